//! Request construction.
//!
//! Every payload is built in layers, later layers winning:
//!
//! 1. built-in alarm defaults ([`AlarmDefaults`]) and the client configuration,
//! 2. the client's default alarm overrides (alarms only),
//! 3. per-call arguments (dimensions, unit, threshold),
//! 4. the per-call escape hatch ([`MetricDataOverrides`] / [`AlarmOverrides`]).
//!
//! The escape hatch may replace structural fields such as the namespace. It is
//! meant for callers that need raw control over a single request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::config::ClientConfig;
use super::normalize::{full_alarm_name, normalize, normalize_dimensions};
use super::types::{
    AlarmSpec, AlarmState, ComparisonOperator, DeleteAlarmsRequest, DescribeAlarmsForMetricRequest,
    DescribeAlarmsRequest, Dimension, MetricDataRequest, MetricDatum, Statistic, TreatMissingData,
    Unit,
};

/// Page size used when listing alarms.
pub const DESCRIBE_ALARMS_PAGE_SIZE: u32 = 100;

/// Built-in values of the alarm fields a call does not set.
pub struct AlarmDefaults;

impl AlarmDefaults {
    pub const STATISTIC: Statistic = Statistic::Average;
    /// Three hours.
    pub const PERIOD_SECS: u32 = 60 * 60 * 3;
    pub const EVALUATION_PERIODS: u32 = 8;
    pub const DATAPOINTS_TO_ALARM: u32 = 8;
    pub const COMPARISON_OPERATOR: ComparisonOperator = ComparisonOperator::GreaterThanThreshold;
    pub const TREAT_MISSING_DATA: TreatMissingData = TreatMissingData::Breaching;
}

/// Raw per-call overrides of a `PutMetricData` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricDataOverrides {
    pub namespace: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// 1 for high-resolution metrics, 60 for standard.
    pub storage_resolution: Option<u32>,
}

impl MetricDataOverrides {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_storage_resolution(mut self, seconds: u32) -> Self {
        self.storage_resolution = Some(seconds);
        self
    }

    fn apply(&self, request: &mut MetricDataRequest) {
        if let Some(namespace) = &self.namespace {
            request.namespace = normalize(namespace);
        }
        for datum in &mut request.metric_data {
            if self.timestamp.is_some() {
                datum.timestamp = self.timestamp;
            }
            if self.storage_resolution.is_some() {
                datum.storage_resolution = self.storage_resolution;
            }
        }
    }
}

/// Alarm fields that can be overridden, each independently.
///
/// Used both as the client-wide alarm defaults and as the per-call escape
/// hatch of [`AlarmOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmOverrides {
    pub namespace: Option<String>,
    pub alarm_description: Option<String>,
    pub statistic: Option<Statistic>,
    pub period: Option<u32>,
    pub unit: Option<Unit>,
    pub evaluation_periods: Option<u32>,
    pub datapoints_to_alarm: Option<u32>,
    pub threshold: Option<f64>,
    pub comparison_operator: Option<ComparisonOperator>,
    pub treat_missing_data: Option<TreatMissingData>,
    pub actions_enabled: Option<bool>,
    pub alarm_actions: Option<Vec<String>>,
    pub ok_actions: Option<Vec<String>>,
    pub insufficient_data_actions: Option<Vec<String>>,
}

impl AlarmOverrides {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.alarm_description = Some(description.into());
        self
    }

    pub fn with_statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = Some(statistic);
        self
    }

    /// Evaluation period in seconds.
    pub fn with_period(mut self, seconds: u32) -> Self {
        self.period = Some(seconds);
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_evaluation_periods(mut self, periods: u32) -> Self {
        self.evaluation_periods = Some(periods);
        self
    }

    pub fn with_datapoints_to_alarm(mut self, datapoints: u32) -> Self {
        self.datapoints_to_alarm = Some(datapoints);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_comparison_operator(mut self, operator: ComparisonOperator) -> Self {
        self.comparison_operator = Some(operator);
        self
    }

    pub fn with_treat_missing_data(mut self, policy: TreatMissingData) -> Self {
        self.treat_missing_data = Some(policy);
        self
    }

    pub fn with_actions_enabled(mut self, enabled: bool) -> Self {
        self.actions_enabled = Some(enabled);
        self
    }

    /// ARNs notified when the alarm enters `ALARM`, e.g. an SNS topic.
    pub fn with_alarm_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alarm_actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_ok_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ok_actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_insufficient_data_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insufficient_data_actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    /// Writes every field that is set into `spec`.
    pub fn apply(&self, spec: &mut AlarmSpec) {
        if let Some(namespace) = &self.namespace {
            spec.namespace = normalize(namespace);
        }
        if let Some(description) = &self.alarm_description {
            spec.alarm_description = Some(description.clone());
        }
        if let Some(statistic) = self.statistic {
            spec.statistic = statistic;
        }
        if let Some(period) = self.period {
            spec.period = period;
        }
        if let Some(unit) = self.unit {
            spec.unit = unit;
        }
        if let Some(periods) = self.evaluation_periods {
            spec.evaluation_periods = periods;
        }
        if let Some(datapoints) = self.datapoints_to_alarm {
            spec.datapoints_to_alarm = datapoints;
        }
        if let Some(threshold) = self.threshold {
            spec.threshold = threshold;
        }
        if let Some(operator) = self.comparison_operator {
            spec.comparison_operator = operator;
        }
        if let Some(policy) = self.treat_missing_data {
            spec.treat_missing_data = policy;
        }
        if let Some(enabled) = self.actions_enabled {
            spec.actions_enabled = Some(enabled);
        }
        if let Some(actions) = &self.alarm_actions {
            spec.alarm_actions = actions.clone();
        }
        if let Some(actions) = &self.ok_actions {
            spec.ok_actions = actions.clone();
        }
        if let Some(actions) = &self.insufficient_data_actions {
            spec.insufficient_data_actions = actions.clone();
        }
    }
}

/// Per-call input of [`MetricsClient::submit_value`](super::MetricsClient::submit_value).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOptions {
    pub dimensions: BTreeMap<String, String>,
    pub unit: Option<Unit>,
    pub overrides: MetricDataOverrides,
}

impl SubmitOptions {
    /// Add a dimension; on a name collision it replaces the client default.
    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_overrides(mut self, overrides: MetricDataOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Per-call input of [`MetricsClient::set_alarm`](super::MetricsClient::set_alarm).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmOptions {
    /// Replaces the threshold of the client alarm defaults when set.
    pub threshold: Option<f64>,
    pub dimensions: BTreeMap<String, String>,
    pub unit: Option<Unit>,
    /// Send the alarm even if one with the same name exists.
    pub update_if_exists: bool,
    pub overrides: AlarmOverrides,
}

impl AlarmOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_update_if_exists(mut self, update: bool) -> Self {
        self.update_if_exists = update;
        self
    }

    pub fn with_overrides(mut self, overrides: AlarmOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Builds request payloads from a [`ClientConfig`] and per-call input.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Namespaced, normalized alarm name.
    pub fn full_alarm_name(&self, alarm_name: &str) -> String {
        full_alarm_name(self.config.namespace(), alarm_name)
    }

    /// Client default dimensions merged with `overrides`, sorted by name.
    pub fn dimensions(&self, overrides: &BTreeMap<String, String>) -> Vec<Dimension> {
        let mut merged = self.config.dimensions().clone();
        merged.extend(normalize_dimensions(overrides));
        merged
            .into_iter()
            .map(|(name, value)| Dimension { name, value })
            .collect()
    }

    pub fn metric_data(
        &self,
        metric_name: &str,
        value: f64,
        options: &SubmitOptions,
    ) -> MetricDataRequest {
        let mut request = MetricDataRequest {
            namespace: self.config.namespace().to_string(),
            metric_data: vec![MetricDatum {
                metric_name: normalize(metric_name),
                dimensions: self.dimensions(&options.dimensions),
                value,
                unit: options.unit.unwrap_or(self.config.unit()),
                timestamp: None,
                storage_resolution: None,
            }],
        };
        options.overrides.apply(&mut request);
        request
    }

    pub fn alarm(&self, alarm_name: &str, metric_name: &str, options: &AlarmOptions) -> AlarmSpec {
        let mut spec = AlarmSpec {
            namespace: self.config.namespace().to_string(),
            alarm_name: self.full_alarm_name(alarm_name),
            alarm_description: None,
            metric_name: normalize(metric_name),
            statistic: AlarmDefaults::STATISTIC,
            dimensions: Vec::new(),
            period: AlarmDefaults::PERIOD_SECS,
            unit: self.config.unit(),
            evaluation_periods: AlarmDefaults::EVALUATION_PERIODS,
            datapoints_to_alarm: AlarmDefaults::DATAPOINTS_TO_ALARM,
            threshold: 0.0,
            comparison_operator: AlarmDefaults::COMPARISON_OPERATOR,
            treat_missing_data: AlarmDefaults::TREAT_MISSING_DATA,
            actions_enabled: None,
            alarm_actions: Vec::new(),
            ok_actions: Vec::new(),
            insufficient_data_actions: Vec::new(),
        };
        self.config.alarm_defaults().apply(&mut spec);

        spec.dimensions = self.dimensions(&options.dimensions);
        if let Some(threshold) = options.threshold {
            spec.threshold = threshold;
        }
        if let Some(unit) = options.unit {
            spec.unit = unit;
        }

        options.overrides.apply(&mut spec);
        spec
    }

    /// Lookup of the alarms attached to a metric in the client namespace.
    ///
    /// [`AlarmSpec::lookup`] is the variant that follows a namespace
    /// replaced by alarm overrides.
    pub fn alarm_lookup(
        &self,
        metric_name: &str,
        dimensions: &BTreeMap<String, String>,
    ) -> DescribeAlarmsForMetricRequest {
        DescribeAlarmsForMetricRequest {
            namespace: self.config.namespace().to_string(),
            metric_name: normalize(metric_name),
            dimensions: self.dimensions(dimensions),
        }
    }

    pub fn delete_alarm(&self, alarm_name: &str) -> DeleteAlarmsRequest {
        DeleteAlarmsRequest {
            alarm_names: vec![self.full_alarm_name(alarm_name)],
        }
    }

    /// First page request of an alarm listing. The name prefix is only set
    /// for a non-empty namespace; CloudWatch rejects an empty prefix.
    pub fn list_alarms(&self, state: AlarmState) -> DescribeAlarmsRequest {
        let prefix = (!self.config.namespace().is_empty()).then(|| self.full_alarm_name(""));
        DescribeAlarmsRequest {
            state_value: state,
            alarm_name_prefix: prefix,
            max_records: DESCRIBE_ALARMS_PAGE_SIZE,
            next_token: None,
        }
    }
}
