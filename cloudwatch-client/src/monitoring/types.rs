use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, MonitorResult};

/// Declares an enum whose variants map one-to-one onto CloudWatch wire strings.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The CloudWatch wire string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MonitorError;

            fn from_str(s: &str) -> MonitorResult<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        MonitorError::configuration(format!(
                            "unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

wire_enum! {
    /// CloudWatch standard units.
    #[derive(Default)]
    pub enum Unit {
        Seconds => "Seconds",
        Microseconds => "Microseconds",
        Milliseconds => "Milliseconds",
        Bytes => "Bytes",
        Kilobytes => "Kilobytes",
        Megabytes => "Megabytes",
        Gigabytes => "Gigabytes",
        Terabytes => "Terabytes",
        Bits => "Bits",
        Kilobits => "Kilobits",
        Megabits => "Megabits",
        Gigabits => "Gigabits",
        Terabits => "Terabits",
        Percent => "Percent",
        Count => "Count",
        BytesPerSecond => "Bytes/Second",
        KilobytesPerSecond => "Kilobytes/Second",
        MegabytesPerSecond => "Megabytes/Second",
        GigabytesPerSecond => "Gigabytes/Second",
        TerabytesPerSecond => "Terabytes/Second",
        BitsPerSecond => "Bits/Second",
        KilobitsPerSecond => "Kilobits/Second",
        MegabitsPerSecond => "Megabits/Second",
        GigabitsPerSecond => "Gigabits/Second",
        TerabitsPerSecond => "Terabits/Second",
        CountPerSecond => "Count/Second",
        #[default]
        None => "None",
    }
}

wire_enum! {
    /// Statistic an alarm evaluates.
    pub enum Statistic {
        SampleCount => "SampleCount",
        Average => "Average",
        Sum => "Sum",
        Minimum => "Minimum",
        Maximum => "Maximum",
    }
}

wire_enum! {
    /// How the statistic is compared against the threshold.
    pub enum ComparisonOperator {
        GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
        GreaterThanThreshold => "GreaterThanThreshold",
        LessThanThreshold => "LessThanThreshold",
        LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
        LessThanLowerOrGreaterThanUpperThreshold => "LessThanLowerOrGreaterThanUpperThreshold",
        LessThanLowerThreshold => "LessThanLowerThreshold",
        GreaterThanUpperThreshold => "GreaterThanUpperThreshold",
    }
}

wire_enum! {
    /// How an alarm treats periods without data points.
    pub enum TreatMissingData {
        Breaching => "breaching",
        NotBreaching => "notBreaching",
        Ignore => "ignore",
        Missing => "missing",
    }
}

wire_enum! {
    /// Alarm state, also used as the state filter when listing alarms.
    pub enum AlarmState {
        Ok => "OK",
        Alarm => "ALARM",
        InsufficientData => "INSUFFICIENT_DATA",
    }
}

/// A name/value pair narrowing a metric to a sub-stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
    pub value: f64,
    pub unit: Unit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_resolution: Option<u32>,
}

/// Payload of a `PutMetricData` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataRequest {
    pub namespace: String,
    pub metric_data: Vec<MetricDatum>,
}

/// Payload of a `PutMetricAlarm` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmSpec {
    pub namespace: String,
    pub alarm_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_description: Option<String>,
    pub metric_name: String,
    pub statistic: Statistic,
    pub dimensions: Vec<Dimension>,
    /// Evaluation period in seconds.
    pub period: u32,
    pub unit: Unit,
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
    pub threshold: f64,
    pub comparison_operator: ComparisonOperator,
    pub treat_missing_data: TreatMissingData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alarm_actions: Vec<String>,
    #[serde(default, rename = "OKActions", skip_serializing_if = "Vec::is_empty")]
    pub ok_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insufficient_data_actions: Vec<String>,
}

impl AlarmSpec {
    /// Lookup of the alarms attached to this alarm's metric, in the namespace
    /// the alarm is created in.
    pub fn lookup(&self) -> DescribeAlarmsForMetricRequest {
        DescribeAlarmsForMetricRequest {
            namespace: self.namespace.clone(),
            metric_name: self.metric_name.clone(),
            dimensions: self.dimensions.clone(),
        }
    }
}

/// Payload of a `DeleteAlarms` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteAlarmsRequest {
    pub alarm_names: Vec<String>,
}

/// Payload of a `DescribeAlarms` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAlarmsRequest {
    pub state_value: AlarmState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_name_prefix: Option<String>,
    pub max_records: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Payload of a `DescribeAlarmsForMetric` call.
///
/// Only the fields that identify an alarm's metric are part of the lookup.
/// Unit and threshold are left out so alarms edited by hand are still found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAlarmsForMetricRequest {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
}

/// An alarm as described by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricAlarm {
    pub alarm_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_value: Option<AlarmState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

impl MetricAlarm {
    pub fn new(alarm_name: impl Into<String>) -> Self {
        Self {
            alarm_name: alarm_name.into(),
            namespace: None,
            metric_name: None,
            state_value: None,
            threshold: None,
            dimensions: Vec::new(),
        }
    }
}

impl From<&AlarmSpec> for MetricAlarm {
    fn from(spec: &AlarmSpec) -> Self {
        Self {
            alarm_name: spec.alarm_name.clone(),
            namespace: Some(spec.namespace.clone()),
            metric_name: Some(spec.metric_name.clone()),
            state_value: Some(AlarmState::InsufficientData),
            threshold: Some(spec.threshold),
            dimensions: spec.dimensions.clone(),
        }
    }
}

/// One page of alarms returned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmPage {
    pub alarms: Vec<MetricAlarm>,
    pub next_token: Option<String>,
    pub request_id: Option<String>,
}

impl AlarmPage {
    /// The continuation cursor, treating an empty token as absent.
    pub fn cursor(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Acknowledgement of a write call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestReceipt {
    pub request_id: Option<String>,
}

impl RequestReceipt {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
        }
    }
}

/// What happened to a request handed to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The service accepted the request.
    Sent { request_id: Option<String> },
    /// An alarm with the same full name already exists; nothing was sent.
    AlreadyExists,
    /// The call failed and the client is configured to swallow errors.
    Failed(MonitorError),
}

/// A request together with what became of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch<R> {
    pub request: R,
    pub outcome: DispatchOutcome,
}

impl<R> Dispatch<R> {
    pub fn is_sent(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Sent { .. })
    }

    /// The swallowed error, if the call failed.
    pub fn error(&self) -> Option<&MonitorError> {
        match &self.outcome {
            DispatchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match &self.outcome {
            DispatchOutcome::Sent { request_id } => request_id.as_deref(),
            _ => None,
        }
    }
}

/// Alarms collected across every page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmListing {
    pub alarms: Vec<MetricAlarm>,
    pub pages: usize,
    /// `Sent` with the last page's request id, or `Failed` when a page errored
    /// in swallow mode. `alarms` then holds what was read before the failure.
    pub outcome: DispatchOutcome,
}
