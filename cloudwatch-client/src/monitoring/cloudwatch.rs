//! [`MonitoringService`] backed by the AWS SDK.
//!
//! Authentication, signing, transport and retries are left to the SDK. This
//! module only converts payloads and maps SDK errors onto [`MonitorError`].

use async_trait::async_trait;
use aws_sdk_cloudwatch::config::Credentials;
use aws_sdk_cloudwatch::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudwatch::operation::RequestId;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types as cw;
use aws_sdk_cloudwatch::Client;
use tracing::debug;

use super::config::ClientConfig;
use super::port::MonitoringService;
use super::types::{
    AlarmPage, AlarmSpec, DeleteAlarmsRequest, DescribeAlarmsForMetricRequest,
    DescribeAlarmsRequest, Dimension, MetricAlarm, MetricDataRequest, MetricDatum, RequestReceipt,
};
use crate::error::{MonitorError, MonitorResult};

/// Error codes CloudWatch returns for rejected credentials.
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "ExpiredToken",
    "ExpiredTokenException",
    "IncompleteSignature",
    "InvalidAccessKeyId",
    "InvalidClientTokenId",
    "MissingAuthenticationToken",
    "SignatureDoesNotMatch",
    "UnrecognizedClientException",
];

/// Error codes CloudWatch returns for malformed requests.
const VALIDATION_ERROR_CODES: &[&str] = &[
    "InvalidFormat",
    "InvalidNextToken",
    "InvalidParameterCombination",
    "InvalidParameterInput",
    "InvalidParameterValue",
    "MissingParameter",
    "MissingRequiredParameter",
    "ValidationError",
];

/// CloudWatch client for one region.
#[derive(Debug, Clone)]
pub struct CloudWatchService {
    client: Client,
}

impl CloudWatchService {
    /// Builds an SDK client for [`ClientConfig::region`], using the static
    /// credentials of the config when present and the default provider chain
    /// otherwise.
    pub async fn from_config(config: &ClientConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region().to_string()));

        if let Some(credentials) = config.credentials() {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id(),
                credentials.secret_access_key().expose(),
                None,
                None,
                "cloudwatch-client",
            ));
        }

        debug!(
            region = config.region(),
            static_credentials = config.credentials().is_some(),
            "Building CloudWatch client"
        );

        Self::from_client(Client::new(&loader.load().await))
    }

    /// Wraps an already configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MonitoringService for CloudWatchService {
    async fn put_metric_data(&self, request: &MetricDataRequest) -> MonitorResult<RequestReceipt> {
        let metric_data = request
            .metric_data
            .iter()
            .map(to_metric_datum)
            .collect::<MonitorResult<Vec<_>>>()?;

        let output = self
            .client
            .put_metric_data()
            .namespace(&request.namespace)
            .set_metric_data(Some(metric_data))
            .send()
            .await
            .map_err(classify)?;

        Ok(RequestReceipt {
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn put_metric_alarm(&self, alarm: &AlarmSpec) -> MonitorResult<RequestReceipt> {
        let output = self
            .client
            .put_metric_alarm()
            .namespace(&alarm.namespace)
            .alarm_name(&alarm.alarm_name)
            .set_alarm_description(alarm.alarm_description.clone())
            .metric_name(&alarm.metric_name)
            .statistic(cw::Statistic::from(alarm.statistic.as_str()))
            .set_dimensions(Some(to_dimensions(&alarm.dimensions)))
            .period(to_i32("Period", alarm.period)?)
            .unit(cw::StandardUnit::from(alarm.unit.as_str()))
            .evaluation_periods(to_i32("EvaluationPeriods", alarm.evaluation_periods)?)
            .datapoints_to_alarm(to_i32("DatapointsToAlarm", alarm.datapoints_to_alarm)?)
            .threshold(alarm.threshold)
            .comparison_operator(cw::ComparisonOperator::from(
                alarm.comparison_operator.as_str(),
            ))
            .treat_missing_data(alarm.treat_missing_data.as_str())
            .set_actions_enabled(alarm.actions_enabled)
            .set_alarm_actions(non_empty(&alarm.alarm_actions))
            .set_ok_actions(non_empty(&alarm.ok_actions))
            .set_insufficient_data_actions(non_empty(&alarm.insufficient_data_actions))
            .send()
            .await
            .map_err(classify)?;

        Ok(RequestReceipt {
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn delete_alarms(&self, request: &DeleteAlarmsRequest) -> MonitorResult<RequestReceipt> {
        let output = self
            .client
            .delete_alarms()
            .set_alarm_names(Some(request.alarm_names.clone()))
            .send()
            .await
            .map_err(classify)?;

        Ok(RequestReceipt {
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn describe_alarms(&self, request: &DescribeAlarmsRequest) -> MonitorResult<AlarmPage> {
        let output = self
            .client
            .describe_alarms()
            .state_value(cw::StateValue::from(request.state_value.as_str()))
            .set_alarm_name_prefix(request.alarm_name_prefix.clone())
            .max_records(to_i32("MaxRecords", request.max_records)?)
            .set_next_token(request.next_token.clone())
            .send()
            .await
            .map_err(classify)?;

        Ok(AlarmPage {
            alarms: output.metric_alarms().iter().map(from_metric_alarm).collect(),
            next_token: output.next_token().map(str::to_string),
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn describe_alarms_for_metric(
        &self,
        request: &DescribeAlarmsForMetricRequest,
    ) -> MonitorResult<AlarmPage> {
        let output = self
            .client
            .describe_alarms_for_metric()
            .namespace(&request.namespace)
            .metric_name(&request.metric_name)
            .set_dimensions(Some(to_dimensions(&request.dimensions)))
            .send()
            .await
            .map_err(classify)?;

        Ok(AlarmPage {
            alarms: output.metric_alarms().iter().map(from_metric_alarm).collect(),
            next_token: None,
            request_id: output.request_id().map(str::to_string),
        })
    }
}

/// Maps an SDK error onto the client's error taxonomy.
fn classify<E, R>(err: SdkError<E, R>) -> MonitorError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::ServiceError(context) => classify_code(context.err().code(), message),
        SdkError::ConstructionFailure(_) => MonitorError::validation(message),
        _ => MonitorError::transport(message),
    }
}

fn classify_code(code: Option<&str>, message: String) -> MonitorError {
    match code {
        Some(code) if AUTH_ERROR_CODES.contains(&code) => MonitorError::auth(message),
        Some(code) if VALIDATION_ERROR_CODES.contains(&code) => MonitorError::validation(message),
        _ => MonitorError::transport(message),
    }
}

fn to_i32(field: &str, value: u32) -> MonitorResult<i32> {
    i32::try_from(value)
        .map_err(|_| MonitorError::validation(format!("{field} {value} is out of range")))
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn to_dimensions(dimensions: &[Dimension]) -> Vec<cw::Dimension> {
    dimensions
        .iter()
        .map(|d| cw::Dimension::builder().name(&d.name).value(&d.value).build())
        .collect()
}

fn to_metric_datum(datum: &MetricDatum) -> MonitorResult<cw::MetricDatum> {
    let storage_resolution = datum
        .storage_resolution
        .map(|r| to_i32("StorageResolution", r))
        .transpose()?;

    Ok(cw::MetricDatum::builder()
        .metric_name(&datum.metric_name)
        .set_dimensions(Some(to_dimensions(&datum.dimensions)))
        .value(datum.value)
        .unit(cw::StandardUnit::from(datum.unit.as_str()))
        .set_timestamp(datum.timestamp.map(|t| DateTime::from_millis(t.timestamp_millis())))
        .set_storage_resolution(storage_resolution)
        .build())
}

fn from_metric_alarm(alarm: &cw::MetricAlarm) -> MetricAlarm {
    MetricAlarm {
        alarm_name: alarm.alarm_name().unwrap_or_default().to_string(),
        namespace: alarm.namespace().map(str::to_string),
        metric_name: alarm.metric_name().map(str::to_string),
        state_value: alarm.state_value().and_then(|s| s.as_str().parse().ok()),
        threshold: alarm.threshold(),
        dimensions: alarm
            .dimensions()
            .iter()
            .map(|d| Dimension::new(d.name().unwrap_or_default(), d.value().unwrap_or_default()))
            .collect(),
    }
}
