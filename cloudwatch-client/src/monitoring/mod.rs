//! Metric submission and alarm management for AWS CloudWatch.
//!
//! [`MetricsClient`] turns caller input into CloudWatch requests and hands them
//! to a [`MonitoringService`]. Identifiers are normalized to ASCII, dimensions
//! and units are merged with the client defaults, and alarms are only created
//! when no alarm with the same full name exists yet.

mod client;
#[cfg(feature = "cloudwatch")]
mod cloudwatch;
mod config;
mod normalize;
mod port;
mod request;
mod types;

pub use client::{AlarmPresence, MetricsClient};
#[cfg(feature = "cloudwatch")]
pub use cloudwatch::CloudWatchService;
pub use config::{ClientConfig, DEBUG_REGION, PRIMARY_REGION};
pub use normalize::{full_alarm_name, normalize, normalize_dimensions};
pub use port::MonitoringService;
pub use request::{
    AlarmDefaults, AlarmOptions, AlarmOverrides, MetricDataOverrides, RequestBuilder,
    SubmitOptions, DESCRIBE_ALARMS_PAGE_SIZE,
};
pub use types::{
    AlarmListing, AlarmPage, AlarmSpec, AlarmState, ComparisonOperator, DeleteAlarmsRequest,
    DescribeAlarmsForMetricRequest, DescribeAlarmsRequest, Dimension, Dispatch, DispatchOutcome,
    MetricAlarm, MetricDataRequest, MetricDatum, RequestReceipt, Statistic, TreatMissingData, Unit,
};
