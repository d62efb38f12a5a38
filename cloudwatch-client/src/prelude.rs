//! Prelude for commonly used types and traits in cloudwatch-client.

pub use crate::error::{MonitorError, MonitorResult};
pub use crate::logging::LogConfig;
#[cfg(feature = "cloudwatch")]
pub use crate::monitoring::CloudWatchService;
pub use crate::monitoring::{
    AlarmOptions, AlarmOverrides, AlarmState, ClientConfig, ComparisonOperator, Dispatch,
    DispatchOutcome, MetricsClient, MonitoringService, Statistic, SubmitOptions,
    TreatMissingData, Unit,
};
