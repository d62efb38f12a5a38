use std::sync::Arc;

use async_trait::async_trait;

use super::types::{
    AlarmPage, AlarmSpec, DeleteAlarmsRequest, DescribeAlarmsForMetricRequest,
    DescribeAlarmsRequest, MetricDataRequest, RequestReceipt,
};
use crate::error::MonitorResult;

/// The calls [`MetricsClient`](super::MetricsClient) makes against the
/// monitoring service.
///
/// Implementations own authentication, transport and retries. Failures are
/// reported as [`MonitorError`](crate::error::MonitorError) once, without
/// being retried by the client.
#[async_trait]
pub trait MonitoringService: Send + Sync {
    async fn put_metric_data(&self, request: &MetricDataRequest) -> MonitorResult<RequestReceipt>;

    async fn put_metric_alarm(&self, alarm: &AlarmSpec) -> MonitorResult<RequestReceipt>;

    async fn delete_alarms(&self, request: &DeleteAlarmsRequest) -> MonitorResult<RequestReceipt>;

    /// One page of alarms; `next_token` on the request continues a listing.
    async fn describe_alarms(&self, request: &DescribeAlarmsRequest) -> MonitorResult<AlarmPage>;

    /// Every alarm attached to the given metric. The page carries no cursor.
    async fn describe_alarms_for_metric(
        &self,
        request: &DescribeAlarmsForMetricRequest,
    ) -> MonitorResult<AlarmPage>;
}

#[async_trait]
impl<T: MonitoringService + ?Sized> MonitoringService for Arc<T> {
    async fn put_metric_data(&self, request: &MetricDataRequest) -> MonitorResult<RequestReceipt> {
        (**self).put_metric_data(request).await
    }

    async fn put_metric_alarm(&self, alarm: &AlarmSpec) -> MonitorResult<RequestReceipt> {
        (**self).put_metric_alarm(alarm).await
    }

    async fn delete_alarms(&self, request: &DeleteAlarmsRequest) -> MonitorResult<RequestReceipt> {
        (**self).delete_alarms(request).await
    }

    async fn describe_alarms(&self, request: &DescribeAlarmsRequest) -> MonitorResult<AlarmPage> {
        (**self).describe_alarms(request).await
    }

    async fn describe_alarms_for_metric(
        &self,
        request: &DescribeAlarmsForMetricRequest,
    ) -> MonitorResult<AlarmPage> {
        (**self).describe_alarms_for_metric(request).await
    }
}
