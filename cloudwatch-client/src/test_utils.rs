//! In-memory monitoring service for tests.
//!
//! [`StubMonitoringService`] records every call, keeps created alarms so the
//! existence check sees them, serves scripted alarm pages and can be told to
//! fail a given operation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{MonitorError, MonitorResult};
use crate::monitoring::{
    AlarmPage, AlarmSpec, DeleteAlarmsRequest, DescribeAlarmsForMetricRequest,
    DescribeAlarmsRequest, MetricAlarm, MetricDataRequest, MonitoringService, RequestReceipt,
};

/// The operations of [`MonitoringService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PutMetricData,
    PutMetricAlarm,
    DeleteAlarms,
    DescribeAlarms,
    DescribeAlarmsForMetric,
}

/// A call received by the stub, with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    PutMetricData(MetricDataRequest),
    PutMetricAlarm(AlarmSpec),
    DeleteAlarms(DeleteAlarmsRequest),
    DescribeAlarms(DescribeAlarmsRequest),
    DescribeAlarmsForMetric(DescribeAlarmsForMetricRequest),
}

impl RecordedCall {
    pub fn operation(&self) -> Operation {
        match self {
            RecordedCall::PutMetricData(_) => Operation::PutMetricData,
            RecordedCall::PutMetricAlarm(_) => Operation::PutMetricAlarm,
            RecordedCall::DeleteAlarms(_) => Operation::DeleteAlarms,
            RecordedCall::DescribeAlarms(_) => Operation::DescribeAlarms,
            RecordedCall::DescribeAlarmsForMetric(_) => Operation::DescribeAlarmsForMetric,
        }
    }
}

#[derive(Default)]
struct StubState {
    calls: Vec<RecordedCall>,
    alarms: Vec<MetricAlarm>,
    pages: VecDeque<AlarmPage>,
    failures: HashMap<Operation, MonitorError>,
    requests_served: u64,
}

impl StubState {
    /// Records the call and returns the scripted failure or a fresh request id.
    fn handle(&mut self, call: RecordedCall) -> MonitorResult<String> {
        let operation = call.operation();
        self.calls.push(call);
        if let Some(err) = self.failures.get(&operation) {
            return Err(err.clone());
        }
        self.requests_served += 1;
        Ok(format!("stub-request-{}", self.requests_served))
    }
}

/// Scriptable in-memory [`MonitoringService`].
#[derive(Default)]
pub struct StubMonitoringService {
    state: Mutex<StubState>,
}

impl StubMonitoringService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an alarm that already exists in the service.
    pub fn with_alarm(mut self, alarm: MetricAlarm) -> Self {
        self.state_mut().alarms.push(alarm);
        self
    }

    /// Script the pages returned by `describe_alarms`, in order.
    pub fn with_pages(mut self, pages: impl IntoIterator<Item = AlarmPage>) -> Self {
        self.state_mut().pages.extend(pages);
        self
    }

    /// Make every call of `operation` fail with `error`.
    pub fn failing(mut self, operation: Operation, error: MonitorError) -> Self {
        self.state_mut().failures.insert(operation, error);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Alarms currently stored by the stub.
    pub fn alarms(&self) -> Vec<MetricAlarm> {
        self.state().alarms.clone()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut StubState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MonitoringService for StubMonitoringService {
    async fn put_metric_data(&self, request: &MetricDataRequest) -> MonitorResult<RequestReceipt> {
        let request_id = self
            .state()
            .handle(RecordedCall::PutMetricData(request.clone()))?;
        Ok(RequestReceipt::new(request_id))
    }

    async fn put_metric_alarm(&self, alarm: &AlarmSpec) -> MonitorResult<RequestReceipt> {
        let mut state = self.state();
        let request_id = state.handle(RecordedCall::PutMetricAlarm(alarm.clone()))?;
        state.alarms.retain(|a| a.alarm_name != alarm.alarm_name);
        state.alarms.push(MetricAlarm::from(alarm));
        Ok(RequestReceipt::new(request_id))
    }

    async fn delete_alarms(&self, request: &DeleteAlarmsRequest) -> MonitorResult<RequestReceipt> {
        let mut state = self.state();
        let request_id = state.handle(RecordedCall::DeleteAlarms(request.clone()))?;
        state
            .alarms
            .retain(|a| !request.alarm_names.contains(&a.alarm_name));
        Ok(RequestReceipt::new(request_id))
    }

    async fn describe_alarms(&self, request: &DescribeAlarmsRequest) -> MonitorResult<AlarmPage> {
        let mut state = self.state();
        let request_id = state.handle(RecordedCall::DescribeAlarms(request.clone()))?;
        if let Some(mut page) = state.pages.pop_front() {
            page.request_id.get_or_insert(request_id);
            return Ok(page);
        }

        let prefix = request.alarm_name_prefix.as_deref().unwrap_or("");
        let alarms = state
            .alarms
            .iter()
            .filter(|a| a.alarm_name.starts_with(prefix))
            .filter(|a| a.state_value.map_or(true, |s| s == request.state_value))
            .cloned()
            .collect();
        Ok(AlarmPage {
            alarms,
            next_token: None,
            request_id: Some(request_id),
        })
    }

    async fn describe_alarms_for_metric(
        &self,
        request: &DescribeAlarmsForMetricRequest,
    ) -> MonitorResult<AlarmPage> {
        let mut state = self.state();
        let request_id = state.handle(RecordedCall::DescribeAlarmsForMetric(request.clone()))?;
        let alarms = state
            .alarms
            .iter()
            .filter(|a| a.namespace.as_deref() == Some(request.namespace.as_str()))
            .filter(|a| a.metric_name.as_deref() == Some(request.metric_name.as_str()))
            .filter(|a| a.dimensions == request.dimensions)
            .cloned()
            .collect();
        Ok(AlarmPage {
            alarms,
            next_token: None,
            request_id: Some(request_id),
        })
    }
}
