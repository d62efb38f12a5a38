//! MetricsClient - submits metric values and manages alarms.
//!
//! Every operation builds one request, hands it to the [`MonitoringService`]
//! and logs the outcome. Failures are handled according to
//! [`ClientConfig::raise_on_error`]:
//!
//! - `false` (default): the error is logged with the full request payload and
//!   the call returns `Ok` with [`DispatchOutcome::Failed`]. Callers that do not
//!   inspect the outcome will not notice the failure.
//! - `true`: the error is logged and returned as `Err`.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudwatch_client::monitoring::{AlarmOptions, ClientConfig, MetricsClient, SubmitOptions, Unit};
//!
//! let config = ClientConfig::new()
//!     .with_namespace("jn.importer")
//!     .with_dimension("Environment", "prod");
//! let client = MetricsClient::new(config, service);
//!
//! client
//!     .submit_value("ImportedJobs", 120.0, SubmitOptions::default().with_unit(Unit::Count))
//!     .await?;
//!
//! // Created once; later calls find the existing alarm and do nothing.
//! client
//!     .set_alarm("NoJobsImported", "ImportedJobs", AlarmOptions::default().with_threshold(0.0))
//!     .await?;
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info, instrument};

use super::config::ClientConfig;
use super::port::MonitoringService;
use super::request::{AlarmOptions, RequestBuilder, SubmitOptions};
use super::types::{
    AlarmListing, AlarmSpec, AlarmState, DeleteAlarmsRequest, DescribeAlarmsForMetricRequest,
    Dispatch, DispatchOutcome, MetricDataRequest, RequestReceipt,
};
use crate::error::{MonitorError, MonitorResult};
use crate::logging::{payload_json, truncate_field};

/// What the existence check found out about an alarm name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmPresence {
    /// The check was skipped because the caller forces an update.
    NotChecked,
    Exists,
    Absent,
}

impl AlarmPresence {
    /// The alarm is sent when the caller forces it or when none exists yet.
    pub fn should_send(self, update_if_exists: bool) -> bool {
        update_if_exists || self == AlarmPresence::Absent
    }
}

/// Client for one namespace of the monitoring service.
///
/// Holds only immutable configuration, so a single instance can be shared
/// between tasks as long as the service implementation allows it.
pub struct MetricsClient<S> {
    config: ClientConfig,
    service: S,
}

impl<S: MonitoringService> MetricsClient<S> {
    pub fn new(config: ClientConfig, service: S) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Request builder bound to this client's configuration.
    pub fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config)
    }

    /// Sends a single value.
    ///
    /// Call dimensions are merged over the client defaults; the unit falls back
    /// to the client default. Returns the request that was sent.
    #[instrument(skip_all, fields(metric = metric_name, value = value))]
    pub async fn submit_value(
        &self,
        metric_name: &str,
        value: f64,
        options: SubmitOptions,
    ) -> MonitorResult<Dispatch<MetricDataRequest>> {
        let request = self.requests().metric_data(metric_name, value, &options);
        let result = self.service.put_metric_data(&request).await;
        self.settle("submit_value", request, result)
    }

    /// Creates an alarm unless one with the same full name is already attached
    /// to the metric.
    ///
    /// With `update_if_exists` the existence check is skipped and the alarm is
    /// always sent. Without it there is a window between the check and the
    /// create call in which a concurrent caller can create the same alarm;
    /// CloudWatch then keeps the last write.
    #[instrument(skip_all, fields(alarm = alarm_name, metric = metric_name))]
    pub async fn set_alarm(
        &self,
        alarm_name: &str,
        metric_name: &str,
        options: AlarmOptions,
    ) -> MonitorResult<Dispatch<AlarmSpec>> {
        let spec = self.requests().alarm(alarm_name, metric_name, &options);

        let presence = if options.update_if_exists {
            AlarmPresence::NotChecked
        } else {
            match self.lookup_alarm(&spec.alarm_name, &spec.lookup()).await {
                Ok(true) => AlarmPresence::Exists,
                Ok(false) => AlarmPresence::Absent,
                Err(err) if self.config.raise_on_error() => return Err(err),
                Err(_) => AlarmPresence::Absent,
            }
        };

        if !presence.should_send(options.update_if_exists) {
            info!(
                alarm_name = %spec.alarm_name,
                debug_mode = self.config.debug_mode(),
                "Alarm already exists, not updating"
            );
            return Ok(Dispatch {
                request: spec,
                outcome: DispatchOutcome::AlreadyExists,
            });
        }

        let result = self.service.put_metric_alarm(&spec).await;
        self.settle("set_alarm", spec, result)
    }

    /// Whether an alarm named `alarm_name` (namespaced by this client) is
    /// attached to the metric with the given dimensions.
    ///
    /// Errors are always returned, regardless of `raise_on_error`.
    pub async fn alarm_exists(
        &self,
        alarm_name: &str,
        metric_name: &str,
        dimensions: &BTreeMap<String, String>,
    ) -> MonitorResult<bool> {
        let requests = self.requests();
        let full_name = requests.full_alarm_name(alarm_name);
        let lookup = requests.alarm_lookup(metric_name, dimensions);
        self.lookup_alarm(&full_name, &lookup).await
    }

    #[instrument(skip(self))]
    pub async fn delete_alarm(&self, alarm_name: &str) -> MonitorResult<Dispatch<DeleteAlarmsRequest>> {
        let request = self.requests().delete_alarm(alarm_name);
        let result = self.service.delete_alarms(&request).await;
        self.settle("delete_alarm", request, result)
    }

    /// Lists every alarm of this client's namespace in `state`, following the
    /// continuation cursor until the service stops returning one.
    ///
    /// In swallow mode a failing page ends the listing; the alarms read so far
    /// are returned with a `Failed` outcome.
    #[instrument(skip(self))]
    pub async fn list_alarms(&self, state: AlarmState) -> MonitorResult<AlarmListing> {
        let mut request = self.requests().list_alarms(state);
        let mut alarms = Vec::new();
        let mut pages = 0;

        let request_id = loop {
            let page = match self.service.describe_alarms(&request).await {
                Ok(page) => page,
                Err(err) => {
                    error!(
                        operation = "list_alarms",
                        error = %err,
                        kind = err.kind(),
                        pages,
                        debug_mode = self.config.debug_mode(),
                        request = %payload_json(&request),
                        "Request failed"
                    );
                    if self.config.raise_on_error() {
                        return Err(err);
                    }
                    return Ok(AlarmListing {
                        alarms,
                        pages,
                        outcome: DispatchOutcome::Failed(err),
                    });
                }
            };

            pages += 1;
            let next_token = page.cursor().map(str::to_string);
            alarms.extend(page.alarms);

            match next_token {
                Some(token) => request.next_token = Some(token),
                None => break page.request_id,
            }
        };

        info!(
            operation = "list_alarms",
            namespace = %self.config.namespace(),
            found = alarms.len(),
            pages,
            request_id = request_id.as_deref().unwrap_or("-"),
            debug_mode = self.config.debug_mode(),
            "Listed alarms"
        );

        Ok(AlarmListing {
            alarms,
            pages,
            outcome: DispatchOutcome::Sent { request_id },
        })
    }

    async fn lookup_alarm(
        &self,
        full_name: &str,
        lookup: &DescribeAlarmsForMetricRequest,
    ) -> MonitorResult<bool> {
        match self.service.describe_alarms_for_metric(lookup).await {
            Ok(page) => {
                let exists = page.alarms.iter().any(|a| a.alarm_name == full_name);
                info!(
                    operation = "alarm_exists",
                    alarm_name = %full_name,
                    exists,
                    request_id = page.request_id.as_deref().unwrap_or("-"),
                    debug_mode = self.config.debug_mode(),
                    request = %self.success_payload(lookup),
                    "Checked for existing alarm"
                );
                Ok(exists)
            }
            Err(err) => {
                error!(
                    operation = "alarm_exists",
                    alarm_name = %full_name,
                    error = %err,
                    kind = err.kind(),
                    debug_mode = self.config.debug_mode(),
                    request = %payload_json(lookup),
                    "Request failed"
                );
                Err(err)
            }
        }
    }

    /// Logs the outcome of a write call and applies the error policy.
    fn settle<R: Serialize>(
        &self,
        operation: &'static str,
        request: R,
        result: MonitorResult<RequestReceipt>,
    ) -> MonitorResult<Dispatch<R>> {
        match result {
            Ok(receipt) => {
                info!(
                    operation,
                    request_id = receipt.request_id.as_deref().unwrap_or("-"),
                    debug_mode = self.config.debug_mode(),
                    request = %self.success_payload(&request),
                    "Request sent"
                );
                Ok(Dispatch {
                    request,
                    outcome: DispatchOutcome::Sent {
                        request_id: receipt.request_id,
                    },
                })
            }
            Err(err) => self.fail(operation, request, err),
        }
    }

    fn fail<R: Serialize>(
        &self,
        operation: &'static str,
        request: R,
        err: MonitorError,
    ) -> MonitorResult<Dispatch<R>> {
        error!(
            operation,
            error = %err,
            kind = err.kind(),
            debug_mode = self.config.debug_mode(),
            request = %payload_json(&request),
            "Request failed"
        );
        if self.config.raise_on_error() {
            Err(err)
        } else {
            Ok(Dispatch {
                request,
                outcome: DispatchOutcome::Failed(err),
            })
        }
    }

    fn success_payload<R: Serialize>(&self, request: &R) -> String {
        let log_config = self.config.log_config();
        if log_config.log_payloads {
            truncate_field(&payload_json(request), log_config.max_field_length)
        } else {
            "-".to_string()
        }
    }
}
