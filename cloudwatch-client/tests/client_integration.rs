//! End-to-end behavior of `MetricsClient` against the in-memory service.
//!
//! Run with `cargo test --features test-utils`.

#![cfg(feature = "test-utils")]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use cloudwatch_client::logging::setup::{self, LoggingConfig};
use cloudwatch_client::monitoring::{AlarmPage, Dimension, MetricAlarm, MetricDataOverrides};
use cloudwatch_client::prelude::*;
use cloudwatch_client::test_utils::{Operation, RecordedCall, StubMonitoringService};

fn importer_config() -> ClientConfig {
    ClientConfig::new()
        .with_namespace("jn.importer")
        .with_dimension("Environment", "prod")
        .with_unit(Unit::Count)
}

fn alarm(name: &str) -> MetricAlarm {
    MetricAlarm::new(name)
}

#[tokio::test]
async fn test_submit_value_builds_merged_payload() {
    let client = MetricsClient::new(importer_config(), StubMonitoringService::new());

    let dispatch = client
        .submit_value(
            "Jobs Übersicht",
            42.0,
            SubmitOptions::default()
                .with_dimension("Environment", "staging")
                .with_dimension("Größe", "groß"),
        )
        .await
        .unwrap();

    assert!(dispatch.is_sent());
    let RecordedCall::PutMetricData(sent) = &client.service().calls()[0] else {
        panic!("expected put_metric_data");
    };
    assert_eq!(sent, &dispatch.request);
    assert_eq!(sent.namespace, "jn.importer");

    let datum = &sent.metric_data[0];
    assert_eq!(datum.metric_name, "Jobs Uebersicht");
    assert_eq!(datum.unit, Unit::Count);
    assert_eq!(
        datum.dimensions,
        vec![
            Dimension::new("Environment", "staging"),
            Dimension::new("Groesse", "gross"),
        ]
    );
}

#[tokio::test]
async fn test_escape_hatch_overrides_namespace_and_timestamp() {
    let client = MetricsClient::new(importer_config(), StubMonitoringService::new());
    let timestamp = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    let dispatch = client
        .submit_value(
            "Latency",
            1.5,
            SubmitOptions::default()
                .with_unit(Unit::Seconds)
                .with_overrides(
                    MetricDataOverrides::default()
                        .with_namespace("jn.shadow")
                        .with_timestamp(timestamp)
                        .with_storage_resolution(1),
                ),
        )
        .await
        .unwrap();

    assert_eq!(dispatch.request.namespace, "jn.shadow");
    let datum = &dispatch.request.metric_data[0];
    assert_eq!(datum.unit, Unit::Seconds);
    assert_eq!(datum.timestamp, Some(timestamp));
    assert_eq!(datum.storage_resolution, Some(1));
}

#[tokio::test]
async fn test_set_alarm_is_idempotent() {
    let client = MetricsClient::new(importer_config(), StubMonitoringService::new());
    let options = AlarmOptions::default().with_threshold(0.0);

    let first = client
        .set_alarm("NoJobsImported", "ImportedJobs", options.clone())
        .await
        .unwrap();
    let second = client
        .set_alarm("NoJobsImported", "ImportedJobs", options)
        .await
        .unwrap();

    assert!(first.is_sent());
    assert_eq!(second.outcome, DispatchOutcome::AlreadyExists);
    assert_eq!(client.service().call_count(Operation::PutMetricAlarm), 1);
    assert_eq!(client.service().call_count(Operation::DescribeAlarmsForMetric), 2);

    let stored = client.service().alarms();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].alarm_name, "jn.importer.NoJobsImported");
}

#[tokio::test]
async fn test_client_alarm_defaults_keep_upsert_idempotent() {
    let config = importer_config().with_alarm_defaults(
        AlarmOverrides::default()
            .with_namespace("jn.shadow")
            .with_threshold(10.0),
    );
    let client = MetricsClient::new(config, StubMonitoringService::new());

    for _ in 0..3 {
        client
            .set_alarm("NoJobsImported", "ImportedJobs", AlarmOptions::default())
            .await
            .unwrap();
    }

    assert_eq!(client.service().call_count(Operation::PutMetricAlarm), 1);
    let stored = client.service().alarms();
    assert_eq!(stored[0].namespace.as_deref(), Some("jn.shadow"));
    assert_eq!(stored[0].threshold, Some(10.0));
}

#[tokio::test]
async fn test_set_alarm_applies_defaults_and_overrides() {
    let config = importer_config().with_alarm_defaults(
        AlarmOverrides::default()
            .with_period(300)
            .with_alarm_actions(["arn:aws:sns:eu-central-1:123456789012:ops"]),
    );
    let client = MetricsClient::new(config, StubMonitoringService::new());

    let dispatch = client
        .set_alarm(
            "SlowImport",
            "ImportDuration",
            AlarmOptions::default()
                .with_threshold(120.0)
                .with_unit(Unit::Seconds)
                .with_overrides(
                    AlarmOverrides::default()
                        .with_comparison_operator(ComparisonOperator::GreaterThanOrEqualToThreshold)
                        .with_treat_missing_data(TreatMissingData::NotBreaching),
                ),
        )
        .await
        .unwrap();

    let spec = &dispatch.request;
    assert_eq!(spec.alarm_name, "jn.importer.SlowImport");
    assert_eq!(spec.statistic, Statistic::Average);
    assert_eq!(spec.period, 300);
    assert_eq!(spec.evaluation_periods, 8);
    assert_eq!(spec.datapoints_to_alarm, 8);
    assert_eq!(spec.threshold, 120.0);
    assert_eq!(spec.unit, Unit::Seconds);
    assert_eq!(
        spec.comparison_operator,
        ComparisonOperator::GreaterThanOrEqualToThreshold
    );
    assert_eq!(spec.treat_missing_data, TreatMissingData::NotBreaching);
    assert_eq!(spec.alarm_actions.len(), 1);
    assert_eq!(spec.dimensions, vec![Dimension::new("Environment", "prod")]);
}

#[tokio::test]
async fn test_existing_alarm_with_other_dimensions_does_not_count() {
    let existing = MetricAlarm {
        namespace: Some("jn.importer".to_string()),
        metric_name: Some("ImportedJobs".to_string()),
        dimensions: vec![Dimension::new("Environment", "staging")],
        ..alarm("jn.importer.NoJobsImported")
    };
    let client = MetricsClient::new(
        importer_config(),
        StubMonitoringService::new().with_alarm(existing),
    );

    let dispatch = client
        .set_alarm("NoJobsImported", "ImportedJobs", AlarmOptions::default())
        .await
        .unwrap();

    assert!(dispatch.is_sent());
    assert_eq!(client.service().call_count(Operation::PutMetricAlarm), 1);
}

#[tokio::test]
async fn test_swallow_mode_reports_failure_in_outcome() {
    let service = StubMonitoringService::new()
        .failing(Operation::PutMetricData, MonitorError::auth("invalid token"));
    let client = MetricsClient::new(importer_config(), service);

    let dispatch = client
        .submit_value("ImportedJobs", 1.0, SubmitOptions::default())
        .await
        .unwrap();

    assert_eq!(dispatch.error(), Some(&MonitorError::auth("invalid token")));
    assert_eq!(dispatch.request_id(), None);
}

#[tokio::test]
async fn test_raise_mode_returns_error() {
    let service = StubMonitoringService::new()
        .failing(Operation::DeleteAlarms, MonitorError::transport("connection reset"));
    let client = MetricsClient::new(importer_config().with_raise_on_error(true), service);

    let err = client.delete_alarm("NoJobsImported").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_failed_existence_check_in_raise_mode_skips_create() {
    let service = StubMonitoringService::new().failing(
        Operation::DescribeAlarmsForMetric,
        MonitorError::transport("timeout"),
    );
    let client = MetricsClient::new(importer_config().with_raise_on_error(true), service);

    let result = client
        .set_alarm("NoJobsImported", "ImportedJobs", AlarmOptions::default())
        .await;

    assert!(result.is_err());
    assert_eq!(client.service().call_count(Operation::PutMetricAlarm), 0);
}

#[tokio::test]
async fn test_delete_then_recreate() {
    let client = MetricsClient::new(importer_config(), StubMonitoringService::new());
    let options = AlarmOptions::default();

    client
        .set_alarm("NoJobsImported", "ImportedJobs", options.clone())
        .await
        .unwrap();
    let deleted = client.delete_alarm("NoJobsImported").await.unwrap();
    assert_eq!(
        deleted.request.alarm_names,
        vec!["jn.importer.NoJobsImported".to_string()]
    );
    assert!(!client
        .alarm_exists("NoJobsImported", "ImportedJobs", &BTreeMap::new())
        .await
        .unwrap());

    let recreated = client
        .set_alarm("NoJobsImported", "ImportedJobs", options)
        .await
        .unwrap();
    assert!(recreated.is_sent());
}

#[tokio::test]
async fn test_list_alarms_walks_every_page() {
    let service = StubMonitoringService::new().with_pages([
        AlarmPage {
            alarms: vec![alarm("jn.importer.a"), alarm("jn.importer.b")],
            next_token: Some("page-2".to_string()),
            request_id: None,
        },
        AlarmPage {
            alarms: vec![alarm("jn.importer.c")],
            next_token: Some(String::new()),
            request_id: None,
        },
    ]);
    let client = MetricsClient::new(importer_config(), service);

    let listing = client.list_alarms(AlarmState::Alarm).await.unwrap();

    assert_eq!(listing.pages, 2);
    let names: Vec<_> = listing.alarms.iter().map(|a| a.alarm_name.as_str()).collect();
    assert_eq!(names, ["jn.importer.a", "jn.importer.b", "jn.importer.c"]);

    let requests: Vec<_> = client
        .service()
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            RecordedCall::DescribeAlarms(request) => Some(request),
            _ => None,
        })
        .collect();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].alarm_name_prefix.as_deref(), Some("jn.importer."));
    assert_eq!(requests[0].max_records, 100);
    assert_eq!(requests[0].next_token, None);
    assert_eq!(requests[1].next_token.as_deref(), Some("page-2"));
}

#[tokio::test]
async fn test_list_alarms_without_namespace_sends_no_prefix() {
    let client = MetricsClient::new(ClientConfig::new(), StubMonitoringService::new());

    let listing = client
        .list_alarms(AlarmState::InsufficientData)
        .await
        .unwrap();

    assert!(listing.alarms.is_empty());
    let RecordedCall::DescribeAlarms(request) = &client.service().calls()[0] else {
        panic!("expected describe_alarms");
    };
    assert_eq!(request.alarm_name_prefix, None);
    assert_eq!(request.state_value, AlarmState::InsufficientData);
}

#[tokio::test]
async fn test_shared_client_across_tasks() {
    let client = Arc::new(MetricsClient::new(
        importer_config(),
        StubMonitoringService::new(),
    ));

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .submit_value("ImportedJobs", f64::from(i), SubmitOptions::default())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_sent());
    }
    assert_eq!(client.service().call_count(Operation::PutMetricData), 4);
}

/// Collects everything the fmt layer writes.
#[derive(Clone, Default)]
struct LogCapture {
    lines: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lines.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.lines.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_failure_log_carries_full_payload() {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = setup::subscriber(
        &LoggingConfig::default().with_json_format(true),
        move || writer.clone(),
    );
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = importer_config().with_log_config(LogConfig::production());
    let service = StubMonitoringService::new()
        .failing(Operation::PutMetricAlarm, MonitorError::validation("bad period"));
    let client = MetricsClient::new(config, service);

    let dispatch = client
        .set_alarm(
            "NoJobsImported",
            "ImportedJobs",
            AlarmOptions::default().with_update_if_exists(true),
        )
        .await
        .unwrap();
    assert!(dispatch.error().is_some());

    let logs = capture.contents();
    assert!(logs.contains("Request failed"));
    assert!(logs.contains("bad period"));
    assert!(logs.contains("jn.importer.NoJobsImported"));
    assert!(logs.contains("EvaluationPeriods"));
}
