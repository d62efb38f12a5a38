//! # cloudwatch-client
//!
//! A thin client for submitting metric values to AWS CloudWatch and managing
//! alarms on them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloudwatch_client::prelude::*;
//!
//! # async fn example() -> MonitorResult<()> {
//! let config = ClientConfig::new()
//!     .with_namespace("jn.importer")
//!     .with_dimension("Environment", "prod")
//!     .with_unit(Unit::Count);
//!
//! // Requires the `cloudwatch` feature.
//! let service = CloudWatchService::from_config(&config).await;
//! let client = MetricsClient::new(config, service);
//!
//! client
//!     .submit_value("ImportedJobs", 120.0, SubmitOptions::default())
//!     .await?;
//!
//! client
//!     .set_alarm(
//!         "NoJobsImported",
//!         "ImportedJobs",
//!         AlarmOptions::default()
//!             .with_threshold(1.0)
//!             .with_overrides(
//!                 AlarmOverrides::default()
//!                     .with_comparison_operator(ComparisonOperator::LessThanThreshold),
//!             ),
//!     )
//!     .await?;
//!
//! let firing = client.list_alarms(AlarmState::Alarm).await?;
//! println!("{} alarms firing", firing.alarms.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Behavior
//!
//! - **Normalization**: metric names, alarm names, dimension names and values
//!   and the namespace are mapped to ASCII (`ä` → `ae`, `ß` → `ss`, other
//!   non-ASCII characters dropped).
//! - **Alarm names**: `{namespace}.{alarm_name}`, or just the alarm name when
//!   the namespace is empty.
//! - **Alarm upsert**: `set_alarm` looks up the alarms of the metric first and
//!   does nothing if one with the same full name exists, unless
//!   `update_if_exists` is set.
//! - **Errors**: logged and swallowed by default; every operation reports the
//!   outcome in its return value. Set `raise_on_error` to get `Err` instead.
//! - **Debug mode**: sends everything to `af-south-1` instead of `eu-central-1`.
//!
//! ## Architecture
//!
//! - **`monitoring`**: the client, request building, normalization and the
//!   [`MonitoringService`](monitoring::MonitoringService) port
//! - **`error`**: the error taxonomy
//! - **`logging`**: log payload settings and subscriber setup
//! - **`security`**: credential storage

pub mod error;
pub mod logging;
pub mod monitoring;
pub mod prelude;
pub mod security;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
