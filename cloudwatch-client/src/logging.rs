//! Logging configuration for the CloudWatch client.
//!
//! The client logs through `tracing`. Every operation emits one event: `info`
//! on success, `error` with the full request payload on failure. [`LogConfig`]
//! controls how much of the payload ends up in success events, and
//! [`setup::init_logging`] installs a `tracing-subscriber` for applications
//! that do not configure one themselves.

use serde::Serialize;

/// Logging configuration for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether success events carry the request payload
    pub log_payloads: bool,
    /// Maximum length of a payload in success events
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_payloads: true,
            max_field_length: 2048,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            log_payloads: true,
            max_field_length: usize::MAX,
        }
    }

    /// Creates a quiet configuration: success events without payloads.
    pub fn production() -> Self {
        Self {
            log_payloads: false,
            max_field_length: 256,
        }
    }
}

/// Truncates a string to the maximum field length if needed.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Renders a request payload as JSON for log output.
pub fn payload_json<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|e| format!("<unserializable payload: {e}>"))
}

/// Subscriber setup for applications that do not configure `tracing`
/// themselves.
///
/// The AWS SDK and its HTTP stack log every request attempt at `debug`, which
/// drowns the client's own events. [`LoggingConfig`] gives them a separate
/// level.
pub mod setup {
    use std::io;

    use tracing::{Level, Subscriber};
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
    use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

    /// Log targets of the AWS SDK and the HTTP crates under it.
    pub const SDK_TARGETS: &[&str] = &[
        "aws_config",
        "aws_sdk_cloudwatch",
        "aws_smithy_runtime",
        "aws_smithy_runtime_api",
        "hyper",
        "hyper_util",
    ];

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LoggingConfig {
        /// Level of every target not listed otherwise
        pub default_level: Level,
        /// Level of `cloudwatch_client` events
        pub client_level: Level,
        /// Level of the [`SDK_TARGETS`]
        pub sdk_level: Level,
        pub json_format: bool,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                default_level: Level::INFO,
                client_level: Level::INFO,
                sdk_level: Level::WARN,
                json_format: false,
            }
        }
    }

    impl LoggingConfig {
        /// JSON output, client events from `info`, SDK events from `error`.
        pub fn production() -> Self {
            Self {
                sdk_level: Level::ERROR,
                json_format: true,
                ..Self::default()
            }
        }

        pub fn with_client_level(mut self, level: Level) -> Self {
            self.client_level = level;
            self
        }

        pub fn with_sdk_level(mut self, level: Level) -> Self {
            self.sdk_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Filter directives, most general first.
        pub fn directives(&self) -> Vec<String> {
            let mut directives = vec![
                level_name(self.default_level),
                format!("cloudwatch_client={}", level_name(self.client_level)),
            ];
            directives.extend(
                SDK_TARGETS
                    .iter()
                    .map(|target| format!("{target}={}", level_name(self.sdk_level))),
            );
            directives
        }

        pub fn env_filter(&self) -> EnvFilter {
            EnvFilter::new(self.directives().join(","))
        }
    }

    fn level_name(level: Level) -> String {
        level.as_str().to_lowercase()
    }

    /// Builds a subscriber writing to `writer`, without installing it.
    pub fn subscriber<W>(
        config: &LoggingConfig,
        writer: W,
    ) -> impl Subscriber + Send + Sync + 'static
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        layered(config.env_filter(), config.json_format, writer)
    }

    /// Installs a global subscriber writing to stdout.
    ///
    /// `RUST_LOG`, when set, replaces the configured directives.
    ///
    /// ```rust,no_run
    /// use cloudwatch_client::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(&LoggingConfig::production()).unwrap();
    /// ```
    pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.env_filter());
        layered(filter, config.json_format, io::stdout).try_init()
    }

    fn layered<W>(
        filter: EnvFilter,
        json: bool,
        writer: W,
    ) -> impl Subscriber + Send + Sync + 'static
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let fmt_layer = if json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer().with_writer(writer).boxed()
        };

        tracing_subscriber::registry().with(filter).with(fmt_layer)
    }
}

#[cfg(test)]
mod tests {
    use super::setup::LoggingConfig;
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert!(config.log_payloads);
        assert_eq!(config.max_field_length, 2048);
    }

    #[test]
    fn test_log_config_production() {
        let config = LogConfig::production();
        assert!(!config.log_payloads);
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");

        let long_text = "this is a very long text that should be truncated";
        assert_eq!(truncate_field(long_text, 10), "this is a ...(truncated)");
    }

    #[test]
    fn test_truncate_field_respects_char_boundaries() {
        assert_eq!(truncate_field("aü", 2), "a...(truncated)");
    }

    #[test]
    fn test_directives_quiet_the_sdk() {
        let directives = LoggingConfig::default().directives();
        assert_eq!(directives[0], "info");
        assert_eq!(directives[1], "cloudwatch_client=info");
        assert!(directives.contains(&"aws_smithy_runtime=warn".to_string()));
        assert_eq!(directives.len(), 2 + setup::SDK_TARGETS.len());
    }

    #[test]
    fn test_directive_levels_follow_config() {
        let directives = LoggingConfig::production()
            .with_client_level(tracing::Level::DEBUG)
            .directives();
        assert!(directives.contains(&"cloudwatch_client=debug".to_string()));
        assert!(directives.contains(&"hyper=error".to_string()));

        let filter = LoggingConfig::default()
            .with_sdk_level(tracing::Level::TRACE)
            .env_filter()
            .to_string();
        assert!(filter.contains("aws_config=trace"));
    }
}
