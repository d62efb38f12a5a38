use std::collections::BTreeMap;

use super::normalize::{normalize, normalize_dimensions};
use super::request::AlarmOverrides;
use super::types::Unit;
use crate::logging::LogConfig;
use crate::security::StaticCredentials;

/// Region all data is sent to by default (Frankfurt).
pub const PRIMARY_REGION: &str = "eu-central-1";

/// Region used in debug mode (Cape Town), so test data never mixes with production.
pub const DEBUG_REGION: &str = "af-south-1";

/// Configuration of a [`MetricsClient`](super::MetricsClient).
///
/// Namespace and default dimensions are normalized to ASCII when set.
///
/// ```rust
/// use cloudwatch_client::monitoring::{ClientConfig, Unit};
///
/// let config = ClientConfig::new()
///     .with_namespace("jn.importer")
///     .with_dimension("Environment", "prod")
///     .with_unit(Unit::Count);
///
/// assert_eq!(config.namespace(), "jn.importer");
/// assert_eq!(config.region(), "eu-central-1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    namespace: String,
    dimensions: BTreeMap<String, String>,
    unit: Unit,
    alarm_defaults: AlarmOverrides,
    debug_mode: bool,
    raise_on_error: bool,
    region: String,
    debug_region: String,
    credentials: Option<StaticCredentials>,
    log_config: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Create a configuration with an empty namespace, no default dimensions,
    /// unit `None`, and errors logged but not returned.
    pub fn new() -> Self {
        Self {
            namespace: String::new(),
            dimensions: BTreeMap::new(),
            unit: Unit::None,
            alarm_defaults: AlarmOverrides::default(),
            debug_mode: false,
            raise_on_error: false,
            region: PRIMARY_REGION.to_string(),
            debug_region: DEBUG_REGION.to_string(),
            credentials: None,
            log_config: LogConfig::default(),
        }
    }

    /// Set the namespace, e.g. `jn.importer`.
    pub fn with_namespace(mut self, namespace: impl AsRef<str>) -> Self {
        self.namespace = normalize(namespace.as_ref());
        self
    }

    /// Add a dimension attached to every data point and alarm.
    pub fn with_dimension(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.dimensions
            .insert(normalize(name.as_ref()), normalize(value.as_ref()));
        self
    }

    /// Replace the default dimensions.
    pub fn with_dimensions<K, V, I>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.dimensions = normalize_dimensions(dimensions);
        self
    }

    /// Set the unit used when a call does not name one.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Set alarm fields applied to every alarm this client creates.
    pub fn with_alarm_defaults(mut self, overrides: AlarmOverrides) -> Self {
        self.alarm_defaults = overrides;
        self
    }

    /// Send everything to the debug region instead of the primary one.
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Return service errors to the caller instead of only logging them.
    pub fn with_raise_on_error(mut self, raise_on_error: bool) -> Self {
        self.raise_on_error = raise_on_error;
        self
    }

    /// Override the primary region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Override the debug region.
    pub fn with_debug_region(mut self, region: impl Into<String>) -> Self {
        self.debug_region = region.into();
        self
    }

    /// Use a static access key pair instead of the default credential chain.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        let credentials = StaticCredentials::new(access_key_id, secret_access_key);
        self.credentials = (!credentials.is_empty()).then_some(credentials);
        self
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn dimensions(&self) -> &BTreeMap<String, String> {
        &self.dimensions
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn alarm_defaults(&self) -> &AlarmOverrides {
        &self.alarm_defaults
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn raise_on_error(&self) -> bool {
        self.raise_on_error
    }

    /// The region requests go to, depending on debug mode.
    pub fn region(&self) -> &str {
        if self.debug_mode {
            &self.debug_region
        } else {
            &self.region
        }
    }

    pub fn credentials(&self) -> Option<&StaticCredentials> {
        self.credentials.as_ref()
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::new();

        assert_eq!(config.namespace(), "");
        assert!(config.dimensions().is_empty());
        assert_eq!(config.unit(), Unit::None);
        assert_eq!(config.alarm_defaults(), &AlarmOverrides::default());
        assert!(!config.debug_mode());
        assert!(!config.raise_on_error());
        assert_eq!(config.region(), PRIMARY_REGION);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_client_config_normalizes_identifiers() {
        let config = ClientConfig::new()
            .with_namespace("jn.übersicht")
            .with_dimension("Größe", "groß");

        assert_eq!(config.namespace(), "jn.uebersicht");
        assert_eq!(config.dimensions().get("Groesse"), Some(&"gross".to_string()));
    }

    #[test]
    fn test_debug_mode_selects_debug_region() {
        let config = ClientConfig::new().with_debug_mode(true);
        assert_eq!(config.region(), DEBUG_REGION);

        let config = ClientConfig::new()
            .with_debug_region("us-west-2")
            .with_debug_mode(true);
        assert_eq!(config.region(), "us-west-2");

        let config = ClientConfig::new().with_region("eu-west-1");
        assert_eq!(config.region(), "eu-west-1");
    }

    #[test]
    fn test_empty_credentials_fall_back_to_default_chain() {
        let config = ClientConfig::new().with_credentials("", "");
        assert!(config.credentials().is_none());

        let config = ClientConfig::new().with_credentials("AKIAEXAMPLE", "secret");
        assert_eq!(
            config.credentials().map(|c| c.access_key_id()),
            Some("AKIAEXAMPLE")
        );
    }

    #[test]
    fn test_with_dimensions_replaces_defaults() {
        let config = ClientConfig::new()
            .with_dimension("Old", "1")
            .with_dimensions([("Host", "wörker-1")]);

        assert_eq!(config.dimensions().len(), 1);
        assert_eq!(config.dimensions().get("Host"), Some(&"woerker-1".to_string()));
    }
}
