//! Error types for the CloudWatch client.
//!
//! All failures reported by the monitoring collaborator are mapped onto
//! [`MonitorError`]. The client itself never retries; an error surfaces once
//! and the caller decides whether to propagate it.

use thiserror::Error;

/// Errors that can occur when talking to the monitoring service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Network or service failure (connection refused, timeout, 5xx, throttling).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The service rejected the credentials.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The service rejected the request (invalid unit, missing field, ...).
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// Client-side configuration error.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl MonitorError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Short label of the error kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MonitorError::Transport { .. } => "transport",
            MonitorError::Auth { .. } => "auth",
            MonitorError::Validation { .. } => "validation",
            MonitorError::Configuration { .. } => "configuration",
        }
    }
}

/// Result type for monitoring operations.
pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
