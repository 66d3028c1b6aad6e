//! Error types for publish operations.
//!
//! A publish is a single attempt; these errors are reported to the caller
//! as-is and never retried by the relay. Response bodies are kept so the
//! test endpoint can echo the platform's error detail.

use std::fmt;

use relay_core::RelayError;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Publish failure taxonomy.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// No response: DNS, connect or transport failure.
    #[error("messaging service unreachable: {message}")]
    NetworkError {
        /// Transport error text.
        message: String,
    },

    /// Configured publish timeout elapsed.
    #[error("publish timed out after {timeout_seconds}s")]
    Timeout {
        /// Configured timeout.
        timeout_seconds: u64,
    },

    /// Publish endpoint answered with a 4xx status.
    #[error("publish rejected: HTTP {status_code}")]
    ClientError {
        /// Status returned by the endpoint.
        status_code: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Publish endpoint answered with any other non-2xx status.
    #[error("messaging service failed: HTTP {status_code}")]
    ServerError {
        /// Status returned by the endpoint.
        status_code: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// HTTP client could not be configured.
    #[error("invalid publish configuration: {message}")]
    ConfigurationError {
        /// Builder error text.
        message: String,
    },

    /// Record could not be encoded.
    #[error("internal publish error: {message}")]
    InternalError {
        /// Encoder error text.
        message: String,
    },
}

impl PublishError {
    /// Transport failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    /// Timeout after `timeout_seconds`.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates the error for a non-2xx response.
    pub fn rejected(status_code: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status_code {
            400..=499 => Self::ClientError { status_code, body },
            _ => Self::ServerError { status_code, body },
        }
    }

    /// Client construction failure.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }

    /// Encoding failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError { message: message.into() }
    }

    /// Returns the HTTP status if the endpoint answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ClientError { status_code, .. } | Self::ServerError { status_code, .. } => {
                Some(*status_code)
            },
            _ => None,
        }
    }

    /// Returns the error detail shown to test callers.
    ///
    /// For rejected publishes this is the endpoint's response body, decoded
    /// as JSON when possible. Otherwise it is the error message.
    pub fn detail(&self) -> Value {
        match self {
            Self::ClientError { body, .. } | Self::ServerError { body, .. } => body_value(body),
            other => Value::String(other.to_string()),
        }
    }
}

impl From<PublishError> for RelayError {
    fn from(error: PublishError) -> Self {
        Self::Forward(error.to_string())
    }
}

/// Decodes a response body as JSON, falling back to a plain string.
pub(crate) fn body_value(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

/// Coarse failure class, logged as the `category` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No response, including timeouts.
    Network,
    /// 4xx: usually a bad key, scope or topic.
    Client,
    /// Any other non-2xx status.
    Server,
    /// HTTP client could not be built.
    Configuration,
    /// Record encoding failed.
    Internal,
}

impl ErrorCategory {
    /// Lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Client => "client",
            Self::Server => "server",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }
}

impl From<&PublishError> for ErrorCategory {
    fn from(error: &PublishError) -> Self {
        match error {
            PublishError::NetworkError { .. } | PublishError::Timeout { .. } => Self::Network,
            PublishError::ClientError { .. } => Self::Client,
            PublishError::ServerError { .. } => Self::Server,
            PublishError::ConfigurationError { .. } => Self::Configuration,
            PublishError::InternalError { .. } => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
