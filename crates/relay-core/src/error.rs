//! Error types and result handling for relay operations.
//!
//! Covers the request-scoped failures a handler can hit (missing or
//! malformed payloads, failed forwards) and the fatal startup failure for
//! missing configuration. Ignored events are not errors; see
//! [`crate::Normalized::Ignored`].

use thiserror::Error;

/// Result type alias using `RelayError`.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Inbound body was absent or an empty JSON object.
    #[error("payload not found")]
    EmptyPayload,

    /// Inbound body could not be read as a JSON object.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Required configuration value missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Outbound publish call failed.
    #[error("failed to forward donation: {0}")]
    Forward(String),
}

impl RelayError {
    /// Returns whether this error was caused by the inbound caller.
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::EmptyPayload | Self::InvalidPayload(_))
    }
}
