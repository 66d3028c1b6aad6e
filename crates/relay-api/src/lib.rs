//! HTTP API for the donation relay.
//!
//! Exposes the provider webhook routes, the manual test route and the
//! info/debug routes. All handlers share one immutable [`AppState`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use relay_core::{Clock, RealClock};
use relay_publish::{PublishClient, PublishError};

pub mod config;
pub mod handlers;
pub mod server;

pub use config::RelayConfig;
pub use server::{create_router, start_server};

/// Shared application state.
///
/// Built once at startup. Nothing in it is mutated while serving, so
/// requests never coordinate with each other.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded relay configuration.
    pub config: Arc<RelayConfig>,
    /// Publish client bound to the configured topic.
    pub publisher: PublishClient,
    /// Time source for record timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates application state using the system clock.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::ConfigurationError` if the HTTP client cannot
    /// be built.
    pub fn new(config: RelayConfig) -> Result<Self, PublishError> {
        Self::with_clock(config, Arc::new(RealClock::new()))
    }

    /// Creates application state with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::ConfigurationError` if the HTTP client cannot
    /// be built.
    pub fn with_clock(config: RelayConfig, clock: Arc<dyn Clock>) -> Result<Self, PublishError> {
        let publisher = PublishClient::new(config.to_publish_config())?;
        Ok(Self { config: Arc::new(config), publisher, clock })
    }
}
