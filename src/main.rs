//! Donation relay service.
//!
//! Main entry point. Loads configuration, builds the publish client and
//! serves the webhook routes until a shutdown signal arrives.

use anyhow::{Context, Result};
use relay_api::{AppState, RelayConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    info!("Starting donation relay");

    let config = RelayConfig::load().context("Invalid relay configuration")?;
    info!(
        universe_id = %config.universe_id,
        messaging_topic = %config.messaging_topic,
        publish_url = %config.publish_url(),
        api_key = %config.api_key_prefix(),
        delivery_timeout_seconds = ?config.delivery_timeout_seconds,
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;
    let state = AppState::new(config).context("Failed to build publish client")?;

    relay_api::start_server(state, addr).await.context("Server failed")?;

    info!("Donation relay shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new("info,donation_relay=debug,relay_api=debug,tower_http=debug")
        })
        .context("Invalid RUST_LOG environment variable")?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
