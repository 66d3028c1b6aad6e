//! Service metadata and configuration debug handlers.

use axum::{extract::State, response::IntoResponse, Json};
use relay_core::DonationSource;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::AppState;

/// Health/info response structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    /// Always `online` while the server is answering.
    pub status: &'static str,
    /// Human-readable service name.
    pub service: &'static str,
    /// Platforms with a webhook route.
    pub platforms: [DonationSource; 2],
    /// Target universe.
    pub universe_id: String,
    /// Target topic.
    pub messaging_topic: String,
    /// Route paths by purpose.
    pub endpoints: Endpoints,
}

/// Route paths advertised by [`ServiceInfo`].
#[derive(Debug, Serialize)]
pub struct Endpoints {
    /// Saweria webhook route.
    pub saweria: &'static str,
    /// SocialBuzz webhook route.
    pub socialbuzz: &'static str,
    /// Manual test route.
    pub test: &'static str,
}

/// Configuration snapshot for operators. The API key is masked.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Target universe.
    pub universe_id: String,
    /// Target topic.
    pub messaging_topic: String,
    /// Derived publish URL.
    pub api_url: String,
    /// Whether an API key is configured.
    pub has_api_key: bool,
    /// First eight characters of the key followed by `...`.
    pub api_key_prefix: String,
    /// Platforms with a webhook route.
    pub supported_platforms: [DonationSource; 2],
}

/// Health check endpoint handler.
///
/// Answers from configuration only; it never calls the messaging service.
#[instrument(name = "service_info", skip_all)]
pub async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Serving service info");

    Json(ServiceInfo {
        status: "online",
        service: "Multi-Platform → Roblox Webhook",
        platforms: DonationSource::PLATFORMS,
        universe_id: state.config.universe_id.clone(),
        messaging_topic: state.config.messaging_topic.clone(),
        endpoints: Endpoints {
            saweria: "/saweria-webhook",
            socialbuzz: "/socialbuzz-webhook",
            test: "/test",
        },
    })
}

/// Configuration debug endpoint handler.
#[instrument(name = "debug_info", skip_all)]
pub async fn debug_info(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;

    Json(DebugInfo {
        universe_id: config.universe_id.clone(),
        messaging_topic: config.messaging_topic.clone(),
        api_url: state.publisher.url().to_string(),
        has_api_key: config.has_api_key(),
        api_key_prefix: config.api_key_prefix(),
        supported_platforms: DonationSource::PLATFORMS,
    })
}
