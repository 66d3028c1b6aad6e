//! Manual publish endpoint for checking the Roblox integration.
//!
//! Builds a synthetic donation from optional request fields and publishes
//! it. Unlike the webhook routes, the platform's response or error detail is
//! echoed back so operators can diagnose key and topic problems.

use axum::{
    extract::State,
    Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use relay_core::{parse_payload, synthetic_record, DonationRecord};
use relay_publish::ErrorCategory;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::{server::RequestId, AppState};

/// Response for a successful test publish.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPublishSuccess {
    /// Always `true`.
    pub success: bool,
    /// HTTP status returned by the messaging service.
    pub status: u16,
    /// Record that was published.
    pub sent_payload: DonationRecord,
    /// Messaging service response body.
    pub roblox_response: Value,
}

/// Response for a failed test publish.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPublishFailure {
    /// Always `false`.
    pub success: bool,
    /// Messaging service error body, or the transport error message.
    pub error: Value,
    /// Record that was attempted.
    pub sent_payload: DonationRecord,
}

/// Publishes a synthetic donation built from the request body.
///
/// Missing, malformed or empty bodies fall back to the default test record.
///
/// # Errors
///
/// Returns 500 with the failure detail if the publish fails.
#[instrument(name = "test_publish", skip_all, fields(request_id = %request_id.0))]
pub async fn test_publish(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let overrides = parse_payload(&body).unwrap_or_default();
    let record = synthetic_record(&overrides, state.clock.as_ref());

    info!(
        source = %record.source,
        username = %record.username,
        amount = record.amount,
        "Sending test donation"
    );

    match state.publisher.publish(&record).await {
        Ok(response) => (
            StatusCode::OK,
            Json(TestPublishSuccess {
                success: true,
                status: response.status_code,
                roblox_response: response.body_json(),
                sent_payload: record,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, category = %ErrorCategory::from(&e), "Test publish failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestPublishFailure { success: false, error: e.detail(), sent_payload: record }),
            )
                .into_response()
        },
    }
}
