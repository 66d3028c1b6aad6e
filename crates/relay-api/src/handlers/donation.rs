//! Donation webhook handlers.
//!
//! Both provider routes run the same pipeline with their own
//! [`ProviderProfile`]: parse the body, normalize it, publish the record.
//! Responses are plain text since providers only look at the status code.

use axum::{
    extract::State,
    Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use relay_core::{
    normalize, parse_payload, Normalized, ProviderProfile, RelayError, SAWERIA, SOCIALBUZZ,
};
use relay_publish::ErrorCategory;
use tracing::{debug, error, info, instrument, warn};

use crate::{server::RequestId, AppState};

/// Receives a Saweria webhook.
///
/// Only `type: "donation"` events are forwarded; other event types are
/// acknowledged with 200 and dropped.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: Body missing, empty or not a JSON object
/// - 500: Publish failed
#[instrument(name = "saweria_webhook", skip_all, fields(request_id = %request_id.0))]
pub async fn saweria_webhook(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    relay_donation(&state, &SAWERIA, &body).await
}

/// Receives a SocialBuzz webhook.
///
/// Every non-empty payload is treated as a donation.
#[instrument(name = "socialbuzz_webhook", skip_all, fields(request_id = %request_id.0))]
pub async fn socialbuzz_webhook(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    relay_donation(&state, &SOCIALBUZZ, &body).await
}

async fn relay_donation(state: &AppState, profile: &ProviderProfile, body: &[u8]) -> Response {
    let source = profile.source;
    debug!(%source, payload = %String::from_utf8_lossy(body), "Webhook received");

    let payload = match parse_payload(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(%source, error = %e, "Rejecting webhook");
            return error_response(&e);
        },
    };

    let record = match normalize(&payload, profile, state.clock.as_ref()) {
        Ok(Normalized::Record(record)) => record,
        Ok(Normalized::Ignored { event_type }) => {
            info!(
                %source,
                event_type = event_type.as_deref().unwrap_or("none"),
                "Ignoring non-donation event"
            );
            return (StatusCode::OK, "OK - Ignored non-donation event").into_response();
        },
        Err(e) => {
            warn!(%source, error = %e, "Rejecting webhook");
            return error_response(&e);
        },
    };

    info!(
        %source,
        username = %record.username,
        display_name = %record.display_name,
        amount = record.amount,
        "Donation received"
    );

    match state.publisher.publish(&record).await {
        Ok(_) => (StatusCode::OK, format!("OK - {source} donation processed")).into_response(),
        Err(e) => {
            error!(
                %source,
                error = %e,
                category = %ErrorCategory::from(&e),
                status = ?e.status_code(),
                "Failed to forward donation"
            );
            error_response(&RelayError::from(e))
        },
    }
}

/// Maps a relay error onto the plain-text response providers receive.
///
/// Publish failure detail stays in the logs.
fn error_response(error: &RelayError) -> Response {
    if error.is_bad_request() {
        return (StatusCode::BAD_REQUEST, "Bad Request: Payload not found").into_response();
    }

    match error {
        RelayError::Forward(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error: Failed to forward to Roblox",
        )
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
    }
}
