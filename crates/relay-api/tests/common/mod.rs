//! Shared fixtures for relay API integration tests.

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::{
    sync::Arc,
    time::{Duration, UNIX_EPOCH},
};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use relay_api::{create_router, AppState, RelayConfig};
use relay_core::{DonationRecord, TestClock};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub const API_KEY: &str = "rbx-test-key-0123456789";
pub const UNIVERSE_ID: &str = "4242";
pub const TOPIC_PATH: &str = "/messaging-service/v1/universes/4242/topics/MedusaIDRBroadcast";
pub const FIXED_TIMESTAMP: u64 = 1_700_000_000;

pub fn config_for(server: &MockServer) -> RelayConfig {
    RelayConfig {
        roblox_api_key: API_KEY.to_string(),
        universe_id: UNIVERSE_ID.to_string(),
        publish_base_url: server.uri(),
        ..RelayConfig::default()
    }
}

pub fn app_for(server: &MockServer) -> Router {
    let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(FIXED_TIMESTAMP));
    let state = AppState::with_clock(config_for(server), Arc::new(clock))
        .expect("app state should build");
    create_router(state)
}

pub async fn send(app: Router, method: &str, path: &str, body: Body) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(body)
        .expect("request should build");

    app.oneshot(request).await.expect("router should respond")
}

pub async fn post_json(app: Router, path: &str, body: &Value) -> Response {
    send(app, "POST", path, Body::from(body.to_string())).await
}

pub async fn read_text(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
    (status, String::from_utf8(bytes.to_vec()).expect("body should be UTF-8"))
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let (status, text) = read_text(response).await;
    (status, serde_json::from_str(&text).expect("body should be JSON"))
}

/// Decodes every record the mock messaging service received.
pub async fn published_records(server: &MockServer) -> Vec<DonationRecord> {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .iter()
        .map(|request| {
            let envelope: Value = serde_json::from_slice(&request.body).expect("envelope JSON");
            let message = envelope["message"].as_str().expect("message should be a string");
            serde_json::from_str(message).expect("message should hold a record")
        })
        .collect()
}
