//! Integration tests for the publish client.
//!
//! Runs the client against a wiremock server standing in for the messaging
//! service and checks the request shape, single-attempt behavior and error
//! classification.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use relay_core::{DonationRecord, DonationSource};
use relay_publish::{client::publish_url, PublishClient, PublishConfig, PublishError};
use serde_json::json;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key-0123456789";
const TOPIC_PATH: &str = "/messaging-service/v1/universes/4242/topics/MedusaIDRBroadcast";

fn donation() -> DonationRecord {
    DonationRecord {
        username: "Budi123".to_string(),
        display_name: "Budi".to_string(),
        amount: 15000,
        timestamp: 1_700_000_000,
        source: DonationSource::Saweria,
        message: "[Budi123] semangat!".to_string(),
        email: "budi@example.com".to_string(),
    }
}

fn client_for(server: &MockServer) -> PublishClient {
    let url = publish_url(&server.uri(), "4242", "MedusaIDRBroadcast");
    PublishClient::new(PublishConfig::new(url, API_KEY)).expect("client should build")
}

#[tokio::test]
async fn publishes_record_as_string_message() {
    let server = MockServer::start().await;
    let record = donation();
    let expected_message = serde_json::to_string(&record).unwrap();

    Mock::given(matchers::method("POST"))
        .and(matchers::path(TOPIC_PATH))
        .and(matchers::header("x-api-key", API_KEY))
        .and(matchers::header("content-type", "application/json"))
        .and(matchers::body_json(json!({ "message": expected_message })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).publish(&record).await.expect("publish should succeed");

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "");
}

#[tokio::test]
async fn client_error_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "errors": [{ "message": "Invalid API Key" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server).publish(&donation()).await.unwrap_err();

    assert_eq!(error.status_code(), Some(401));
    assert!(matches!(error, PublishError::ClientError { .. }));
    assert_eq!(error.detail(), json!({ "errors": [{ "message": "Invalid API Key" }] }));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server).publish(&donation()).await.unwrap_err();

    assert!(matches!(error, PublishError::ServerError { status_code: 503, .. }));
    assert_eq!(error.detail(), json!("Service Unavailable"));
    server.verify().await;
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = publish_url(&format!("http://{addr}"), "4242", "MedusaIDRBroadcast");
    let client = PublishClient::new(PublishConfig::new(url, API_KEY)).unwrap();

    let error = client.publish(&donation()).await.unwrap_err();

    assert!(matches!(error, PublishError::NetworkError { .. }), "got {error:?}");
    assert_eq!(error.status_code(), None);
}

#[tokio::test]
async fn configured_timeout_is_enforced() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let url = publish_url(&server.uri(), "4242", "MedusaIDRBroadcast");
    let config = PublishConfig {
        timeout: Some(Duration::from_millis(100)),
        ..PublishConfig::new(url, API_KEY)
    };
    let client = PublishClient::new(config).unwrap();

    let error = client.publish(&donation()).await.unwrap_err();

    assert!(matches!(error, PublishError::Timeout { .. }), "got {error:?}");
}

#[tokio::test]
async fn json_response_body_exposed() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let response = client_for(&server).publish(&donation()).await.unwrap();

    assert_eq!(response.body_json(), json!({ "ok": true }));
}
