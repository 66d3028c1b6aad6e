//! HTTP client for the Roblox MessagingService publish API.
//!
//! Wraps each donation record in a `{"message": "<json>"}` envelope, signs
//! the request with the static `x-api-key` header and classifies the
//! response. Exactly one request is made per publish.

use std::{
    fmt,
    time::{Duration, Instant},
};

use relay_core::DonationRecord;
use reqwest::Response;
use serde::Serialize;
use serde_json::Value;
use tracing::{info_span, Instrument};

use crate::error::{body_value, PublishError, Result};

/// Header carrying the Open Cloud API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Production Open Cloud host.
pub const DEFAULT_PUBLISH_BASE_URL: &str = "https://apis.roblox.com";

const MAX_RESPONSE_BODY_SIZE: usize = 64 * 1024;

/// Builds the topic publish URL for a universe.
///
/// Both path parameters are percent-encoded.
///
/// # Example
///
/// ```
/// use relay_publish::client::publish_url;
///
/// assert_eq!(
///     publish_url("https://apis.roblox.com", "123", "Donation Feed"),
///     "https://apis.roblox.com/messaging-service/v1/universes/123/topics/Donation%20Feed"
/// );
/// ```
pub fn publish_url(base_url: &str, universe_id: &str, topic: &str) -> String {
    format!(
        "{}/messaging-service/v1/universes/{}/topics/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(universe_id),
        urlencoding::encode(topic)
    )
}

/// Configuration for the publish client.
#[derive(Clone)]
pub struct PublishConfig {
    /// Fully derived topic publish URL.
    pub url: String,
    /// Open Cloud API key sent in `x-api-key`.
    pub api_key: String,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl PublishConfig {
    /// Creates a configuration for `url` with default client settings.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: None,
            user_agent: format!("donation-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("url", &self.url)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Request body for a topic publish.
///
/// The record is carried as a JSON string because the messaging service
/// only accepts string messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEnvelope {
    /// Serialized donation record.
    pub message: String,
}

impl MessageEnvelope {
    /// Serializes `record` into an envelope.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::InternalError` if the record cannot be
    /// serialized.
    pub fn from_record(record: &DonationRecord) -> Result<Self> {
        serde_json::to_string(record)
            .map(|message| Self { message })
            .map_err(|e| PublishError::internal(format!("failed to serialize record: {e}")))
    }
}

/// Successful publish response.
#[derive(Debug, Clone)]
pub struct PublishResponse {
    /// HTTP status code (2xx).
    pub status_code: u16,
    /// Response body, truncated past 64 KiB.
    pub body: String,
    /// Total duration of the request.
    pub duration: Duration,
}

impl PublishResponse {
    /// Returns the body decoded as JSON, or as a plain string if it is not
    /// JSON.
    pub fn body_json(&self) -> Value {
        body_value(&self.body)
    }
}

/// Client for publishing donation records to one messaging topic.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PublishClient {
    client: reqwest::Client,
    config: PublishConfig,
}

impl PublishClient {
    /// Creates a new publish client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::ConfigurationError` if the HTTP client cannot
    /// be built.
    pub fn new(config: PublishConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| PublishError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Returns the topic publish URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Publishes a donation record to the topic.
    ///
    /// # Errors
    ///
    /// - `NetworkError` for connection failures
    /// - `Timeout` when the configured timeout elapses
    /// - `ClientError` / `ServerError` for any non-2xx response
    pub async fn publish(&self, record: &DonationRecord) -> Result<PublishResponse> {
        let envelope = MessageEnvelope::from_record(record)?;

        let span = info_span!(
            "roblox_publish",
            source = %record.source,
            username = %record.username,
            amount = record.amount,
        );

        async move {
            let start_time = Instant::now();
            tracing::debug!(
                url = %self.config.url,
                message = %envelope.message,
                "Sending to messaging service"
            );

            let response = match self
                .client
                .post(&self.config.url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .json(&envelope)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        duration_ms = start_time.elapsed().as_millis(),
                        "No response from messaging service: {}",
                        e
                    );

                    if e.is_timeout() {
                        let timeout_seconds = self.config.timeout.map_or(0, |t| t.as_secs());
                        return Err(PublishError::timeout(timeout_seconds));
                    }
                    if e.is_connect() {
                        return Err(PublishError::network(format!("connection failed: {e}")));
                    }
                    return Err(PublishError::network(e.to_string()));
                },
            };

            let published = read_response(response, start_time.elapsed()).await;

            if !(200..=299).contains(&published.status_code) {
                tracing::warn!(
                    status = published.status_code,
                    body = %published.body,
                    "Messaging service rejected publish"
                );
                return Err(PublishError::rejected(published.status_code, published.body));
            }

            tracing::info!(
                status = published.status_code,
                duration_ms = published.duration.as_millis(),
                "Published to messaging service"
            );
            Ok(published)
        }
        .instrument(span)
        .await
    }
}

async fn read_response(response: Response, duration: Duration) -> PublishResponse {
    let status_code = response.status().as_u16();

    let body = match response.bytes().await {
        Ok(bytes) if bytes.len() > MAX_RESPONSE_BODY_SIZE => {
            let truncated = String::from_utf8_lossy(&bytes[..MAX_RESPONSE_BODY_SIZE]);
            format!("{truncated}... (truncated)")
        },
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Failed to read response body: {}", e);
            format!("[Failed to read response body: {e}]")
        },
    };

    PublishResponse { status_code, body, duration }
}

#[cfg(test)]
mod tests {
    use relay_core::DonationSource;

    use super::*;

    #[test]
    fn publish_url_encodes_topic() {
        assert_eq!(
            publish_url("https://apis.roblox.com/", "4242", "MedusaIDRBroadcast"),
            "https://apis.roblox.com/messaging-service/v1/universes/4242/topics/MedusaIDRBroadcast"
        );
        assert_eq!(
            publish_url("http://127.0.0.1:9000", "1", "feed/idr & more"),
            "http://127.0.0.1:9000/messaging-service/v1/universes/1/topics/feed%2Fidr%20%26%20more"
        );
    }

    #[test]
    fn envelope_carries_record_as_string() {
        let record = DonationRecord {
            username: "Budi123".into(),
            display_name: "Budi".into(),
            amount: 15000,
            timestamp: 1_700_000_000,
            source: DonationSource::Saweria,
            message: "[Budi123] semangat!".into(),
            email: String::new(),
        };

        let envelope = MessageEnvelope::from_record(&record).unwrap();
        let body = serde_json::to_value(&envelope).unwrap();

        let message = body["message"].as_str().expect("message should be a string");
        let decoded: DonationRecord = serde_json::from_str(message).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = PublishConfig::new("http://localhost/topic", "super-secret-key");
        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn body_json_falls_back_to_text() {
        let response =
            PublishResponse { status_code: 200, body: String::new(), duration: Duration::ZERO };
        assert_eq!(response.body_json(), Value::String(String::new()));
    }
}
