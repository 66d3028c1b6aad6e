//! Configuration management for the donation relay.

use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use relay_core::RelayError;
use relay_publish::{
    client::{publish_url, DEFAULT_PUBLISH_BASE_URL},
    PublishConfig,
};
use serde::{Deserialize, Deserializer, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Service configuration with defaults, file, and environment overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// `ROBLOX_API_KEY` and `UNIVERSE_ID` have no usable default; loading fails
/// until both are set. The value is immutable once loaded and shared with
/// every handler.
///
/// # Example
///
/// ```no_run
/// use relay_api::RelayConfig;
///
/// let config = RelayConfig::load().expect("Failed to load configuration");
///
/// println!("Publishing to {}", config.publish_url());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Open Cloud API key with messaging publish scope.
    ///
    /// Environment variable: `ROBLOX_API_KEY`
    #[serde(default, alias = "ROBLOX_API_KEY", deserialize_with = "lenient_string")]
    pub roblox_api_key: String,
    /// Universe whose servers subscribe to the topic.
    ///
    /// Environment variable: `UNIVERSE_ID`
    #[serde(default, alias = "UNIVERSE_ID", deserialize_with = "lenient_string")]
    pub universe_id: String,
    /// MessagingService topic name.
    ///
    /// Environment variable: `MESSAGING_TOPIC`
    #[serde(
        default = "default_messaging_topic",
        alias = "MESSAGING_TOPIC",
        deserialize_with = "lenient_string"
    )]
    pub messaging_topic: String,
    /// Open Cloud base URL.
    ///
    /// Environment variable: `PUBLISH_BASE_URL`
    #[serde(
        default = "default_publish_base_url",
        alias = "PUBLISH_BASE_URL",
        deserialize_with = "lenient_string"
    )]
    pub publish_base_url: String,
    /// Outbound publish timeout in seconds. Unset means no relay-imposed
    /// timeout.
    ///
    /// Environment variable: `DELIVERY_TIMEOUT_SECONDS`
    #[serde(default, alias = "DELIVERY_TIMEOUT_SECONDS")]
    pub delivery_timeout_seconds: Option<u64>,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST", deserialize_with = "lenient_string")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
}

impl RelayConfig {
    /// Load configuration from defaults, config file, and environment variable
    /// overrides.
    ///
    /// # Errors
    ///
    /// Fails if a source cannot be parsed or a required value is missing.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Full topic publish URL derived from base URL, universe and topic.
    pub fn publish_url(&self) -> String {
        publish_url(&self.publish_base_url, &self.universe_id, &self.messaging_topic)
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.roblox_api_key.is_empty()
    }

    /// API key masked down to its first eight characters for display.
    pub fn api_key_prefix(&self) -> String {
        if self.has_api_key() {
            let prefix: String = self.roblox_api_key.chars().take(8).collect();
            format!("{prefix}...")
        } else {
            "NOT SET".to_string()
        }
    }

    /// Convert to the publish client configuration.
    pub fn to_publish_config(&self) -> PublishConfig {
        PublishConfig {
            timeout: self.delivery_timeout_seconds.map(Duration::from_secs),
            ..PublishConfig::new(self.publish_url(), self.roblox_api_key.clone())
        }
    }

    /// Parse server socket address from host and port configuration.
    ///
    /// # Errors
    ///
    /// Fails if `host` is not an IP address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` naming the first invalid value.
    pub fn validate(&self) -> relay_core::Result<()> {
        if self.roblox_api_key.trim().is_empty() {
            return Err(RelayError::Configuration("ROBLOX_API_KEY must be set".into()));
        }

        if self.universe_id.trim().is_empty() {
            return Err(RelayError::Configuration("UNIVERSE_ID must be set".into()));
        }

        if self.messaging_topic.trim().is_empty() {
            return Err(RelayError::Configuration("MESSAGING_TOPIC must not be empty".into()));
        }

        if self.port == 0 {
            return Err(RelayError::Configuration("PORT must be greater than 0".into()));
        }

        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            roblox_api_key: String::new(),
            universe_id: String::new(),
            messaging_topic: default_messaging_topic(),
            publish_base_url: default_publish_base_url(),
            delivery_timeout_seconds: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("roblox_api_key", &self.api_key_prefix())
            .field("universe_id", &self.universe_id)
            .field("messaging_topic", &self.messaging_topic)
            .field("publish_base_url", &self.publish_base_url)
            .field("delivery_timeout_seconds", &self.delivery_timeout_seconds)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn default_messaging_topic() -> String {
    "MedusaIDRBroadcast".to_string()
}

fn default_publish_base_url() -> String {
    DEFAULT_PUBLISH_BASE_URL.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Accepts strings, bare numbers and booleans, since environment values
/// such as `UNIVERSE_ID=123` or `MESSAGING_TOPIC=true` arrive typed.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Bool(flag) => flag.to_string(),
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}
