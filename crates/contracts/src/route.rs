//! BridgeConfig - bridge routing file contents
//!
//! Describes the broker to subscribe to and the static topic → target bindings.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Complete bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BridgeConfig {
    /// Broker connection settings
    #[validate(nested)]
    pub broker: BrokerConfig,

    /// Topic → target bindings, in match order
    #[validate(length(min = 1, message = "at least one target is required"))]
    #[validate(nested)]
    pub targets: Vec<Route>,

    /// MQTT client identifier
    #[serde(default = "default_client_id")]
    #[validate(length(min = 1, message = "client_id cannot be empty"))]
    pub client_id: String,

    /// Per-route forwarding queue capacity
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1, message = "queue_capacity must be >= 1"))]
    pub queue_capacity: usize,
}

fn default_client_id() -> String {
    "mqtt-redirect".to_string()
}

fn default_queue_capacity() -> usize {
    64
}

/// Broker address
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrokerConfig {
    #[validate(length(min = 1, message = "broker host cannot be empty"))]
    pub host: String,

    /// Accepts `1883` or `"1883"`
    #[serde(deserialize_with = "port_from_number_or_string")]
    #[validate(range(min = 1, message = "broker port must be in 1..=65535"))]
    pub port: u16,
}

/// Static binding of one topic filter to one ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Route {
    /// MQTT topic filter (`+` / `#` wildcards allowed)
    #[validate(length(min = 1, message = "topic cannot be empty"))]
    pub topic: String,

    /// Bare `host:port`; forwarded to as `http://<addr>`
    #[validate(length(min = 1, message = "addr cannot be empty"))]
    pub addr: String,
}

impl Route {
    pub fn new(topic: impl Into<String>, addr: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            addr: addr.into(),
        }
    }

    /// Target URL for forwarded payloads
    pub fn target_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Number(u16),
        Text(String),
    }

    match RawPort::deserialize(deserializer)? {
        RawPort::Number(port) => Ok(port),
        RawPort::Text(text) => text
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid port '{text}': {e}"))),
    }
}
