//! Bridge error types

use thiserror::Error;

/// Bridge-specific errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Initial broker connection failed
    #[error("failed to connect to broker {broker}: {message}")]
    Connect { broker: String, message: String },

    /// Subscription refused by the client or rejected in the broker's SubAck
    #[error("failed to subscribe to '{topic}': {message}")]
    Subscribe { topic: String, message: String },

    /// Broker connection dropped after startup
    #[error("broker connection lost: {message}")]
    ConnectionLost { message: String },

    /// HTTP forward failed (transport error or non-2xx status)
    #[error("forward to {target} failed: {message}")]
    Forward { target: String, message: String },

    /// HTTP client construction failed
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl BridgeError {
    pub fn connect(broker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connect {
            broker: broker.into(),
            message: message.into(),
        }
    }

    pub fn subscribe(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subscribe {
            topic: topic.into(),
            message: message.into(),
        }
    }

    pub fn forward(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forward {
            target: target.into(),
            message: message.into(),
        }
    }
}
