//! Outbound HTTP delivery of broker payloads

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::error::BridgeError;

/// Delivers one payload to a route's target
#[trait_variant::make(Forwarder: Send)]
pub trait LocalForwarder {
    /// Target description for logs
    fn target(&self) -> &str;

    async fn forward(&self, payload: Bytes) -> Result<(), BridgeError>;
}

/// Build the shared HTTP client. `None` means no request timeout.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, BridgeError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// POSTs the payload unchanged to `http://<addr>` as JSON
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    url: String,
}

impl HttpForwarder {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Forwarder for HttpForwarder {
    fn target(&self) -> &str {
        &self.url
    }

    #[instrument(name = "http_forward", skip(self, payload), fields(url = %self.url, bytes = payload.len()))]
    async fn forward(&self, payload: Bytes) -> Result<(), BridgeError> {
        let started = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| BridgeError::forward(&self.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::forward(
                &self.url,
                format!("target responded with {status}"),
            ));
        }
        debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Forwarded"
        );
        Ok(())
    }
}
