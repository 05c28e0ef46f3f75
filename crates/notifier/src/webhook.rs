//! WebhookNotifier - chat webhook delivery (Discord-compatible payload)

use std::time::Duration;

use contracts::{ContractError, Notifier};
use serde::Serialize;
use tracing::{debug, instrument};

/// Configuration for WebhookNotifier
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Webhook URL
    pub url: String,
    /// Request timeout (None = wait for completion or transport failure)
    pub timeout: Option<Duration>,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Notifier posting JSON `{"content": ...}` to a webhook
pub struct WebhookNotifier {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Build the notifier and its HTTP client
    pub fn new(name: impl Into<String>, config: WebhookConfig) -> Result<Self, ContractError> {
        let name = name.into();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ContractError::notify_delivery(&name, e.to_string()))?;

        Ok(Self {
            name,
            url: config.url,
            client,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "webhook_notifier_send", skip(self, message), fields(notifier = %self.name))]
    async fn send(&self, message: &str) -> Result<(), ContractError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content: message })
            .send()
            .await
            .map_err(|e| ContractError::notify_delivery(&self.name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::notify_delivery(
                &self.name,
                format!("webhook responded with {status}"),
            ));
        }

        debug!(notifier = %self.name, %status, "Webhook delivered");
        Ok(())
    }
}
