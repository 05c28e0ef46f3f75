//! LogNotifier - logs alerts via tracing

use contracts::{ContractError, Notifier};
use tracing::{instrument, warn};

/// Notifier that only logs, used when no webhook is configured
pub struct LogNotifier {
    name: String,
}

impl LogNotifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_notifier_send", skip(self, message), fields(notifier = %self.name))]
    async fn send(&self, message: &str) -> Result<(), ContractError> {
        warn!(notifier = %self.name, message, "Alert raised");
        Ok(())
    }
}
