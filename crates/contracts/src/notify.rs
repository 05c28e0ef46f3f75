//! Notifier trait - outbound text notification

use crate::ContractError;

/// Fire-and-forget delivery of a text message.
#[trait_variant::make(Notifier: Send)]
pub trait LocalNotifier {
    /// Notifier name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one message
    async fn send(&self, message: &str) -> Result<(), ContractError>;
}
