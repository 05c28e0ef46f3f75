//! # Notifier
//!
//! `Notifier` implementations.
//!
//! - `WebhookNotifier`: posts `{"content": message}` to a chat webhook
//! - `LogNotifier`: writes the message to the log only
//! - `MockNotifier`: records messages in memory

mod log;
mod mock;
mod webhook;

pub use contracts::Notifier;
pub use self::log::LogNotifier;
pub use self::mock::MockNotifier;
pub use self::webhook::{WebhookConfig, WebhookNotifier};
