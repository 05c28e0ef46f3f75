//! MockNotifier - records messages for tests and local runs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{ContractError, Notifier};

/// Notifier that keeps every delivered message in memory.
///
/// Cloning yields a handle to the same recording, so a test can keep one
/// clone and hand the other to the service under test.
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before each delivery (widens race windows in concurrency tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make subsequent deliveries fail (or succeed again)
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, message: &str) -> Result<(), ContractError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ContractError::notify_delivery("mock", "mock failure"));
        }
        self.sent
            .lock()
            .map_err(|_| ContractError::notify_delivery("mock", "recording lock poisoned"))?
            .push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_and_fails() {
        let notifier = MockNotifier::new();
        let observer = notifier.clone();

        notifier.send("one").await.unwrap();
        notifier.set_failing(true);
        assert!(notifier.send("two").await.is_err());

        assert_eq!(observer.sent(), vec!["one".to_string()]);
    }
}
