//! Alert strategies run after each threshold decision

use contracts::{ContractError, Notifier};
use tracing::{debug, info, instrument};

use crate::latch::{AlertLatch, LatchState, Transition};

/// What the strategy did with a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Nothing was sent
    Silent,
    /// A notification was delivered
    Notified,
}

#[trait_variant::make(AlertStrategy: Send)]
pub trait LocalAlertStrategy {
    /// Strategy name for logs
    fn kind(&self) -> &'static str;

    /// React to one alerting decision.
    ///
    /// An error means a notification was due but could not be delivered.
    async fn on_decision(&self, alerting: bool) -> Result<AlertOutcome, ContractError>;
}

/// Threshold-only sensors
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlert;

impl AlertStrategy for NoAlert {
    fn kind(&self) -> &'static str {
        "none"
    }

    async fn on_decision(&self, _alerting: bool) -> Result<AlertOutcome, ContractError> {
        Ok(AlertOutcome::Silent)
    }
}

/// Sends one notification per rising edge of the alerting decision.
///
/// A failed delivery leaves the latch raised, so the next alerting reading
/// does not retry.
pub struct DebouncedAlert<N> {
    latch: AlertLatch,
    notifier: N,
    message: String,
}

impl<N: Notifier + Send + Sync> DebouncedAlert<N> {
    pub fn new(notifier: N, message: impl Into<String>) -> Self {
        Self {
            latch: AlertLatch::new(),
            notifier,
            message: message.into(),
        }
    }

    pub fn state(&self) -> LatchState {
        self.latch.state()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<N: Notifier + Send + Sync> AlertStrategy for DebouncedAlert<N> {
    fn kind(&self) -> &'static str {
        "debounced"
    }

    #[instrument(name = "alert_decision", skip(self), fields(notifier = self.notifier.name()))]
    async fn on_decision(&self, alerting: bool) -> Result<AlertOutcome, ContractError> {
        // Latch guard is dropped before the await below.
        let transition = self.latch.observe(alerting);
        match transition {
            Transition::Raised => {
                self.notifier.send(&self.message).await?;
                info!("Alert notification sent");
                Ok(AlertOutcome::Notified)
            }
            Transition::Cleared => {
                debug!("Alert cleared");
                Ok(AlertOutcome::Silent)
            }
            Transition::Held | Transition::Idle => Ok(AlertOutcome::Silent),
        }
    }
}
