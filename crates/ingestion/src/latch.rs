//! Two-state alert latch for edge-triggered notification

use std::sync::Mutex;

/// Latch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchState {
    #[default]
    Idle,
    Alerting,
}

/// Outcome of feeding one decision into the latch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle -> Alerting. The caller owns the notification.
    Raised,
    /// Alerting stays Alerting
    Held,
    /// Alerting -> Idle
    Cleared,
    /// Idle stays Idle
    Idle,
}

/// Read-and-update is a single critical section, so concurrent requests
/// see exactly one `Raised` per rising edge.
#[derive(Debug, Default)]
pub struct AlertLatch {
    state: Mutex<LatchState>,
}

impl AlertLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LatchState {
        *self.lock()
    }

    pub fn observe(&self, alerting: bool) -> Transition {
        let mut state = self.lock();
        let (next, transition) = match (*state, alerting) {
            (LatchState::Idle, true) => (LatchState::Alerting, Transition::Raised),
            (LatchState::Alerting, true) => (LatchState::Alerting, Transition::Held),
            (LatchState::Alerting, false) => (LatchState::Idle, Transition::Cleared),
            (LatchState::Idle, false) => (LatchState::Idle, Transition::Idle),
        };
        *state = next;
        transition
    }

    // A poisoned latch still holds a valid two-state value.
    fn lock(&self) -> std::sync::MutexGuard<'_, LatchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_sequence() {
        let latch = AlertLatch::new();
        let seen: Vec<_> = [true, true, false, true, false, false]
            .into_iter()
            .map(|a| latch.observe(a))
            .collect();
        assert_eq!(
            seen,
            vec![
                Transition::Raised,
                Transition::Held,
                Transition::Cleared,
                Transition::Raised,
                Transition::Cleared,
                Transition::Idle,
            ]
        );
        assert_eq!(latch.state(), LatchState::Idle);
    }

    #[test]
    fn test_concurrent_single_raise() {
        let latch = Arc::new(AlertLatch::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let latch = Arc::clone(&latch);
                std::thread::spawn(move || latch.observe(true))
            })
            .collect();
        let raised = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|t| *t == Transition::Raised)
            .count();
        assert_eq!(raised, 1);
        assert_eq!(latch.state(), LatchState::Alerting);
    }
}
