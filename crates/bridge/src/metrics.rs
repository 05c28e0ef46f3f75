//! Per-route forwarding counters

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters for a single route
#[derive(Debug, Default)]
pub struct ForwardMetrics {
    queue_len: AtomicUsize,
    forwarded_count: AtomicU64,
    failure_count: AtomicU64,
    dropped_count: AtomicU64,
}

impl ForwardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    /// Messages accepted by the target with a 2xx status
    pub fn forwarded_count(&self) -> u64 {
        self.forwarded_count.load(Ordering::Relaxed)
    }

    pub fn inc_forwarded_count(&self) {
        self.forwarded_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Messages discarded after a failed forward
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Messages discarded because the route queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ForwardSnapshot {
        ForwardSnapshot {
            queue_len: self.queue_len(),
            forwarded_count: self.forwarded_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Point-in-time copy of [`ForwardMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardSnapshot {
    pub queue_len: usize,
    pub forwarded_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
}

impl ForwardSnapshot {
    /// Messages that reached a terminal state
    pub fn settled(&self) -> u64 {
        self.forwarded_count + self.failure_count + self.dropped_count
    }
}
