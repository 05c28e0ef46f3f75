//! RouteHandle - one route's queue and forwarding worker

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use observability::{record_forward_latency_ms, record_message_dropped, record_message_forwarded};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use crate::forwarder::Forwarder;
use crate::metrics::ForwardMetrics;

/// Handle to a running route worker
pub struct RouteHandle {
    /// Topic filter this route serves
    topic: String,
    tx: mpsc::Sender<Bytes>,
    metrics: Arc<ForwardMetrics>,
    worker_handle: JoinHandle<()>,
}

impl RouteHandle {
    /// Spawn the worker task for `topic`
    pub fn spawn<F: Forwarder + Send + 'static>(
        topic: impl Into<String>,
        forwarder: F,
        queue_capacity: usize,
    ) -> Self {
        let topic = topic.into();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(ForwardMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_topic = topic.clone();
        let worker_handle = tokio::spawn(async move {
            route_worker(forwarder, rx, worker_metrics, worker_topic).await;
        });

        Self {
            topic,
            tx,
            metrics,
            worker_handle,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn metrics(&self) -> &Arc<ForwardMetrics> {
        &self.metrics
    }

    /// Queue a payload without waiting.
    ///
    /// Returns false if the queue is full (the payload is dropped and counted).
    pub fn try_send(&self, payload: Bytes) -> bool {
        match self.tx.try_send(payload) {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                true
            }
            Err(mpsc::error::TrySendError::Full(payload)) => {
                self.metrics.inc_dropped_count();
                record_message_dropped(&self.topic);
                warn!(topic = %self.topic, bytes = payload.len(), "Route queue full, message dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(topic = %self.topic, "Route worker closed unexpectedly");
                false
            }
        }
    }

    /// Close the queue and wait for queued payloads to be forwarded
    #[instrument(name = "route_handle_shutdown", skip(self), fields(topic = %self.topic))]
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!(topic = %self.topic, error = ?e, "Route worker panicked");
        }
        debug!(topic = %self.topic, "Route worker drained");
    }
}

/// Forwards queued payloads in order. Failures are counted and discarded.
#[instrument(name = "route_worker_loop", skip(forwarder, rx, metrics), fields(topic = %topic))]
async fn route_worker<F: Forwarder>(
    forwarder: F,
    mut rx: mpsc::Receiver<Bytes>,
    metrics: Arc<ForwardMetrics>,
    topic: String,
) {
    debug!(target_url = forwarder.target(), "Route worker started");

    while let Some(payload) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        let started = Instant::now();
        match forwarder.forward(payload).await {
            Ok(()) => {
                metrics.inc_forwarded_count();
                record_message_forwarded(&topic, true);
                record_forward_latency_ms(&topic, started.elapsed().as_secs_f64() * 1000.0);
            }
            Err(e) => {
                metrics.inc_failure_count();
                record_message_forwarded(&topic, false);
                error!(error = %e, "Forward failed, message discarded");
            }
        }
    }

    debug!("Route worker stopped");
}
