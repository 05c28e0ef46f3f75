//! First-match routing of broker topics to route workers

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use contracts::Route;
use observability::record_message_unrouted;
use rumqttc::mqttbytes::matches;
use tracing::{debug, info, instrument};

use crate::error::BridgeError;
use crate::forwarder::{http_client, HttpForwarder};
use crate::handle::RouteHandle;
use crate::metrics::ForwardSnapshot;

/// What happened to one incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Queued on the route at this index
    Queued(usize),
    /// Matched the route at this index but its queue was full
    Dropped(usize),
    /// No filter matched
    Unrouted,
}

/// Route handles in configuration order
pub struct RouteTable {
    handles: Vec<RouteHandle>,
}

impl RouteTable {
    /// Spawn one HTTP forwarding worker per route, sharing one client
    #[instrument(name = "route_table_from_routes", skip(routes), fields(routes = routes.len()))]
    pub fn from_routes(
        routes: &[Route],
        queue_capacity: usize,
        forward_timeout: Option<Duration>,
    ) -> Result<Self, BridgeError> {
        let client = http_client(forward_timeout)?;
        let handles = routes
            .iter()
            .map(|route| {
                info!(topic = %route.topic, target_url = %route.target_url(), "Route registered");
                RouteHandle::spawn(
                    route.topic.clone(),
                    HttpForwarder::new(client.clone(), route.target_url()),
                    queue_capacity,
                )
            })
            .collect();
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Topic filters in configuration order
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(RouteHandle::topic)
    }

    /// Index of the first route whose filter matches `topic`
    pub fn lookup(&self, topic: &str) -> Option<usize> {
        self.handles
            .iter()
            .position(|h| matches(topic, h.topic()))
    }

    /// Hand a payload to the first matching route without waiting
    pub fn dispatch(&self, topic: &str, payload: Bytes) -> DispatchOutcome {
        match self.lookup(topic) {
            Some(index) => {
                if self.handles[index].try_send(payload) {
                    DispatchOutcome::Queued(index)
                } else {
                    DispatchOutcome::Dropped(index)
                }
            }
            None => {
                record_message_unrouted();
                debug!(topic = %topic, "No route for topic");
                DispatchOutcome::Unrouted
            }
        }
    }

    /// Snapshot per route filter, in configuration order
    pub fn metrics(&self) -> Vec<(String, ForwardSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.topic().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Drain every route worker and return the final counters
    pub async fn shutdown(self) -> Vec<(String, ForwardSnapshot)> {
        let mut summary = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let topic = handle.topic().to_string();
            let metrics = Arc::clone(handle.metrics());
            handle.shutdown().await;
            summary.push((topic, metrics.snapshot()));
        }
        summary
    }
}
