//! # Bridge
//!
//! Relays broker messages to HTTP ingestion services.
//!
//! - Subscribes to every configured topic filter
//! - Routes each message to the first matching filter's target
//! - Forwards on a per-route worker so a slow target never blocks the others

pub mod error;
pub mod forwarder;
pub mod handle;
pub mod metrics;
pub mod route_table;
pub mod router;

pub use contracts::{BridgeConfig, Route};
pub use error::BridgeError;
pub use forwarder::{http_client, Forwarder, HttpForwarder, LocalForwarder};
pub use handle::RouteHandle;
pub use metrics::{ForwardMetrics, ForwardSnapshot};
pub use route_table::{DispatchOutcome, RouteTable};
pub use router::{BridgeOptions, BridgeRouter};
