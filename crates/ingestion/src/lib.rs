//! # Ingestion
//!
//! Per-sensor HTTP ingestion services.
//!
//! Each service accepts readings over `POST /`, persists them to a
//! [`DocumentStore`](contracts::DocumentStore), evaluates a threshold and
//! hands the decision to an [`AlertStrategy`]. Stored readings are paged
//! back out over `GET /`.
//!
//! ```ignore
//! use ingestion::{http, sensors::rain};
//!
//! let service = Arc::new(rain::service(rain::profile(), store, notifier));
//! http::serve(listener, service, shutdown_signal()).await?;
//! ```

mod alert;
mod codec;
mod error;
pub mod http;
mod latch;
mod profile;
pub mod sensors;
mod service;

pub use alert::{AlertOutcome, AlertStrategy, DebouncedAlert, LocalAlertStrategy, NoAlert};
pub use codec::{decode_reading, encode_reading, encode_readings};
pub use error::{IngestionError, Result};
pub use latch::{AlertLatch, LatchState, Transition};
pub use profile::{SensorProfile, Threshold};
pub use service::IngestionService;
