//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data flow
//! sensor → broker topic → bridge → ingestion service → document store
//! (and, on a rising alert edge, → notifier)

mod error;
mod notify;
mod reading;
mod route;
mod store;

pub use error::*;
pub use notify::{LocalNotifier, Notifier};
pub use reading::*;
pub use route::*;
pub use store::{DocumentStore, LocalDocumentStore};
