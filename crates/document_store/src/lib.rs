//! # Document Store
//!
//! `DocumentStore` implementations.
//!
//! - `MongoStore`: one MongoDB collection per sensor type (database `iot`)
//! - `MemoryStore`: process-local vector, for tests and local runs

mod memory;
mod mongo;

pub use contracts::{DocumentStore, PageRequest, Reading};
pub use memory::MemoryStore;
pub use mongo::{MongoStore, MongoStoreConfig};
