//! DocumentStore trait - append-only paginated persistence
//!
//! Implementations must be safe to call from many requests at once;
//! callers add no locking of their own.

use crate::{ContractError, PageRequest, Reading};

/// Append-only store of readings, one logical collection per instance.
#[trait_variant::make(DocumentStore: Send)]
pub trait LocalDocumentStore {
    /// Collection name (used for logging/metrics)
    fn collection(&self) -> &str;

    /// Append one reading
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn append(&self, reading: &Reading) -> Result<(), ContractError>;

    /// Read one page in insertion order.
    ///
    /// A page past the end yields an empty vector, not an error.
    async fn page(&self, request: PageRequest) -> Result<Vec<Reading>, ContractError>;
}
