//! MemoryStore - in-process append-only store

use std::sync::{Arc, RwLock};

use contracts::{ContractError, DocumentStore, PageRequest, Reading};

/// Store backed by a shared vector.
///
/// Cloning yields a handle to the same collection.
#[derive(Clone)]
pub struct MemoryStore {
    collection: String,
    entries: Arc<RwLock<Vec<Reading>>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of everything stored, in insertion order
    pub fn snapshot(&self) -> Vec<Reading> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }

    fn poisoned(&self) -> String {
        format!("collection '{}' lock poisoned", self.collection)
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn append(&self, reading: &Reading) -> Result<(), ContractError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ContractError::store_write(&self.collection, self.poisoned()))?;
        entries.push(*reading);
        Ok(())
    }

    async fn page(&self, request: PageRequest) -> Result<Vec<Reading>, ContractError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ContractError::store_read(&self.collection, self.poisoned()))?;

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);

        Ok(entries.iter().skip(offset).take(limit).copied().collect())
    }
}
