//! In-memory document store for tests and unsynchronized embedding.

use crate::plan::domain::Document;
use crate::plan::ports::{DocumentStore, StoreError, StoreResult};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory snapshot holder.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<Document>>,
}

impl InMemoryDocumentStore {
    /// Creates a store holding an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `document`.
    #[must_use]
    pub fn with_document(document: Document) -> Self {
        Self {
            state: Arc::new(RwLock::new(document)),
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn snapshot(&self) -> StoreResult<Document> {
        let state = self
            .state
            .read()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))?;
        Ok(state.clone())
    }

    fn commit(&self, document: Document) -> StoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))?;
        *state = document;
        Ok(())
    }
}
