//! Document store port: the replicated-snapshot boundary.

use crate::plan::domain::Document;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract for the externally replicated document holder.
///
/// The core never talks to network or disk: collaborators hand it the
/// current snapshot and persist the snapshot it returns. Conflict merging
/// between replicas happens behind this port, before a snapshot ever
/// reaches the core.
pub trait DocumentStore: Send + Sync {
    /// Returns the current merged snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store is unavailable.
    fn snapshot(&self) -> StoreResult<Document>;

    /// Persists `document` as the next snapshot and propagates it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the snapshot cannot be persisted.
    fn commit(&self, document: Document) -> StoreResult<()>;
}

/// Errors returned by document store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing storage failed.
    #[error("store failure: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
