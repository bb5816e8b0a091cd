//! Store-facing dispatch: load a snapshot, apply an intent, persist the
//! result.
//!
//! This is the one seam where the pure mutation layer meets the replicated
//! document boundary. It stays a thin composition so every piece remains
//! individually testable.

use crate::plan::domain::{Document, Millis, PlanError};
use crate::plan::ports::{DocumentStore, StoreError};
use crate::plan::services::intents::{self, Intent};
use log::debug;
use thiserror::Error;

/// Errors surfaced when dispatching an intent through a store.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The mutation itself was rejected.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// The store could not produce or persist a snapshot.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Applies `intent` to the store's current snapshot and commits the result,
/// returning the new snapshot.
///
/// # Errors
///
/// Returns [`DispatchError::Plan`] when the mutation is rejected (the store
/// is left untouched) and [`DispatchError::Store`] when the snapshot cannot
/// be read or written.
pub fn dispatch(
    store: &dyn DocumentStore,
    intent: Intent,
    now: Millis,
) -> Result<Document, DispatchError> {
    let snapshot = store.snapshot()?;
    let next = intents::apply(&snapshot, intent, now)?;
    store.commit(next.clone())?;
    debug!("event=intent_committed tasks={}", next.tasks.len());
    Ok(next)
}
