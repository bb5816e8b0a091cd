//! Error types for planning mutations and projections.

use super::{PlaceId, TaskId};
use thiserror::Error;

/// Errors returned by planning operations.
///
/// `TaskNotFound`, `PlaceNotFound`, `CycleDetected`, and `InvalidTransition`
/// are expected, recoverable outcomes a caller can surface to the user.
/// `Malformed` indicates the input snapshot already violated a structural
/// invariant and is a programming-contract violation upstream, not a
/// user-facing failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The operation referenced a task id that does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The operation referenced a place id that does not exist.
    #[error("place not found: {0}")]
    PlaceNotFound(PlaceId),

    /// Re-parenting would make a task its own ancestor.
    #[error("moving task {task} under {destination} would create a cycle")]
    CycleDetected {
        /// The task being moved.
        task: TaskId,
        /// The destination parent that is the task itself or one of its
        /// descendants.
        destination: TaskId,
    },

    /// The requested status change is not permitted for the task.
    #[error("invalid transition for task {task}: {reason}")]
    InvalidTransition {
        /// The task whose transition was rejected.
        task: TaskId,
        /// Why the transition is impossible.
        reason: String,
    },

    /// The snapshot was already structurally inconsistent.
    #[error("malformed document: {0}")]
    Malformed(String),
}
