//! Domain model for the planning core.
//!
//! Pure data and total functions only: the document shape shared with other
//! replicas, the tree algebra over it, scoring constants, and the error
//! taxonomy. No clocks, no I/O — `now` always arrives as a parameter.

pub mod constants;
mod document;
mod error;
pub mod hierarchy;
mod ids;
mod place;
mod task;

pub use document::Document;
pub use error::PlanError;
pub use hierarchy::Position;
pub use ids::{ANYWHERE_PLACE_ID, PlaceId, TaskId};
pub use place::{OpenHours, OpenHoursMode, Place};
pub use task::{Frequency, RepeatConfig, Schedule, ScheduleKind, Task, TaskStatus};

/// Milliseconds since the Unix epoch; the timestamp unit of the document
/// format.
pub type Millis = i64;
