//! Identifier types for the planning domain.
//!
//! Identifiers are stable, opaque strings so that documents written by other
//! replicas (which may use arbitrary id schemes) round-trip untouched. Fresh
//! identifiers are UUID v4 values.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a place/context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

/// Reserved place identifier meaning "no location restriction".
pub const ANYWHERE_PLACE_ID: &str = "Anywhere";

impl PlaceId {
    /// Creates a new random place identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the sentinel place that matches every context.
    #[must_use]
    pub fn anywhere() -> Self {
        Self(ANYWHERE_PLACE_ID.to_owned())
    }

    /// Returns `true` when this is the "anywhere" sentinel.
    #[must_use]
    pub fn is_anywhere(&self) -> bool {
        self.0 == ANYWHERE_PLACE_ID
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PlaceId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
