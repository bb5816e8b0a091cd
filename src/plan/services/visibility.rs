//! Place/context visibility filtering.

use crate::plan::domain::{Document, Millis, PlaceId, Task};
use serde::{Deserialize, Serialize};

/// Place filter applied when projecting the do-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceFilter {
    /// Show tasks for every place.
    #[default]
    All,
    /// Show tasks performable at the given place.
    At(PlaceId),
}

/// Resolves whether `task` is visible under `filter` at `now`.
///
/// A task with no place resolves to the "anywhere" sentinel, which is open
/// around the clock and matches every filter. A task bound to a concrete
/// place is visible only while that place is open, and only when the filter
/// is `All`, names the same place, or names a place that includes it.
#[must_use]
pub fn is_visible(document: &Document, task: &Task, filter: &PlaceFilter, now: Millis) -> bool {
    let effective_place_id = task.place_id.clone().unwrap_or_else(PlaceId::anywhere);

    let is_open = if effective_place_id.is_anywhere() {
        true
    } else {
        document
            .places
            .get(&effective_place_id)
            .is_some_and(|place| place.is_open_at(now))
    };

    let filter_match = match filter {
        PlaceFilter::All => true,
        PlaceFilter::At(_) if effective_place_id.is_anywhere() => true,
        PlaceFilter::At(filter_place_id) => {
            filter_place_id == &effective_place_id
                || document
                    .places
                    .get(filter_place_id)
                    .is_some_and(|place| place.included_places.contains(&effective_place_id))
        }
    };

    is_open && filter_match
}
