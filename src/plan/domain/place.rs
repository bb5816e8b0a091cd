//! Places: optional location/context tags tasks can be restricted to.

use super::{Millis, PlaceId};
use chrono::{DateTime, Datelike, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Operating-hours policy for a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenHoursMode {
    /// The place is always available.
    AlwaysOpen,
    /// The place is never available.
    AlwaysClosed,
    /// Availability follows the weekday schedule.
    Custom,
}

/// Weekly operating hours, keyed by three-letter weekday (`"Mon"`..`"Sun"`)
/// with `"HH:MM-HH:MM"` ranges in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHours {
    /// The operating-hours policy.
    pub mode: OpenHoursMode,
    /// Weekday ranges, consulted only in `Custom` mode.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schedule: Option<HashMap<String, Vec<String>>>,
}

impl OpenHours {
    /// Returns an always-open policy.
    #[must_use]
    pub const fn always_open() -> Self {
        Self {
            mode: OpenHoursMode::AlwaysOpen,
            schedule: None,
        }
    }
}

/// A place/context where tasks can be performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Stable unique identifier.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Operating hours.
    pub hours: OpenHours,
    /// Places contained within this one; a filter on this place also
    /// matches tasks bound to an included place.
    #[serde(default)]
    pub included_places: Vec<PlaceId>,
}

impl Place {
    /// Creates an always-open place with no inclusions.
    #[must_use]
    pub fn new(id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hours: OpenHours::always_open(),
            included_places: Vec::new(),
        }
    }

    /// Returns whether the place is open at `now`.
    #[must_use]
    pub fn is_open_at(&self, now: Millis) -> bool {
        match self.hours.mode {
            OpenHoursMode::AlwaysOpen => true,
            OpenHoursMode::AlwaysClosed => false,
            OpenHoursMode::Custom => {
                let Some(schedule) = &self.hours.schedule else {
                    return false;
                };
                let dt = DateTime::from_timestamp_millis(now).unwrap_or(DateTime::UNIX_EPOCH);
                let day_of_week = match dt.weekday() {
                    chrono::Weekday::Sun => "Sun",
                    chrono::Weekday::Mon => "Mon",
                    chrono::Weekday::Tue => "Tue",
                    chrono::Weekday::Wed => "Wed",
                    chrono::Weekday::Thu => "Thu",
                    chrono::Weekday::Fri => "Fri",
                    chrono::Weekday::Sat => "Sat",
                };
                let Some(ranges) = schedule.get(day_of_week) else {
                    return false;
                };
                let current_minutes = dt.hour() * 60 + dt.minute();
                ranges.iter().any(|range| {
                    parse_time_range(range)
                        .is_some_and(|(start, end)| current_minutes >= start && current_minutes < end)
                })
            }
        }
    }
}

fn parse_time_range(range: &str) -> Option<(u32, u32)> {
    let (start, end) = range.split_once('-')?;
    Some((parse_time(start)?, parse_time(end)?))
}

fn parse_time(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    let hours = hours.parse::<u32>().ok()?;
    let minutes = minutes.parse::<u32>().ok()?;
    Some(hours * 60 + minutes)
}
