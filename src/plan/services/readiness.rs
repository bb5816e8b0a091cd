//! Date-driven readiness: the lead-time ramp and urgency classification.

use crate::plan::domain::Millis;
use crate::plan::domain::constants::URGENCY_THRESHOLD_RATIO;
use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};

/// Returns the lead-time factor of a task at `now`.
///
/// The factor is the urgency ramp of the composite score:
///
/// - `0.0` while more than twice the lead time remains (too early);
/// - rising linearly to `1.0` between `2 × lead_time` and `1 × lead_time`
///   remaining;
/// - `1.0` from one lead time out, through and past the due date.
///
/// A task with no due date is baseline-ready: factor `1.0`.
#[must_use]
pub fn lead_time_factor(due_date: Option<Millis>, lead_time: Millis, now: Millis) -> f64 {
    let Some(due_date) = due_date else {
        return 1.0;
    };

    if due_date <= now {
        return 1.0;
    }

    // With a non-positive lead time this branch also catches the whole
    // pre-due window, so the division below never sees a zero lead time.
    let time_remaining = due_date - now;
    if time_remaining > 2 * lead_time {
        return 0.0;
    }

    let raw = ((2 * lead_time - time_remaining) as f64) / lead_time as f64;
    raw.clamp(0.0, 1.0)
}

/// Display-level urgency classification of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Past due on an earlier day.
    Overdue,
    /// Due today, or inside the final quarter of the lead-time window.
    Urgent,
    /// Inside the lead-time window.
    Active,
    /// The window opens within a quarter lead time.
    Upcoming,
    /// No schedule pressure.
    Distant,
}

/// Classifies a task's urgency from its effective schedule at `now`.
#[must_use]
pub fn urgency(due_date: Option<Millis>, lead_time: Option<Millis>, now: Millis) -> Urgency {
    let (Some(due_date), Some(lead_time)) = (due_date, lead_time) else {
        return Urgency::Distant;
    };

    if now > due_date {
        if is_same_day_utc(due_date, now).unwrap_or(false) {
            return Urgency::Urgent;
        }
        return Urgency::Overdue;
    }

    if is_same_day_utc(due_date, now).unwrap_or(false) {
        return Urgency::Urgent;
    }

    let time_buffer = (due_date - now) as f64;
    let lead_time = lead_time as f64;

    if time_buffer > lead_time {
        let upcoming_threshold = lead_time + lead_time * URGENCY_THRESHOLD_RATIO;
        if time_buffer <= upcoming_threshold {
            return Urgency::Upcoming;
        }
        return Urgency::Distant;
    }

    if time_buffer <= lead_time * URGENCY_THRESHOLD_RATIO {
        return Urgency::Urgent;
    }

    Urgency::Active
}

/// Returns whether two timestamps fall on the same UTC calendar day, or
/// `None` when either is out of the representable range.
#[must_use]
pub fn is_same_day_utc(first: Millis, second: Millis) -> Option<bool> {
    let first = DateTime::from_timestamp_millis(first)?;
    let second = DateTime::from_timestamp_millis(second)?;
    Some(
        first.year() == second.year()
            && first.month() == second.month()
            && first.day() == second.day(),
    )
}
