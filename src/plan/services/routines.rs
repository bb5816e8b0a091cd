//! Recurrence sweep: reinstating completed routine tasks.

use crate::plan::domain::{Document, Millis, ScheduleKind, TaskStatus};
use log::debug;

/// Wakes every completed, acknowledged `Routinely` task whose next
/// occurrence window has arrived.
///
/// The next occurrence is `last_completed_at + interval`; the task wakes
/// once `now` reaches `next_occurrence - lead_time` so it re-enters the
/// list with its usual run-up. Waking resets the task to `Pending` and
/// unacknowledged, anchors the new cycle in `schedule.last_done`, and
/// clears any stale explicit due date — scoring derives the effective due
/// date from the anchor. The sweep touches nothing else and is idempotent:
/// a woken task no longer matches the precondition.
#[must_use]
pub fn wake_up_routine_tasks(document: &Document, now: Millis) -> Document {
    let mut next = document.clone();
    let mut woken = 0_usize;

    for task in next.tasks.values_mut() {
        if task.status != TaskStatus::Done
            || !task.is_acknowledged
            || task.schedule.kind != ScheduleKind::Routinely
        {
            continue;
        }
        let Some(repeat_config) = &task.repeat_config else {
            // A Routinely task without a repeat rule cannot compute its
            // next occurrence; leave it for the user to repair.
            continue;
        };

        let Some(last_completed_at) = task.last_completed_at else {
            continue;
        };
        let next_occurrence = last_completed_at + repeat_config.interval_millis();
        let wake_at = next_occurrence - task.schedule.lead_time;

        if now >= wake_at {
            task.status = TaskStatus::Pending;
            task.is_acknowledged = false;
            task.schedule.last_done = Some(last_completed_at);
            task.schedule.due_date = None;
            woken += 1;
        }
    }

    if woken > 0 {
        debug!("event=routines_woken count={woken}");
    }
    next
}
