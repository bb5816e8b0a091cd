//! Task record and scheduling types.
//!
//! These types are the persisted document shape shared with other replicas:
//! field names serialize in camelCase and must not change without a
//! document-format migration.

use super::constants::{
    DEFAULT_CREDIT_INCREMENT, DEFAULT_DESIRED_CREDITS, DEFAULT_IMPORTANCE,
    DEFAULT_LEAD_TIME_MILLIS,
};
use super::{Millis, PlaceId, TaskId};
use serde::{Deserialize, Serialize};

/// Completion status of a task.
///
/// `Deleted` never originates from this crate (deletion removes the record
/// structurally) but can arrive in a merged snapshot produced by an older
/// replica; every projection drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task is not yet completed.
    Pending,
    /// Task has been completed.
    Done,
    /// Task was tombstoned by a foreign replica.
    Deleted,
}

/// Scheduling strategy for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    /// A one-shot task, optionally carrying an explicit due date.
    Once,
    /// A recurring task whose next occurrence derives from its last
    /// completion and repeat configuration.
    Routinely,
}

/// Frequency unit for recurring tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every N minutes.
    Minutes,
    /// Every N hours.
    Hours,
    /// Every N days.
    Daily,
    /// Every N weeks.
    Weekly,
    /// Every N months (30-day approximation).
    Monthly,
    /// Every N years (365-day approximation).
    Yearly,
}

impl Frequency {
    /// Returns the length of one unit in milliseconds.
    #[must_use]
    pub const fn unit_millis(self) -> Millis {
        const ONE_MINUTE: Millis = 60 * 1000;
        const ONE_HOUR: Millis = 60 * ONE_MINUTE;
        const ONE_DAY: Millis = 24 * ONE_HOUR;
        match self {
            Self::Minutes => ONE_MINUTE,
            Self::Hours => ONE_HOUR,
            Self::Daily => ONE_DAY,
            Self::Weekly => 7 * ONE_DAY,
            Self::Monthly => 30 * ONE_DAY,
            Self::Yearly => 365 * ONE_DAY,
        }
    }
}

/// Repeat configuration for `Routinely` tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatConfig {
    /// The unit of recurrence.
    pub frequency: Frequency,
    /// The interval multiplier, e.g. `2` for "every 2 weeks".
    pub interval: i64,
}

impl RepeatConfig {
    /// Returns the full recurrence interval in milliseconds.
    #[must_use]
    pub const fn interval_millis(&self) -> Millis {
        self.frequency.unit_millis() * self.interval
    }
}

/// Scheduling state of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Whether the task is one-shot or recurring.
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    /// Explicit due date as Unix milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub due_date: Option<Millis>,
    /// Window before the due date over which urgency ramps up.
    #[serde(default)]
    pub lead_time: Millis,
    /// Completion timestamp anchoring the current recurrence cycle.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_done: Option<Millis>,
}

impl Schedule {
    /// Returns a one-shot schedule with the default lead time and no due
    /// date.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            kind: ScheduleKind::Once,
            due_date: None,
            lead_time: DEFAULT_LEAD_TIME_MILLIS,
            last_done: None,
        }
    }
}

/// A task record as persisted in the replicated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable unique identifier, immutable after creation.
    pub id: TaskId,
    /// Completion status.
    pub status: TaskStatus,
    /// Free-text title.
    pub title: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Owning parent, absent for root-level tasks.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_id: Option<TaskId>,
    /// Ordered children; the only authoritative sibling ordering.
    #[serde(default)]
    pub child_task_ids: Vec<TaskId>,
    /// Optional place restriction; absent means "anywhere".
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_id: Option<PlaceId>,
    /// User-set weight in `[0, 1]`.
    pub importance: f64,
    /// Credits granted per completion; `None` falls back to the default.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub credit_increment: Option<f64>,
    /// Accrued completion credits, decayed lazily at read time.
    pub credits: f64,
    /// Target credit accrual rate for the fairness adjustment.
    pub desired_credits: f64,
    /// Timestamp the stored `credits` value was last brought to present.
    pub credits_timestamp: Millis,
    /// Timestamp of the last change to any scoring input.
    pub priority_timestamp: Millis,
    /// Scheduling state.
    pub schedule: Schedule,
    /// Recurrence rule, present only for `Routinely` schedules.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat_config: Option<RepeatConfig>,
    /// When `true`, children must be worked in list order.
    #[serde(default)]
    pub is_sequential: bool,
    /// A `Done` task stays in the active list until acknowledged.
    #[serde(default)]
    pub is_acknowledged: bool,
    /// Timestamp of the most recent completion.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_completed_at: Option<Millis>,
}

impl Task {
    /// Creates a task with documented defaults, inheriting the place and
    /// credit increment from `parent` when given.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, parent: Option<&Self>) -> Self {
        let mut place_id = None;
        let mut credit_increment = Some(DEFAULT_CREDIT_INCREMENT);
        if let Some(parent) = parent {
            place_id = parent.place_id.clone();
            credit_increment = parent.credit_increment;
        }

        Self {
            id,
            status: TaskStatus::Pending,
            title: title.into(),
            notes: String::new(),
            parent_id: parent.map(|p| p.id.clone()),
            child_task_ids: Vec::new(),
            place_id,
            importance: DEFAULT_IMPORTANCE,
            credit_increment,
            credits: 0.0,
            desired_credits: DEFAULT_DESIRED_CREDITS,
            credits_timestamp: 0,
            priority_timestamp: 0,
            schedule: Schedule::once(),
            repeat_config: None,
            is_sequential: false,
            is_acknowledged: false,
            last_completed_at: None,
        }
    }

    /// Returns the due date the pipeline should score against.
    ///
    /// For recurring tasks with an anchored cycle this is
    /// `last_done + interval`; otherwise the explicit due date.
    #[must_use]
    pub fn effective_due_date(&self) -> Option<Millis> {
        match self.schedule.kind {
            ScheduleKind::Routinely => {
                match (self.schedule.last_done, &self.repeat_config) {
                    (Some(last_done), Some(config)) => {
                        Some(last_done + config.interval_millis())
                    }
                    _ => self.schedule.due_date,
                }
            }
            ScheduleKind::Once => self.schedule.due_date,
        }
    }

    /// Whether the task still represents outstanding work.
    ///
    /// A completed recurring task counts as pending: it will wake again, so
    /// its ancestors remain containers of future work.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        match self.status {
            TaskStatus::Pending => true,
            TaskStatus::Done => self.schedule.kind == ScheduleKind::Routinely,
            TaskStatus::Deleted => false,
        }
    }
}
