//! Mutation layer: every document edit expressed as a pure
//! `(snapshot, intent, now) -> snapshot` transform.
//!
//! Operations clone the input snapshot, edit the clone through the tree
//! algebra, and return it only when fully consistent — a failed operation
//! never exposes a half-applied document. This keeps each intent compatible
//! with replicated-document merge semantics: replicas replay intents against
//! whatever snapshot they currently hold.

use crate::plan::domain::constants::DEFAULT_CREDIT_INCREMENT;
use crate::plan::domain::hierarchy::{
    self, Position, insert_at, is_descendant, owning_list_mut, remove_from,
};
use crate::plan::domain::{
    Document, Millis, PlaceId, PlanError, RepeatConfig, ScheduleKind, Task, TaskId, TaskStatus,
};
use crate::plan::services::feedback::decay_credits;
use crate::plan::services::routines;
use log::debug;
use serde::{Deserialize, Serialize};

/// A serializable mutation request.
///
/// Intents carry everything needed to replay the edit against any valid
/// snapshot, including caller-allocated ids, so replicas that exchange
/// intents instead of snapshots converge on the same structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Create a new task.
    Create(CreateTask),
    /// Merge non-structural field updates into a task.
    Update {
        /// Target task.
        id: TaskId,
        /// Fields to merge.
        patch: TaskPatch,
    },
    /// Remove a task and all of its descendants.
    Delete {
        /// Target task.
        id: TaskId,
    },
    /// Re-parent and/or re-order a task.
    Move {
        /// Task being moved.
        id: TaskId,
        /// Destination parent; `None` moves to the root level.
        new_parent_id: Option<TaskId>,
        /// Sibling to land immediately after; `None` lands at the start.
        after_id: Option<TaskId>,
    },
    /// Make a task a child of its previous sibling.
    Indent {
        /// Target task.
        id: TaskId,
    },
    /// Move a task up next to its current parent.
    Outdent {
        /// Target task.
        id: TaskId,
    },
    /// Flip a task between `Pending` and `Done`.
    ToggleDone {
        /// Target task.
        id: TaskId,
    },
    /// Acknowledge every `Done` task, clearing it from the active list.
    AcknowledgeDoneTasks,
    /// Reinstate completed recurring tasks whose next occurrence arrived.
    WakeUpRoutineTasks,
}

/// Request payload for [`create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTask {
    /// Caller-allocated id for the new task.
    pub id: TaskId,
    /// Title of the new task.
    pub title: String,
    /// Parent under which to create; `None` creates at the root level.
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    /// Where to insert within the target sibling list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_id: Option<TaskId>,
    /// When `true`, insert at the end instead of the start when `after_id`
    /// is absent.
    #[serde(default = "default_true")]
    pub append: bool,
    /// Field overrides applied on top of the documented defaults.
    #[serde(default)]
    pub overrides: TaskPatch,
}

const fn default_true() -> bool {
    true
}

impl CreateTask {
    /// Creates a request for a root-level task with a fresh id, appended to
    /// the end of the root list.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            parent_id: None,
            after_id: None,
            append: true,
            overrides: TaskPatch::default(),
        }
    }

    /// Sets the parent to create under.
    #[must_use]
    pub fn under(mut self, parent_id: TaskId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Positions the new task immediately after a sibling.
    #[must_use]
    pub fn after(mut self, sibling: TaskId) -> Self {
        self.after_id = Some(sibling);
        self
    }

    /// Positions the new task at the start of the sibling list.
    #[must_use]
    pub const fn at_start(mut self) -> Self {
        self.append = false;
        self
    }

    /// Applies field overrides on top of the defaults.
    #[must_use]
    pub fn with_overrides(mut self, overrides: TaskPatch) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Partial field update for [`update`].
///
/// Structural fields (`id`, `parent_id`, `child_task_ids`) are deliberately
/// absent: structure changes only through [`move_task`] and friends. Fields
/// wrapped in a double `Option` distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New status. Completion through here skips credit accounting; use
    /// [`toggle_done`] for user-facing completion.
    pub status: Option<TaskStatus>,
    /// Set (`Some(Some(_))`) or clear (`Some(None)`) the place restriction.
    pub place_id: Option<Option<PlaceId>>,
    /// New importance weight.
    pub importance: Option<f64>,
    /// Set or clear the due date.
    pub due_date: Option<Option<Millis>>,
    /// New schedule kind.
    pub schedule_kind: Option<ScheduleKind>,
    /// New lead time.
    pub lead_time: Option<Millis>,
    /// Set or clear the recurrence anchor.
    pub last_done: Option<Option<Millis>>,
    /// Set or clear the repeat rule.
    pub repeat_config: Option<Option<RepeatConfig>>,
    /// New sequential flag.
    pub is_sequential: Option<bool>,
    /// New acknowledgement flag.
    pub is_acknowledged: Option<bool>,
    /// New stored credits.
    pub credits: Option<f64>,
    /// New desired credit rate.
    pub desired_credits: Option<f64>,
    /// New per-completion credit increment.
    pub credit_increment: Option<f64>,
    /// New credits checkpoint timestamp.
    pub credits_timestamp: Option<Millis>,
}

/// Applies `intent` to `document`, returning the next snapshot.
///
/// # Errors
///
/// Propagates the typed failure of the underlying operation; the input
/// snapshot is never modified.
pub fn apply(document: &Document, intent: Intent, now: Millis) -> Result<Document, PlanError> {
    match intent {
        Intent::Create(request) => create(document, request, now),
        Intent::Update { id, patch } => update(document, &id, patch, now),
        Intent::Delete { id } => delete(document, &id),
        Intent::Move {
            id,
            new_parent_id,
            after_id,
        } => move_task(document, &id, new_parent_id, after_id, now),
        Intent::Indent { id } => indent(document, &id, now),
        Intent::Outdent { id } => outdent(document, &id, now),
        Intent::ToggleDone { id } => toggle_done(document, &id, now),
        Intent::AcknowledgeDoneTasks => Ok(acknowledge_done_tasks(document)),
        Intent::WakeUpRoutineTasks => Ok(routines::wake_up_routine_tasks(document, now)),
    }
}

/// Creates a new task with documented defaults plus `overrides`, inserted
/// into the target sibling list.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] when the parent or `after_id` is
/// unknown, [`PlanError::PlaceNotFound`] when an override names a missing
/// place, and [`PlanError::Malformed`] when the id is already taken.
pub fn create(document: &Document, request: CreateTask, now: Millis) -> Result<Document, PlanError> {
    if document.tasks.contains_key(&request.id) {
        return Err(PlanError::Malformed(format!(
            "task id {} already present",
            request.id
        )));
    }

    let parent = match &request.parent_id {
        Some(parent_id) => Some(document.task(parent_id)?),
        None => None,
    };

    let mut task = Task::new(request.id.clone(), request.title, parent);
    task.credits_timestamp = now;
    task.priority_timestamp = now;
    merge_patch(document, &mut task, request.overrides)?;

    let position = match request.after_id {
        Some(after) => Position::After(after),
        None if request.append => Position::End,
        None => Position::Start,
    };

    let mut next = document.clone();
    insert_at(
        owning_list_mut(&mut next, request.parent_id.as_ref())?,
        request.id.clone(),
        &position,
    )?;
    next.tasks.insert(request.id.clone(), task);

    debug!("event=task_created id={} parent={:?}", request.id, request.parent_id);
    Ok(next)
}

/// Merges `patch` into the task `id`.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id and
/// [`PlanError::PlaceNotFound`] when the patch names a missing place.
pub fn update(
    document: &Document,
    id: &TaskId,
    patch: TaskPatch,
    now: Millis,
) -> Result<Document, PlanError> {
    let mut next = document.clone();
    let task = next.task_mut(id)?;
    merge_patch(document, task, patch)?;
    task.priority_timestamp = now;
    Ok(next)
}

/// Writes the non-`None` fields of `patch` into `task`.
fn merge_patch(document: &Document, task: &mut Task, patch: TaskPatch) -> Result<(), PlanError> {
    if let Some(place_update) = &patch.place_id {
        if let Some(place_id) = place_update {
            if !place_id.is_anywhere() && !document.places.contains_key(place_id) {
                return Err(PlanError::PlaceNotFound(place_id.clone()));
            }
        }
    }

    if let Some(title) = patch.title {
        task.title = title;
    }
    if let Some(notes) = patch.notes {
        task.notes = notes;
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(place_id) = patch.place_id {
        task.place_id = place_id;
    }
    if let Some(importance) = patch.importance {
        task.importance = importance;
    }
    if let Some(due_date) = patch.due_date {
        task.schedule.due_date = due_date;
    }
    if let Some(kind) = patch.schedule_kind {
        task.schedule.kind = kind;
    }
    if let Some(lead_time) = patch.lead_time {
        task.schedule.lead_time = lead_time;
    }
    if let Some(last_done) = patch.last_done {
        task.schedule.last_done = last_done;
    }
    if let Some(repeat_config) = patch.repeat_config {
        task.repeat_config = repeat_config;
    }
    if let Some(is_sequential) = patch.is_sequential {
        task.is_sequential = is_sequential;
    }
    if let Some(is_acknowledged) = patch.is_acknowledged {
        task.is_acknowledged = is_acknowledged;
    }
    if let Some(credits) = patch.credits {
        task.credits = credits;
    }
    if let Some(desired_credits) = patch.desired_credits {
        task.desired_credits = desired_credits;
    }
    if let Some(credit_increment) = patch.credit_increment {
        task.credit_increment = Some(credit_increment);
    }
    if let Some(credits_timestamp) = patch.credits_timestamp {
        task.credits_timestamp = credits_timestamp;
    }
    Ok(())
}

/// Removes the task `id` and, recursively, all of its descendants.
///
/// The cascade is atomic: either every affected record is gone from the
/// returned snapshot or the error left the input untouched.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id.
pub fn delete(document: &Document, id: &TaskId) -> Result<Document, PlanError> {
    let task = document.task(id)?;
    let parent_id = task.parent_id.clone();

    let mut next = document.clone();
    let doomed = hierarchy::descendant_ids(document, id);
    for victim in &doomed {
        next.tasks.remove(victim);
    }
    next.tasks.remove(id);
    remove_from(owning_list_mut(&mut next, parent_id.as_ref())?, id);

    debug!("event=task_deleted id={id} cascade={}", doomed.len() + 1);
    Ok(next)
}

/// Re-parents `id` under `new_parent_id` (`None` = root level), landing
/// immediately after `after_id` or at the start of the destination list.
///
/// # Errors
///
/// Returns [`PlanError::CycleDetected`] when the destination is the task
/// itself or one of its descendants, and [`PlanError::TaskNotFound`] when
/// any referenced id is unknown or `after_id` is not in the destination
/// list. The input snapshot is unchanged on error.
pub fn move_task(
    document: &Document,
    id: &TaskId,
    new_parent_id: Option<TaskId>,
    after_id: Option<TaskId>,
    now: Millis,
) -> Result<Document, PlanError> {
    let old_parent_id = document.task(id)?.parent_id.clone();

    if let Some(destination) = &new_parent_id {
        document.task(destination)?;
        if destination == id || is_descendant(document, id, destination) {
            return Err(PlanError::CycleDetected {
                task: id.clone(),
                destination: destination.clone(),
            });
        }
    }

    let mut next = document.clone();
    remove_from(owning_list_mut(&mut next, old_parent_id.as_ref())?, id);

    let position = match after_id {
        Some(anchor) => Position::After(anchor),
        None => Position::Start,
    };
    insert_at(
        owning_list_mut(&mut next, new_parent_id.as_ref())?,
        id.clone(),
        &position,
    )?;

    let task = next.task_mut(id)?;
    task.parent_id = new_parent_id;
    task.priority_timestamp = now;
    Ok(next)
}

/// Makes `id` the last child of its previous sibling.
///
/// A first child (or a task with no previous sibling) is left unchanged —
/// the boundary case is a no-op, not a failure.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id.
pub fn indent(document: &Document, id: &TaskId, now: Millis) -> Result<Document, PlanError> {
    document.task(id)?;
    let Some(new_parent) = hierarchy::previous_sibling(document, id) else {
        return Ok(document.clone());
    };

    let anchor = document.task(&new_parent)?.child_task_ids.last().cloned();
    move_task(document, id, Some(new_parent), anchor, now)
}

/// Moves `id` out to its grandparent (or the root level), landing
/// immediately after its former parent.
///
/// A root-level task is left unchanged.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id and
/// [`PlanError::Malformed`] when the parent chain dangles.
pub fn outdent(document: &Document, id: &TaskId, now: Millis) -> Result<Document, PlanError> {
    let Some(parent_id) = document.task(id)?.parent_id.clone() else {
        return Ok(document.clone());
    };
    let grandparent_id = document
        .tasks
        .get(&parent_id)
        .ok_or_else(|| {
            PlanError::Malformed(format!("task {id} references missing parent {parent_id}"))
        })?
        .parent_id
        .clone();

    move_task(document, id, grandparent_id, Some(parent_id), now)
}

/// Flips `id` between `Pending` and `Done`.
///
/// Completing grants the credit increment on top of the decayed credit
/// balance and stamps the completion timestamps. Reverting restores
/// `Pending` and clears the acknowledgement but never claws credits back.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id and
/// [`PlanError::InvalidTransition`] when the task is tombstoned.
pub fn toggle_done(document: &Document, id: &TaskId, now: Millis) -> Result<Document, PlanError> {
    let mut next = document.clone();
    let task = next.task_mut(id)?;

    match task.status {
        TaskStatus::Deleted => {
            return Err(PlanError::InvalidTransition {
                task: id.clone(),
                reason: "task is deleted".to_owned(),
            });
        }
        TaskStatus::Pending => {
            let decayed = decay_credits(task.credits, task.credits_timestamp, now);
            let increment = task.credit_increment.unwrap_or(DEFAULT_CREDIT_INCREMENT);
            task.credits = decayed + increment;
            task.credits_timestamp = now;
            task.status = TaskStatus::Done;
            task.last_completed_at = Some(now);
            debug!("event=task_completed id={id}");
        }
        TaskStatus::Done => {
            task.status = TaskStatus::Pending;
            task.is_acknowledged = false;
            debug!("event=task_reopened id={id}");
        }
    }
    task.priority_timestamp = now;
    Ok(next)
}

/// Acknowledges every `Done` task so it leaves the active list.
#[must_use]
pub fn acknowledge_done_tasks(document: &Document) -> Document {
    let mut next = document.clone();
    for task in next.tasks.values_mut() {
        if task.status == TaskStatus::Done && !task.is_acknowledged {
            task.is_acknowledged = true;
        }
    }
    next
}
