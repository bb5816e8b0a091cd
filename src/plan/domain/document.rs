//! The document aggregate: the full task forest plus places.

use super::{Place, PlaceId, PlanError, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The root aggregate of a replicated planning document.
///
/// Tasks form a forest: `root_task_ids` orders the top level and each task's
/// `child_task_ids` orders its children. The map is the arena; every
/// structural edge is expressed through id lists plus parent back-references
/// so both sides of each edge can be kept consistent atomically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// All task records, keyed by id.
    #[serde(default)]
    pub tasks: HashMap<TaskId, Task>,
    /// All place records, keyed by id.
    #[serde(default)]
    pub places: HashMap<PlaceId, Place>,
    /// Ordered root-level task ids.
    #[serde(default)]
    pub root_task_ids: Vec<TaskId>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the task for `id` or a [`PlanError::TaskNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::TaskNotFound`] when the id is unknown.
    pub fn task(&self, id: &TaskId) -> Result<&Task, PlanError> {
        self.tasks
            .get(id)
            .ok_or_else(|| PlanError::TaskNotFound(id.clone()))
    }

    /// Mutable variant of [`Document::task`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::TaskNotFound`] when the id is unknown.
    pub fn task_mut(&mut self, id: &TaskId) -> Result<&mut Task, PlanError> {
        self.tasks
            .get_mut(id)
            .ok_or_else(|| PlanError::TaskNotFound(id.clone()))
    }

    /// Verifies the five structural invariants.
    ///
    /// Mutation code assumes a valid input snapshot; this check is the
    /// fail-fast guard used by tests and by callers hydrating documents from
    /// untrusted replicas. The invariants:
    ///
    /// 1. no task is its own ancestor;
    /// 2. `parent_id` back-references agree with the owning id list, and
    ///    parentless tasks appear in `root_task_ids`;
    /// 3. no id list references a missing task;
    /// 4. each id is owned by exactly one list;
    /// 5. (ordering is significant — vacuous here, preserved by ops).
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Malformed`] naming the first violation found.
    pub fn check_integrity(&self) -> Result<(), PlanError> {
        let mut owned: HashSet<&TaskId> = HashSet::new();

        for (list_name, parent, list) in self.owned_lists() {
            for id in list {
                let task = self.tasks.get(id).ok_or_else(|| {
                    PlanError::Malformed(format!("{list_name} references missing task {id}"))
                })?;
                if !owned.insert(id) {
                    return Err(PlanError::Malformed(format!(
                        "task {id} is owned by more than one sibling list"
                    )));
                }
                if task.parent_id.as_ref() != parent {
                    return Err(PlanError::Malformed(format!(
                        "task {id} parent back-reference disagrees with {list_name}"
                    )));
                }
            }
        }

        for (id, task) in &self.tasks {
            if id != &task.id {
                return Err(PlanError::Malformed(format!(
                    "task keyed as {id} carries id {}",
                    task.id
                )));
            }
            if !owned.contains(id) {
                return Err(PlanError::Malformed(format!(
                    "task {id} is not owned by any sibling list"
                )));
            }
            self.check_acyclic(id)?;
        }

        Ok(())
    }

    /// Walks the parent chain of `id`, failing if it revisits `id`.
    fn check_acyclic(&self, id: &TaskId) -> Result<(), PlanError> {
        let mut seen = HashSet::new();
        let mut current = self.tasks.get(id).and_then(|t| t.parent_id.as_ref());
        while let Some(parent) = current {
            if parent == id || !seen.insert(parent) {
                return Err(PlanError::Malformed(format!(
                    "task {id} is its own ancestor"
                )));
            }
            current = self.tasks.get(parent).and_then(|t| t.parent_id.as_ref());
        }
        Ok(())
    }

    /// Yields every owning sibling list with its parent context.
    fn owned_lists(&self) -> impl Iterator<Item = (String, Option<&TaskId>, &Vec<TaskId>)> {
        let root = std::iter::once(("rootTaskIds".to_owned(), None, &self.root_task_ids));
        let children = self.tasks.values().map(|task| {
            (
                format!("childTaskIds of {}", task.id),
                Some(&task.id),
                &task.child_task_ids,
            )
        });
        root.chain(children)
    }
}
