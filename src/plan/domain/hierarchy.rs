//! Tree algebra: ancestry, descendant, and sibling-list primitives.
//!
//! All functions here are pure and total over a snapshot. They either
//! produce a fully consistent result or report the input as malformed; they
//! never leave a document half-edited.

use super::{Document, PlanError, TaskId};
use std::collections::HashSet;

/// Insertion point within a sibling list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// Insert as the first sibling.
    Start,
    /// Insert as the last sibling.
    End,
    /// Insert immediately after the given sibling.
    After(TaskId),
}

/// Collects the ancestor chain of `id`, nearest parent first.
///
/// Unknown ids yield an empty chain; a malformed parent chain simply stops
/// at the dangling reference.
#[must_use]
pub fn ancestors_of(document: &Document, id: &TaskId) -> Vec<TaskId> {
    let mut ancestors = Vec::new();
    let mut current = document.tasks.get(id).and_then(|t| t.parent_id.clone());
    while let Some(parent_id) = current {
        // Guard against cyclic input so a malformed snapshot cannot hang us.
        if ancestors.contains(&parent_id) {
            break;
        }
        current = document
            .tasks
            .get(&parent_id)
            .and_then(|t| t.parent_id.clone());
        ancestors.push(parent_id);
    }
    ancestors
}

/// Collects every descendant id of `id` (children, grandchildren, …).
#[must_use]
pub fn descendant_ids(document: &Document, id: &TaskId) -> HashSet<TaskId> {
    let mut descendants = HashSet::new();
    let mut stack: Vec<TaskId> = document
        .tasks
        .get(id)
        .map(|t| t.child_task_ids.clone())
        .unwrap_or_default();

    while let Some(current) = stack.pop() {
        if descendants.insert(current.clone()) {
            if let Some(task) = document.tasks.get(&current) {
                stack.extend(task.child_task_ids.iter().cloned());
            }
        }
    }

    descendants
}

/// Returns whether `node` sits somewhere below `candidate_ancestor`.
#[must_use]
pub fn is_descendant(document: &Document, candidate_ancestor: &TaskId, node: &TaskId) -> bool {
    ancestors_of(document, node)
        .iter()
        .any(|ancestor| ancestor == candidate_ancestor)
}

/// Returns the sibling list owning `id`: the root list for parentless
/// tasks, otherwise the parent's child list.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown `id` and
/// [`PlanError::Malformed`] when the parent back-reference dangles.
pub fn sibling_list<'doc>(
    document: &'doc Document,
    id: &TaskId,
) -> Result<&'doc Vec<TaskId>, PlanError> {
    let task = document.task(id)?;
    match &task.parent_id {
        None => Ok(&document.root_task_ids),
        Some(parent_id) => document
            .tasks
            .get(parent_id)
            .map(|parent| &parent.child_task_ids)
            .ok_or_else(|| {
                PlanError::Malformed(format!("task {id} references missing parent {parent_id}"))
            }),
    }
}

/// Mutable access to the sibling list owned by `parent` (`None` = roots).
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] when `parent` is unknown.
pub fn owning_list_mut<'doc>(
    document: &'doc mut Document,
    parent: Option<&TaskId>,
) -> Result<&'doc mut Vec<TaskId>, PlanError> {
    match parent {
        None => Ok(&mut document.root_task_ids),
        Some(parent_id) => Ok(&mut document.task_mut(parent_id)?.child_task_ids),
    }
}

/// Returns the sibling immediately before `id` in its owning list.
#[must_use]
pub fn previous_sibling(document: &Document, id: &TaskId) -> Option<TaskId> {
    let siblings = sibling_list(document, id).ok()?;
    let position = siblings.iter().position(|sibling| sibling == id)?;
    position.checked_sub(1).map(|i| siblings[i].clone())
}

/// Inserts `id` into `list` at `position`, preserving the order of the
/// remaining entries.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] when `Position::After` names an id
/// that is not in the list.
pub fn insert_at(list: &mut Vec<TaskId>, id: TaskId, position: &Position) -> Result<(), PlanError> {
    match position {
        Position::Start => list.insert(0, id),
        Position::End => list.push(id),
        Position::After(anchor) => {
            let anchor_index = list
                .iter()
                .position(|entry| entry == anchor)
                .ok_or_else(|| PlanError::TaskNotFound(anchor.clone()))?;
            list.insert(anchor_index + 1, id);
        }
    }
    Ok(())
}

/// Removes `id` from `list`; absent ids are a no-op.
pub fn remove_from(list: &mut Vec<TaskId>, id: &TaskId) {
    list.retain(|entry| entry != id);
}
