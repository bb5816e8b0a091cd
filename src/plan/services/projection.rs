//! Read-only projections derived on demand from a snapshot.
//!
//! Nothing here caches or mutates: every view is recomputed from the
//! document it is handed, so replicas can re-render after any merge.

use crate::plan::domain::{Document, Millis, PlanError, TaskId, TaskStatus, hierarchy};
use crate::plan::services::priority::{PriorityOptions, ScoredTask, prioritize};

/// One node of the rendered plan outline.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Completion status.
    pub status: TaskStatus,
    /// Acknowledgement flag.
    pub is_acknowledged: bool,
    /// Whether children must be worked in order.
    pub is_sequential: bool,
    /// Raw importance weight.
    pub importance: f64,
    /// Children in stored sibling order.
    pub children: Vec<TreeNode>,
}

/// One segment of a breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
}

/// Renders the full task forest in stored order, tombstoned tasks omitted.
#[must_use]
pub fn build_tree(document: &Document) -> Vec<TreeNode> {
    build_forest(document, &document.root_task_ids)
}

fn build_forest(document: &Document, ids: &[TaskId]) -> Vec<TreeNode> {
    ids.iter()
        .filter_map(|id| document.tasks.get(id))
        .filter(|task| task.status != TaskStatus::Deleted)
        .map(|task| TreeNode {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status,
            is_acknowledged: task.is_acknowledged,
            is_sequential: task.is_sequential,
            importance: task.importance,
            children: build_forest(document, &task.child_task_ids),
        })
        .collect()
}

/// Computes the prioritized do-list with default options.
#[must_use]
pub fn select_priority_list(document: &Document, now: Millis) -> Vec<ScoredTask> {
    prioritize(document, now, &PriorityOptions::default())
}

/// Returns the path from the root down to `task_id`, inclusive.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id.
pub fn breadcrumbs_for(document: &Document, task_id: &TaskId) -> Result<Vec<Breadcrumb>, PlanError> {
    let task = document.task(task_id)?;

    let mut path: Vec<Breadcrumb> = hierarchy::ancestors_of(document, task_id)
        .into_iter()
        .filter_map(|ancestor_id| document.tasks.get(&ancestor_id))
        .map(|ancestor| Breadcrumb {
            id: ancestor.id.clone(),
            title: ancestor.title.clone(),
        })
        .collect();
    path.reverse();
    path.push(Breadcrumb {
        id: task.id.clone(),
        title: task.title.clone(),
    });
    Ok(path)
}

/// Returns every task `task_id` could legally be re-parented under, in
/// outline order: all tasks except itself and its descendants.
///
/// # Errors
///
/// Returns [`PlanError::TaskNotFound`] for an unknown id.
pub fn valid_move_targets_for(
    document: &Document,
    task_id: &TaskId,
) -> Result<Vec<TaskId>, PlanError> {
    document.task(task_id)?;
    let excluded = hierarchy::descendant_ids(document, task_id);

    let mut targets = Vec::new();
    collect_targets(document, &document.root_task_ids, task_id, &excluded, &mut targets);
    Ok(targets)
}

fn collect_targets(
    document: &Document,
    ids: &[TaskId],
    moving: &TaskId,
    excluded: &std::collections::HashSet<TaskId>,
    targets: &mut Vec<TaskId>,
) {
    for id in ids {
        if id == moving || excluded.contains(id) {
            continue;
        }
        let Some(task) = document.tasks.get(id) else {
            continue;
        };
        if task.status == TaskStatus::Deleted {
            continue;
        }
        targets.push(id.clone());
        collect_targets(document, &task.child_task_ids, moving, excluded, targets);
    }
}
