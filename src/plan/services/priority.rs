//! The priority pipeline: a pure, staged function from a document snapshot
//! plus a clock to the ordered "do next" list.
//!
//! Stages, in order: hydrate the forest in depth-first outline order, apply
//! place visibility, compute lead-time factors and decayed credits,
//! aggregate credits bottom-up, derive per-root fairness factors, walk the
//! tree distributing importance (with sequential gating and schedule
//! inheritance), delegate containers to their pending children, then sort
//! and filter deterministically. The same snapshot and `now` always produce
//! the same list, tie order included.

use crate::plan::domain::constants::{MIN_PRIORITY, PRIORITY_EPSILON};
use crate::plan::domain::{Document, Millis, PlaceId, ScheduleKind, TaskId, TaskStatus};
use crate::plan::services::feedback::{FeedbackTotals, decay_credits, feedback_factor};
use crate::plan::services::readiness::{Urgency, lead_time_factor, urgency};
use crate::plan::services::visibility::{PlaceFilter, is_visible};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Options controlling the projected list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityOptions {
    /// When `true`, suppressed tasks (invisible, below the score floor, or
    /// acknowledged) are kept in the output. Deleted tasks are never kept.
    pub include_hidden: bool,
    /// Place filter for the current context.
    pub filter: PlaceFilter,
}

/// Where a task's effective schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleSource {
    /// The task carries its own due date.
    Own,
    /// The due date was inherited from an ancestor during scoring.
    Ancestor,
}

/// A task annotated with its computed standing in the do-list.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTask {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Parent id, absent for roots.
    pub parent_id: Option<TaskId>,
    /// Effective place (the "anywhere" sentinel when unrestricted).
    pub place_id: PlaceId,
    /// Completion status.
    pub status: TaskStatus,
    /// Acknowledgement flag.
    pub is_acknowledged: bool,
    /// Raw user-set importance.
    pub importance: f64,
    /// Importance after distribution down the tree.
    pub normalized_importance: f64,
    /// Decayed credits aggregated over the subtree.
    pub effective_credits: f64,
    /// The composite score the list is ordered by.
    pub score: f64,
    /// Whether the task has children.
    pub is_container: bool,
    /// Whether the task still represents outstanding work.
    pub is_pending: bool,
    /// Pending and inside its readiness window.
    pub is_ready: bool,
    /// Due date used for scoring, own or inherited.
    pub effective_due_date: Option<Millis>,
    /// Lead time used for scoring.
    pub effective_lead_time: Option<Millis>,
    /// Origin of the effective schedule, when there is one.
    pub schedule_source: Option<ScheduleSource>,
    /// Display urgency classification.
    pub urgency: Urgency,
}

/// Mutable per-task scratchpad threaded through the pipeline stages.
struct ScoreState {
    id: TaskId,
    title: String,
    parent_id: Option<TaskId>,
    place_id: PlaceId,
    status: TaskStatus,
    is_acknowledged: bool,
    is_sequential: bool,
    is_deleted: bool,
    is_pending: bool,
    is_container: bool,
    importance: f64,
    desired_credits: f64,
    lead_time: Millis,
    effective_due_date: Option<Millis>,
    effective_lead_time: Option<Millis>,
    schedule_source: Option<ScheduleSource>,
    effective_credits: f64,
    feedback_factor: f64,
    lead_time_factor: f64,
    normalized_importance: f64,
    visibility: bool,
    score: f64,
    outline_index: usize,
}

/// Ordered child indices per state, parallel to the state vector.
type ChildrenIndex = Vec<Vec<usize>>;

/// Computes the prioritized task list for `document` at `now`.
#[must_use]
pub fn prioritize(document: &Document, now: Millis, options: &PriorityOptions) -> Vec<ScoredTask> {
    let (mut states, children, roots) = hydrate(document, now, &options.filter);

    aggregate_effective_credits(&mut states);
    apply_feedback_factors(&mut states, &roots);

    for &root in &roots {
        states[root].normalized_importance = states[root].importance;
        evaluate(root, root, &mut states, &children, now);
    }

    let mut order: Vec<usize> = (0..states.len()).collect();
    order.sort_by(|&a, &b| compare_states(&states[a], &states[b]));

    order
        .into_iter()
        .filter(|&idx| selects(&states[idx], options))
        .map(|idx| project(&states[idx], now))
        .collect()
}

/// Builds the scratchpad states in depth-first outline order, along with
/// the children index and root indices.
///
/// Dangling ids in sibling lists are skipped: a malformed snapshot is an
/// upstream contract violation, never a pipeline error.
fn hydrate(
    document: &Document,
    now: Millis,
    filter: &PlaceFilter,
) -> (Vec<ScoreState>, ChildrenIndex, Vec<usize>) {
    let mut states: Vec<ScoreState> = Vec::with_capacity(document.tasks.len());
    let mut children: ChildrenIndex = Vec::with_capacity(document.tasks.len());
    let mut roots = Vec::new();

    // Iterative DFS preserving sibling order; a stack of (task id, parent
    // state slot) entries pushed in reverse keeps the outline order stable.
    // The seen-set guards against duplicated or cyclic sibling lists in a
    // malformed snapshot.
    let mut seen: HashSet<TaskId> = HashSet::new();
    let mut stack: Vec<(TaskId, Option<usize>)> = document
        .root_task_ids
        .iter()
        .rev()
        .map(|id| (id.clone(), None))
        .collect();

    while let Some((id, parent_slot)) = stack.pop() {
        let Some(task) = document.tasks.get(&id) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }

        let slot = states.len();
        match parent_slot {
            None => roots.push(slot),
            Some(parent) => children[parent].push(slot),
        }

        let is_deleted = task.status == TaskStatus::Deleted;
        let effective_due_date = task.effective_due_date();
        states.push(ScoreState {
            id: id.clone(),
            title: task.title.clone(),
            parent_id: task.parent_id.clone(),
            place_id: task.place_id.clone().unwrap_or_else(PlaceId::anywhere),
            status: task.status,
            is_acknowledged: task.is_acknowledged,
            is_sequential: task.is_sequential,
            is_deleted,
            is_pending: task.is_pending(),
            is_container: !task.child_task_ids.is_empty(),
            importance: task.importance,
            desired_credits: task.desired_credits,
            lead_time: task.schedule.lead_time,
            effective_due_date,
            effective_lead_time: Some(task.schedule.lead_time),
            schedule_source: if task.schedule.due_date.is_some()
                || (task.schedule.kind == ScheduleKind::Routinely
                    && task.schedule.last_done.is_some())
            {
                Some(ScheduleSource::Own)
            } else {
                None
            },
            effective_credits: decay_credits(task.credits, task.credits_timestamp, now),
            feedback_factor: 1.0,
            lead_time_factor: sanitize(lead_time_factor(
                effective_due_date,
                task.schedule.lead_time,
                now,
            )),
            normalized_importance: 0.0,
            visibility: !is_deleted && is_visible(document, task, filter, now),
            score: 0.0,
            outline_index: slot,
        });
        children.push(Vec::new());

        for child_id in task.child_task_ids.iter().rev() {
            stack.push((child_id.clone(), Some(slot)));
        }
    }

    (states, children, roots)
}

/// Folds each task's decayed credits into its ancestors.
///
/// States are in depth-first order, so every child sits after its parent;
/// a reverse scan accumulates whole subtrees in one pass.
fn aggregate_effective_credits(states: &mut [ScoreState]) {
    let index_of: HashMap<TaskId, usize> = states
        .iter()
        .enumerate()
        .map(|(idx, state)| (state.id.clone(), idx))
        .collect();

    for idx in (0..states.len()).rev() {
        let Some(parent_id) = states[idx].parent_id.clone() else {
            continue;
        };
        if let Some(&parent_idx) = index_of.get(&parent_id) {
            let credits = states[idx].effective_credits;
            states[parent_idx].effective_credits += credits;
        }
    }
}

/// Computes the fairness factor for every root goal.
fn apply_feedback_factors(states: &mut [ScoreState], roots: &[usize]) {
    let totals = FeedbackTotals {
        total_desired_credits: 0.0,
        total_effective_credits: 0.0,
    };
    let totals = roots.iter().fold(totals, |mut totals, &root| {
        totals.total_desired_credits += states[root].desired_credits;
        totals.total_effective_credits += states[root].effective_credits;
        totals
    });

    for &root in roots {
        states[root].feedback_factor =
            feedback_factor(states[root].desired_credits, states[root].effective_credits, totals);
    }
}

/// Distributes importance and schedules to the children of `parent`.
fn distribute_to_children(
    parent: usize,
    child_indices: &[usize],
    states: &mut [ScoreState],
    now: Millis,
) {
    if child_indices.is_empty() {
        return;
    }

    let pending_importance_sum: f64 = child_indices
        .iter()
        .filter(|&&idx| states[idx].is_pending)
        .map(|&idx| states[idx].importance)
        .sum();

    let is_sequential = states[parent].is_sequential;
    let parent_importance = states[parent].normalized_importance;
    let parent_due_date = states[parent].effective_due_date;
    let parent_lead_time = states[parent].effective_lead_time;

    let mut has_active_child = false;
    for &child in child_indices {
        if states[child].effective_due_date.is_none() && parent_due_date.is_some() {
            states[child].effective_due_date = parent_due_date;
            states[child].effective_lead_time = parent_lead_time;
            states[child].schedule_source = Some(ScheduleSource::Ancestor);
        }

        if is_sequential {
            if states[child].status == TaskStatus::Pending {
                if has_active_child {
                    // Gated: only the first not-done child is workable.
                    states[child].normalized_importance = 0.0;
                    states[child].lead_time_factor = 0.0;
                    continue;
                }
                has_active_child = true;
            }
            states[child].normalized_importance = parent_importance;
        } else if pending_importance_sum == 0.0 {
            states[child].normalized_importance = parent_importance / child_indices.len() as f64;
        } else {
            states[child].normalized_importance =
                (states[child].importance / pending_importance_sum) * parent_importance;
        }

        let lead_time = states[child].effective_lead_time.unwrap_or(states[child].lead_time);
        states[child].lead_time_factor = sanitize(lead_time_factor(
            states[child].effective_due_date,
            lead_time,
            now,
        ));
    }
}

/// Depth-first evaluation: distributes to children, recurses, then settles
/// this task's visibility and score. Returns whether the subtree below
/// `idx` contains pending work.
fn evaluate(
    idx: usize,
    root: usize,
    states: &mut [ScoreState],
    children: &ChildrenIndex,
    now: Millis,
) -> bool {
    let child_indices = children[idx].clone();
    distribute_to_children(idx, &child_indices, states, now);

    let mut has_pending_descendant = false;
    for &child in &child_indices {
        let child_subtree_pending = evaluate(child, root, states, children, now);
        has_pending_descendant |= child_subtree_pending || states[child].is_pending;
    }

    let feedback = states[root].feedback_factor;
    let state = &mut states[idx];

    if has_pending_descendant {
        // Containers delegate to their children: the parent is not itself
        // actionable while pending work remains below it.
        state.visibility = false;
        state.score = 0.0;
    } else {
        let visibility_factor = if state.visibility { 1.0 } else { 0.0 };
        state.score = visibility_factor
            * sanitize(state.normalized_importance)
            * feedback
            * sanitize(state.lead_time_factor);
    }

    has_pending_descendant
}

/// Deterministic list order: score descending, raw importance descending,
/// outline order ascending.
fn compare_states(a: &ScoreState, b: &ScoreState) -> Ordering {
    if (a.score - b.score).abs() > PRIORITY_EPSILON {
        return b.score.total_cmp(&a.score);
    }
    if (a.importance - b.importance).abs() > f64::EPSILON {
        return b.importance.total_cmp(&a.importance);
    }
    a.outline_index.cmp(&b.outline_index)
}

/// Final membership filter.
fn selects(state: &ScoreState, options: &PriorityOptions) -> bool {
    if state.is_deleted {
        return false;
    }
    if options.include_hidden {
        return true;
    }
    if !state.visibility {
        return false;
    }
    if state.status == TaskStatus::Done && state.is_acknowledged {
        return false;
    }
    state.score > MIN_PRIORITY
}

/// Projects a scratchpad state into the public annotated task.
fn project(state: &ScoreState, now: Millis) -> ScoredTask {
    let is_ready = state.is_pending && state.lead_time_factor > 0.0;
    ScoredTask {
        id: state.id.clone(),
        title: state.title.clone(),
        parent_id: state.parent_id.clone(),
        place_id: state.place_id.clone(),
        status: state.status,
        is_acknowledged: state.is_acknowledged,
        importance: state.importance,
        normalized_importance: state.normalized_importance,
        effective_credits: state.effective_credits,
        score: state.score,
        is_container: state.is_container,
        is_pending: state.is_pending,
        is_ready,
        effective_due_date: state.effective_due_date,
        effective_lead_time: state.effective_lead_time,
        schedule_source: state.schedule_source,
        urgency: urgency(state.effective_due_date, state.effective_lead_time, now),
    }
}

/// Collapses NaN factors to zero so one bad input cannot poison the sort.
fn sanitize(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}
