//! Property tests: arbitrary operation sequences preserve the structural
//! invariants, and cycle rejection holds for every ancestor/descendant
//! pair.

use super::fixtures::NOW;
use crate::plan::domain::{Document, TaskId, hierarchy};
use crate::plan::services::intents::{self, CreateTask, Intent, TaskPatch};
use proptest::prelude::*;

/// Operations over a small fixed id pool so sequences collide in
/// interesting ways (duplicate creates, moves into deleted subtrees, …).
#[derive(Debug, Clone)]
enum Op {
    Create { id: usize, parent: Option<usize> },
    Delete { id: usize },
    Move { id: usize, parent: Option<usize> },
    Indent { id: usize },
    Outdent { id: usize },
    Toggle { id: usize },
    Acknowledge,
    Wake,
}

const POOL: usize = 8;

fn pool_id(index: usize) -> TaskId {
    TaskId::from(format!("t{index}"))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL, proptest::option::of(0..POOL))
            .prop_map(|(id, parent)| Op::Create { id, parent }),
        (0..POOL).prop_map(|id| Op::Delete { id }),
        (0..POOL, proptest::option::of(0..POOL)).prop_map(|(id, parent)| Op::Move { id, parent }),
        (0..POOL).prop_map(|id| Op::Indent { id }),
        (0..POOL).prop_map(|id| Op::Outdent { id }),
        (0..POOL).prop_map(|id| Op::Toggle { id }),
        Just(Op::Acknowledge),
        Just(Op::Wake),
    ]
}

fn to_intent(op: &Op) -> Intent {
    match op {
        Op::Create { id, parent } => Intent::Create(CreateTask {
            id: pool_id(*id),
            title: format!("Task {id}"),
            parent_id: parent.map(pool_id),
            after_id: None,
            append: true,
            overrides: TaskPatch::default(),
        }),
        Op::Delete { id } => Intent::Delete { id: pool_id(*id) },
        Op::Move { id, parent } => Intent::Move {
            id: pool_id(*id),
            new_parent_id: parent.map(pool_id),
            after_id: None,
        },
        Op::Indent { id } => Intent::Indent { id: pool_id(*id) },
        Op::Outdent { id } => Intent::Outdent { id: pool_id(*id) },
        Op::Toggle { id } => Intent::ToggleDone { id: pool_id(*id) },
        Op::Acknowledge => Intent::AcknowledgeDoneTasks,
        Op::Wake => Intent::WakeUpRoutineTasks,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every reachable document satisfies the structural invariants, no
    /// matter which operations were applied or rejected along the way.
    #[test]
    fn operation_sequences_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let mut document = Document::new();
        let mut clock = NOW;

        for op in &ops {
            clock += 1;
            // Rejected intents (unknown ids, cycles, duplicates) must leave
            // the snapshot untouched; accepted ones must keep it sound.
            if let Ok(next) = intents::apply(&document, to_intent(op), clock) {
                document = next;
            }
            prop_assert!(document.check_integrity().is_ok());
        }
    }

    /// Moving any task under any of its descendants is always rejected.
    #[test]
    fn moves_under_descendants_are_always_rejected(ops in proptest::collection::vec(op_strategy(), 0..30)) {
        let mut document = Document::new();
        let mut clock = NOW;
        for op in &ops {
            clock += 1;
            if let Ok(next) = intents::apply(&document, to_intent(op), clock) {
                document = next;
            }
        }

        let task_ids: Vec<TaskId> = document.tasks.keys().cloned().collect();
        for task_id in &task_ids {
            for descendant in hierarchy::descendant_ids(&document, task_id) {
                let result =
                    intents::move_task(&document, task_id, Some(descendant), None, clock);
                prop_assert!(result.is_err());
            }
        }
    }
}
