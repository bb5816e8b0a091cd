//! Document store adapter and dispatch-seam tests.

use super::fixtures::{NOW, id, sample_document};
use crate::plan::adapters::InMemoryDocumentStore;
use crate::plan::ports::DocumentStore;
use crate::plan::services::dispatch::{DispatchError, dispatch};
use crate::plan::services::intents::{CreateTask, Intent};
use rstest::rstest;

#[rstest]
fn snapshot_returns_what_was_committed() {
    let store = InMemoryDocumentStore::new();
    let document = sample_document();

    store.commit(document.clone()).expect("commit must succeed");
    let snapshot = store.snapshot().expect("snapshot must succeed");

    assert_eq!(snapshot, document);
}

#[rstest]
fn dispatch_applies_and_persists_the_intent() {
    let store = InMemoryDocumentStore::with_document(sample_document());

    let intent = Intent::Create(CreateTask {
        id: id("c"),
        ..CreateTask::new("Goal C")
    });
    let returned = dispatch(&store, intent, NOW).expect("dispatch must succeed");

    assert!(returned.tasks.contains_key(&id("c")));
    let persisted = store.snapshot().expect("snapshot must succeed");
    assert_eq!(persisted, returned);
}

#[rstest]
fn rejected_intents_leave_the_store_untouched() {
    let store = InMemoryDocumentStore::with_document(sample_document());
    let before = store.snapshot().expect("snapshot must succeed");

    let intent = Intent::Move {
        id: id("a"),
        new_parent_id: Some(id("a2x")),
        after_id: None,
    };
    let result = dispatch(&store, intent, NOW);

    assert!(matches!(result, Err(DispatchError::Plan(_))));
    assert_eq!(store.snapshot().expect("snapshot must succeed"), before);
}
