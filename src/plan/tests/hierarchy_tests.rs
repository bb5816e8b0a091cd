//! Tree algebra tests: ancestry, descendants, and sibling-list editing.

use super::fixtures::{id, sample_document};
use crate::plan::domain::hierarchy::{
    ancestors_of, descendant_ids, insert_at, is_descendant, previous_sibling, remove_from,
    sibling_list,
};
use crate::plan::domain::{PlanError, Position, TaskId};
use rstest::rstest;

#[rstest]
fn ancestors_are_listed_nearest_first() {
    let document = sample_document();
    assert_eq!(ancestors_of(&document, &id("a2x")), vec![id("a2"), id("a")]);
    assert_eq!(ancestors_of(&document, &id("a")), Vec::<TaskId>::new());
}

#[rstest]
fn descendants_cover_the_whole_subtree() {
    let document = sample_document();
    let descendants = descendant_ids(&document, &id("a"));

    assert_eq!(descendants.len(), 3);
    assert!(descendants.contains(&id("a1")));
    assert!(descendants.contains(&id("a2")));
    assert!(descendants.contains(&id("a2x")));
}

#[rstest]
#[case("a", "a2x", true)]
#[case("a2", "a2x", true)]
#[case("a2x", "a", false)]
#[case("b", "a2x", false)]
fn is_descendant_walks_the_parent_chain(
    #[case] ancestor: &str,
    #[case] node: &str,
    #[case] expected: bool,
) {
    let document = sample_document();
    assert_eq!(is_descendant(&document, &id(ancestor), &id(node)), expected);
}

#[rstest]
fn sibling_list_is_the_owning_list() {
    let document = sample_document();

    let roots = sibling_list(&document, &id("a")).expect("root task");
    assert_eq!(roots, &document.root_task_ids);

    let children = sibling_list(&document, &id("a1")).expect("child task");
    assert_eq!(children, &[id("a1"), id("a2")]);
}

#[rstest]
fn previous_sibling_of_first_child_is_none() {
    let document = sample_document();
    assert_eq!(previous_sibling(&document, &id("a1")), None);
    assert_eq!(previous_sibling(&document, &id("a2")), Some(id("a1")));
    assert_eq!(previous_sibling(&document, &id("b")), Some(id("a")));
}

#[rstest]
fn insert_at_supports_every_position() {
    let mut list = vec![id("x"), id("y")];

    insert_at(&mut list, id("s"), &Position::Start).expect("start insert");
    insert_at(&mut list, id("e"), &Position::End).expect("end insert");
    insert_at(&mut list, id("m"), &Position::After(id("x"))).expect("after insert");

    assert_eq!(list, vec![id("s"), id("x"), id("m"), id("y"), id("e")]);
}

#[rstest]
fn insert_after_unknown_anchor_fails() {
    let mut list = vec![id("x")];
    let result = insert_at(&mut list, id("n"), &Position::After(id("ghost")));

    assert_eq!(result, Err(PlanError::TaskNotFound(id("ghost"))));
    assert_eq!(list, vec![id("x")]);
}

#[rstest]
fn remove_from_is_a_noop_for_absent_ids() {
    let mut list = vec![id("x"), id("y")];
    remove_from(&mut list, &id("ghost"));
    assert_eq!(list, vec![id("x"), id("y")]);

    remove_from(&mut list, &id("x"));
    assert_eq!(list, vec![id("y")]);
}
