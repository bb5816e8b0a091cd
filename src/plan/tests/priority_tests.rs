//! Priority pipeline tests: ordering, gating, visibility, fairness, and
//! the readiness curves.

use super::fixtures::{DAY, HOUR, NOW, id, insert_child, insert_place, insert_root, place, task};
use crate::plan::domain::{Document, OpenHoursMode, PlaceId, TaskId, TaskStatus};
use crate::plan::services::intents::{acknowledge_done_tasks, toggle_done};
use crate::plan::services::priority::{PriorityOptions, ScheduleSource, prioritize};
use crate::plan::services::readiness::{Urgency, lead_time_factor, urgency};
use crate::plan::services::visibility::PlaceFilter;
use rstest::rstest;

fn listed_ids(document: &Document) -> Vec<TaskId> {
    prioritize(document, NOW, &PriorityOptions::default())
        .into_iter()
        .map(|scored| scored.id)
        .collect()
}

fn two_goals(importance_a: f64, importance_b: f64) -> Document {
    let mut document = Document::new();
    let mut a = task("a", "Goal A");
    a.importance = importance_a;
    let mut b = task("b", "Goal B");
    b.importance = importance_b;
    insert_root(&mut document, a);
    insert_root(&mut document, b);
    document
}

#[rstest]
fn higher_importance_ranks_first() {
    let document = two_goals(1.0, 0.1);
    assert_eq!(listed_ids(&document), vec![id("a"), id("b")]);

    let flipped = two_goals(0.1, 1.0);
    assert_eq!(listed_ids(&flipped), vec![id("b"), id("a")]);
}

#[rstest]
fn done_task_stays_listed_until_acknowledged() {
    let document = two_goals(1.0, 0.1);

    let done = toggle_done(&document, &id("a"), NOW).expect("complete a");
    let listed = listed_ids(&done);
    assert!(listed.contains(&id("a")), "unacknowledged Done task remains");
    assert!(listed.contains(&id("b")));

    let acknowledged = acknowledge_done_tasks(&done);
    let listed = listed_ids(&acknowledged);
    assert!(!listed.contains(&id("a")), "acknowledged Done task is cleared");
    assert!(listed.contains(&id("b")));
}

#[rstest]
fn containers_delegate_to_their_pending_children() {
    let mut document = Document::new();
    insert_root(&mut document, task("goal", "Goal"));
    insert_child(&mut document, "goal", task("step", "Step"));

    let listed = listed_ids(&document);
    assert_eq!(listed, vec![id("step")]);
}

#[rstest]
fn container_surfaces_once_children_are_cleared() {
    let mut document = Document::new();
    insert_root(&mut document, task("goal", "Goal"));
    insert_child(&mut document, "goal", task("step", "Step"));

    let done = toggle_done(&document, &id("step"), NOW).expect("complete step");
    let acknowledged = acknowledge_done_tasks(&done);

    let listed = listed_ids(&acknowledged);
    assert_eq!(listed, vec![id("goal")], "an emptied container is actionable");
}

#[rstest]
fn sequential_parent_exposes_only_the_first_pending_child() {
    let mut document = Document::new();
    let mut parent = task("s", "Sequence");
    parent.is_sequential = true;
    insert_root(&mut document, parent);
    insert_child(&mut document, "s", task("c1", "First"));
    insert_child(&mut document, "s", task("c2", "Second"));
    insert_child(&mut document, "s", task("c3", "Third"));

    assert_eq!(listed_ids(&document), vec![id("c1")]);

    // Completing and acknowledging the head unblocks the next sibling.
    let done = toggle_done(&document, &id("c1"), NOW).expect("complete c1");
    let acknowledged = acknowledge_done_tasks(&done);
    assert_eq!(listed_ids(&acknowledged), vec![id("c2")]);
}

#[rstest]
fn completed_head_remains_visible_until_acknowledged() {
    let mut document = Document::new();
    let mut parent = task("s", "Sequence");
    parent.is_sequential = true;
    insert_root(&mut document, parent);
    insert_child(&mut document, "s", task("c1", "First"));
    insert_child(&mut document, "s", task("c2", "Second"));

    let done = toggle_done(&document, &id("c1"), NOW).expect("complete c1");
    let listed = listed_ids(&done);

    assert!(listed.contains(&id("c1")));
    assert!(listed.contains(&id("c2")));
}

#[rstest]
fn zero_importance_falls_below_the_floor() {
    let document = two_goals(1.0, 0.0);
    assert_eq!(listed_ids(&document), vec![id("a")]);
}

#[rstest]
fn deleted_tasks_never_appear() {
    let mut document = two_goals(1.0, 0.5);
    document
        .tasks
        .get_mut(&id("b"))
        .expect("fixture task")
        .status = TaskStatus::Deleted;

    assert_eq!(listed_ids(&document), vec![id("a")]);

    let everything = prioritize(
        &document,
        NOW,
        &PriorityOptions {
            include_hidden: true,
            filter: PlaceFilter::All,
        },
    );
    assert!(
        everything.iter().all(|scored| scored.id != id("b")),
        "tombstones are dropped even when hidden tasks are included"
    );
}

#[rstest]
fn neglected_goal_outranks_overserved_goal() {
    let mut document = Document::new();
    let mut neglected = task("neglected", "Neglected");
    neglected.importance = 1.0;
    neglected.desired_credits = 10.0;
    neglected.credits = 5.0;
    neglected.credits_timestamp = NOW;
    let mut overserved = task("overserved", "Overserved");
    overserved.importance = 1.0;
    overserved.desired_credits = 10.0;
    overserved.credits = 10.0;
    overserved.credits_timestamp = NOW;
    insert_root(&mut document, neglected);
    insert_root(&mut document, overserved);

    let scored = prioritize(&document, NOW, &PriorityOptions::default());
    assert_eq!(scored[0].id, id("neglected"));
    assert!(scored[0].score > scored[1].score);
}

#[rstest]
fn effective_credits_aggregate_up_the_tree() {
    let mut document = Document::new();
    let mut parent = task("p", "Parent");
    parent.credits = 1.0;
    parent.credits_timestamp = NOW;
    insert_root(&mut document, parent);
    let mut child = task("c", "Child");
    child.credits = 2.0;
    child.credits_timestamp = NOW;
    insert_child(&mut document, "p", child);

    let everything = prioritize(
        &document,
        NOW,
        &PriorityOptions {
            include_hidden: true,
            filter: PlaceFilter::All,
        },
    );
    let parent = everything
        .iter()
        .find(|scored| scored.id == id("p"))
        .expect("parent present when hidden tasks are included");

    assert!((parent.effective_credits - 3.0).abs() < 0.001);
}

#[rstest]
fn place_filter_hides_tasks_bound_elsewhere() {
    let mut document = Document::new();
    insert_place(&mut document, place("office", "Office"));
    insert_place(&mut document, place("home", "Home"));
    let mut office_task = task("desk", "File the report");
    office_task.place_id = Some(PlaceId::from("office"));
    insert_root(&mut document, office_task);
    insert_root(&mut document, task("anywhere", "Think"));

    let at_home = prioritize(
        &document,
        NOW,
        &PriorityOptions {
            include_hidden: false,
            filter: PlaceFilter::At(PlaceId::from("home")),
        },
    );
    let ids: Vec<TaskId> = at_home.into_iter().map(|scored| scored.id).collect();

    assert!(!ids.contains(&id("desk")));
    assert!(ids.contains(&id("anywhere")), "anywhere tasks match every context");
}

#[rstest]
fn place_filter_follows_inclusions() {
    let mut document = Document::new();
    insert_place(&mut document, place("desk-a", "Desk A"));
    let mut building = place("building", "Building");
    building.included_places.push(PlaceId::from("desk-a"));
    insert_place(&mut document, building);

    let mut desk_task = task("t", "Water desk plant");
    desk_task.place_id = Some(PlaceId::from("desk-a"));
    insert_root(&mut document, desk_task);

    let in_building = prioritize(
        &document,
        NOW,
        &PriorityOptions {
            include_hidden: false,
            filter: PlaceFilter::At(PlaceId::from("building")),
        },
    );
    assert_eq!(in_building.len(), 1);
}

#[rstest]
fn closed_place_suppresses_its_tasks() {
    let mut document = Document::new();
    let mut shop = place("shop", "Shop");
    shop.hours.mode = OpenHoursMode::AlwaysClosed;
    insert_place(&mut document, shop);
    let mut errand = task("errand", "Buy milk");
    errand.place_id = Some(PlaceId::from("shop"));
    insert_root(&mut document, errand);

    assert!(listed_ids(&document).is_empty());
}

#[rstest]
fn far_future_due_date_keeps_a_task_out_of_the_list() {
    let mut document = Document::new();
    let mut later = task("later", "File taxes");
    later.schedule.due_date = Some(NOW + 30 * DAY);
    later.schedule.lead_time = DAY;
    insert_root(&mut document, later);

    assert!(listed_ids(&document).is_empty(), "outside 2x lead time");
}

#[rstest]
fn children_inherit_the_parent_due_date() {
    let mut document = Document::new();
    let mut goal = task("goal", "Ship release");
    goal.schedule.due_date = Some(NOW + HOUR);
    goal.schedule.lead_time = 2 * HOUR;
    insert_root(&mut document, goal);
    insert_child(&mut document, "goal", task("step", "Write changelog"));

    let scored = prioritize(&document, NOW, &PriorityOptions::default());
    let step = scored
        .iter()
        .find(|entry| entry.id == id("step"))
        .expect("step is listed");

    assert_eq!(step.effective_due_date, Some(NOW + HOUR));
    assert_eq!(step.schedule_source, Some(ScheduleSource::Ancestor));
}

#[rstest]
fn identical_inputs_produce_identical_output() {
    let mut document = two_goals(0.5, 0.5);
    insert_child(&mut document, "a", task("a1", "Tied step"));
    insert_child(&mut document, "a", task("a2", "Other tied step"));

    let first = prioritize(&document, NOW, &PriorityOptions::default());
    let second = prioritize(&document, NOW, &PriorityOptions::default());

    assert_eq!(first, second, "tie order included");
}

#[rstest]
fn exact_ties_fall_back_to_outline_order() {
    let mut document = Document::new();
    insert_root(&mut document, task("first", "First in outline"));
    insert_root(&mut document, task("second", "Second in outline"));

    assert_eq!(listed_ids(&document), vec![id("first"), id("second")]);
}

#[rstest]
#[case(2_000, 0.0)]
#[case(3_000, 0.0)]
#[case(3_500, 0.5)]
#[case(4_000, 1.0)]
#[case(4_500, 1.0)]
#[case(6_000, 1.0)]
fn lead_time_factor_ramps_toward_the_due_date(#[case] now: i64, #[case] expected: f64) {
    let factor = lead_time_factor(Some(5_000), 1_000, now);
    assert!((factor - expected).abs() < f64::EPSILON, "got {factor}");
}

#[rstest]
fn lead_time_factor_without_due_date_is_baseline_ready() {
    assert!((lead_time_factor(None, 1_000, 6_000) - 1.0).abs() < f64::EPSILON);
}

#[rstest]
fn urgency_past_due_is_overdue_after_the_day_ends() {
    assert_eq!(urgency(Some(NOW - HOUR), Some(HOUR), NOW), Urgency::Urgent);
    assert_eq!(urgency(Some(NOW - 2 * DAY), Some(HOUR), NOW), Urgency::Overdue);
}

#[rstest]
fn urgency_stages_track_the_lead_time_window() {
    let due = NOW + 3 * DAY;

    // Inside the final quarter of the window.
    assert_eq!(urgency(Some(due), Some(16 * DAY), due - 2 * DAY), Urgency::Urgent);
    // Inside the window.
    assert_eq!(urgency(Some(due), Some(4 * DAY), due - 3 * DAY), Urgency::Active);
    // Window opens within a quarter lead time.
    assert_eq!(urgency(Some(due), Some(2 * DAY), due - 59 * HOUR), Urgency::Upcoming);
    // Far out.
    assert_eq!(urgency(Some(due), Some(HOUR), due - 3 * DAY), Urgency::Distant);
    // No schedule at all.
    assert_eq!(urgency(None, None, NOW), Urgency::Distant);
}
