//! Application services over the planning domain.
//!
//! Every service is a pure function of a snapshot (plus `now` where time
//! matters): the mutation layer in [`intents`], the recurrence sweep in
//! [`routines`], the scoring pipeline in [`priority`] with its supporting
//! stages ([`feedback`], [`readiness`], [`visibility`]), the read-only
//! views in [`projection`], and the store-facing composition in
//! [`dispatch`].

pub mod dispatch;
pub mod feedback;
pub mod intents;
pub mod priority;
pub mod projection;
pub mod readiness;
pub mod routines;
pub mod visibility;

pub use dispatch::{DispatchError, dispatch};
pub use intents::{CreateTask, Intent, TaskPatch};
pub use priority::{PriorityOptions, ScheduleSource, ScoredTask, prioritize};
pub use projection::{
    Breadcrumb, TreeNode, breadcrumbs_for, build_tree, select_priority_list,
    valid_move_targets_for,
};
pub use readiness::Urgency;
pub use routines::wake_up_routine_tasks;
pub use visibility::PlaceFilter;
