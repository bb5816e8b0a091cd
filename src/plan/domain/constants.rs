//! Scoring and default constants.
//!
//! These values are the calibration contract of the priority pipeline: the
//! stage ordering and monotonicity properties are fixed, and the constants
//! below tune the curves.

/// Half-life for credit decay (7 days in milliseconds).
pub const CREDITS_HALF_LIFE_MILLIS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Credit increment granted on completion when a task has no explicit value.
pub const DEFAULT_CREDIT_INCREMENT: f64 = 0.5;

/// Importance assigned to new tasks.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Desired credit accrual assigned to new tasks.
pub const DEFAULT_DESIRED_CREDITS: f64 = 1.0;

/// Sensitivity exponent for the fairness feedback factor.
pub const FEEDBACK_SENSITIVITY: f64 = 2.0;

/// Epsilon guarding the feedback division against zero denominators.
pub const FEEDBACK_EPSILON: f64 = 0.001;

/// Cap on the deviation ratio so starved goals cannot run away.
pub const FEEDBACK_DEVIATION_RATIO_CAP: f64 = 1000.0;

/// Scores at or below this floor are dropped from the do-list.
pub const MIN_PRIORITY: f64 = 0.001;

/// Two scores closer than this are treated as tied when sorting.
pub const PRIORITY_EPSILON: f64 = 0.000_001;

/// Lead time assigned to new tasks (8 hours in milliseconds).
pub const DEFAULT_LEAD_TIME_MILLIS: i64 = 8 * 60 * 60 * 1000;

/// Fraction of the lead-time window used for urgency stage boundaries.
pub const URGENCY_THRESHOLD_RATIO: f64 = 0.25;
