//! Credit decay and the fairness feedback factor.
//!
//! Credits record how much completion credit a subtree has earned; desired
//! credits record how much it *should* earn. The feedback factor boosts
//! root goals that trail their target share and damps goals that run ahead,
//! so neglected areas climb the do-list even without date pressure.

use crate::plan::domain::Millis;
use crate::plan::domain::constants::{
    CREDITS_HALF_LIFE_MILLIS, FEEDBACK_DEVIATION_RATIO_CAP, FEEDBACK_EPSILON, FEEDBACK_SENSITIVITY,
};

/// Brings a stored credit balance forward to `now` by exponential decay
/// with a 7-day half-life.
#[must_use]
pub fn decay_credits(credits: f64, credits_timestamp: Millis, now: Millis) -> f64 {
    let elapsed = now.saturating_sub(credits_timestamp) as f64;
    credits * 0.5_f64.powf(elapsed / CREDITS_HALF_LIFE_MILLIS)
}

/// Aggregated credit totals across all root tasks.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackTotals {
    /// Sum of desired credits across roots.
    pub total_desired_credits: f64,
    /// Sum of decayed, subtree-aggregated credits across roots.
    pub total_effective_credits: f64,
}

/// Computes the feedback factor for one root goal.
///
/// `target = desired / Σdesired`, `actual = effective / max(Σeffective,
/// ε·Σdesired)`, and the factor is `min(target / max(actual, ε), cap)^k`.
/// When nothing is desired anywhere the factor is neutral.
#[must_use]
pub fn feedback_factor(desired: f64, effective: f64, totals: FeedbackTotals) -> f64 {
    if totals.total_desired_credits == 0.0 {
        return 1.0;
    }

    let target_percent = desired / totals.total_desired_credits;
    let effective_denominator = totals
        .total_effective_credits
        .max(FEEDBACK_EPSILON * totals.total_desired_credits);
    let actual_percent = effective / effective_denominator;

    let deviation_ratio = if target_percent == 0.0 {
        1.0
    } else {
        target_percent / actual_percent.max(FEEDBACK_EPSILON)
    };

    deviation_ratio
        .min(FEEDBACK_DEVIATION_RATIO_CAP)
        .powf(FEEDBACK_SENSITIVITY)
}
