//! Adaptive targets.
//!
//! Pure functions over the completed/target ratio of one attempt and the rep
//! counts of recent attempts. History itself is owned by the caller.

use serde::{Deserialize, Serialize};

/// Ratio at or above which the target is considered met.
const PROGRESS_RATIO: f64 = 1.0;
const MAINTAIN_RATIO: f64 = 0.8;
const REDUCE_RATIO: f64 = 0.5;

/// Mean of recent attempts (as a fraction of target) that earns an increase.
const INCREASE_MEAN: f64 = 0.95;
/// Mean below which the target is lowered.
const DECREASE_MEAN: f64 = 0.7;
const INCREASE_MIN_ATTEMPTS: usize = 3;
const DECREASE_MIN_ATTEMPTS: usize = 2;
const MAX_STEP: u32 = 2;
const MIN_TARGET: u32 = 3;

/// Suggested change of difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveAction {
    Progress,
    Maintain,
    Reduce,
    Modify,
}

impl AdaptiveAction {
    pub fn label(&self) -> &'static str {
        match self {
            AdaptiveAction::Progress => "Progress",
            AdaptiveAction::Maintain => "Maintain",
            AdaptiveAction::Reduce => "Reduce",
            AdaptiveAction::Modify => "Modify",
        }
    }

    /// Action for a completed/target ratio.
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio >= PROGRESS_RATIO {
            AdaptiveAction::Progress
        } else if ratio >= MAINTAIN_RATIO {
            AdaptiveAction::Maintain
        } else if ratio >= REDUCE_RATIO {
            AdaptiveAction::Reduce
        } else {
            AdaptiveAction::Modify
        }
    }
}

impl std::fmt::Display for AdaptiveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Recommendation shown after an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: AdaptiveAction,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Recommend how to adjust difficulty after completing `completed_reps` of
/// `target_reps`. A zero target is treated as met.
pub fn recommend(completed_reps: u32, target_reps: u32) -> Recommendation {
    let ratio = if target_reps == 0 {
        PROGRESS_RATIO
    } else {
        f64::from(completed_reps) / f64::from(target_reps)
    };
    let action = AdaptiveAction::for_ratio(ratio);

    let (message, suggestions): (String, &[&str]) = match action {
        AdaptiveAction::Progress => (
            format!("Great work! You completed {completed_reps} reps. Ready to increase difficulty?"),
            &["Increase reps by 2-3", "Add weight/resistance", "Try advanced variation"],
        ),
        AdaptiveAction::Maintain => (
            format!(
                "Almost there! You completed {completed_reps}/{target_reps} reps. Keep working at this level."
            ),
            &[
                "Continue with current reps",
                "Focus on perfect form",
                "Rest properly between sets",
            ],
        ),
        AdaptiveAction::Reduce => (
            format!(
                "You completed {completed_reps}/{target_reps} reps. Let's adjust to build strength gradually."
            ),
            &[
                "Reduce reps to build up gradually",
                "Use assisted variation",
                "Focus on form over quantity",
            ],
        ),
        AdaptiveAction::Modify => (
            format!(
                "You completed {completed_reps}/{target_reps} reps. Let's try an easier variation first."
            ),
            &[
                "Try beginner variation",
                "Reduce reps significantly",
                "Use lighter/no weight",
                "Build foundational strength first",
            ],
        ),
    };

    Recommendation {
        action,
        message,
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

/// Next per-set target given the rep counts of recent attempts.
///
/// Raises the target by at most 20% (and at most two reps) when the recent
/// mean is at least 95% of it over three or more attempts. Lowers it to 80%,
/// never below three reps, when the mean is under 70% over two or more.
pub fn next_target(current_target: u32, recent_attempts: &[u32]) -> u32 {
    if recent_attempts.is_empty() {
        return current_target;
    }

    let mean = recent_attempts.iter().map(|&a| f64::from(a)).sum::<f64>()
        / recent_attempts.len() as f64;
    let target = f64::from(current_target);

    if recent_attempts.len() >= INCREASE_MIN_ATTEMPTS && mean >= target * INCREASE_MEAN {
        // ceil(1.2 * target) in integers
        let capped = (current_target * 6 + 4) / 5;
        let next = (current_target + MAX_STEP).min(capped);
        tracing::debug!(current_target, next, mean, "Raising target");
        next
    } else if recent_attempts.len() >= DECREASE_MIN_ATTEMPTS && mean < target * DECREASE_MEAN {
        let next = ((current_target * 4 + 4) / 5).max(MIN_TARGET);
        tracing::debug!(current_target, next, mean, "Lowering target");
        next
    } else {
        current_target
    }
}
