//! Repetition counting.
//!
//! Each exercise family has its own [`RepCounter`] strategy, selected by
//! [`counter_for`]. A counter owns the state of one exercise attempt: the
//! last usable sample and the phase of its movement cycle. A frame missing
//! the landmarks a counter needs returns it to idle, so a repetition is only
//! ever inferred from consecutive complete frames.

pub mod cycle;
pub mod pull_up;
pub mod push_up;
pub mod shooting;
pub mod squat;
pub mod stick_handling;

use serde::{Deserialize, Serialize};

use super::types::{ExerciseType, RepEvent};
use crate::pose::types::Frame;
use crate::storage::config::CounterThresholds;

pub use cycle::{CycleCounter, CycleMetric, HysteresisCycle, Phase};
pub use pull_up::PullUpCounter;
pub use push_up::PushUpCounter;
pub use shooting::{ShootingCounter, ShootingHand};
pub use squat::SquatCounter;
pub use stick_handling::StickHandlingCounter;

/// Confidence reported by counters for types without a rep rule.
pub const NO_RULE_CONFIDENCE: f32 = 0.5;

/// Stateful per-exercise repetition detector.
pub trait RepCounter: Send {
    /// Exercise type this counter was built for.
    fn exercise_type(&self) -> ExerciseType;

    /// Forget all state, as at the start of an attempt.
    fn reset(&mut self);

    /// Consume the next frame; returns an event when a cycle completes.
    fn on_frame(&mut self, frame: &Frame) -> Option<RepEvent>;

    /// Rule-specific certainty for the last frame; 0.0 if it was unusable.
    fn last_confidence(&self) -> f32;
}

/// Counter for exercise types that have no repetition rule.
#[derive(Debug, Clone, Copy)]
pub struct NoopCounter {
    exercise_type: ExerciseType,
}

impl NoopCounter {
    pub fn new(exercise_type: ExerciseType) -> Self {
        Self { exercise_type }
    }
}

impl RepCounter for NoopCounter {
    fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    fn reset(&mut self) {}

    fn on_frame(&mut self, _frame: &Frame) -> Option<RepEvent> {
        None
    }

    fn last_confidence(&self) -> f32 {
        NO_RULE_CONFIDENCE
    }
}

/// Build the counter strategy for an exercise type.
pub fn counter_for(
    exercise_type: ExerciseType,
    thresholds: &CounterThresholds,
) -> Box<dyn RepCounter> {
    let visibility = thresholds.visibility_threshold;
    match exercise_type {
        ExerciseType::PushUps => Box::new(PushUpCounter::new(thresholds.push_up, visibility)),
        ExerciseType::Squats => Box::new(SquatCounter::new(thresholds.squat, visibility)),
        ExerciseType::PullUps => Box::new(PullUpCounter::new(thresholds.pull_up, visibility)),
        ExerciseType::Shooting => Box::new(ShootingCounter::new(thresholds.shooting, visibility)),
        ExerciseType::StickHandling => Box::new(StickHandlingCounter::new(
            thresholds.stick_handling,
            visibility,
        )),
        ExerciseType::Generic | ExerciseType::GenericMobility => {
            Box::new(NoopCounter::new(exercise_type))
        }
    }
}

/// Outcome of evaluating one pair of frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountResult {
    pub count: u32,
    pub confidence: f32,
    pub rep_completed: bool,
}

/// Evaluate a frame pair with default thresholds.
pub fn count(
    current: &Frame,
    previous: &Frame,
    exercise_type: ExerciseType,
    prior_count: u32,
) -> CountResult {
    count_with(
        &CounterThresholds::default(),
        current,
        previous,
        exercise_type,
        prior_count,
    )
}

/// Evaluate a frame pair with a fresh counter.
///
/// Deterministic: the result depends only on the arguments.
pub fn count_with(
    thresholds: &CounterThresholds,
    current: &Frame,
    previous: &Frame,
    exercise_type: ExerciseType,
    prior_count: u32,
) -> CountResult {
    let mut counter = counter_for(exercise_type, thresholds);

    counter.on_frame(previous);
    if counter.last_confidence() == 0.0 {
        return CountResult {
            count: prior_count,
            confidence: 0.0,
            rep_completed: false,
        };
    }

    let event = counter.on_frame(current);
    CountResult {
        count: prior_count.saturating_add(u32::from(event.is_some())),
        confidence: counter.last_confidence(),
        rep_completed: event.is_some(),
    }
}
