//! Two-threshold movement cycles.
//!
//! ```text
//! IDLE --metric < low--> LOADED --metric > high--> RELEASED (emit)
//!                          ^                          |
//!                          +-------metric < low-------+
//! ```
//!
//! Values between the thresholds keep the current phase, so a cycle can only
//! fire again after the loaded phase has been re-entered.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::RepCounter;
use crate::exercises::types::{ExerciseType, RepEvent};
use crate::pose::types::Frame;
use crate::storage::config::CycleThresholds;

/// Phase of a movement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No usable sample yet
    #[default]
    Idle,
    /// At the extreme of the movement (bottom of a push-up, top of a pull-up)
    Loaded,
    /// Back at the start position
    Released,
}

/// Hysteresis state over a scalar metric.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisCycle {
    band: CycleThresholds,
    phase: Phase,
}

impl HysteresisCycle {
    pub fn new(band: CycleThresholds) -> Self {
        Self {
            band,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feed one sample. Returns `true` on a loaded-to-released transition.
    pub fn advance(&mut self, metric: f32) -> bool {
        if metric < self.band.loaded_below {
            self.phase = Phase::Loaded;
            false
        } else if metric > self.band.released_above {
            let completed = self.phase == Phase::Loaded;
            self.phase = Phase::Released;
            completed
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }
}

/// Scalar signal measured from one frame.
pub trait CycleMetric: Send {
    const EXERCISE: ExerciseType;
    /// Confidence attached to a completed cycle
    const REP_CONFIDENCE: f32;
    /// Confidence while tracking without completing a cycle
    const TRACKING_CONFIDENCE: f32;

    /// Measure the frame, or `None` if required landmarks are not visible.
    fn measure(frame: &Frame, visibility: f32) -> Option<f32>;
}

/// Counter driven by a [`HysteresisCycle`] over a [`CycleMetric`].
#[derive(Debug)]
pub struct CycleCounter<M: CycleMetric> {
    cycle: HysteresisCycle,
    visibility: f32,
    last_confidence: f32,
    _metric: PhantomData<M>,
}

impl<M: CycleMetric> CycleCounter<M> {
    pub fn new(band: CycleThresholds, visibility: f32) -> Self {
        Self {
            cycle: HysteresisCycle::new(band),
            visibility,
            last_confidence: 0.0,
            _metric: PhantomData,
        }
    }

    pub fn phase(&self) -> Phase {
        self.cycle.phase()
    }
}

impl<M: CycleMetric> RepCounter for CycleCounter<M> {
    fn exercise_type(&self) -> ExerciseType {
        M::EXERCISE
    }

    fn reset(&mut self) {
        self.cycle.reset();
        self.last_confidence = 0.0;
    }

    fn on_frame(&mut self, frame: &Frame) -> Option<RepEvent> {
        let Some(metric) = M::measure(frame, self.visibility) else {
            self.cycle.reset();
            self.last_confidence = 0.0;
            return None;
        };

        if self.cycle.advance(metric) {
            self.last_confidence = M::REP_CONFIDENCE;
            tracing::debug!(
                exercise = %M::EXERCISE,
                metric,
                timestamp_ms = frame.timestamp_ms,
                "Repetition completed"
            );
            Some(RepEvent {
                exercise_type: M::EXERCISE,
                timestamp_ms: frame.timestamp_ms,
                confidence: M::REP_CONFIDENCE,
                kind: M::EXERCISE.rep_kind(),
            })
        } else {
            self.last_confidence = M::TRACKING_CONFIDENCE;
            None
        }
    }

    fn last_confidence(&self) -> f32 {
        self.last_confidence
    }
}
