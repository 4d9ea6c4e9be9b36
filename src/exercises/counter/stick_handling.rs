//! Stick-handling counting.
//!
//! Signal: lateral offset of the hands (wrist midpoint) from the body
//! centerline (shoulder midpoint). Each frame where the offset exceeds the
//! lateral threshold is a side sample. A cycle completes when the side flips
//! between consecutive side samples while both wrists moved together.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::RepCounter;
use crate::exercises::types::{ExerciseType, RepEvent, RepKind};
use crate::pose::geometry;
use crate::pose::types::{Frame, Landmark};
use crate::storage::config::StickHandlingThresholds;

const REP_CONFIDENCE: f32 = 0.75;
const TRACKING_CONFIDENCE: f32 = 0.3;

/// Side of the body the hands are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct HandSample {
    left_wrist: Vec2,
    right_wrist: Vec2,
    offset: f32,
}

/// Stateful stick-handling cycle detector.
#[derive(Debug, Clone)]
pub struct StickHandlingCounter {
    thresholds: StickHandlingThresholds,
    visibility: f32,
    previous: Option<HandSample>,
    last_side: Option<Side>,
    last_confidence: f32,
}

impl StickHandlingCounter {
    pub fn new(thresholds: StickHandlingThresholds, visibility: f32) -> Self {
        Self {
            thresholds,
            visibility,
            previous: None,
            last_side: None,
            last_confidence: 0.0,
        }
    }

    /// Side of the last qualifying side sample.
    pub fn last_side(&self) -> Option<Side> {
        self.last_side
    }

    fn sample(&self, frame: &Frame) -> Option<HandSample> {
        let left_wrist = frame.visible(Landmark::LeftWrist, self.visibility)?;
        let right_wrist = frame.visible(Landmark::RightWrist, self.visibility)?;
        let left_shoulder = frame.visible(Landmark::LeftShoulder, self.visibility)?;
        let right_shoulder = frame.visible(Landmark::RightShoulder, self.visibility)?;

        let hands = geometry::midpoint(left_wrist, right_wrist);
        let body = geometry::midpoint(left_shoulder, right_shoulder);
        Some(HandSample {
            left_wrist: left_wrist.position(),
            right_wrist: right_wrist.position(),
            offset: hands.x - body.x,
        })
    }

    fn side(&self, offset: f32) -> Option<Side> {
        if offset > self.thresholds.lateral_offset {
            Some(Side::Right)
        } else if offset < -self.thresholds.lateral_offset {
            Some(Side::Left)
        } else {
            None
        }
    }
}

impl RepCounter for StickHandlingCounter {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::StickHandling
    }

    fn reset(&mut self) {
        self.previous = None;
        self.last_side = None;
        self.last_confidence = 0.0;
    }

    fn on_frame(&mut self, frame: &Frame) -> Option<RepEvent> {
        let Some(sample) = self.sample(frame) else {
            self.previous = None;
            self.last_side = None;
            self.last_confidence = 0.0;
            return None;
        };

        let coordinated = self.previous.is_some_and(|prev| {
            let min_move = self.thresholds.coordinated_movement;
            prev.left_wrist.distance(sample.left_wrist) > min_move
                && prev.right_wrist.distance(sample.right_wrist) > min_move
        });
        self.previous = Some(sample);
        self.last_confidence = TRACKING_CONFIDENCE;

        let side = self.side(sample.offset)?;
        let flipped = self.last_side.is_some_and(|last| last != side);
        self.last_side = Some(side);

        if !(flipped && coordinated) {
            return None;
        }

        self.last_confidence = REP_CONFIDENCE;
        tracing::debug!(?side, timestamp_ms = frame.timestamp_ms, "Stick-handling cycle");
        Some(RepEvent {
            exercise_type: ExerciseType::StickHandling,
            timestamp_ms: frame.timestamp_ms,
            confidence: REP_CONFIDENCE,
            kind: RepKind::StickhandlingCycle,
        })
    }

    fn last_confidence(&self) -> f32 {
        self.last_confidence
    }
}
