//! Shot counting.
//!
//! Signal: velocity of the shooting-side wrist between consecutive frames. A
//! shot is a fast forward movement of that wrist while the counter is armed.
//! After a shot the counter stays disarmed until the wrist slows below the
//! re-arm speed, so one follow-through is never counted twice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::RepCounter;
use crate::exercises::types::{ExerciseType, RepEvent, RepKind};
use crate::pose::types::{Frame, Landmark};
use crate::storage::config::ShootingThresholds;

const TRACKING_CONFIDENCE: f32 = 0.4;

/// Which hand drives the shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShootingHand {
    #[default]
    Right,
    Left,
}

impl ShootingHand {
    fn landmarks(self) -> (Landmark, Landmark) {
        match self {
            ShootingHand::Right => (Landmark::RightElbow, Landmark::RightWrist),
            ShootingHand::Left => (Landmark::LeftElbow, Landmark::LeftWrist),
        }
    }
}

/// Stateful shot detector.
#[derive(Debug, Clone)]
pub struct ShootingCounter {
    thresholds: ShootingThresholds,
    visibility: f32,
    hand: ShootingHand,
    /// Sign of image-x that counts as "forward"
    forward: f32,
    previous_wrist: Option<Vec2>,
    armed: bool,
    last_confidence: f32,
}

impl ShootingCounter {
    pub fn new(thresholds: ShootingThresholds, visibility: f32) -> Self {
        Self {
            thresholds,
            visibility,
            hand: ShootingHand::Right,
            forward: 1.0,
            previous_wrist: None,
            armed: true,
            last_confidence: 0.0,
        }
    }

    /// Track the given hand instead of the right one.
    pub fn with_hand(mut self, hand: ShootingHand) -> Self {
        self.hand = hand;
        self
    }

    /// Treat decreasing image-x as forward (subject facing the other way).
    pub fn facing_left(mut self) -> Self {
        self.forward = -1.0;
        self
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn wrist(&self, frame: &Frame) -> Option<Vec2> {
        let (elbow, wrist) = self.hand.landmarks();
        frame.visible(elbow, self.visibility)?;
        frame.visible(wrist, self.visibility).map(|w| w.position())
    }
}

impl RepCounter for ShootingCounter {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Shooting
    }

    fn reset(&mut self) {
        self.previous_wrist = None;
        self.armed = true;
        self.last_confidence = 0.0;
    }

    fn on_frame(&mut self, frame: &Frame) -> Option<RepEvent> {
        let Some(wrist) = self.wrist(frame) else {
            self.previous_wrist = None;
            self.last_confidence = 0.0;
            return None;
        };

        let Some(previous) = self.previous_wrist.replace(wrist) else {
            self.last_confidence = TRACKING_CONFIDENCE;
            return None;
        };

        let velocity = wrist - previous;
        let speed = velocity.length();
        let moving_forward = velocity.x * self.forward > 0.0;

        if self.armed && moving_forward && speed > self.thresholds.release_speed {
            self.armed = false;
            let confidence =
                (speed / self.thresholds.confidence_scale).min(self.thresholds.max_confidence);
            self.last_confidence = confidence;
            tracing::debug!(speed, timestamp_ms = frame.timestamp_ms, "Shot released");
            return Some(RepEvent {
                exercise_type: ExerciseType::Shooting,
                timestamp_ms: frame.timestamp_ms,
                confidence,
                kind: RepKind::Shot,
            });
        }

        if speed < self.thresholds.rearm_speed {
            self.armed = true;
        }
        self.last_confidence = TRACKING_CONFIDENCE;
        None
    }

    fn last_confidence(&self) -> f32 {
        self.last_confidence
    }
}
