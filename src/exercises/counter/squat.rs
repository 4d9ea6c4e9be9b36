//! Squat counting.
//!
//! Signal: interior hip-knee-ankle angle, taken from the side whose three
//! landmarks are tracked most confidently. Deep flexion is loaded, a standing
//! leg is released.

use super::cycle::{CycleCounter, CycleMetric};
use crate::exercises::types::ExerciseType;
use crate::pose::geometry;
use crate::pose::types::{Frame, Landmark};

const LEGS: [[Landmark; 3]; 2] = [
    [Landmark::LeftHip, Landmark::LeftKnee, Landmark::LeftAnkle],
    [Landmark::RightHip, Landmark::RightKnee, Landmark::RightAnkle],
];

/// Knee angle in degrees of the best-tracked leg. A leg whose joints
/// collapse onto one point is not measurable.
pub fn knee_angle(frame: &Frame, visibility: f32) -> Option<f32> {
    LEGS.iter()
        .filter_map(|[hip, knee, ankle]| {
            let hip = frame.visible(*hip, visibility)?;
            let knee = frame.visible(*knee, visibility)?;
            let ankle = frame.visible(*ankle, visibility)?;
            let weakest = hip.confidence.min(knee.confidence).min(ankle.confidence);
            Some((weakest, geometry::joint_angle(hip, knee, ankle)?))
        })
        .fold(None, |best: Option<(f32, f32)>, candidate| match best {
            Some(b) if b.0 >= candidate.0 => Some(b),
            _ => Some(candidate),
        })
        .map(|(_, angle)| angle)
}

#[derive(Debug, Clone, Copy)]
pub struct KneeAngle;

impl CycleMetric for KneeAngle {
    const EXERCISE: ExerciseType = ExerciseType::Squats;
    const REP_CONFIDENCE: f32 = 0.85;
    const TRACKING_CONFIDENCE: f32 = 0.4;

    fn measure(frame: &Frame, visibility: f32) -> Option<f32> {
        knee_angle(frame, visibility)
    }
}

pub type SquatCounter = CycleCounter<KneeAngle>;
