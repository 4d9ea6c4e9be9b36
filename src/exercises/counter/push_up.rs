//! Push-up counting.
//!
//! Signal: vertical gap between the nose and the nearer visible wrist. The
//! gap closes at the bottom of the push-up (loaded) and opens again at the top
//! (released).

use super::cycle::{CycleCounter, CycleMetric};
use crate::exercises::types::ExerciseType;
use crate::pose::geometry;
use crate::pose::types::{Frame, Landmark};

/// Nose-to-wrist vertical gap, shared by push-ups and pull-ups.
pub(crate) fn nose_wrist_gap(frame: &Frame, visibility: f32) -> Option<f32> {
    let nose = frame.visible(Landmark::Nose, visibility)?;
    [Landmark::LeftWrist, Landmark::RightWrist]
        .into_iter()
        .filter_map(|w| frame.visible(w, visibility))
        .map(|wrist| geometry::vertical_gap(nose, wrist))
        .reduce(f32::min)
}

#[derive(Debug, Clone, Copy)]
pub struct NoseWristGap;

impl CycleMetric for NoseWristGap {
    const EXERCISE: ExerciseType = ExerciseType::PushUps;
    const REP_CONFIDENCE: f32 = 0.8;
    const TRACKING_CONFIDENCE: f32 = 0.3;

    fn measure(frame: &Frame, visibility: f32) -> Option<f32> {
        nose_wrist_gap(frame, visibility)
    }
}

pub type PushUpCounter = CycleCounter<NoseWristGap>;
