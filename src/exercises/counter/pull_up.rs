//! Pull-up counting.
//!
//! Same nose-to-wrist signal as push-ups, but the loaded phase is the top of
//! the pull (chin at the bar, gap closed) and a repetition completes on the
//! return to a hang.

use super::cycle::{CycleCounter, CycleMetric};
use super::push_up::nose_wrist_gap;
use crate::exercises::types::ExerciseType;
use crate::pose::types::Frame;

#[derive(Debug, Clone, Copy)]
pub struct ChinToBar;

impl CycleMetric for ChinToBar {
    const EXERCISE: ExerciseType = ExerciseType::PullUps;
    const REP_CONFIDENCE: f32 = 0.8;
    const TRACKING_CONFIDENCE: f32 = 0.3;

    fn measure(frame: &Frame, visibility: f32) -> Option<f32> {
        nose_wrist_gap(frame, visibility)
    }
}

pub type PullUpCounter = CycleCounter<ChinToBar>;
