//! Keypoint frame adapter.
//!
//! Normalizes raw pose-model output into [`Frame`]s. Pure: never fails, maps
//! anything it cannot use to a zero-confidence keypoint.

use super::types::{Frame, Keypoint, Landmark, RawKeypoint, RawPose, LANDMARK_COUNT};
use crate::storage::config::{CoordinateSpace, FrameSettings};

/// Converts raw model poses into engine frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameAdapter {
    settings: FrameSettings,
}

impl FrameAdapter {
    pub fn new(settings: FrameSettings) -> Self {
        Self { settings }
    }

    /// Adapt one model output. `None` means the model detected nobody.
    pub fn adapt(&self, raw: Option<&RawPose>) -> Option<Frame> {
        let raw = raw?;
        if raw.keypoints.is_empty() {
            return None;
        }

        let mut keypoints = Landmark::ALL.map(Keypoint::missing);
        for (index, raw_kp) in raw.keypoints.iter().enumerate() {
            let landmark = match &raw_kp.name {
                Some(name) => Landmark::from_name(name),
                None if index < LANDMARK_COUNT => Landmark::from_index(index),
                None => None,
            };
            if let Some(landmark) = landmark {
                keypoints[landmark.index()] = self.convert(landmark, raw_kp);
            }
        }

        let mut frame = Frame {
            timestamp_ms: raw.timestamp_ms,
            keypoints,
            overall_score: 0.0,
        };
        frame.overall_score = match raw.score {
            Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
            _ => frame.mean_confidence(),
        };
        Some(frame)
    }

    fn convert(&self, landmark: Landmark, raw: &RawKeypoint) -> Keypoint {
        let confidence = raw.score.unwrap_or(0.0);
        if !raw.x.is_finite() || !raw.y.is_finite() || !confidence.is_finite() {
            return Keypoint::missing(landmark);
        }

        let (x, y) = match self.settings.coordinate_space {
            CoordinateSpace::Pixels => (raw.x, raw.y),
            CoordinateSpace::Normalized => (
                raw.x * self.settings.reference_width as f32,
                raw.y * self.settings.reference_height as f32,
            ),
        };
        Keypoint::new(landmark, x, y, confidence.clamp(0.0, 1.0))
    }
}

/// Adapt with default settings (pixel coordinates).
pub fn adapt(raw: Option<&RawPose>) -> Option<Frame> {
    FrameAdapter::default().adapt(raw)
}
