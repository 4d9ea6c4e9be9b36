//! Exercise verification classifier.
//!
//! Decides, for a single frame, whether the prescribed movement appears to be
//! performed. Advisory only: repetition counting is independent and the two
//! are allowed to disagree.

use serde::{Deserialize, Serialize};

use super::types::{ExerciseType, RuleFamily};
use crate::pose::geometry;
use crate::pose::types::{Frame, Keypoint, Landmark};
use crate::storage::config::VerificationSettings;

/// Minimum model score for stance, limb and generic rules.
const BASE_SCORE_THRESHOLD: f32 = 0.5;
/// Minimum model score for the flexion rule.
const FLEXION_SCORE_THRESHOLD: f32 = 0.6;
/// Thigh inclination (1 - cos of angle from vertical) that counts as bent.
const KNEE_BEND_THRESHOLD: f32 = 0.3;

/// Coarse verification state behind the feedback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Required landmarks are not in frame
    NotVisible,
    /// Landmarks are visible but the movement is not detected
    NotPerforming,
    /// Movement detected
    Verified,
}

/// Per-frame verification verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub confidence: f32,
    pub feedback: String,
    pub status: VerificationStatus,
}

impl VerificationResult {
    fn not_visible(feedback: &str) -> Self {
        Self {
            verified: false,
            confidence: 0.0,
            feedback: feedback.to_string(),
            status: VerificationStatus::NotVisible,
        }
    }

    fn judged(performing: bool, confidence: f32, verified_text: &str, pending_text: &str) -> Self {
        Self {
            verified: performing,
            confidence,
            feedback: if performing { verified_text } else { pending_text }.to_string(),
            status: if performing {
                VerificationStatus::Verified
            } else {
                VerificationStatus::NotPerforming
            },
        }
    }

    /// Result used when no pose was detected for the current input.
    pub fn no_detection() -> Self {
        Self::not_visible("Please position yourself in frame")
    }

    /// Result for an input the pose model failed to process in time.
    pub fn tracking_interrupted() -> Self {
        Self::not_visible("Pose tracking interrupted - hold your position")
    }

    /// Result used while running without a pose model.
    pub fn basic_mode(confidence: f32) -> Self {
        Self {
            verified: true,
            confidence,
            feedback: "Recording in progress - complete the exercise".to_string(),
            status: VerificationStatus::Verified,
        }
    }
}

/// Frame classifier keyed by exercise type.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    visibility_threshold: f32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&VerificationSettings::default())
    }
}

impl Classifier {
    pub fn new(settings: &VerificationSettings) -> Self {
        Self {
            visibility_threshold: settings.visibility_threshold,
        }
    }

    /// Classify one frame for the given exercise type.
    pub fn classify(&self, frame: &Frame, exercise_type: ExerciseType) -> VerificationResult {
        if !frame.any_visible(self.visibility_threshold) {
            return VerificationResult::not_visible("Please position yourself in frame");
        }

        match exercise_type.rule_family() {
            RuleFamily::Stance => self.stance(frame),
            RuleFamily::Flexion => self.flexion(frame),
            RuleFamily::LimbVisibility => self.limb_visibility(frame),
            RuleFamily::Generic => self.generic(frame),
        }
    }

    fn visible_either(&self, frame: &Frame, left: Landmark, right: Landmark) -> bool {
        frame.visible(left, self.visibility_threshold).is_some()
            || frame.visible(right, self.visibility_threshold).is_some()
    }

    fn stance(&self, frame: &Frame) -> VerificationResult {
        let hip = self.visible_either(frame, Landmark::LeftHip, Landmark::RightHip);
        let knee = self.visible_either(frame, Landmark::LeftKnee, Landmark::RightKnee);
        if !(hip && knee) {
            return VerificationResult::not_visible("Please position yourself in frame");
        }

        VerificationResult::judged(
            frame.overall_score > BASE_SCORE_THRESHOLD,
            frame.overall_score,
            "Good form detected",
            "Hold your position in frame",
        )
    }

    fn flexion(&self, frame: &Frame) -> VerificationResult {
        let bend = [
            (Landmark::LeftHip, Landmark::LeftKnee),
            (Landmark::RightHip, Landmark::RightKnee),
        ]
        .into_iter()
        .filter_map(|(hip, knee)| {
            let hip = frame.visible(hip, self.visibility_threshold)?;
            let knee = frame.visible(knee, self.visibility_threshold)?;
            knee_bend(hip, knee)
        })
        .fold(None, |best: Option<f32>, b| Some(best.map_or(b, |x| x.max(b))));

        let Some(bend) = bend else {
            return VerificationResult::not_visible("Position yourself fully in frame");
        };

        VerificationResult::judged(
            bend > KNEE_BEND_THRESHOLD && frame.overall_score > FLEXION_SCORE_THRESHOLD,
            frame.overall_score,
            "Exercise detected",
            "Please perform the exercise",
        )
    }

    fn limb_visibility(&self, frame: &Frame) -> VerificationResult {
        if !self.visible_either(frame, Landmark::LeftWrist, Landmark::RightWrist) {
            return VerificationResult::not_visible("Please show your arms in frame");
        }

        VerificationResult::judged(
            frame.overall_score > BASE_SCORE_THRESHOLD,
            frame.overall_score,
            "Arms detected - keep going!",
            "Keep your whole body in frame",
        )
    }

    fn generic(&self, frame: &Frame) -> VerificationResult {
        VerificationResult::judged(
            frame.overall_score > BASE_SCORE_THRESHOLD,
            frame.overall_score,
            "Activity detected",
            "Please position yourself in frame",
        )
    }
}

/// How far the thigh leans away from vertical: 0 standing, 1 horizontal.
fn knee_bend(hip: &Keypoint, knee: &Keypoint) -> Option<f32> {
    let thigh = geometry::distance(hip, knee);
    if thigh <= f32::EPSILON {
        return None;
    }
    Some(1.0 - (geometry::vertical_gap(hip, knee) / thigh).min(1.0))
}

/// Classify with default settings.
pub fn classify(frame: &Frame, exercise_type: ExerciseType) -> VerificationResult {
    Classifier::default().classify(frame, exercise_type)
}
