//! Post-hoc technique analysis.
//!
//! Scores one representative frame on three axes (balance, technique, form),
//! each 0 - 100, using simple levelness and joint-angle heuristics chosen per
//! exercise profile. Landmarks that are not visible yield a neutral axis
//! score and a "could not assess" note instead of a guess.

use serde::{Deserialize, Serialize};

use crate::exercises::types::ExerciseType;
use crate::pose::geometry::{distance, joint_angle};
use crate::pose::types::{Frame, Keypoint, Landmark};

/// Keypoint confidence required for a landmark to be assessed.
const ANALYSIS_VISIBILITY: f32 = 0.3;
/// Keypoint confidence counted by [`form_score`].
const FORM_VISIBILITY: f32 = 0.5;
/// Axis score used when the landmarks for an axis are missing.
const NEUTRAL_SCORE: u32 = 70;
/// Axis or overall scores below this produce recommendations.
const RECOMMENDATION_BELOW: u32 = 75;

const LEVEL_HIPS: f32 = 10.0;
const SLIGHTLY_UNEVEN_HIPS: f32 = 20.0;
const LEVEL_SHOULDERS: f32 = 15.0;
const EXTENDED_ELBOW: (f32, f32) = (150.0, 180.0);
const WEIGHT_TRANSFER_DROP: f32 = 100.0;
const HAND_SPACING: (f32, f32) = (30.0, 60.0);
const KNEE_OVER_ANKLE: f32 = 20.0;

/// Heuristic set used for an exercise type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueProfile {
    Shooting,
    StickHandling,
    Strength,
    Generic,
}

impl From<ExerciseType> for TechniqueProfile {
    fn from(exercise_type: ExerciseType) -> Self {
        match exercise_type {
            ExerciseType::Shooting => TechniqueProfile::Shooting,
            ExerciseType::StickHandling => TechniqueProfile::StickHandling,
            ExerciseType::PushUps | ExerciseType::Squats | ExerciseType::PullUps => {
                TechniqueProfile::Strength
            }
            ExerciseType::GenericMobility | ExerciseType::Generic => TechniqueProfile::Generic,
        }
    }
}

/// Score and notes for one axis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisScore {
    pub score: u32,
    pub feedback: Vec<String>,
}

impl AxisScore {
    fn new(score: u32, feedback: &str) -> Self {
        Self {
            score: score.min(100),
            feedback: vec![feedback.to_string()],
        }
    }

    fn unassessed(what: &str) -> Self {
        Self::new(NEUTRAL_SCORE, &format!("Could not assess {what} - keep your full body in frame"))
    }

    fn add(&mut self, bonus: u32, feedback: &str) {
        self.score = (self.score + bonus).min(100);
        self.feedback.push(feedback.to_string());
    }
}

/// Structured form report for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueReport {
    pub exercise_type: ExerciseType,
    pub balance: AxisScore,
    pub technique: AxisScore,
    pub form: AxisScore,
    /// Rounded mean of the three axis scores
    pub overall_score: u32,
    pub recommendations: Vec<String>,
}

/// Analyze a representative frame for `exercise_type`.
pub fn analyze(exercise_type: ExerciseType, frame: &Frame) -> TechniqueReport {
    let profile = TechniqueProfile::from(exercise_type);
    let (balance, technique, form) = match profile {
        TechniqueProfile::Shooting => shooting(frame),
        TechniqueProfile::StickHandling => stick_handling(frame),
        TechniqueProfile::Strength => strength(frame),
        TechniqueProfile::Generic => generic(frame),
    };

    let overall_score = ((balance.score + technique.score + form.score) as f32 / 3.0).round() as u32;

    let mut report = TechniqueReport {
        exercise_type,
        balance,
        technique,
        form,
        overall_score,
        recommendations: Vec::new(),
    };
    report.recommendations = recommendations(profile, &report);
    report
}

/// Analyze the best-scoring frame of a short buffer.
pub fn analyze_buffer(exercise_type: ExerciseType, frames: &[Frame]) -> Option<TechniqueReport> {
    frames
        .iter()
        .map(|frame| analyze(exercise_type, frame))
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.overall_score.cmp(&b.overall_score).then(ib.cmp(ia)))
        .map(|(_, report)| report)
}

/// Mean confidence of clearly visible keypoints, scaled to 0 - 100.
pub fn form_score(frame: &Frame) -> f32 {
    let visible: Vec<f32> = frame
        .keypoints
        .iter()
        .filter(|kp| kp.is_visible(FORM_VISIBILITY))
        .map(|kp| kp.confidence)
        .collect();
    if visible.is_empty() {
        return 0.0;
    }
    visible.iter().sum::<f32>() / visible.len() as f32 * 100.0
}

/// Differences between two attempts at the same movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormComparison {
    pub improvements: Vec<String>,
    pub issues: Vec<String>,
    pub overall_form_score: f32,
}

/// Compare the current frame's form against a previous attempt.
pub fn compare_form(current: &Frame, previous: &Frame) -> FormComparison {
    let mut improvements = Vec::new();
    let mut issues = Vec::new();

    if let (Some(now), Some(before)) = (left_knee_angle(current), left_knee_angle(previous)) {
        if now < before {
            improvements.push("Deeper knee bend - better range of motion".to_string());
        }
    }

    if let (Some(now), Some(before)) = (shoulder_tilt(current), shoulder_tilt(previous)) {
        if now < before {
            improvements.push("Better shoulder alignment".to_string());
        } else if now > before + LEVEL_SHOULDERS {
            issues.push("Shoulders less level than last time".to_string());
        }
    }

    FormComparison {
        improvements,
        issues,
        overall_form_score: form_score(current),
    }
}

fn seen(frame: &Frame, landmark: Landmark) -> Option<&Keypoint> {
    frame.visible(landmark, ANALYSIS_VISIBILITY)
}

fn hip_tilt(frame: &Frame) -> Option<f32> {
    let left = seen(frame, Landmark::LeftHip)?;
    let right = seen(frame, Landmark::RightHip)?;
    Some((left.y - right.y).abs())
}

fn shoulder_tilt(frame: &Frame) -> Option<f32> {
    let left = seen(frame, Landmark::LeftShoulder)?;
    let right = seen(frame, Landmark::RightShoulder)?;
    Some((left.y - right.y).abs())
}

fn left_knee_angle(frame: &Frame) -> Option<f32> {
    joint_angle(
        seen(frame, Landmark::LeftHip)?,
        seen(frame, Landmark::LeftKnee)?,
        seen(frame, Landmark::LeftAnkle)?,
    )
}

fn shooting(frame: &Frame) -> (AxisScore, AxisScore, AxisScore) {
    let balance = match hip_tilt(frame) {
        Some(tilt) if tilt < LEVEL_HIPS => AxisScore::new(90, "Excellent balance - hips are level"),
        Some(tilt) if tilt < SLIGHTLY_UNEVEN_HIPS => {
            AxisScore::new(75, "Good balance - slight hip misalignment")
        }
        Some(_) => AxisScore::new(60, "Work on balance - hips are uneven"),
        None => AxisScore::unassessed("balance"),
    };

    let arm = (
        seen(frame, Landmark::RightShoulder),
        seen(frame, Landmark::RightElbow),
        seen(frame, Landmark::RightWrist),
    );
    let technique = match arm {
        (Some(shoulder), Some(elbow), Some(wrist)) => {
            let extended = joint_angle(shoulder, elbow, wrist)
                .is_some_and(|angle| angle > EXTENDED_ELBOW.0 && angle < EXTENDED_ELBOW.1);
            let mut axis = if extended {
                AxisScore::new(85, "Good arm extension on release")
            } else {
                AxisScore::new(70, "Work on full arm extension for more power")
            };
            if let Some(hip) = seen(frame, Landmark::RightHip) {
                if (shoulder.y - hip.y).abs() > WEIGHT_TRANSFER_DROP {
                    axis.add(10, "Good weight transfer - using lower body");
                } else {
                    axis.feedback
                        .push("Add more weight transfer from lower body".to_string());
                }
            }
            axis
        }
        _ => AxisScore::unassessed("arm extension"),
    };

    let form = match shoulder_tilt(frame) {
        Some(tilt) if tilt < LEVEL_SHOULDERS => AxisScore::new(80, "Good shoulder alignment"),
        Some(_) => AxisScore::new(65, "Keep shoulders level for better accuracy"),
        None => AxisScore::unassessed("shoulder alignment"),
    };

    (balance, technique, form)
}

fn stick_handling(frame: &Frame) -> (AxisScore, AxisScore, AxisScore) {
    let balance = match hip_tilt(frame) {
        Some(tilt) if tilt < LEVEL_HIPS => {
            AxisScore::new(85, "Good balance - maintain low center of gravity")
        }
        Some(_) => AxisScore::new(70, "Keep hips level for better puck control"),
        None => AxisScore::unassessed("balance"),
    };

    let technique = match (
        seen(frame, Landmark::LeftWrist),
        seen(frame, Landmark::RightWrist),
    ) {
        (Some(left), Some(right)) => {
            let spacing = distance(left, right);
            if spacing > HAND_SPACING.0 && spacing < HAND_SPACING.1 {
                AxisScore::new(80, "Good hand spacing on stick")
            } else {
                AxisScore::new(70, "Adjust hand spacing for better control")
            }
        }
        _ => AxisScore::unassessed("hand spacing"),
    };

    let form = match shoulder_tilt(frame) {
        Some(tilt) if tilt < LEVEL_SHOULDERS => AxisScore::new(75, "Good body position"),
        Some(_) => AxisScore::new(65, "Keep body square to maintain control"),
        None => AxisScore::unassessed("body position"),
    };

    (balance, technique, form)
}

fn strength(frame: &Frame) -> (AxisScore, AxisScore, AxisScore) {
    let balance = match hip_tilt(frame) {
        Some(tilt) if tilt < LEVEL_HIPS => AxisScore::new(85, "Excellent balance"),
        Some(_) => AxisScore::new(70, "Work on maintaining level hips"),
        None => AxisScore::unassessed("balance"),
    };

    let technique = AxisScore::new(75, "Maintain controlled movement throughout");

    let form = match (
        seen(frame, Landmark::LeftHip),
        seen(frame, Landmark::LeftKnee),
        seen(frame, Landmark::LeftAnkle),
    ) {
        (Some(_), Some(knee), Some(ankle)) => {
            if (knee.x - ankle.x).abs() < KNEE_OVER_ANKLE {
                AxisScore::new(80, "Good knee tracking - knees over toes")
            } else {
                AxisScore::new(65, "Keep knees aligned over toes to prevent injury")
            }
        }
        _ => AxisScore::unassessed("knee tracking"),
    };

    (balance, technique, form)
}

fn generic(frame: &Frame) -> (AxisScore, AxisScore, AxisScore) {
    let balance = match hip_tilt(frame) {
        Some(tilt) if tilt < LEVEL_HIPS => AxisScore::new(80, "Hips are level"),
        Some(_) => AxisScore::new(70, "Work on keeping hips level"),
        None => AxisScore::unassessed("balance"),
    };
    let technique = AxisScore::new(75, "Keep the movement smooth and controlled");
    let form = AxisScore::new(75, "Stay tall through the movement");
    (balance, technique, form)
}

fn recommendations(profile: TechniqueProfile, report: &TechniqueReport) -> Vec<String> {
    let mut out = Vec::new();
    let low = |axis: &AxisScore| axis.score < RECOMMENDATION_BELOW;

    match profile {
        TechniqueProfile::Shooting => {
            if report.overall_score < RECOMMENDATION_BELOW {
                out.push("Focus on balance drills to improve stability");
                out.push("Practice weight transfer from back leg to front");
            }
            if low(&report.technique) {
                out.push("Work on full arm extension for maximum shot power");
            }
        }
        TechniqueProfile::StickHandling => {
            if low(&report.balance) {
                out.push("Practice stick handling in a low, wide stance");
            }
            if low(&report.technique) {
                out.push("Set hands about a forearm apart on the stick");
            }
            if low(&report.form) {
                out.push("Keep shoulders square to the puck while moving it");
            }
        }
        TechniqueProfile::Strength => {
            if low(&report.balance) {
                out.push("Focus on balance drills to improve stability");
            }
            if low(&report.form) {
                out.push("Slow the movement down and keep knees tracking over toes");
            }
        }
        TechniqueProfile::Generic => {
            if report.overall_score < RECOMMENDATION_BELOW || low(&report.balance) {
                out.push("Focus on balance drills to improve stability");
            }
        }
    }

    out.into_iter().map(String::from).collect()
}
