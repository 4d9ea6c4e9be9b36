//! Pose types: landmarks, keypoints and frames.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmark slots in a frame.
pub const LANDMARK_COUNT: usize = 17;

/// One of the 17 COCO-style anatomical landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum Landmark {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Landmark {
    /// All landmarks in slot order.
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Landmark::Nose,
        Landmark::LeftEye,
        Landmark::RightEye,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// Slot index of this landmark in a frame.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Model-facing name (`left_shoulder`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftEye => "left_eye",
            Landmark::RightEye => "right_eye",
            Landmark::LeftEar => "left_ear",
            Landmark::RightEar => "right_ear",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftElbow => "left_elbow",
            Landmark::RightElbow => "right_elbow",
            Landmark::LeftWrist => "left_wrist",
            Landmark::RightWrist => "right_wrist",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
            Landmark::LeftKnee => "left_knee",
            Landmark::RightKnee => "right_knee",
            Landmark::LeftAnkle => "left_ankle",
            Landmark::RightAnkle => "right_ankle",
        }
    }

    /// Parse a model-facing name. Accepts `left_shoulder` and `leftShoulder`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.name().replace('_', "") == normalized)
    }
}

impl std::fmt::Display for Landmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One tracked landmark estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub landmark: Landmark,
    pub x: f32,
    pub y: f32,
    /// Model confidence (0.0 - 1.0)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(landmark: Landmark, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            landmark,
            x,
            y,
            confidence,
        }
    }

    /// A placeholder for a landmark the model did not report.
    pub fn missing(landmark: Landmark) -> Self {
        Self::new(landmark, 0.0, 0.0, 0.0)
    }

    /// Whether the confidence strictly exceeds `threshold`.
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }

    pub fn position(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }
}

/// A single pose estimate at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Monotonic capture time in milliseconds
    pub timestamp_ms: u64,
    /// One keypoint per landmark, in slot order
    pub keypoints: [Keypoint; LANDMARK_COUNT],
    /// Whole-pose score reported by the model (0.0 - 1.0)
    pub overall_score: f32,
}

impl Frame {
    /// A frame where every landmark is missing.
    pub fn empty(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            keypoints: Landmark::ALL.map(Keypoint::missing),
            overall_score: 0.0,
        }
    }

    pub fn keypoint(&self, landmark: Landmark) -> &Keypoint {
        &self.keypoints[landmark.index()]
    }

    /// The keypoint if its confidence exceeds `threshold`.
    pub fn visible(&self, landmark: Landmark, threshold: f32) -> Option<&Keypoint> {
        let kp = self.keypoint(landmark);
        kp.is_visible(threshold).then_some(kp)
    }

    /// Whether any landmark exceeds `threshold`.
    pub fn any_visible(&self, threshold: f32) -> bool {
        self.keypoints.iter().any(|k| k.is_visible(threshold))
    }

    /// Mean confidence across all 17 slots.
    pub fn mean_confidence(&self) -> f32 {
        self.keypoints.iter().map(|k| k.confidence).sum::<f32>() / LANDMARK_COUNT as f32
    }

    /// Builder-style setter used by tests and replay tooling.
    pub fn with_keypoint(mut self, landmark: Landmark, x: f32, y: f32, confidence: f32) -> Self {
        self.keypoints[landmark.index()] = Keypoint::new(landmark, x, y, confidence);
        self
    }

    pub fn with_score(mut self, overall_score: f32) -> Self {
        self.overall_score = overall_score;
        self
    }
}

/// A keypoint as produced by the upstream pose model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKeypoint {
    #[serde(default)]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default, alias = "confidence")]
    pub score: Option<f32>,
}

/// Unnormalized pose model output for one input image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPose {
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(default)]
    pub keypoints: Vec<RawKeypoint>,
    #[serde(default)]
    pub score: Option<f32>,
}

/// Errors raised at the pose-source boundary.
#[derive(Debug, Error)]
pub enum PoseError {
    /// The pose model could not be brought up
    #[error("Pose model unavailable: {0}")]
    ModelUnavailable(String),

    /// Acquisition was cancelled before the model became ready
    #[error("Pose detector acquisition cancelled")]
    Cancelled,

    /// The detector is not in the Ready state
    #[error("Pose detector not ready (state: {0})")]
    NotReady(String),

    /// Inference failed for a single input
    #[error("Pose inference failed: {0}")]
    Inference(String),

    /// The source has no more frames
    #[error("Pose stream ended")]
    StreamEnded,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        PoseError::Io(err.to_string())
    }
}
