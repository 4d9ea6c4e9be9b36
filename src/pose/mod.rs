//! Pose input: keypoint frames and the pose-source boundary.

pub mod adapter;
pub mod geometry;
pub mod replay;
pub mod source;
pub mod types;

pub use adapter::{adapt, FrameAdapter};
pub use replay::ReplaySource;
pub use source::{DetectorState, FrameOutcome, PoseDetector, PoseSource};
pub use types::{Frame, Keypoint, Landmark, PoseError, RawKeypoint, RawPose, LANDMARK_COUNT};
