//! IcePulse - pose-driven exercise verification and repetition counting
//!
//! Consumes a stream of estimated body keypoints and, per exercise type,
//! verifies that the prescribed movement is being performed, counts
//! repetitions, aggregates a session confidence and recommends the next
//! target. Pose estimation, capture, storage and UI are external
//! collaborators reached through narrow traits and plain data.

pub mod coaching;
pub mod exercises;
pub mod pose;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use coaching::{analyze, next_target, recommend, Recommendation, TechniqueReport};
pub use exercises::{classify, count, ExerciseDefinition, ExerciseType, RepEvent, VerificationResult};
pub use pose::{adapt, Frame, PoseDetector, PoseSource, RawPose};
pub use session::{run_exercise, ExerciseSession, SessionResult};
pub use storage::config::EngineConfig;
