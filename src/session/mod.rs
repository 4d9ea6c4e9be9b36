//! Exercise sessions.
//!
//! - `aggregator`: rep and confidence accumulation, final results
//! - `runner`: synchronous per-frame session
//! - `driver`: async loop wiring a pose detector into a session

pub mod aggregator;
pub mod driver;
pub mod runner;

pub use aggregator::{SessionAggregator, SessionResult};
pub use driver::{drive, run_exercise, DriveOutcome, LiveUpdate, SessionControl, SessionHandle};
pub use runner::{ExerciseSession, FrameReport, VerificationMode};
