//! Exercise verification and repetition counting.

pub mod classifier;
pub mod counter;
pub mod types;

pub use classifier::{classify, Classifier, VerificationResult, VerificationStatus};
pub use counter::{count, count_with, counter_for, CountResult, RepCounter};
pub use types::{ExerciseDefinition, ExerciseError, ExerciseType, RepEvent, RepKind, RuleFamily};
