//! Post-session coaching.
//!
//! Consumers of a finished session: difficulty adaptation, technique
//! analysis of a representative frame and progress analytics over history.
//! None of these feed back into a live session.

pub mod adaptation;
pub mod progress;
pub mod technique;

pub use adaptation::{next_target, recommend, AdaptiveAction, Recommendation};
pub use progress::{
    analyze_improvement, consistency, improvement_summary, trend, ExerciseImprovement,
    ImprovementSummary, Trend,
};
pub use technique::{
    analyze, analyze_buffer, compare_form, form_score, AxisScore, FormComparison, TechniqueProfile,
    TechniqueReport,
};
