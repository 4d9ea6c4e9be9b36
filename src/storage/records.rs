//! Performance records handed to the performance-storage collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exercises::types::{ExerciseDefinition, ExerciseType};
use crate::session::aggregator::SessionResult;

/// Per-attempt metrics stored alongside the verification score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Form score (0 - 100)
    pub form_score: f32,
    pub total_reps: u32,
    pub completed_sets: u32,
    /// Consistency percentage across the attempt, when known
    pub consistency: Option<u32>,
}

/// One stored exercise attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: Uuid,
    pub exercise_id: String,
    pub title: String,
    pub exercise_type: ExerciseType,
    pub recorded_at: DateTime<Utc>,
    /// Attempt length, rounded to whole minutes
    pub duration_minutes: u32,
    /// Session average confidence (0.0 - 1.0)
    pub verification_score: f32,
    pub metrics: PerformanceMetrics,
}

impl PerformanceRecord {
    /// Build a record for a finished session, stamped now.
    pub fn from_session(definition: &ExerciseDefinition, result: &SessionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id: result.exercise_id.clone(),
            title: definition.title.clone(),
            exercise_type: definition.exercise_type,
            recorded_at: Utc::now(),
            duration_minutes: ((result.duration_ms as f64) / 60_000.0).round() as u32,
            verification_score: result.average_confidence,
            metrics: PerformanceMetrics {
                form_score: result.average_confidence * 100.0,
                total_reps: result.total_reps,
                completed_sets: result.completed_sets,
                consistency: None,
            },
        }
    }

    /// Replace the confidence-derived form score with a measured one.
    pub fn with_form_score(mut self, form_score: f32) -> Self {
        self.metrics.form_score = form_score.clamp(0.0, 100.0);
        self
    }

    pub fn with_consistency(mut self, consistency: u32) -> Self {
        self.metrics.consistency = Some(consistency.min(100));
        self
    }

    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = at;
        self
    }
}

/// Destination for finished attempts.
pub trait PerformanceSink {
    fn store(&mut self, record: PerformanceRecord);
}

impl PerformanceSink for Vec<PerformanceRecord> {
    fn store(&mut self, record: PerformanceRecord) {
        tracing::debug!(id = %record.id, exercise = %record.exercise_id, "Storing performance record");
        self.push(record);
    }
}
