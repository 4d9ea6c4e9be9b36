//! Session aggregation.
//!
//! Accumulates repetition events and live verification confidences for one
//! exercise attempt. Averages are always recomputed from the full history.

use serde::{Deserialize, Serialize};

use crate::exercises::classifier::VerificationResult;
use crate::exercises::types::{ExerciseDefinition, RepEvent};

/// Final outcome of one exercise attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub exercise_id: String,
    pub total_reps: u32,
    pub target_reps: u32,
    pub total_sets: u32,
    pub completed_sets: u32,
    pub average_confidence: f32,
    pub verified: bool,
    /// Span between the first and last accepted frame
    #[serde(default)]
    pub duration_ms: u64,
}

impl SessionResult {
    /// Whether the celebratory-message collaborator should be notified.
    pub fn should_celebrate(&self) -> bool {
        self.verified && self.average_confidence > 0.6
    }

    /// Completed reps as a fraction of the per-set target.
    pub fn completion_ratio(&self) -> f32 {
        if self.target_reps == 0 {
            return if self.verified { 1.0 } else { 0.0 };
        }
        self.total_reps as f32 / self.target_reps as f32
    }
}

/// Accumulator for one exercise attempt.
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    definition: ExerciseDefinition,
    session_threshold: f32,
    total_reps: u32,
    rep_confidences: Vec<f32>,
    verification_confidences: Vec<f32>,
    verified_frames: u32,
}

impl SessionAggregator {
    pub fn new(definition: ExerciseDefinition, session_threshold: f32) -> Self {
        Self {
            definition,
            session_threshold,
            total_reps: 0,
            rep_confidences: Vec::new(),
            verification_confidences: Vec::new(),
            verified_frames: 0,
        }
    }

    pub fn definition(&self) -> &ExerciseDefinition {
        &self.definition
    }

    /// Accept one repetition. Returns the new total.
    pub fn record_rep(&mut self, event: &RepEvent) -> u32 {
        if event.exercise_type != self.definition.exercise_type {
            tracing::warn!(
                "Ignoring {} event in a {} session",
                event.exercise_type,
                self.definition.exercise_type
            );
            return self.total_reps;
        }
        self.total_reps = self.total_reps.saturating_add(1);
        self.rep_confidences.push(event.confidence.clamp(0.0, 1.0));
        self.total_reps
    }

    /// Record the live verification verdict for one frame.
    pub fn record_verification(&mut self, result: &VerificationResult) {
        self.verification_confidences
            .push(result.confidence.clamp(0.0, 1.0));
        if result.verified {
            self.verified_frames = self.verified_frames.saturating_add(1);
        }
    }

    pub fn total_reps(&self) -> u32 {
        self.total_reps
    }

    pub fn verified_frames(&self) -> u32 {
        self.verified_frames
    }

    /// Mean rep confidence; for attempts without reps, mean live confidence.
    pub fn average_confidence(&self) -> f32 {
        mean(&self.rep_confidences)
            .or_else(|| mean(&self.verification_confidences))
            .unwrap_or(0.0)
    }

    /// Snapshot the current result.
    pub fn result(&self) -> SessionResult {
        let average_confidence = self.average_confidence();
        let verified = average_confidence >= self.session_threshold;
        let total_sets = self.definition.target_sets;
        let target_reps = self.definition.target_reps;

        let completed_sets = if target_reps > 0 {
            (self.total_reps / target_reps).min(total_sets)
        } else {
            u32::from(verified).min(total_sets)
        };

        SessionResult {
            exercise_id: self.definition.id.clone(),
            total_reps: self.total_reps,
            target_reps,
            total_sets,
            completed_sets,
            average_confidence,
            verified,
            duration_ms: 0,
        }
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|v| *v as f64).sum();
    Some((sum / values.len() as f64) as f32)
}
