//! Per-frame exercise session.
//!
//! Owns the counter and aggregator state of one exercise attempt and runs
//! each frame to completion: classify, count, aggregate. Frames must arrive in
//! strictly increasing timestamp order; anything else is dropped here rather
//! than reordered.

use serde::{Deserialize, Serialize};

use super::aggregator::{SessionAggregator, SessionResult};
use crate::exercises::classifier::{Classifier, VerificationResult};
use crate::exercises::counter::{counter_for, RepCounter};
use crate::exercises::types::{ExerciseDefinition, ExerciseError, RepEvent};
use crate::pose::types::Frame;
use crate::storage::config::EngineConfig;

/// How live verification is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// Driven by pose frames
    #[default]
    Pose,
    /// No pose model: always verified while active, reps entered manually
    Basic,
}

/// What one processed frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub verification: VerificationResult,
    pub total_reps: u32,
    pub rep: Option<RepEvent>,
    /// Counter certainty for this frame
    pub counter_confidence: f32,
}

/// One exercise attempt.
pub struct ExerciseSession {
    classifier: Classifier,
    counter: Box<dyn RepCounter>,
    aggregator: SessionAggregator,
    mode: VerificationMode,
    basic_confidence: f32,
    first_timestamp: Option<u64>,
    last_timestamp: Option<u64>,
    latest: Option<VerificationResult>,
    no_detection_frames: u32,
    failed_inputs: u32,
    dropped_frames: u32,
}

impl ExerciseSession {
    /// Start an attempt at `definition`.
    pub fn new(definition: ExerciseDefinition, config: &EngineConfig) -> Result<Self, ExerciseError> {
        definition.validate()?;

        tracing::info!(
            exercise = %definition.exercise_type,
            id = %definition.id,
            target_reps = definition.target_reps,
            "Exercise session started"
        );

        Ok(Self {
            classifier: Classifier::new(&config.verification),
            counter: counter_for(definition.exercise_type, &config.counter),
            aggregator: SessionAggregator::new(definition, config.verification.session_threshold),
            mode: VerificationMode::Pose,
            basic_confidence: config.verification.basic_mode_confidence,
            first_timestamp: None,
            last_timestamp: None,
            latest: None,
            no_detection_frames: 0,
            failed_inputs: 0,
            dropped_frames: 0,
        })
    }

    pub fn definition(&self) -> &ExerciseDefinition {
        self.aggregator.definition()
    }

    pub fn mode(&self) -> VerificationMode {
        self.mode
    }

    /// Switch verification mode, e.g. after the pose model failed.
    pub fn set_mode(&mut self, mode: VerificationMode) {
        if self.mode != mode {
            tracing::warn!("Session verification mode: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.counter.reset();
        }
    }

    /// Latest live verdict, if any frame has been processed.
    pub fn latest_verification(&self) -> Option<&VerificationResult> {
        self.latest.as_ref()
    }

    pub fn total_reps(&self) -> u32 {
        self.aggregator.total_reps()
    }

    pub fn dropped_frames(&self) -> u32 {
        self.dropped_frames
    }

    pub fn no_detection_frames(&self) -> u32 {
        self.no_detection_frames
    }

    /// Inputs lost to inference failures or timeouts.
    pub fn failed_inputs(&self) -> u32 {
        self.failed_inputs
    }

    /// Span between the first and last accepted frame.
    pub fn duration_ms(&self) -> u64 {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        }
    }

    /// Process one detected frame. Returns `None` if the frame was dropped
    /// for arriving out of order or with a duplicate timestamp.
    pub fn process_frame(&mut self, frame: &Frame) -> Option<FrameReport> {
        if let Some(last) = self.last_timestamp {
            if frame.timestamp_ms <= last {
                self.dropped_frames = self.dropped_frames.saturating_add(1);
                tracing::debug!(
                    timestamp_ms = frame.timestamp_ms,
                    last_ms = last,
                    "Dropping out-of-order frame"
                );
                return None;
            }
        }
        self.first_timestamp.get_or_insert(frame.timestamp_ms);
        self.last_timestamp = Some(frame.timestamp_ms);

        if self.mode == VerificationMode::Basic {
            return Some(self.basic_tick());
        }

        let exercise_type = self.aggregator.definition().exercise_type;
        let verification = self.classifier.classify(frame, exercise_type);
        let rep = self.counter.on_frame(frame);
        let counter_confidence = self.counter.last_confidence();

        if let Some(event) = &rep {
            self.aggregator.record_rep(event);
        }
        Some(self.publish(verification, rep, counter_confidence))
    }

    /// Record an input where the model detected nobody.
    pub fn process_no_detection(&mut self) -> FrameReport {
        if self.mode == VerificationMode::Basic {
            return self.basic_tick();
        }
        self.no_detection_frames = self.no_detection_frames.saturating_add(1);
        self.counter.reset();
        self.publish(VerificationResult::no_detection(), None, 0.0)
    }

    /// Record an input the pose model failed on or timed out. Breaks the
    /// repetition cycle like a missing subject, but is tallied separately.
    pub fn process_input_failure(&mut self) -> FrameReport {
        if self.mode == VerificationMode::Basic {
            return self.basic_tick();
        }
        self.failed_inputs = self.failed_inputs.saturating_add(1);
        self.counter.reset();
        self.publish(VerificationResult::tracking_interrupted(), None, 0.0)
    }

    /// Produce a basic-mode verdict for the current instant.
    pub fn basic_tick(&mut self) -> FrameReport {
        self.publish(
            VerificationResult::basic_mode(self.basic_confidence),
            None,
            self.basic_confidence,
        )
    }

    /// Record a repetition entered by the user. Only valid in basic mode.
    pub fn record_manual_rep(&mut self, timestamp_ms: u64) -> Option<RepEvent> {
        if self.mode != VerificationMode::Basic {
            return None;
        }
        let exercise_type = self.aggregator.definition().exercise_type;
        let event = RepEvent {
            exercise_type,
            timestamp_ms,
            confidence: self.basic_confidence,
            kind: exercise_type.rep_kind(),
        };
        self.aggregator.record_rep(&event);
        Some(event)
    }

    fn publish(
        &mut self,
        verification: VerificationResult,
        rep: Option<RepEvent>,
        counter_confidence: f32,
    ) -> FrameReport {
        self.aggregator.record_verification(&verification);
        self.latest = Some(verification.clone());
        FrameReport {
            verification,
            total_reps: self.aggregator.total_reps(),
            rep,
            counter_confidence,
        }
    }

    /// Snapshot of the result so far.
    pub fn snapshot(&self) -> SessionResult {
        SessionResult {
            duration_ms: self.duration_ms(),
            ..self.aggregator.result()
        }
    }

    /// End the attempt and hand off its result.
    pub fn finish(self) -> SessionResult {
        let result = self.snapshot();
        tracing::info!(
            id = %result.exercise_id,
            total_reps = result.total_reps,
            average_confidence = result.average_confidence,
            verified = result.verified,
            "Exercise session finished"
        );
        result
    }

    /// Abandon the attempt. All state is discarded and nothing is emitted.
    pub fn cancel(self) {
        tracing::info!(
            id = %self.aggregator.definition().id,
            "Exercise session cancelled"
        );
    }
}

impl std::fmt::Debug for ExerciseSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseSession")
            .field("exercise", &self.aggregator.definition().exercise_type)
            .field("mode", &self.mode)
            .field("total_reps", &self.aggregator.total_reps())
            .field("last_timestamp", &self.last_timestamp)
            .finish()
    }
}
