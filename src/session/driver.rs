//! Async session driver.
//!
//! Pulls frames from a [`PoseDetector`] into an [`ExerciseSession`] until the
//! caller finishes or cancels, publishing a [`LiveUpdate`] for every processed
//! input. When the detector cannot be acquired, or keeps timing out, the
//! session degrades to basic mode and ticks on a timer instead.

use std::time::Duration;

use crossbeam::channel::Sender;
use tokio::sync::watch;

use super::aggregator::SessionResult;
use super::runner::{ExerciseSession, FrameReport, VerificationMode};
use crate::exercises::classifier::VerificationResult;
use crate::exercises::types::{ExerciseDefinition, ExerciseError, RepEvent};
use crate::pose::adapter::FrameAdapter;
use crate::pose::source::{FrameOutcome, PoseDetector, PoseSource};
use crate::pose::types::PoseError;
use crate::storage::config::{DetectorSettings, EngineConfig};

/// Caller intent for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionControl {
    #[default]
    Running,
    /// Stop and emit the result
    Finish,
    /// Stop and discard everything
    Cancel,
}

/// Caller side of the control channel.
#[derive(Debug)]
pub struct SessionHandle {
    tx: watch::Sender<SessionControl>,
}

impl SessionHandle {
    /// Create a handle and the receiver the driver listens on.
    pub fn new() -> (Self, watch::Receiver<SessionControl>) {
        let (tx, rx) = watch::channel(SessionControl::Running);
        (Self { tx }, rx)
    }

    pub fn finish(&self) {
        let _ = self.tx.send(SessionControl::Finish);
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(SessionControl::Cancel);
    }
}

/// How a driven session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveOutcome {
    Completed(SessionResult),
    Cancelled,
}

/// Live state published after every processed input.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveUpdate {
    pub verification: VerificationResult,
    pub total_reps: u32,
    pub rep: Option<RepEvent>,
    pub mode: VerificationMode,
}

impl LiveUpdate {
    fn from_report(report: FrameReport, mode: VerificationMode) -> Self {
        Self {
            verification: report.verification,
            total_reps: report.total_reps,
            rep: report.rep,
            mode,
        }
    }
}

fn publish(live: Option<&Sender<LiveUpdate>>, report: FrameReport, mode: VerificationMode) {
    if let Some(tx) = live {
        let _ = tx.send(LiveUpdate::from_report(report, mode));
    }
}

fn conclude(session: ExerciseSession, control: SessionControl) -> DriveOutcome {
    match control {
        SessionControl::Cancel => {
            session.cancel();
            DriveOutcome::Cancelled
        }
        _ => DriveOutcome::Completed(session.finish()),
    }
}

/// Drive `session` until the caller decides or the source ends.
///
/// A dropped control handle counts as [`SessionControl::Finish`].
pub async fn drive<S: PoseSource>(
    detector: &mut PoseDetector<S>,
    mut session: ExerciseSession,
    settings: DetectorSettings,
    mut control: watch::Receiver<SessionControl>,
    live: Option<Sender<LiveUpdate>>,
) -> DriveOutcome {
    let tick = Duration::from_millis(settings.basic_tick_ms);
    let mut consecutive_failures = 0u32;

    loop {
        let decision = *control.borrow_and_update();
        if decision != SessionControl::Running {
            return conclude(session, decision);
        }

        match session.mode() {
            VerificationMode::Pose => {
                let outcome = tokio::select! {
                    changed = control.changed() => {
                        if changed.is_err() {
                            return conclude(session, SessionControl::Finish);
                        }
                        continue;
                    }
                    outcome = detector.next_frame() => outcome,
                };

                match outcome {
                    FrameOutcome::Pose(frame) => {
                        consecutive_failures = 0;
                        if let Some(report) = session.process_frame(&frame) {
                            publish(live.as_ref(), report, session.mode());
                        }
                    }
                    FrameOutcome::NoDetection => {
                        consecutive_failures = 0;
                        let report = session.process_no_detection();
                        publish(live.as_ref(), report, session.mode());
                    }
                    failure @ (FrameOutcome::TimedOut | FrameOutcome::Failed(_)) => {
                        consecutive_failures = consecutive_failures.saturating_add(1);
                        tracing::debug!(
                            "Pose input unavailable ({} in a row): {:?}",
                            consecutive_failures,
                            failure
                        );
                        if consecutive_failures >= settings.max_consecutive_failures {
                            tracing::warn!(
                                "Pose detector unresponsive, continuing in basic mode"
                            );
                            session.set_mode(VerificationMode::Basic);
                        } else {
                            let report = session.process_input_failure();
                            publish(live.as_ref(), report, session.mode());
                        }
                    }
                    FrameOutcome::Ended => {
                        tracing::info!("Pose source ended");
                        return conclude(session, SessionControl::Finish);
                    }
                }
            }
            VerificationMode::Basic => {
                tokio::select! {
                    changed = control.changed() => {
                        if changed.is_err() {
                            return conclude(session, SessionControl::Finish);
                        }
                    }
                    _ = tokio::time::sleep(tick) => {
                        let report = session.basic_tick();
                        publish(live.as_ref(), report, session.mode());
                    }
                }
            }
        }
    }
}

/// Acquire a detector over `source` and drive a new session for `definition`.
///
/// If the pose model cannot be acquired the session runs in basic mode.
/// Cancelling during acquisition discards the session.
pub async fn run_exercise<S: PoseSource>(
    source: S,
    definition: ExerciseDefinition,
    config: &EngineConfig,
    control: watch::Receiver<SessionControl>,
    live: Option<Sender<LiveUpdate>>,
) -> Result<DriveOutcome, ExerciseError> {
    let mut session = ExerciseSession::new(definition, config)?;
    let mut detector = PoseDetector::new(source, FrameAdapter::new(config.frame), config.detector);

    let mut cancel_rx = control.clone();
    let cancelled = async move {
        let requested = cancel_rx
            .wait_for(|c| *c == SessionControl::Cancel)
            .await
            .is_ok();
        if !requested {
            std::future::pending::<()>().await;
        }
    };

    match detector.acquire(cancelled).await {
        Ok(()) => {}
        Err(PoseError::Cancelled) => {
            session.cancel();
            return Ok(DriveOutcome::Cancelled);
        }
        Err(e) => {
            tracing::warn!("Pose model unavailable, using basic verification: {}", e);
            session.set_mode(VerificationMode::Basic);
        }
    }

    Ok(drive(&mut detector, session, config.detector, control, live).await)
}
