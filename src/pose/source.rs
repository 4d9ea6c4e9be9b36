//! Pose source boundary and detector lifecycle.
//!
//! The detector is an explicitly constructed, caller-owned object. Its
//! lifecycle is a small state machine:
//!
//! ```text
//! Uninitialized -> Acquiring -> Ready
//!                           \-> Failed
//! ```
//!
//! Acquisition may be cancelled. Once `Ready`, [`PoseDetector::next_frame`]
//! waits at most the fallback window for the next pose.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::adapter::FrameAdapter;
use super::types::{Frame, PoseError, RawPose};
use crate::storage::config::DetectorSettings;

/// External pose-estimation collaborator.
#[async_trait]
pub trait PoseSource: Send {
    /// Bring the underlying model up.
    async fn initialize(&mut self) -> Result<(), PoseError>;

    /// Estimate the next pose. `Ok(None)` means no subject was detected.
    async fn next_frame(&mut self) -> Result<Option<RawPose>, PoseError>;
}

/// Lifecycle state of a [`PoseDetector`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetectorState {
    #[default]
    Uninitialized,
    Acquiring,
    Ready,
    Failed(String),
}

impl std::fmt::Display for DetectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectorState::Uninitialized => write!(f, "Uninitialized"),
            DetectorState::Acquiring => write!(f, "Acquiring"),
            DetectorState::Ready => write!(f, "Ready"),
            DetectorState::Failed(reason) => write!(f, "Failed ({reason})"),
        }
    }
}

/// Result of waiting for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// A subject was detected
    Pose(Frame),
    /// The model ran but found nobody
    NoDetection,
    /// Nothing arrived within the fallback window
    TimedOut,
    /// Inference failed for this input; the stream continues
    Failed(String),
    /// The source is exhausted
    Ended,
}

/// Caller-owned pose detector wrapping a [`PoseSource`].
pub struct PoseDetector<S: PoseSource> {
    source: S,
    adapter: FrameAdapter,
    settings: DetectorSettings,
    state: DetectorState,
}

impl<S: PoseSource> PoseDetector<S> {
    pub fn new(source: S, adapter: FrameAdapter, settings: DetectorSettings) -> Self {
        Self {
            source,
            adapter,
            settings,
            state: DetectorState::Uninitialized,
        }
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == DetectorState::Ready
    }

    /// Acquire the pose model.
    ///
    /// Acquisition is abandoned as soon as `cancel` resolves; the detector
    /// then returns to `Uninitialized` and can be acquired again later.
    pub async fn acquire(&mut self, cancel: impl Future<Output = ()>) -> Result<(), PoseError> {
        match self.state {
            DetectorState::Ready => return Ok(()),
            DetectorState::Acquiring => {
                return Err(PoseError::NotReady(self.state.to_string()));
            }
            DetectorState::Uninitialized | DetectorState::Failed(_) => {}
        }

        tracing::info!("Acquiring pose detector");
        self.state = DetectorState::Acquiring;

        let timeout_ms = self.settings.acquire_timeout_ms;
        let timeout = Duration::from_millis(timeout_ms);
        let result = tokio::select! {
            result = tokio::time::timeout(timeout, self.source.initialize()) => match result {
                Ok(inner) => inner,
                Err(_) => Err(PoseError::ModelUnavailable(format!(
                    "initialization exceeded {timeout_ms} ms"
                ))),
            },
            _ = cancel => Err(PoseError::Cancelled),
        };

        match result {
            Ok(()) => {
                self.state = DetectorState::Ready;
                tracing::info!("Pose detector ready");
                Ok(())
            }
            Err(PoseError::Cancelled) => {
                self.state = DetectorState::Uninitialized;
                tracing::info!("Pose detector acquisition cancelled");
                Err(PoseError::Cancelled)
            }
            Err(e) => {
                let reason = e.to_string();
                self.state = DetectorState::Failed(reason.clone());
                tracing::warn!("Pose detector failed: {}", reason);
                Err(PoseError::ModelUnavailable(reason))
            }
        }
    }

    /// Wait for the next frame, bounded by the fallback window.
    pub async fn next_frame(&mut self) -> FrameOutcome {
        if !self.is_ready() {
            return FrameOutcome::Failed(format!("detector not ready ({})", self.state));
        }

        let window = Duration::from_millis(self.settings.fallback_window_ms);
        match tokio::time::timeout(window, self.source.next_frame()).await {
            Err(_) => FrameOutcome::TimedOut,
            Ok(Err(PoseError::StreamEnded)) => FrameOutcome::Ended,
            Ok(Err(e)) => {
                tracing::debug!("Pose inference error: {}", e);
                FrameOutcome::Failed(e.to_string())
            }
            Ok(Ok(raw)) => match self.adapter.adapt(raw.as_ref()) {
                Some(frame) => FrameOutcome::Pose(frame),
                None => FrameOutcome::NoDetection,
            },
        }
    }
}
