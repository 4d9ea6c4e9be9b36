//! Replay of recorded pose streams.
//!
//! A recording is a JSON-lines file: one [`RawPose`] object per line, or
//! `null` for an input where the model detected nobody. Blank lines are
//! skipped.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::source::PoseSource;
use super::types::{PoseError, RawPose};

/// A [`PoseSource`] that plays back recorded poses in order.
#[derive(Debug, Default)]
pub struct ReplaySource {
    poses: VecDeque<Option<RawPose>>,
    frame_interval: Option<Duration>,
}

impl ReplaySource {
    /// Play back an in-memory sequence.
    pub fn from_poses(poses: impl IntoIterator<Item = Option<RawPose>>) -> Self {
        Self {
            poses: poses.into_iter().collect(),
            frame_interval: None,
        }
    }

    /// Parse a JSON-lines recording.
    pub fn parse(content: &str) -> Result<Self, PoseError> {
        let mut poses = VecDeque::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let pose: Option<RawPose> =
                serde_json::from_str(line).map_err(|e| PoseError::Parse {
                    line: i + 1,
                    message: e.to_string(),
                })?;
            poses.push_back(pose);
        }
        Ok(Self {
            poses,
            frame_interval: None,
        })
    }

    /// Load a JSON-lines recording from disk.
    pub fn open(path: &Path) -> Result<Self, PoseError> {
        let content = std::fs::read_to_string(path)?;
        let source = Self::parse(&content)?;
        tracing::info!("Loaded {} recorded poses from {}", source.len(), path.display());
        Ok(source)
    }

    /// Pace playback at a fixed interval, as a live camera would.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    /// Remaining poses.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Remaining poses, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = Option<&RawPose>> + '_ {
        self.poses.iter().map(Option::as_ref)
    }
}

#[async_trait]
impl PoseSource for ReplaySource {
    async fn initialize(&mut self) -> Result<(), PoseError> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<RawPose>, PoseError> {
        if let Some(interval) = self.frame_interval {
            tokio::time::sleep(interval).await;
        }
        self.poses.pop_front().ok_or(PoseError::StreamEnded)
    }
}
