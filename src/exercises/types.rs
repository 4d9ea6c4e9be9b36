//! Exercise types, definitions and repetition events.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of exercise types the engine has rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    PushUps,
    Squats,
    PullUps,
    Shooting,
    StickHandling,
    GenericMobility,
    Generic,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 7] = [
        ExerciseType::PushUps,
        ExerciseType::Squats,
        ExerciseType::PullUps,
        ExerciseType::Shooting,
        ExerciseType::StickHandling,
        ExerciseType::GenericMobility,
        ExerciseType::Generic,
    ];

    /// Serialized tag (`push_ups`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            ExerciseType::PushUps => "push_ups",
            ExerciseType::Squats => "squats",
            ExerciseType::PullUps => "pull_ups",
            ExerciseType::Shooting => "shooting",
            ExerciseType::StickHandling => "stick_handling",
            ExerciseType::GenericMobility => "generic_mobility",
            ExerciseType::Generic => "generic",
        }
    }

    /// Parse a tag, falling back to [`ExerciseType::Generic`] for unknown input.
    pub fn from_tag_or_generic(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown exercise type '{}', using generic rules", tag);
            ExerciseType::Generic
        })
    }

    /// Verification rule family used by the classifier.
    pub fn rule_family(&self) -> RuleFamily {
        match self {
            ExerciseType::GenericMobility => RuleFamily::Stance,
            ExerciseType::Squats | ExerciseType::PushUps => RuleFamily::Flexion,
            ExerciseType::PullUps | ExerciseType::Shooting | ExerciseType::StickHandling => {
                RuleFamily::LimbVisibility
            }
            ExerciseType::Generic => RuleFamily::Generic,
        }
    }

    /// Kind of event a completed cycle produces.
    pub fn rep_kind(&self) -> RepKind {
        match self {
            ExerciseType::Shooting => RepKind::Shot,
            ExerciseType::StickHandling => RepKind::StickhandlingCycle,
            _ => RepKind::Rep,
        }
    }
}

impl std::str::FromStr for ExerciseType {
    type Err = ExerciseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        ExerciseType::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == needle)
            .ok_or_else(|| ExerciseError::UnknownExerciseType(s.to_string()))
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseType::PushUps => write!(f, "Push-Ups"),
            ExerciseType::Squats => write!(f, "Squats"),
            ExerciseType::PullUps => write!(f, "Pull-Ups"),
            ExerciseType::Shooting => write!(f, "Shooting"),
            ExerciseType::StickHandling => write!(f, "Stick Handling"),
            ExerciseType::GenericMobility => write!(f, "Mobility"),
            ExerciseType::Generic => write!(f, "Generic"),
        }
    }
}

/// Classifier rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    /// Hips and knees in frame (skating, stretching, mobility)
    Stance,
    /// Knee bend (strength, squat-like)
    Flexion,
    /// Wrists in frame (shooting, stick handling)
    LimbVisibility,
    /// Subject in frame at all
    Generic,
}

/// Kind of completed movement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepKind {
    Rep,
    Shot,
    StickhandlingCycle,
}

/// One completed repetition, emitted by a counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepEvent {
    pub exercise_type: ExerciseType,
    pub timestamp_ms: u64,
    /// Rule-specific certainty (0.0 - 1.0)
    pub confidence: f32,
    pub kind: RepKind,
}

/// A drill as supplied by the drill-authoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub target_reps: u32,
    pub target_sets: u32,
    #[serde(default)]
    pub default_timer_seconds: Option<u32>,
}

impl ExerciseDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        exercise_type: ExerciseType,
        target_reps: u32,
        target_sets: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            exercise_type,
            target_reps,
            target_sets,
            default_timer_seconds: None,
        }
    }

    pub fn with_timer(mut self, seconds: u32) -> Self {
        self.default_timer_seconds = Some(seconds);
        self
    }

    pub fn validate(&self) -> Result<(), ExerciseError> {
        if self.id.trim().is_empty() {
            return Err(ExerciseError::InvalidDefinition("id is empty".into()));
        }
        if self.target_sets == 0 {
            return Err(ExerciseError::InvalidDefinition(
                "target_sets must be at least 1".into(),
            ));
        }
        if self.target_reps == 0 && self.default_timer_seconds.is_none() {
            return Err(ExerciseError::InvalidDefinition(
                "a drill needs target_reps or a timer".into(),
            ));
        }
        Ok(())
    }
}

/// Exercise-level errors.
#[derive(Debug, Error)]
pub enum ExerciseError {
    #[error("Unknown exercise type: {0}")]
    UnknownExerciseType(String),

    #[error("Invalid exercise definition: {0}")]
    InvalidDefinition(String),
}
