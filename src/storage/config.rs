//! Engine configuration.
//!
//! Loaded from `config.toml` in the platform data directory. Every section has
//! defaults, so a missing file or a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Live verification settings
    pub verification: VerificationSettings,
    /// Repetition counter thresholds
    pub counter: CounterThresholds,
    /// Pose detector lifecycle settings
    pub detector: DetectorSettings,
    /// Frame coordinate handling
    pub frame: FrameSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            verification: VerificationSettings::default(),
            counter: CounterThresholds::default(),
            detector: DetectorSettings::default(),
            frame: FrameSettings::default(),
        }
    }
}

/// Live verification settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationSettings {
    /// Keypoint confidence a landmark must exceed to count as visible
    pub visibility_threshold: f32,
    /// Average confidence a session needs to be marked verified
    pub session_threshold: f32,
    /// Confidence reported while running without a pose model
    pub basic_mode_confidence: f32,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.5,
            session_threshold: 0.6,
            basic_mode_confidence: 0.8,
        }
    }
}

/// Per-family thresholds for the repetition counters.
///
/// Distances are in pixel-equivalent units of the frame reference resolution,
/// angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterThresholds {
    /// Keypoint confidence a landmark must exceed to be used by a counter
    pub visibility_threshold: f32,
    pub push_up: CycleThresholds,
    pub squat: CycleThresholds,
    pub pull_up: CycleThresholds,
    pub shooting: ShootingThresholds,
    pub stick_handling: StickHandlingThresholds,
}

impl Default for CounterThresholds {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.3,
            push_up: CycleThresholds::new(50.0, 100.0),
            squat: CycleThresholds::new(90.0, 150.0),
            pull_up: CycleThresholds::new(30.0, 100.0),
            shooting: ShootingThresholds::default(),
            stick_handling: StickHandlingThresholds::default(),
        }
    }
}

/// Two-threshold hysteresis band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleThresholds {
    /// Metric below this value is the loaded phase
    pub loaded_below: f32,
    /// Metric above this value is the released phase
    pub released_above: f32,
}

impl CycleThresholds {
    pub fn new(loaded_below: f32, released_above: f32) -> Self {
        Self {
            loaded_below,
            released_above,
        }
    }
}

/// Shot detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingThresholds {
    /// Wrist speed per frame that counts as a release
    pub release_speed: f32,
    /// Wrist speed per frame below which the counter re-arms
    pub rearm_speed: f32,
    /// Speed mapped to full confidence
    pub confidence_scale: f32,
    /// Upper bound on reported shot confidence
    pub max_confidence: f32,
}

impl Default for ShootingThresholds {
    fn default() -> Self {
        Self {
            release_speed: 20.0,
            rearm_speed: 15.0,
            confidence_scale: 30.0,
            max_confidence: 0.85,
        }
    }
}

/// Stick-handling cycle thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickHandlingThresholds {
    /// Lateral hand offset from the body centerline that marks a side
    pub lateral_offset: f32,
    /// Minimum per-frame movement of each wrist for a coordinated stroke
    pub coordinated_movement: f32,
}

impl Default for StickHandlingThresholds {
    fn default() -> Self {
        Self {
            lateral_offset: 15.0,
            coordinated_movement: 10.0,
        }
    }
}

/// Pose detector lifecycle settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    /// How long to wait for a frame before reporting a timeout
    pub fallback_window_ms: u64,
    /// How long model acquisition may take before failing
    pub acquire_timeout_ms: u64,
    /// Consecutive timeouts or inference failures before falling back to basic mode
    pub max_consecutive_failures: u32,
    /// Interval between live updates in basic mode
    pub basic_tick_ms: u64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            fallback_window_ms: 2000,
            acquire_timeout_ms: 10_000,
            max_consecutive_failures: 3,
            basic_tick_ms: 1000,
        }
    }
}

/// Coordinate space of incoming keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Coordinates are already in pixels
    #[default]
    Pixels,
    /// Coordinates are in 0.0 - 1.0 and get scaled to the reference size
    Normalized,
}

/// Frame coordinate handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    pub coordinate_space: CoordinateSpace,
    /// Reference width in pixels
    pub reference_width: u32,
    /// Reference height in pixels
    pub reference_height: u32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            coordinate_space: CoordinateSpace::Pixels,
            reference_width: 640,
            reference_height: 480,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "icepulse", "IcePulse")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load engine configuration from the default location.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load engine configuration from `path`, falling back to defaults if absent.
pub fn load_config_from(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(EngineConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: EngineConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    config.data_dir = get_data_dir();

    Ok(config)
}

/// Save engine configuration to `path`.
pub fn save_config_to(config: &EngineConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

impl EngineConfig {
    /// Reject threshold combinations that would break hysteresis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, band) in [
            ("push_up", self.counter.push_up),
            ("squat", self.counter.squat),
            ("pull_up", self.counter.pull_up),
        ] {
            if band.loaded_below >= band.released_above {
                return Err(ConfigError::InvalidValue(format!(
                    "counter.{name}: loaded_below must be less than released_above"
                )));
            }
        }
        if self.counter.shooting.rearm_speed > self.counter.shooting.release_speed {
            return Err(ConfigError::InvalidValue(
                "counter.shooting: rearm_speed must not exceed release_speed".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.verification.session_threshold) {
            return Err(ConfigError::InvalidValue(
                "verification.session_threshold must be within 0.0 - 1.0".into(),
            ));
        }
        if self.detector.basic_tick_ms == 0 || self.detector.fallback_window_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "detector intervals must be greater than zero".into(),
            ));
        }
        if self.detector.max_consecutive_failures == 0 {
            return Err(ConfigError::InvalidValue(
                "detector.max_consecutive_failures must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
