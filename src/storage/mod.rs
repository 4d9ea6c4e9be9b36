//! Storage module for configuration and performance hand-off records.

pub mod config;
pub mod records;

pub use config::{
    load_config, load_config_from, save_config_to, ConfigError, CounterThresholds, CycleThresholds,
    DetectorSettings, EngineConfig, FrameSettings, VerificationSettings,
};
pub use records::{PerformanceMetrics, PerformanceRecord, PerformanceSink};
