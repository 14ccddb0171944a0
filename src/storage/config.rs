//! Analysis configuration.
//!
//! Tuning knobs for the compliance engine, loaded from `compliance.toml` in the
//! application data directory. Every field has a default, so a partial (or
//! missing) file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compliance::detection::DEFAULT_BOUNDARY_DOMINANCE;
use crate::compliance::matcher::{DEFAULT_MIN_SIMILARITY, DEFAULT_WINDOW_SIZE};
use crate::error::{ComplianceError, ComplianceResult};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Application version that wrote the file
    pub version: String,
    /// Segment matching settings
    pub matching: MatchingSettings,
    /// Effort block detection settings
    pub detection: DetectionSettings,
    /// Aggregate scoring settings
    pub scoring: ScoringSettings,
    /// Power data quality settings
    pub quality: QualitySettings,
    /// Workout flattening limits
    pub workouts: WorkoutSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            matching: MatchingSettings::default(),
            detection: DetectionSettings::default(),
            scoring: ScoringSettings::default(),
            quality: QualitySettings::default(),
            workouts: WorkoutSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> ComplianceResult<()> {
        let invalid = |msg: String| Err(ComplianceError::InvalidConfiguration(msg));

        if self.matching.window_size == 0 {
            return invalid("matching.window_size must be at least 1".to_string());
        }
        if !(0.0..=100.0).contains(&self.matching.min_similarity) {
            return invalid(format!(
                "matching.min_similarity must be within 0-100, got {}",
                self.matching.min_similarity
            ));
        }
        if !(self.detection.boundary_dominance > 0.0 && self.detection.boundary_dominance <= 1.0) {
            return invalid(format!(
                "detection.boundary_dominance must be within (0, 1], got {}",
                self.detection.boundary_dominance
            ));
        }
        if !(self.scoring.skip_penalty.is_finite() && self.scoring.skip_penalty >= 0.0) {
            return invalid(format!(
                "scoring.skip_penalty must be non-negative, got {}",
                self.scoring.skip_penalty
            ));
        }
        let ratio = self.quality.partial_dropout_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return invalid(format!(
                "quality.partial_dropout_ratio must be within (0, 1], got {}",
                self.quality.partial_dropout_ratio
            ));
        }
        if self.workouts.max_segments == 0 {
            return invalid("workouts.max_segments must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Segment matching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// How many unused detected blocks each planned segment may look at
    pub window_size: usize,
    /// Minimum similarity (0-100) for a match to count
    pub min_similarity: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

/// Effort block detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Share of the lookahead window the new zone must hold to open a block
    pub boundary_dominance: f64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            boundary_dominance: DEFAULT_BOUNDARY_DOMINANCE,
        }
    }
}

/// Aggregate scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Points deducted from the overall score per skipped segment
    pub skip_penalty: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self { skip_penalty: 5.0 }
    }
}

/// Power data quality settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    /// Dropout share at which a stream is rated "partial"
    pub partial_dropout_ratio: f64,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            partial_dropout_ratio: 0.20,
        }
    }
}

/// Limits applied while flattening planned workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutSettings {
    /// Upper bound on a single repetition count
    pub max_repetitions: u32,
    /// Upper bound on the number of flattened segments
    pub max_segments: usize,
}

impl Default for WorkoutSettings {
    fn default() -> Self {
        Self {
            max_repetitions: 100,
            max_segments: 2000,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rustride", "RustRide")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("compliance.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<AnalysisConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a file, falling back to defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AnalysisConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: AnalysisConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Save configuration to the default location.
pub fn save_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to a file.
pub fn save_config_to(config: &AnalysisConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
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
}
