use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::deviation::CRITICAL_DEVIATION;

/// Application-level constants
pub const APP_NAME: &str = "Labscope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labscope_lib=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config load failed ({0}): {1}")]
    Load(String, String),

    #[error("Config parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Score bands for risk and headline tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
    /// Highest abnormal count still rated Medium risk. Zero abnormal is Low,
    /// anything above this is High.
    pub medium_risk_max_abnormal: usize,
    pub excellent_min_score: u8,
    pub good_min_score: u8,
    pub needs_attention_min_score: u8,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            medium_risk_max_abnormal: 2,
            excellent_min_score: 80,
            good_min_score: 60,
            needs_attention_min_score: 40,
        }
    }
}

/// Engine configuration. Every field has a default so a partial JSON file
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: ScoringThresholds,
    /// Deviation (in half-ranges from the midpoint) above which an abnormal
    /// result counts as significantly out of range.
    pub critical_deviation: f64,
    /// Replace a supplied status that disagrees with the value/range instead
    /// of trusting it.
    pub recompute_status: bool,
    /// Upper bound on specialists the built-in recommender returns.
    pub max_specialists: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ScoringThresholds::default(),
            critical_deviation: CRITICAL_DEVIATION,
            recompute_status: false,
            max_specialists: 3,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(path.display().to_string(), e.to_string()))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Engine config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.critical_deviation.is_finite() || self.critical_deviation < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "critical_deviation must be a non-negative number, got {}",
                self.critical_deviation
            )));
        }
        let t = &self.thresholds;
        if !(t.excellent_min_score > t.good_min_score
            && t.good_min_score > t.needs_attention_min_score)
        {
            return Err(ConfigError::Invalid(
                "headline thresholds must be strictly descending".into(),
            ));
        }
        if t.excellent_min_score > 100 {
            return Err(ConfigError::Invalid(
                "excellent_min_score cannot exceed 100".into(),
            ));
        }
        Ok(())
    }
}
