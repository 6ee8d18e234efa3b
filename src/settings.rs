//! Driver settings and game tuning
//!
//! Loaded from a JSON file by the headless runner; every field has a default,
//! so a partial file (or none at all) is fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{BreakoutConfig, PongConfig};

/// Anything wrong with a settings file or a tuning value
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("win score must be at least 1")]
    ZeroWinScore,
    #[error("brick grid must be between 1x1 and 16x16, got {rows}x{cols}")]
    BrickGrid { rows: u32, cols: u32 },
    #[error("max substeps must be at least 1")]
    ZeroSubsteps,
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fail unless `min <= value <= max` (NaN always fails)
pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub(crate) fn ensure_ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds per simulation tick
    pub tick_seconds: f32,
    /// Cap on ticks run for one frame
    pub max_substeps: u32,
    /// Fixed seed; a time-based one is used when absent
    pub seed: Option<u64>,
    pub pong: PongConfig,
    pub breakout: BreakoutConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_seconds: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            seed: None,
            pong: PongConfig::default(),
            breakout: BreakoutConfig::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_in_range("tick_seconds", self.tick_seconds, 0.001, 0.1)?;
        if self.max_substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        self.pong.validate()?;
        self.breakout.validate()?;
        Ok(())
    }
}
