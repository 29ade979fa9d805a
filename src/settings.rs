//! Host settings for the native runner
//!
//! Read from an optional JSON file; command-line flags override single
//! fields afterwards.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play area size in points
    pub screen_width: f32,
    pub screen_height: f32,
    /// Seed for the first game; later games draw theirs from it
    pub seed: u64,

    // === Frame loop ===
    /// Nominal frames per second
    pub frame_rate: f32,
    /// Random frame time variation (fraction of the nominal frame time)
    pub frame_jitter: f32,
    /// Total simulated seconds to run
    pub run_secs: f32,
    /// How many times to start a new game after dying
    pub restarts: u32,
    /// Let the autopilot tap instead of idling
    pub autopilot: bool,

    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            seed: 36,
            frame_rate: 60.0,
            frame_jitter: 0.25,
            run_secs: 60.0,
            restarts: 2,
            autopilot: true,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("frame_rate", self.frame_rate),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must be positive"),
                });
            }
        }
        if !(0.0..1.0).contains(&self.frame_jitter) {
            return Err(ConfigError::Invalid {
                field: "frame_jitter",
                reason: format!("{} must be in [0, 1)", self.frame_jitter),
            });
        }
        if !(self.run_secs.is_finite() && self.run_secs >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "run_secs",
                reason: format!("{} must not be negative", self.run_secs),
            });
        }
        self.tuning.validate()
    }

    /// Nominal frame time in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate
    }
}
