//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-tuned from JSON
//! without touching the simulation. Missing fields fall back to `consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical gravity (m/s²)
    pub gravity: f32,
    pub points_per_meter: f32,
    /// Tap impulse (N·s)
    pub flap_impulse: f32,
    pub player_mass: f32,
    pub rotation_factor: f32,
    pub max_rotation: f32,
    pub rotation_ease_secs: f32,
    pub logo_fade_secs: f32,
    pub logo_wait_secs: f32,
    pub spawn_interval_secs: f32,
    pub obstacle_traverse_secs: f32,
    pub rock_distance: f32,
    pub gap_min_y: f32,
    pub gap_max_fraction: f32,
    pub trigger_width: f32,
    pub ground_scroll_secs: f32,
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            points_per_meter: POINTS_PER_METER,
            flap_impulse: FLAP_IMPULSE,
            player_mass: PLAYER_MASS,
            rotation_factor: ROTATION_FACTOR,
            max_rotation: MAX_ROTATION,
            rotation_ease_secs: ROTATION_EASE_SECS,
            logo_fade_secs: LOGO_FADE_SECS,
            logo_wait_secs: LOGO_WAIT_SECS,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            obstacle_traverse_secs: OBSTACLE_TRAVERSE_SECS,
            rock_distance: ROCK_DISTANCE,
            gap_min_y: GAP_MIN_Y,
            gap_max_fraction: GAP_MAX_FRACTION,
            trigger_width: TRIGGER_WIDTH,
            ground_scroll_secs: GROUND_SCROLL_SECS,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Gravity as an acceleration in points/s²
    pub fn gravity_vector(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity * self.points_per_meter)
    }

    /// The impulse applied on a tap (N·s, pointing up)
    pub fn flap_vector(&self) -> Vec2 {
        Vec2::new(0.0, self.flap_impulse)
    }

    /// Upper bound of the random gap offset for a given screen height
    pub fn gap_max_y(&self, screen_height: f32) -> f32 {
        screen_height * self.gap_max_fraction
    }

    /// Total logo transition time (fade + wait)
    pub fn logo_transition_secs(&self) -> f32 {
        self.logo_fade_secs + self.logo_wait_secs
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("rotation_factor", self.rotation_factor),
            ("rock_distance", self.rock_distance),
            ("gap_min_y", self.gap_min_y),
            ("gap_max_fraction", self.gap_max_fraction),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not finite")));
            }
        }

        let positive = [
            ("points_per_meter", self.points_per_meter),
            ("player_mass", self.player_mass),
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("obstacle_traverse_secs", self.obstacle_traverse_secs),
            ("trigger_width", self.trigger_width),
            ("ground_scroll_secs", self.ground_scroll_secs),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("{value} must be positive")));
            }
        }

        let non_negative = [
            ("max_rotation", self.max_rotation),
            ("rotation_ease_secs", self.rotation_ease_secs),
            ("logo_fade_secs", self.logo_fade_secs),
            ("logo_wait_secs", self.logo_wait_secs),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("{value} must not be negative")));
            }
        }

        if self.gap_max_fraction <= 0.0 {
            return Err(invalid(
                "gap_max_fraction",
                "gap range would be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
