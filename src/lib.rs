//! Crag Glider - an endless side-scrolling glider game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, obstacles, collisions, game flow)
//! - `present`: Interfaces to the rendering/audio/asset collaborators
//! - `tuning`: Data-driven game balance
//! - `settings`: Host configuration for the native runner

pub mod error;
pub mod present;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AssetError, ConfigError};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Default screen size in points
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;

    /// World gravity (m/s², y-up)
    pub const GRAVITY: f32 = -5.0;
    /// Conversion from physics meters to screen points
    pub const POINTS_PER_METER: f32 = 150.0;

    /// Upward impulse applied on every tap (N·s)
    pub const FLAP_IMPULSE: f32 = 20.0;
    /// Player mass (kg) - 20 N·s / 7.5 kg * 150 = 400 points/s per flap
    pub const PLAYER_MASS: f32 = 7.5;
    /// Mass of everything else (only matters for dynamic bodies)
    pub const DEFAULT_MASS: f32 = 1.0;

    /// Visual tilt per point/s of vertical speed
    pub const ROTATION_FACTOR: f32 = 0.001;
    /// Tilt clamp (radians)
    pub const MAX_ROTATION: f32 = 0.5;
    /// Time for the eased tilt to reach its target
    pub const ROTATION_EASE_SECS: f32 = 0.1;

    /// Logo fade-out, then the pause before the player goes live
    pub const LOGO_FADE_SECS: f32 = 0.5;
    pub const LOGO_WAIT_SECS: f32 = 0.5;

    /// Time between obstacle spawns
    pub const SPAWN_INTERVAL_SECS: f32 = 3.0;
    /// Time for an obstacle to cross the whole traversal distance
    pub const OBSTACLE_TRAVERSE_SECS: f32 = 6.2;
    /// Half of the vertical gap between the rocks
    pub const ROCK_DISTANCE: f32 = 70.0;
    /// Lowest random gap offset
    pub const GAP_MIN_Y: f32 = -50.0;
    /// Highest random gap offset as a fraction of screen height
    pub const GAP_MAX_FRACTION: f32 = 1.0 / 3.0;
    /// Width of the invisible scoring trigger
    pub const TRIGGER_WIDTH: f32 = 32.0;

    /// Time for a ground tile to scroll one tile width
    pub const GROUND_SCROLL_SECS: f32 = 5.0;

    /// Largest frame delta the simulation will accept in one update
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Asset names the core asks the presenter for
    pub const PLAYER_ASSET: &str = "player-1";
    pub const ROCK_ASSET: &str = "rock";
    pub const GROUND_ASSET: &str = "ground";
}

/// Collision categories (bit flags)
pub mod category {
    pub const NONE: u32 = 0;
    pub const ALL: u32 = u32::MAX;
    pub const PLAYER: u32 = 1 << 0;
    pub const GROUND: u32 = 1 << 1;
    pub const OBSTACLE: u32 = 1 << 2;
    pub const TRIGGER: u32 = 1 << 3;
}

/// Linear interpolation toward a target, clamped so it never overshoots
#[inline]
pub fn approach(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t.clamp(0.0, 1.0)
}

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}
