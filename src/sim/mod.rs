//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame updates driven by elapsed time only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod collision;
pub mod game;
pub mod obstacle;
pub mod scheduler;
pub mod score;
pub mod shape;
pub mod state;
pub mod tick;

pub use body::{Body, BodyId, BodyTag, Motion};
pub use collision::{Contact, ContactOutcome, classify, find_contacts};
pub use game::Game;
pub use obstacle::{ObstacleGenerator, ObstaclePair};
pub use scheduler::SpawnScheduler;
pub use score::ScoreCounter;
pub use shape::{Aabb, ConvexPolygon, PixelMask, Shape, shapes_overlap};
pub use state::{GameEvent, GameState, Logo, Shapes, World};
pub use tick::{handle_tap, tick};
