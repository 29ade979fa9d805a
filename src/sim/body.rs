//! Rigid bodies: gravity integration, impulses, scripted motion, overlap
//!
//! Dynamic bodies are moved by gravity. Non-dynamic bodies only move along
//! a scripted `Motion` (obstacles, ground tiles), which never sees gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Shape, shapes_overlap};
use crate::category;
use crate::consts::DEFAULT_MASS;

/// Stable body identifier (monotonic per world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// What a body is, for contact classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyTag {
    #[default]
    None,
    Player,
    Ground,
    ScoreTrigger,
    Obstacle,
}

/// Scripted kinematic motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Move at constant velocity for `remaining` seconds, then remove the body
    MoveBy { velocity: Vec2, remaining: f32 },
    /// Scroll by `span` at `velocity`, snap back, repeat forever
    ScrollLoop {
        velocity: Vec2,
        span: f32,
        travelled: f32,
        origin: Vec2,
    },
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub tag: BodyTag,
    pub position: Vec2,
    pub velocity: Vec2,
    pub shape: Shape,
    pub mass: f32,
    /// Only dynamic bodies are integrated under gravity
    pub dynamic: bool,
    /// Categories this body belongs to
    pub category_mask: u32,
    /// Categories this body reports contacts with
    pub contact_mask: u32,
    pub motion: Option<Motion>,
    /// Removed bodies are inert and purged at the end of the frame
    pub removed: bool,
}

impl Body {
    pub fn new(id: BodyId, tag: BodyTag, position: Vec2, shape: Shape) -> Self {
        Self {
            id,
            tag,
            position,
            velocity: Vec2::ZERO,
            shape,
            mass: DEFAULT_MASS,
            dynamic: false,
            category_mask: category::ALL,
            contact_mask: category::NONE,
            motion: None,
            removed: false,
        }
    }

    /// Builder-style category setup
    pub fn with_masks(mut self, category: u32, contact: u32) -> Self {
        self.category_mask = category;
        self.contact_mask = contact;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Semi-implicit Euler step under gravity (dynamic bodies only)
    pub fn integrate(&mut self, dt: f32, gravity: Vec2) {
        if self.removed || !self.dynamic {
            return;
        }
        self.velocity += gravity * dt;
        self.position += self.velocity * dt;
    }

    /// Zero the velocity, then add the impulse. Every flap gives the same rise.
    pub fn apply_impulse(&mut self, impulse: Vec2, points_per_meter: f32) {
        if self.removed {
            return;
        }
        self.velocity = Vec2::ZERO;
        self.velocity += impulse / self.mass * points_per_meter;
    }

    /// Advance scripted motion. Returns true when a `MoveBy` finished and
    /// the body should be removed.
    pub fn advance_motion(&mut self, dt: f32) -> bool {
        if self.removed {
            return false;
        }
        match &mut self.motion {
            None => false,
            Some(Motion::MoveBy {
                velocity,
                remaining,
            }) => {
                let step = dt.min(*remaining);
                self.position += *velocity * step;
                *remaining -= step;
                *remaining <= 0.0
            }
            Some(Motion::ScrollLoop {
                velocity,
                span,
                travelled,
                origin,
            }) => {
                let speed = velocity.length();
                if speed <= 0.0 || *span <= 0.0 {
                    return false;
                }
                *travelled = (*travelled + speed * dt) % *span;
                self.position = *origin + velocity.normalize() * *travelled;
                false
            }
        }
    }

    /// Shape overlap with another body (removed bodies never overlap)
    pub fn overlaps(&self, other: &Body) -> bool {
        if self.removed || other.removed {
            return false;
        }
        shapes_overlap(&self.shape, self.position, &other.shape, other.position)
    }

    /// Whether the pair should be tested for contact at all
    pub fn wants_contact_with(&self, other: &Body) -> bool {
        (self.dynamic || other.dynamic)
            && ((self.category_mask & other.contact_mask) != 0
                || (other.category_mask & self.contact_mask) != 0)
    }

    pub fn is_player(&self) -> bool {
        self.tag == BodyTag::Player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball(dynamic: bool) -> Body {
        let mut body = Body::new(
            BodyId(1),
            BodyTag::Player,
            Vec2::new(100.0, 500.0),
            Shape::rect(10.0, 10.0),
        );
        body.dynamic = dynamic;
        body
    }

    #[test]
    fn test_static_body_ignores_gravity() {
        let mut body = ball(false);
        body.velocity = Vec2::new(0.0, 3.0);
        body.integrate(0.5, Vec2::new(0.0, -750.0));
        assert_eq!(body.velocity, Vec2::new(0.0, 3.0));
        assert_eq!(body.position, Vec2::new(100.0, 500.0));
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut body = ball(true);
        body.integrate(0.1, Vec2::new(0.0, -750.0));
        assert!((body.velocity.y + 75.0).abs() < 1e-3);
        assert!(body.position.y < 500.0);
    }

    #[test]
    fn test_impulse_replaces_velocity() {
        let mut body = ball(true);
        body.velocity = Vec2::new(12.0, -900.0);
        body.apply_impulse(Vec2::new(0.0, 20.0), 1.0);
        assert_eq!(body.velocity, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_removed_body_is_inert() {
        let mut body = ball(true);
        body.removed = true;
        body.integrate(1.0, Vec2::new(0.0, -750.0));
        body.apply_impulse(Vec2::new(0.0, 20.0), 1.0);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.position, Vec2::new(100.0, 500.0));
        assert!(!body.overlaps(&ball(false)));
    }

    #[test]
    fn test_move_by_finishes_exactly() {
        let mut body = ball(false).with_motion(Motion::MoveBy {
            velocity: Vec2::new(-100.0, 0.0),
            remaining: 1.0,
        });
        assert!(!body.advance_motion(0.6));
        assert!(body.advance_motion(0.6));
        // Never overshoots the scripted distance
        assert!((body.position.x - 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_loop_wraps() {
        let origin = Vec2::new(50.0, 20.0);
        let mut body = ball(false).with_motion(Motion::ScrollLoop {
            velocity: Vec2::new(-10.0, 0.0),
            span: 100.0,
            travelled: 0.0,
            origin,
        });
        body.position = origin;
        for _ in 0..11 {
            assert!(!body.advance_motion(1.0));
        }
        // 110 points travelled, wrapped once
        assert!((body.position.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_contact_needs_a_dynamic_body() {
        let rock = Body::new(BodyId(2), BodyTag::Obstacle, Vec2::ZERO, Shape::rect(1.0, 1.0));
        let ground = Body::new(BodyId(3), BodyTag::Ground, Vec2::ZERO, Shape::rect(1.0, 1.0))
            .with_masks(category::GROUND, category::ALL);
        assert!(!rock.wants_contact_with(&ground));

        let player = ball(true).with_masks(category::PLAYER, category::ALL);
        assert!(player.wants_contact_with(&rock));
        assert!(rock.wants_contact_with(&player));
    }

    proptest! {
        #[test]
        fn prop_impulse_is_idempotent(vx in -1e4f32..1e4, vy in -1e4f32..1e4, j in 0.1f32..100.0) {
            let mut once = ball(true);
            once.velocity = Vec2::new(vx, vy);
            once.apply_impulse(Vec2::new(0.0, j), 150.0);

            let mut twice = ball(true);
            twice.velocity = Vec2::new(vx, vy);
            twice.apply_impulse(Vec2::new(0.0, j), 150.0);
            twice.apply_impulse(Vec2::new(0.0, j), 150.0);

            prop_assert_eq!(once.velocity, twice.velocity);
        }

        #[test]
        fn prop_gravity_strictly_lowers_vertical_speed(vy in -1e3f32..1e3, dt in 0.001f32..0.25) {
            let mut body = ball(true);
            body.velocity.y = vy;
            body.integrate(dt, Vec2::new(0.0, -750.0));
            prop_assert!(body.velocity.y < vy);
        }
    }
}
