//! Procedural rock pairs
//!
//! Each spawn places a rock hanging from above and a rock standing below,
//! with a gap of `2 * rock_distance` between them at a random height, plus
//! an invisible full-height trigger just behind the gap. All three scroll
//! left together and are removed when the scroll finishes.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, BodyId, BodyTag, Motion};
use super::shape::Shape;
use crate::category;
use crate::tuning::Tuning;

/// One spawned gate: the bodies and where its gap is
#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePair {
    pub top: BodyId,
    pub bottom: BodyId,
    pub trigger: BodyId,
    /// The random offset the pair was placed at
    pub y_position: f32,
    pub gap_center_y: f32,
    pub gap_half_height: f32,
}

/// Builds rock pairs from a cached rock shape
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    rock: Shape,
    rock_flipped: Shape,
}

impl ObstacleGenerator {
    pub fn new(rock: Shape) -> Self {
        let rock_flipped = rock.flipped_vertically();
        Self { rock, rock_flipped }
    }

    /// Spawn a pair just off the right edge. `next_id` allocates body ids.
    pub fn spawn<R: Rng>(
        &self,
        screen: Vec2,
        tuning: &Tuning,
        rng: &mut R,
        mut next_id: impl FnMut() -> BodyId,
    ) -> (ObstaclePair, [Body; 3]) {
        let rock_size = self.rock.size();
        let x = screen.x + rock_size.x;

        let max_y = tuning.gap_max_y(screen.y).max(tuning.gap_min_y);
        let y_position = rng.random_range(tuning.gap_min_y..=max_y);

        let travel = screen.x + rock_size.x * 2.0;
        let motion = Motion::MoveBy {
            velocity: Vec2::new(-travel / tuning.obstacle_traverse_secs, 0.0),
            remaining: tuning.obstacle_traverse_secs,
        };

        let rock_masks = |body: Body| body.with_masks(category::OBSTACLE, category::NONE);

        let top = rock_masks(Body::new(
            next_id(),
            BodyTag::Obstacle,
            Vec2::new(x, y_position + rock_size.y + tuning.rock_distance),
            self.rock_flipped.clone(),
        ))
        .with_motion(motion);

        let bottom = rock_masks(Body::new(
            next_id(),
            BodyTag::Obstacle,
            Vec2::new(x, y_position - tuning.rock_distance),
            self.rock.clone(),
        ))
        .with_motion(motion);

        let trigger = Body::new(
            next_id(),
            BodyTag::ScoreTrigger,
            Vec2::new(x + tuning.trigger_width * 2.0, screen.y / 2.0),
            Shape::rect(tuning.trigger_width, screen.y),
        )
        .with_masks(category::TRIGGER, category::NONE)
        .with_motion(motion);

        let pair = ObstaclePair {
            top: top.id,
            bottom: bottom.id,
            trigger: trigger.id,
            y_position,
            gap_center_y: y_position + rock_size.y / 2.0,
            gap_half_height: tuning.rock_distance,
        };

        log::debug!(
            "Spawned rocks at y={:.1} (gap center {:.1})",
            y_position,
            pair.gap_center_y
        );

        (pair, [top, bottom, trigger])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SCREEN: Vec2 = Vec2::new(1024.0, 768.0);

    fn generator() -> ObstacleGenerator {
        ObstacleGenerator::new(Shape::rect(60.0, 440.0))
    }

    fn spawn_one(seed: u64) -> (ObstaclePair, [Body; 3]) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut id = 0;
        generator().spawn(SCREEN, &Tuning::default(), &mut rng, || {
            id += 1;
            BodyId(id)
        })
    }

    #[test]
    fn test_gap_is_twice_rock_distance() {
        let (pair, [top, bottom, _]) = spawn_one(1);
        let top_edge_of_bottom = bottom.position.y + 220.0;
        let bottom_edge_of_top = top.position.y - 220.0;
        assert!((bottom_edge_of_top - top_edge_of_bottom - 140.0).abs() < 1e-3);
        assert!((pair.gap_center_y - (top_edge_of_bottom + 70.0)).abs() < 1e-3);
        assert_eq!(pair.gap_half_height, 70.0);
    }

    #[test]
    fn test_layout_and_motion() {
        let (pair, [top, bottom, trigger]) = spawn_one(2);
        assert_eq!((pair.top, pair.bottom, pair.trigger), (BodyId(1), BodyId(2), BodyId(3)));
        assert_eq!(top.position.x, 1084.0);
        assert_eq!(bottom.position.x, 1084.0);
        assert_eq!(trigger.position, Vec2::new(1084.0 + 64.0, 384.0));
        assert_eq!(trigger.shape.size(), Vec2::new(32.0, 768.0));
        assert!(!top.dynamic && !bottom.dynamic && !trigger.dynamic);

        let expected_speed = (1024.0 + 120.0) / 6.2;
        for body in [&top, &bottom, &trigger] {
            match body.motion {
                Some(Motion::MoveBy {
                    velocity,
                    remaining,
                }) => {
                    assert!((velocity.x + expected_speed).abs() < 1e-3);
                    assert_eq!(velocity.y, 0.0);
                    assert_eq!(remaining, 6.2);
                }
                other => panic!("unexpected motion {other:?}"),
            }
        }
    }

    #[test]
    fn test_pair_removes_itself_after_traversal() {
        let (_, mut bodies) = spawn_one(3);
        let mut finished = [false; 3];
        for _ in 0..63 {
            for (body, done) in bodies.iter_mut().zip(finished.iter_mut()) {
                *done |= body.advance_motion(0.1);
            }
        }
        assert_eq!(finished, [true; 3]);
        // Travelled the full distance, fully past the left edge
        assert!((bodies[0].position.x - (1084.0 - 1144.0)).abs() < 0.05);
    }

    #[test]
    fn test_top_rock_is_flipped() {
        let spike = Shape::Polygon(
            crate::sim::shape::ConvexPolygon::new(vec![
                Vec2::new(-30.0, -220.0),
                Vec2::new(30.0, -220.0),
                Vec2::new(0.0, 220.0),
            ])
            .unwrap(),
        );
        let generator = ObstacleGenerator::new(spike.clone());
        let mut rng = Pcg32::seed_from_u64(4);
        let mut id = 0;
        let (_, [top, bottom, _]) = generator.spawn(SCREEN, &Tuning::default(), &mut rng, || {
            id += 1;
            BodyId(id)
        });
        assert_eq!(bottom.shape, spike);
        assert_eq!(top.shape, spike.flipped_vertically());
    }

    proptest! {
        #[test]
        fn prop_gap_offset_in_range(seed in any::<u64>()) {
            let (pair, _) = spawn_one(seed);
            prop_assert!(pair.y_position >= -50.0);
            prop_assert!(pair.y_position <= 768.0 / 3.0);
        }
    }
}
