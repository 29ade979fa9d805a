//! Game state and the simulation context
//!
//! A `World` is one complete run: bodies, obstacles, score, timers and RNG.
//! It is never reset in place; a new run builds a new `World`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyTag, Motion};
use super::obstacle::{ObstacleGenerator, ObstaclePair};
use super::scheduler::SpawnScheduler;
use super::score::ScoreCounter;
use super::shape::Shape;
use crate::category;
use crate::tuning::Tuning;

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Title logo shown, player frozen, waiting for the first tap
    ShowingLogo,
    Playing,
    /// Run over, everything frozen; the next tap starts a new run
    Dead,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LogoFadeStarted,
    PlayerActivated,
    ObstacleSpawned { y_position: f32 },
    ScoreChanged(u32),
    GameOver { position: Vec2, score: u32 },
    NewGame { seed: u64 },
}

/// Collision shapes loaded once at startup and reused by every run
#[derive(Debug, Clone)]
pub struct Shapes {
    pub player: Shape,
    pub rock: Shape,
    pub ground: Shape,
}

/// Title logo and its fade-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logo {
    pub visible: bool,
    pub alpha: f32,
    /// Seconds since the first tap, while the fade/wait is running
    pub transition: Option<f32>,
}

impl Default for Logo {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 1.0,
            transition: None,
        }
    }
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub screen: Vec2,
    pub(crate) state: GameState,
    pub logo: Logo,
    pub game_over_visible: bool,
    /// Time scale (1 = real time, 0 = frozen)
    pub speed: f32,
    /// Sorted by id
    pub(crate) bodies: Vec<Body>,
    pub(crate) player: BodyId,
    pub(crate) obstacles: Vec<ObstaclePair>,
    pub(crate) generator: ObstacleGenerator,
    pub(crate) scheduler: SpawnScheduler,
    pub(crate) score: ScoreCounter,
    /// Target tilt for the player sprite
    pub rotation_hint: f32,
    /// Eased tilt following `rotation_hint`
    pub player_angle: f32,
    /// Game time elapsed (scaled by `speed`)
    pub elapsed: f32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Build a fresh run: player, ground, logo. No obstacles yet.
    pub fn new(seed: u64, screen: Vec2, shapes: &Shapes, tuning: &Tuning) -> Self {
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen,
            state: GameState::ShowingLogo,
            logo: Logo::default(),
            game_over_visible: false,
            speed: 1.0,
            bodies: Vec::new(),
            player: BodyId(0),
            obstacles: Vec::new(),
            generator: ObstacleGenerator::new(shapes.rock.clone()),
            scheduler: SpawnScheduler::new(tuning.spawn_interval_secs),
            score: ScoreCounter::default(),
            rotation_hint: 0.0,
            player_angle: 0.0,
            elapsed: 0.0,
            events: Vec::new(),
            next_id: 1,
        };

        world.player = world.spawn_body(|id| {
            let mut player = Body::new(
                id,
                BodyTag::Player,
                Vec2::new(screen.x / 6.0, screen.y * 0.75),
                shapes.player.clone(),
            )
            // Reports contact with everything
            .with_masks(category::PLAYER, category::ALL);
            player.mass = tuning.player_mass;
            player
        });

        world.create_ground(&shapes.ground, tuning);
        world
    }

    /// Two ground tiles side by side, scrolling left forever
    fn create_ground(&mut self, ground: &Shape, tuning: &Tuning) {
        let size = ground.size();
        for i in 0..2 {
            let origin = Vec2::new(size.x / 2.0 + size.x * i as f32, size.y / 2.0);
            self.spawn_body(|id| {
                Body::new(id, BodyTag::Ground, origin, ground.clone())
                    .with_masks(category::GROUND, category::NONE)
                    .with_motion(Motion::ScrollLoop {
                        velocity: Vec2::new(-size.x / tuning.ground_scroll_secs, 0.0),
                        span: size.x,
                        travelled: 0.0,
                        origin,
                    })
            });
        }
    }

    /// Allocate an id and add the body built for it
    pub(crate) fn spawn_body(&mut self, build: impl FnOnce(BodyId) -> Body) -> BodyId {
        let id = self.alloc_id();
        let body = build(id);
        self.bodies.push(body);
        id
    }

    fn alloc_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn one rock pair off the right edge
    pub(crate) fn spawn_obstacle(&mut self, tuning: &Tuning) {
        let mut next_id = self.next_id;
        let (pair, bodies) = self.generator.spawn(self.screen, tuning, &mut self.rng, || {
            let id = BodyId(next_id);
            next_id += 1;
            id
        });
        self.next_id = next_id;
        self.bodies.extend(bodies);
        self.events.push(GameEvent::ObstacleSpawned {
            y_position: pair.y_position,
        });
        self.obstacles.push(pair);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score.value()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Live (not removed) body by id
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
            .filter(|b| !b.removed)
    }

    pub(crate) fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &mut self.bodies[i])
            .filter(|b| !b.removed)
    }

    /// The player body, even after it has been removed on death
    pub fn player(&self) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&self.player, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn player_id(&self) -> BodyId {
        self.player
    }

    pub fn obstacles(&self) -> &[ObstaclePair] {
        &self.obstacles
    }

    /// Total obstacle pairs spawned this run
    pub fn spawned_obstacles(&self) -> u64 {
        self.scheduler.fired()
    }

    /// Take the notifications produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop removed bodies (the player stays, deactivated) and obstacle
    /// pairs with nothing left on screen
    pub(crate) fn purge_removed(&mut self) {
        let player = self.player;
        self.bodies.retain(|b| !b.removed || b.id == player);

        let bodies = &self.bodies;
        let alive = |id: BodyId| {
            bodies
                .binary_search_by_key(&id, |b| b.id)
                .is_ok()
        };
        self.obstacles
            .retain(|pair| alive(pair.top) || alive(pair.bottom) || alive(pair.trigger));
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_new_world_layout() {
        let world = world(1);
        assert_eq!(world.state(), GameState::ShowingLogo);
        assert_eq!(world.score(), 0);
        assert!(world.obstacles().is_empty());
        assert_eq!(world.bodies().len(), 3);

        let player = world.player().unwrap();
        assert_eq!(player.tag, BodyTag::Player);
        assert!(!player.dynamic);
        assert_eq!(player.position, Vec2::new(1024.0 / 6.0, 576.0));
        assert_eq!(player.mass, Tuning::default().player_mass);

        let grounds: Vec<_> = world
            .bodies()
            .iter()
            .filter(|b| b.tag == BodyTag::Ground)
            .collect();
        assert_eq!(grounds.len(), 2);
        assert_eq!(grounds[0].position, Vec2::new(512.0, 30.0));
        assert_eq!(grounds[1].position, Vec2::new(1536.0, 30.0));
        assert!(world.logo.visible);
    }

    #[test]
    fn test_spawn_obstacle_keeps_ids_sorted() {
        let mut world = world(2);
        world.spawn_obstacle(&Tuning::default());
        world.spawn_obstacle(&Tuning::default());
        assert_eq!(world.obstacles().len(), 2);
        assert!(world.bodies().windows(2).all(|w| w[0].id < w[1].id));
        let pair = &world.obstacles()[1];
        assert!(world.body(pair.trigger).is_some());
        assert_eq!(world.drain_events().len(), 2);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_purge_keeps_player_and_partial_pairs() {
        let mut world = world(3);
        world.spawn_obstacle(&Tuning::default());
        let pair = world.obstacles()[0].clone();
        let player = world.player_id();

        world.body_mut(pair.trigger).unwrap().removed = true;
        world.body_mut(player).unwrap().removed = true;
        world.purge_removed();

        assert!(world.player().is_some());
        assert!(world.body(player).is_none());
        assert!(world.body(pair.trigger).is_none());
        assert_eq!(world.obstacles().len(), 1);

        world.body_mut(pair.top).unwrap().removed = true;
        world.body_mut(pair.bottom).unwrap().removed = true;
        world.purge_removed();
        assert!(world.obstacles().is_empty());
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let mut a = world(99);
        let mut b = world(99);
        for _ in 0..5 {
            a.spawn_obstacle(&Tuning::default());
            b.spawn_obstacle(&Tuning::default());
        }
        let gaps = |w: &World| w.obstacles().iter().map(|p| p.y_position).collect::<Vec<_>>();
        assert_eq!(gaps(&a), gaps(&b));
    }
}
