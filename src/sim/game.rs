//! Game flow controller
//!
//! Owns the current `World` and routes input and frame updates to it.
//! Tapping after death throws the whole world away and builds a new one.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameEvent, GameState, Shapes, World};
use super::tick::{handle_tap, tick};
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct Game {
    world: World,
    tuning: Tuning,
    shapes: Shapes,
    screen: Vec2,
    /// Seeds for every run after the first
    seeds: Pcg32,
    runs: u32,
}

impl Game {
    pub fn new(seed: u64, screen: Vec2, shapes: Shapes, tuning: Tuning) -> Self {
        log::info!("New game with seed {seed}");
        let world = World::new(seed, screen, &shapes, &tuning);
        Self {
            world,
            tuning,
            shapes,
            screen,
            seeds: Pcg32::seed_from_u64(seed),
            runs: 1,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> GameState {
        self.world.state()
    }

    /// Number of runs started, including the current one
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// The single "primary action" input, handled immediately
    pub fn handle_input(&mut self) {
        if self.world.state() == GameState::Dead {
            self.restart();
        } else {
            handle_tap(&mut self.world, &self.tuning);
        }
    }

    /// Advance one frame of `dt` real seconds
    pub fn update(&mut self, dt: f32) {
        tick(&mut self.world, &self.tuning, dt);
    }

    /// Take notifications produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.drain_events()
    }

    fn restart(&mut self) {
        let seed = self.seeds.next_u64();
        let pending = self.world.drain_events();

        self.world = World::new(seed, self.screen, &self.shapes, &self.tuning);
        self.world.events = pending;
        self.world.events.push(GameEvent::NewGame { seed });
        self.runs += 1;
        log::info!("New game with seed {seed} (run {})", self.runs);
    }
}
