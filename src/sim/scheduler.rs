//! Time-based obstacle spawn cadence
//!
//! Fires once on start, then once per interval of accumulated game time.
//! Large frame deltas fire every spawn they cover, so the count depends
//! only on elapsed time, never on frame rate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    interval: f32,
    /// Time until the next spawn
    until_next: f32,
    running: bool,
    fired: u64,
}

impl SpawnScheduler {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            until_next: 0.0,
            running: false,
            fired: 0,
        }
    }

    /// Start the cadence. Returns the number of spawns due now (the
    /// immediate one), or 0 if it was already running.
    pub fn start(&mut self) -> u32 {
        if self.running {
            return 0;
        }
        self.running = true;
        self.until_next = self.interval;
        self.fired += 1;
        1
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Total spawns fired since creation
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Advance by `dt` seconds; returns how many spawns are due
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running || dt <= 0.0 {
            return 0;
        }
        self.until_next -= dt;
        let mut due = 0;
        while self.until_next <= 0.0 {
            self.until_next += self.interval;
            due += 1;
        }
        self.fired += u64::from(due);
        due
    }
}
