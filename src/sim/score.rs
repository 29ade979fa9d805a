//! Monotonic score counter

use serde::{Deserialize, Serialize};

use super::state::GameEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounter {
    value: u32,
}

impl ScoreCounter {
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Add one point and return the change notification
    pub fn increment(&mut self) -> GameEvent {
        self.value = self.value.saturating_add(1);
        GameEvent::ScoreChanged(self.value)
    }
}
