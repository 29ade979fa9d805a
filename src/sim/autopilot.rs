//! Demo autopilot
//!
//! Produces taps for the headless runner. Every flap gives the same arc
//! (velocity is reset on each tap), so the autopilot flaps from just under
//! the height that centers that arc on the next gap.

use super::state::{GameState, World};
use crate::tuning::Tuning;

/// Flap slightly early; a frame of falling lands lower than the threshold
const EARLY: f32 = 3.0;

/// Height gained by one flap from the moment of the tap to the apex
pub fn flap_rise(tuning: &Tuning) -> f32 {
    let v = tuning.flap_impulse / tuning.player_mass * tuning.points_per_meter;
    let g = (tuning.gravity * tuning.points_per_meter).abs();
    if g > 0.0 { v * v / (2.0 * g) } else { f32::INFINITY }
}

/// Height the autopilot is currently steering for
pub fn target_height(world: &World) -> f32 {
    let Some(player) = world.player() else {
        return world.screen.y / 2.0;
    };
    let player_left = player.position.x - player.shape.half_extents().x;

    // Nearest pair whose rocks are not yet behind the player
    world
        .obstacles()
        .iter()
        .filter_map(|pair| {
            let rock = world.body(pair.bottom).or_else(|| world.body(pair.top))?;
            let rock_right = rock.position.x + rock.shape.half_extents().x;
            (rock_right >= player_left).then_some((rock_right, pair.gap_center_y))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, gap)| gap)
        .unwrap_or(world.screen.y / 2.0)
}

/// Whether to tap this frame
pub fn wants_tap(world: &World, tuning: &Tuning) -> bool {
    match world.state() {
        GameState::ShowingLogo => world.logo.transition.is_none(),
        GameState::Playing => {
            let Some(player) = world.body(world.player_id()) else {
                return false;
            };
            let threshold = target_height(world) - flap_rise(tuning) / 2.0 + EARLY;
            player.velocity.y <= 0.0 && player.position.y < threshold
        }
        GameState::Dead => false,
    }
}
