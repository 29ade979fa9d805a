//! Per-frame simulation update and tap handling
//!
//! Everything is driven by the real elapsed time of the frame, so the
//! game plays the same at any frame rate.

use super::collision::{ContactOutcome, classify, find_contacts};
use super::state::{GameEvent, GameState, Logo, World};
use crate::approach;
use crate::tuning::Tuning;

/// React to a tap. `Dead` is handled by the owner of the world, which
/// replaces it with a new one.
pub fn handle_tap(world: &mut World, tuning: &Tuning) {
    match world.state {
        GameState::ShowingLogo => {
            if world.logo.transition.is_none() {
                log::info!("Tap received, fading out logo");
                world.logo.transition = Some(0.0);
                world.events.push(GameEvent::LogoFadeStarted);
            }
        }
        GameState::Playing => {
            let points_per_meter = tuning.points_per_meter;
            let player = world.player;
            if let Some(body) = world.body_mut(player) {
                body.apply_impulse(tuning.flap_vector(), points_per_meter);
                log::trace!("Flap, vy={:.1}", body.velocity.y);
            }
        }
        GameState::Dead => {}
    }
}

/// Advance the world by one frame of `dt` real seconds.
///
/// `dt` is capped at `max_frame_dt` before it is scaled by the world speed.
/// Time beyond the cap is dropped: after a hitch the game runs slow instead of
/// catching up, so spawn counts follow simulated time, not wall time.
pub fn tick(world: &mut World, tuning: &Tuning, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        log::warn!("Ignoring frame with dt={dt}");
        return;
    }

    let dt = dt.min(tuning.max_frame_dt) * world.speed;
    if dt <= 0.0 {
        return;
    }
    world.elapsed += dt;

    match world.state {
        GameState::ShowingLogo => {
            advance_motion(world, dt);
            advance_logo(world, tuning, dt);
        }
        GameState::Playing => {
            let due = world.scheduler.advance(dt);
            for _ in 0..due {
                world.spawn_obstacle(tuning);
            }

            let gravity = tuning.gravity_vector();
            for body in &mut world.bodies {
                body.integrate(dt, gravity);
            }
            advance_motion(world, dt);
            resolve_contacts(world);
            world.purge_removed();
            update_rotation(world, tuning, dt);
        }
        GameState::Dead => {}
    }
}

/// Scripted movement; finished obstacles are removed
fn advance_motion(world: &mut World, dt: f32) {
    for body in &mut world.bodies {
        if body.advance_motion(dt) {
            body.removed = true;
        }
    }
}

/// Fade, wait, then bring the player to life and start the rocks
fn advance_logo(world: &mut World, tuning: &Tuning, dt: f32) {
    let Some(elapsed) = world.logo.transition.as_mut() else {
        return;
    };
    *elapsed += dt;
    let elapsed = *elapsed;

    world.logo.alpha = if tuning.logo_fade_secs > 0.0 {
        (1.0 - elapsed / tuning.logo_fade_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };

    if elapsed < tuning.logo_transition_secs() {
        return;
    }

    let player = world.player;
    if let Some(body) = world.body_mut(player) {
        body.dynamic = true;
    }
    world.logo = Logo {
        visible: false,
        alpha: 0.0,
        transition: None,
    };
    world.state = GameState::Playing;
    world.events.push(GameEvent::PlayerActivated);
    log::info!("Player activated, rocks incoming");

    for _ in 0..world.scheduler.start() {
        world.spawn_obstacle(tuning);
    }
}

/// Overlap pass. Every gate passed this frame scores before a fatal hit
/// ends the run, whatever the body ids.
fn resolve_contacts(world: &mut World) {
    let outcomes: Vec<ContactOutcome> = find_contacts(&world.bodies)
        .into_iter()
        .map(|contact| classify(world.body(contact.a), world.body(contact.b)))
        .collect();

    for outcome in &outcomes {
        if let ContactOutcome::Score { remove } = *outcome {
            if let Some(id) = remove {
                // Already consumed by an earlier contact this frame
                let Some(body) = world.body_mut(id) else {
                    continue;
                };
                body.removed = true;
            }
            let event = world.score.increment();
            log::debug!("Gate passed, score {}", world.score.value());
            world.events.push(event);
        }
    }

    if outcomes.contains(&ContactOutcome::Fatal) {
        die(world);
    }
}

/// Freeze everything and show the game over marker
fn die(world: &mut World) {
    let player = world.player;
    let position = world.body(player).map(|b| b.position).unwrap_or_default();
    if let Some(body) = world.body_mut(player) {
        body.removed = true;
        body.dynamic = false;
    }

    world.state = GameState::Dead;
    world.speed = 0.0;
    world.scheduler.stop();
    world.game_over_visible = true;
    world.events.push(GameEvent::GameOver {
        position,
        score: world.score.value(),
    });
    log::info!("Game over at {position:?}, score {}", world.score.value());
}

fn update_rotation(world: &mut World, tuning: &Tuning, dt: f32) {
    let Some(vy) = world.body(world.player).map(|b| b.velocity.y) else {
        return;
    };
    world.rotation_hint = (vy * tuning.rotation_factor)
        .clamp(-tuning.max_rotation, tuning.max_rotation);
    world.player_angle = if tuning.rotation_ease_secs > 0.0 {
        approach(world.player_angle, world.rotation_hint, dt / tuning.rotation_ease_secs)
    } else {
        world.rotation_hint
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Body, BodyTag};
    use crate::sim::shape::Shape;
    use crate::sim::state::test_support::world;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn playing_world(seed: u64) -> World {
        let tuning = Tuning::default();
        let mut world = world(seed);
        handle_tap(&mut world, &tuning);
        for _ in 0..61 {
            tick(&mut world, &tuning, DT);
        }
        assert_eq!(world.state(), GameState::Playing);
        world.drain_events();
        world
    }

    #[test]
    fn test_taps_during_fade_are_ignored() {
        let tuning = Tuning::default();
        let mut world = world(1);
        handle_tap(&mut world, &tuning);
        tick(&mut world, &tuning, 0.2);
        handle_tap(&mut world, &tuning);
        assert_eq!(world.logo.transition, Some(0.2));
        assert_eq!(world.state(), GameState::ShowingLogo);
        assert!((world.logo.alpha - 0.6).abs() < 1e-4);
        assert_eq!(world.drain_events(), vec![GameEvent::LogoFadeStarted]);
    }

    #[test]
    fn test_logo_idles_without_tap() {
        let tuning = Tuning::default();
        let mut world = world(1);
        for _ in 0..600 {
            tick(&mut world, &tuning, DT);
        }
        assert_eq!(world.state(), GameState::ShowingLogo);
        assert!(!world.player().unwrap().dynamic);
        assert_eq!(world.player().unwrap().position, Vec2::new(1024.0 / 6.0, 576.0));
    }

    #[test]
    fn test_flap_sets_upward_velocity() {
        let tuning = Tuning::default();
        let mut world = playing_world(2);
        tick(&mut world, &tuning, 0.2);
        handle_tap(&mut world, &tuning);
        assert!((world.player().unwrap().velocity.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_player_falls_while_untouched() {
        let tuning = Tuning::default();
        let mut world = playing_world(3);
        let mut last_vy = world.player().unwrap().velocity.y;
        for _ in 0..20 {
            tick(&mut world, &tuning, DT);
            if world.state() != GameState::Playing {
                break;
            }
            let vy = world.player().unwrap().velocity.y;
            assert!(vy < last_vy);
            last_vy = vy;
        }
    }

    #[test]
    fn test_rotation_follows_velocity() {
        let tuning = Tuning::default();
        let mut world = playing_world(4);
        handle_tap(&mut world, &tuning);
        tick(&mut world, &tuning, DT);
        let vy = world.player().unwrap().velocity.y;
        assert!((world.rotation_hint - vy * 0.001).abs() < 1e-5);
        assert!(world.player_angle > 0.0 && world.player_angle <= world.rotation_hint);

        // Fast fall is clamped
        let player = world.player_id();
        world.body_mut(player).unwrap().velocity.y = -5000.0;
        tick(&mut world, &tuning, DT);
        assert_eq!(world.rotation_hint, -tuning.max_rotation);
    }

    #[test]
    fn test_trigger_contact_scores_once() {
        let tuning = Tuning::default();
        let mut world = playing_world(5);
        let at = world.player().unwrap().position;
        let trigger = world.spawn_body(|id| {
            Body::new(id, BodyTag::ScoreTrigger, at, Shape::rect(32.0, 768.0))
                .with_masks(crate::category::TRIGGER, crate::category::NONE)
        });

        tick(&mut world, &tuning, DT);
        tick(&mut world, &tuning, DT);

        assert_eq!(world.score(), 1);
        assert!(world.body(trigger).is_none());
        assert_eq!(world.state(), GameState::Playing);
        let scores: Vec<_> = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged(_)))
            .collect();
        assert_eq!(scores, vec![GameEvent::ScoreChanged(1)]);
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let tuning = Tuning::default();
        let mut world = playing_world(6);
        let before = world.player().unwrap().position;
        tick(&mut world, &tuning, f32::NAN);
        tick(&mut world, &tuning, -1.0);
        tick(&mut world, &tuning, 0.0);
        assert_eq!(world.player().unwrap().position, before);
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let tuning = Tuning::default();
        let mut world = playing_world(7);
        let before = world.elapsed;
        tick(&mut world, &tuning, 10.0);
        assert!((world.elapsed - before - tuning.max_frame_dt).abs() < 1e-5);
    }
}
