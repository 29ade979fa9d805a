//! Presentation collaborators
//!
//! The simulation only needs two things from the outside world: a way to
//! show a frame (and hear about score/game over), and collision shapes for
//! named assets. Both are traits so a real renderer can slot in; the
//! implementations here are what the headless runner uses.

use std::sync::Arc;

use glam::Vec2;

use crate::consts::{GROUND_ASSET, PLAYER_ASSET, ROCK_ASSET};
use crate::error::AssetError;
use crate::sim::{
    Body, BodyTag, ConvexPolygon, Game, GameEvent, GameState, PixelMask, Shape, Shapes, World,
};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub bodies: &'a [Body],
    /// Player tilt in radians
    pub rotation: f32,
    pub score: u32,
    pub state: GameState,
    pub logo_alpha: f32,
    pub game_over_visible: bool,
}

impl<'a> Frame<'a> {
    pub fn of(world: &'a World) -> Self {
        Self {
            bodies: world.bodies(),
            rotation: world.player_angle,
            score: world.score(),
            state: world.state(),
            logo_alpha: if world.logo.visible { world.logo.alpha } else { 0.0 },
            game_over_visible: world.game_over_visible,
        }
    }
}

/// Renderer/audio side of the game
pub trait Presenter {
    fn render(&mut self, frame: &Frame<'_>);
    /// Score changes, game over, new game...
    fn notify(&mut self, event: &GameEvent);
}

/// Source of collision shapes for named textures
pub trait AssetSource {
    fn load_shape(&self, name: &str) -> Result<Shape, AssetError>;
}

/// Load every shape the game needs. Call once at startup; any missing asset
/// fails here, before a world exists.
pub fn load_shapes(assets: &dyn AssetSource) -> Result<Shapes, AssetError> {
    let shapes = Shapes {
        player: assets.load_shape(PLAYER_ASSET)?,
        rock: assets.load_shape(ROCK_ASSET)?,
        ground: assets.load_shape(GROUND_ASSET)?,
    };
    log::info!(
        "Loaded shapes: player {:?}, rock {:?}, ground {:?}",
        shapes.player.size(),
        shapes.rock.size(),
        shapes.ground.size()
    );
    Ok(shapes)
}

/// Deliver pending events, then draw the current frame
pub fn present(game: &mut Game, presenter: &mut dyn Presenter) {
    for event in game.drain_events() {
        presenter.notify(&event);
    }
    presenter.render(&Frame::of(game.world()));
}

/// Shapes generated in code, sized like the original artwork
#[derive(Debug, Clone)]
pub struct ProceduralAssets {
    screen_width: f32,
}

impl ProceduralAssets {
    pub const PLAYER_SIZE: (u32, u32) = (88, 73);
    pub const ROCK_SIZE: Vec2 = Vec2::new(104.0, 440.0);
    pub const GROUND_HEIGHT: f32 = 60.0;

    pub fn new(screen_width: f32) -> Self {
        Self { screen_width }
    }

    /// Plane silhouette: an elliptical fuselage with a raised tail fin
    fn plane_mask() -> PixelMask {
        let (w, h) = Self::PLAYER_SIZE;
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        let (rx, ry) = (w as f32 / 2.0, h as f32 / 3.0);
        PixelMask::from_fn(w, h, |x, y| {
            let p = Vec2::new(x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
            let body = (p.x / rx).powi(2) + (p.y / ry).powi(2) <= 1.0;
            let fin = p.x < -rx * 0.5 && p.y >= 0.0 && p.y <= h as f32 / 2.0;
            body || fin
        })
    }
}

impl AssetSource for ProceduralAssets {
    fn load_shape(&self, name: &str) -> Result<Shape, AssetError> {
        match name {
            PLAYER_ASSET => Ok(Shape::Mask(Arc::new(Self::plane_mask()))),
            ROCK_ASSET => {
                // Tapered spike, wide at its base
                let h = Self::ROCK_SIZE / 2.0;
                ConvexPolygon::new(vec![
                    Vec2::new(-h.x, -h.y),
                    Vec2::new(h.x, -h.y),
                    Vec2::new(h.x * 0.3, h.y),
                    Vec2::new(-h.x * 0.3, h.y),
                ])
                .map(Shape::Polygon)
                .ok_or_else(|| AssetError::InvalidShape {
                    name: name.to_string(),
                    reason: "rock outline is not convex".to_string(),
                })
            }
            GROUND_ASSET => {
                if self.screen_width > 0.0 {
                    Ok(Shape::rect(self.screen_width, Self::GROUND_HEIGHT))
                } else {
                    Err(AssetError::InvalidShape {
                        name: name.to_string(),
                        reason: format!("ground width {} is not positive", self.screen_width),
                    })
                }
            }
            other => Err(AssetError::Missing(other.to_string())),
        }
    }
}

/// Presenter that narrates the game through the `log` facade
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub frames: u64,
    pub score: u32,
    pub best_score: u32,
    pub games_over: u32,
}

impl Presenter for LogPresenter {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        if log::log_enabled!(log::Level::Trace) {
            let player = frame.bodies.iter().find(|b| b.tag == BodyTag::Player);
            let rocks = frame
                .bodies
                .iter()
                .filter(|b| b.tag == BodyTag::Obstacle)
                .count();
            log::trace!(
                "frame {} {:?}: player {:?} tilt {:.3}, {} rocks, logo alpha {:.2}",
                self.frames,
                frame.state,
                player.map(|p| p.position),
                frame.rotation,
                rocks,
                frame.logo_alpha
            );
        }
    }

    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LogoFadeStarted => log::debug!("Logo fading"),
            GameEvent::PlayerActivated => log::debug!("Plane is live"),
            GameEvent::ObstacleSpawned { y_position } => {
                log::debug!("Rocks spawned at y={y_position:.1}")
            }
            GameEvent::ScoreChanged(score) => {
                self.score = *score;
                self.best_score = self.best_score.max(*score);
                log::info!("*coin* SCORE: {score}");
            }
            GameEvent::GameOver { position, score } => {
                self.games_over += 1;
                log::info!(
                    "*explosion* at ({:.0}, {:.0}) - GAME OVER, score {score}",
                    position.x,
                    position.y
                );
            }
            GameEvent::NewGame { seed } => {
                self.score = 0;
                log::info!("New game (seed {seed})");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    struct Nothing;

    impl AssetSource for Nothing {
        fn load_shape(&self, name: &str) -> Result<Shape, AssetError> {
            Err(AssetError::Missing(name.to_string()))
        }
    }

    #[test]
    fn test_missing_asset_fails_fast() {
        let err = load_shapes(&Nothing).unwrap_err();
        assert!(matches!(err, AssetError::Missing(ref name) if name == PLAYER_ASSET));
    }

    #[test]
    fn test_procedural_shapes() {
        let shapes = load_shapes(&ProceduralAssets::new(1024.0)).unwrap();
        assert_eq!(shapes.player.size(), Vec2::new(88.0, 73.0));
        assert_eq!(shapes.rock.size(), ProceduralAssets::ROCK_SIZE);
        assert_eq!(shapes.ground.size(), Vec2::new(1024.0, 60.0));
        assert!(matches!(
            ProceduralAssets::new(1024.0).load_shape("music"),
            Err(AssetError::Missing(_))
        ));
        assert!(matches!(
            ProceduralAssets::new(0.0).load_shape(GROUND_ASSET),
            Err(AssetError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_plane_mask_has_empty_corners() {
        let mask = ProceduralAssets::plane_mask();
        assert!(!mask.is_solid(87, 0));
        assert!(!mask.is_solid(87, 72));
        assert!(mask.is_solid(44, 36));
        assert!(mask.solid_count() > 0);
    }

    #[test]
    fn test_present_delivers_events_then_frame() {
        let shapes = load_shapes(&ProceduralAssets::new(1024.0)).unwrap();
        let mut game = Game::new(3, Vec2::new(1024.0, 768.0), shapes, Tuning::default());
        let mut presenter = LogPresenter::default();

        game.handle_input();
        for _ in 0..400 {
            game.update(1.0 / 60.0);
            present(&mut game, &mut presenter);
        }

        assert_eq!(presenter.frames, 400);
        assert_eq!(game.state(), GameState::Dead);
        assert_eq!(presenter.games_over, 1);
        let frame = Frame::of(game.world());
        assert!(frame.game_over_visible);
        assert_eq!(frame.logo_alpha, 0.0);
    }
}
