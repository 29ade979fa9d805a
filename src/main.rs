//! Crag Glider - headless native runner
//!
//! Plays the game with variable frame times, tapping via the autopilot,
//! and narrates it through the log.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crag_glider::Settings;
use crag_glider::present::{LogPresenter, ProceduralAssets, load_shapes, present};
use crag_glider::sim::{Game, GameState, autopilot};

/// Seconds to linger on the game over screen before tapping again
const GAME_OVER_PAUSE_SECS: f32 = 1.0;

/// An endless side-scrolling glider game, played headless
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the first game
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long)]
    seconds: Option<f32>,
    /// Nominal frames per second
    #[arg(long)]
    fps: Option<f32>,
    /// Frame time variation, as a fraction of the frame time
    #[arg(long)]
    jitter: Option<f32>,
    /// New games to start after dying
    #[arg(long)]
    restarts: Option<u32>,
    /// Never tap; the plane sits on the logo screen
    #[arg(long)]
    no_autopilot: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn settings(args: &Args) -> Result<Settings, crag_glider::ConfigError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(seconds) = args.seconds {
        settings.run_secs = seconds;
    }
    if let Some(fps) = args.fps {
        settings.frame_rate = fps;
    }
    if let Some(jitter) = args.jitter {
        settings.frame_jitter = jitter;
    }
    if let Some(restarts) = args.restarts {
        settings.restarts = restarts;
    }
    if args.no_autopilot {
        settings.autopilot = false;
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Crag Glider starting...");

    let settings = settings(&args)?;
    let screen = Vec2::new(settings.screen_width, settings.screen_height);
    let shapes = load_shapes(&ProceduralAssets::new(screen.x))?;

    let mut game = Game::new(settings.seed, screen, shapes, settings.tuning.clone());
    let mut presenter = LogPresenter::default();
    let mut frame_rng = Pcg32::seed_from_u64(settings.seed ^ 0x5eed);
    let mut restarts_left = settings.restarts;
    let mut elapsed = 0.0;
    let mut dead_for = 0.0;

    while elapsed < settings.run_secs {
        let jitter = settings.frame_jitter;
        let dt = settings.frame_dt() * (1.0 + frame_rng.random_range(-jitter..=jitter));

        match game.state() {
            GameState::Dead => {
                dead_for += dt;
                if dead_for >= GAME_OVER_PAUSE_SECS {
                    if restarts_left == 0 {
                        break;
                    }
                    restarts_left -= 1;
                    dead_for = 0.0;
                    game.handle_input();
                }
            }
            _ => {
                if settings.autopilot && autopilot::wants_tap(game.world(), game.tuning()) {
                    game.handle_input();
                }
            }
        }

        game.update(dt);
        present(&mut game, &mut presenter);
        elapsed += dt;
    }

    log::info!(
        "Done after {:.1}s: {} runs, {} games over, best score {}, {} frames",
        elapsed,
        game.runs(),
        presenter.games_over,
        presenter.best_score,
        presenter.frames
    );
    Ok(())
}
