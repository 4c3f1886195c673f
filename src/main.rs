#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use pacman_engine::autopilot;
use pacman_engine::events::GameEvent;
use pacman_engine::game::Game;
use pacman_engine::logging::setup_logging;
use pacman_engine::profile::Profile;
use tracing::{debug, error, info, warn};

/// Name recorded in the highscore table for autopilot runs.
const AUTOPILOT_NAME: &str = "CPU";

fn log_event(event: GameEvent) {
    match event {
        GameEvent::CollectibleConsumed { .. } | GameEvent::BonusFruitPlaced { .. } => debug!(?event, "Game event"),
        _ => info!(?event, "Game event"),
    }
}

/// Runs the game headless at the configured tick rate, steered by the autopilot.
pub fn main() -> anyhow::Result<()> {
    setup_logging();

    let config_path = env::args().nth(1).map_or_else(|| PathBuf::from("config.json"), PathBuf::from);
    let max_ticks = env::var("PACMAN_MAX_TICKS")
        .ok()
        .map(|value| value.parse::<u64>())
        .transpose()
        .context("PACMAN_MAX_TICKS must be a whole number")?;

    let mut profile = Profile::new(&config_path);
    let config = profile
        .config()
        .with_context(|| format!("Could not load configuration from {}", config_path.display()))?
        .clone();
    let best = profile.highscores()?.top();

    let mut game = Game::from_config(&config);
    game.set_highscore_target(best);
    game.start().context("Could not start the first level")?;

    let loop_time = Duration::from_secs(1) / config.gameplay.tick_rate;
    info!(loop_ms = loop_time.as_secs_f64() * 1000.0, max_ticks, "Starting game loop");

    let mut ticks = 0u64;
    let mut failure = None;
    loop {
        let start = Instant::now();

        let intent = game
            .maze()
            .zip(game.player_position())
            .and_then(|(maze, cell)| autopilot::steer(maze, cell));
        if let Err(e) = game.tick(intent) {
            error!(error = %e, "Game halted");
            failure = Some(e);
            break;
        }
        game.drain_events().into_iter().for_each(log_event);

        ticks += 1;
        if game.stage().is_terminal() || max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        let elapsed = start.elapsed();
        if elapsed < loop_time {
            spin_sleep::sleep(loop_time - elapsed);
        } else {
            warn!(behind = ?(elapsed - loop_time), "Game loop behind schedule");
        }
    }

    info!(ticks, score = game.score(), level = game.level(), stage = ?game.stage(), "Game loop finished");
    match profile.highscores()?.record(AUTOPILOT_NAME, game.score())? {
        Some(rank) => info!(rank = rank + 1, score = game.score(), "New highscore entry"),
        None => debug!(score = game.score(), "Score did not make the highscore table"),
    }
    profile.shutdown()?;

    match failure {
        Some(e) => Err(e).context("A level failed to load"),
        None => Ok(()),
    }
}
