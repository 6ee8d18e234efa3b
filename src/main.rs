//! Watch Arcade headless runner
//!
//! Plays one game with an autopilot paddle and prints the final state as JSON.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use watch_arcade::Settings;
use watch_arcade::arcade::{Arcade, ArcadeEvent, GameKind};
use watch_arcade::driver::crown_to_target;
use watch_arcade::sim::{BreakoutEvent, PongEvent};

#[derive(Debug, Parser)]
#[command(
    name = "watch-arcade",
    version,
    about = "Run Pong or Breakout headless with an autopilot paddle"
)]
struct Args {
    /// Game to play
    #[arg(value_enum)]
    game: GameKind,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 6_000)]
    ticks: u64,

    /// Autopilot looks at the ball once every this many ticks
    #[arg(long, default_value_t = 12)]
    lag: u64,

    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Fold whole seconds and the sub-second part into one seed
fn seed_from_elapsed(elapsed: Duration) -> u64 {
    elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(seed_from_elapsed)
        .unwrap_or(0)
}

fn log_event(event: ArcadeEvent, tick: u64) {
    match event {
        ArcadeEvent::Pong(PongEvent::Scored(side)) => log::info!("[{tick}] {side} scores"),
        ArcadeEvent::Pong(PongEvent::Won(side)) => log::info!("[{tick}] {side} wins"),
        ArcadeEvent::Breakout(BreakoutEvent::BrickDestroyed { row, col }) => {
            log::info!("[{tick}] brick ({row}, {col}) destroyed")
        }
        ArcadeEvent::Breakout(BreakoutEvent::Missed) => log::info!("[{tick}] ball lost"),
        other => log::debug!("[{tick}] {other:?}"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let seed = args.seed.or(settings.seed).unwrap_or_else(time_seed);
    let lag = args.lag.max(1);

    let mut arcade = Arcade::new(settings).context("invalid settings")?;
    let session = arcade.start(args.game, seed)?;
    let input = session.input();

    for tick in 0..args.ticks {
        if tick % lag == 0 {
            // Autopilot turns the crown the way a wearer would
            let crown = 1.0 - session.autopilot_target();
            input.set(crown_to_target(crown));
        }
        for event in session.step() {
            log_event(event, tick);
        }
        if session.is_finished() {
            log::info!("Game over after {} ticks", session.time_ticks());
            break;
        }
    }

    let snapshot = session.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).context("serializing final state")?;
    println!("{json}");

    arcade.end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_keeps_subsecond_bits() {
        assert_eq!(seed_from_elapsed(Duration::new(0, 0)), 0);
        assert_eq!(seed_from_elapsed(Duration::new(5, 0)), 5);
        assert_eq!(seed_from_elapsed(Duration::new(0, 7)), 7);
        assert_ne!(
            seed_from_elapsed(Duration::new(1_700_000_000, 1)),
            seed_from_elapsed(Duration::new(1_700_000_000, 2))
        );
        // Far beyond what u64 nanoseconds can hold
        let far = Duration::new(u64::MAX, 999_999_999);
        assert_eq!(seed_from_elapsed(far), u64::MAX ^ 999_999_999);
    }
}
