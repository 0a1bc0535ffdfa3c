//! Headless driver: plays a seeded game with the auto-play solver.
//!
//! Usage: `sum-stack [classic|time] [seed]`

use sum_stack::sim::find_selection;
use sum_stack::{GameEngine, GameEvent, GameMode, GameStatus};

/// Ticks the bot "thinks" between moves in time mode (2.5 s)
const THINK_TICKS: u32 = 25;
/// Stop runs that never lose
const MAX_MOVES: u32 = 2_000;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .and_then(|m| GameMode::from_str(&m))
        .unwrap_or_default();
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);

    log::info!("Sum Stack (headless) starting: mode={}, seed={}", mode.as_str(), seed);

    let mut engine = GameEngine::new(seed);
    engine.start_game(mode);

    let mut moves = 0;
    let mut celebrations = 0;
    while engine.status() == GameStatus::Playing && moves < MAX_MOVES {
        if mode == GameMode::Time {
            for _ in 0..THINK_TICKS {
                engine.update(sum_stack::consts::TICK_DT);
            }
            if engine.status() != GameStatus::Playing {
                break;
            }
        }

        match find_selection(engine.blocks(), engine.target()) {
            Some(ids) => {
                for id in ids {
                    let events = engine.toggle_block(id);
                    celebrations += events
                        .iter()
                        .filter(|e| matches!(e, GameEvent::Celebration { .. }))
                        .count();
                }
            }
            None => {
                log::warn!("No selection reaches target {}, advancing", engine.target());
                engine.force_advance();
            }
        }
        moves += 1;
    }

    println!(
        "\n{:?} after {} moves: score {}, level {}, {} big clears",
        engine.status(),
        moves,
        engine.score(),
        engine.level(),
        celebrations
    );
    match serde_json::to_string_pretty(&engine.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
