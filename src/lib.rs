//! Sum Stack - A falling-block arithmetic puzzle
//!
//! Core modules:
//! - `sim`: Deterministic game engine (grid, targets, timer, transitions)
//! - `rules`: Data-driven game balance (scoring, levels, countdown)
//!
//! Rendering, input and persistence belong to the host. The host observes
//! engine state and feeds it `Command`s.

pub mod rules;
pub mod sim;

pub use rules::{Rules, RulesError};
pub use sim::{
    BlockId, Command, GameEngine, GameEvent, GameMode, GameStatus, Snapshot, TimerHandle,
};

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (columns x rows). Row 0 is the top, row `GRID_HEIGHT - 1` spawns.
    pub const GRID_WIDTH: usize = 6;
    pub const GRID_HEIGHT: usize = 10;
    /// Full rows placed at the bottom when a game starts
    pub const INITIAL_ROWS: usize = 4;

    /// Block values are drawn uniformly from this inclusive range
    pub const MIN_BLOCK_VALUE: u8 = 1;
    pub const MAX_BLOCK_VALUE: u8 = 9;

    /// Target used when the grid is empty (only possible before a game starts)
    pub const EMPTY_GRID_TARGET: u32 = 10;
    /// Number of blocks sampled to build a target (inclusive range)
    pub const TARGET_MIN_SAMPLES: usize = 2;
    pub const TARGET_MAX_SAMPLES: usize = 4;

    /// Points per cleared block, multiplied by the current level
    pub const POINTS_PER_BLOCK: u64 = 10;
    /// Score needed per level
    pub const LEVEL_SCORE_STEP: u64 = 500;
    /// Clears of at least this many blocks fire the celebration signal
    pub const CELEBRATION_MIN_BLOCKS: usize = 3;

    /// Countdown per row in time mode, in tenths of a second
    pub const BASE_TIME_TENTHS: u32 = 100;
    /// Countdown never drops below this (tenths of a second)
    pub const MIN_TIME_TENTHS: u32 = 40;
    /// Countdown shrinks by this much per level (tenths of a second)
    pub const TIME_DECAY_TENTHS: u32 = 5;

    /// Timer cadence (100 ms per tick, 0.1 s removed from the countdown)
    pub const TICK_DT: f64 = 0.1;
    /// Maximum ticks processed per `update` call to prevent spiral of death
    pub const MAX_CATCH_UP_TICKS: u32 = 8;
}

/// Convert whole tenths of a second to seconds
#[inline]
pub fn tenths_to_secs(tenths: u32) -> f32 {
    tenths as f32 / 10.0
}
