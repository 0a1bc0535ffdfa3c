//! Deterministic game engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Injectable block ids
//! - Stable iteration order (by block ID)
//! - No rendering or platform dependencies

pub mod engine;
pub mod grid;
pub mod solver;
pub mod state;
pub mod target;
pub mod timer;

pub use engine::{Command, GameEngine};
pub use grid::{Grid, RowInjection};
pub use solver::find_selection;
pub use state::{
    Block, BlockId, GameEvent, GameMode, GameStatus, IdSource, RngState, SequentialIds, Snapshot,
};
pub use target::{Target, generate_target};
pub use timer::{Countdown, CountdownStep, TickTimer, TimerHandle};
