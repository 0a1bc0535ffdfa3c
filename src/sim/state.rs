//! Game state types
//!
//! Everything the host observes about a session lives here: blocks, modes,
//! status and the one-shot events produced by each transition.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Opaque block identity, stable for the lifetime of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// A numbered block on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub value: u8,
    /// 0 is the top row (loss boundary)
    pub row: usize,
    pub col: usize,
}

/// Source of fresh block ids. Only uniqueness is required.
pub trait IdSource {
    fn next_id(&mut self) -> BlockId;
}

/// Monotonic counter ids (b1, b2, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialIds {
    next: u32,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// How rows get injected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// A new row after every successful clear
    #[default]
    Classic,
    /// A new row whenever the countdown expires
    Time,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Time => "time",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "time" | "timed" => Some(GameMode::Time),
            _ => None,
        }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    GameOver,
}

/// Notifications emitted by a transition, newest last.
/// Cosmetic only: the host may ignore any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted { mode: GameMode, target: u32 },
    /// Selected blocks matched the target and were removed
    Cleared { ids: Vec<BlockId>, points: u64 },
    /// Big clear, for confetti and friends
    Celebration { count: usize },
    /// Selection overshot the target and was dropped
    Bust { sum: u32 },
    TargetChanged { target: u32 },
    RowInjected,
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
    ReturnedToMenu,
}

/// RNG state wrapper for reproducible sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Read-only view of the engine for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub mode: GameMode,
    /// Sorted by id
    pub grid: Vec<Block>,
    /// Selection order preserved
    pub selected_ids: Vec<BlockId>,
    pub target: u32,
    pub current_sum: u32,
    pub score: u64,
    pub level: u32,
    pub time_left: f32,
    pub max_time: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_are_unique() {
        let mut ids = SequentialIds::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a, BlockId(1));
        assert_eq!(b.to_string(), "b2");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("Classic"), Some(GameMode::Classic));
        assert_eq!(GameMode::from_str("time"), Some(GameMode::Time));
        assert_eq!(GameMode::from_str("zen"), None);
        assert_eq!(GameMode::Time.as_str(), "time");
    }

    #[test]
    fn test_rng_state_reproducible() {
        use rand::Rng;
        let mut a = RngState::new(7).to_rng();
        let mut b = RngState::new(7).to_rng();
        assert_eq!(a.random::<u32>(), b.random::<u32>());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&GameStatus::GameOver).unwrap();
        assert_eq!(json, "\"gameover\"");
    }
}
