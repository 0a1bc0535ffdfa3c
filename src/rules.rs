//! Game balance and rules
//!
//! The shipped game always plays with `Rules::default()`. Custom rulesets can
//! be loaded from JSON for tooling and experiments; they are validated before
//! the engine accepts them.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a ruleset is rejected
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("block value range {min}..={max} is empty or includes zero")]
    InvalidValueRange { min: u8, max: u8 },

    #[error("target sample range {min}..={max} is empty or includes zero")]
    InvalidSampleRange { min: usize, max: usize },

    #[error("initial rows ({0}) must be at least one and leave the top row empty")]
    InvalidInitialRows(usize),

    #[error("level score step must be positive")]
    ZeroLevelStep,

    #[error("countdown floor ({floor}) exceeds base countdown ({base}) or is zero")]
    InvalidCountdown { base: u32, floor: u32 },

    #[error("malformed ruleset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable game rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Full rows placed when a game starts
    pub initial_rows: usize,
    /// Inclusive block value range
    pub min_value: u8,
    pub max_value: u8,
    /// Inclusive range for the number of blocks sampled per target
    pub min_samples: usize,
    pub max_samples: usize,
    /// Points per cleared block at level 1
    pub points_per_block: u64,
    /// Score per level
    pub level_score_step: u64,
    /// Minimum clear size for the celebration signal
    pub celebration_min_blocks: usize,
    /// Time mode countdown settings (tenths of a second)
    pub base_time_tenths: u32,
    pub min_time_tenths: u32,
    pub time_decay_tenths: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            initial_rows: INITIAL_ROWS,
            min_value: MIN_BLOCK_VALUE,
            max_value: MAX_BLOCK_VALUE,
            min_samples: TARGET_MIN_SAMPLES,
            max_samples: TARGET_MAX_SAMPLES,
            points_per_block: POINTS_PER_BLOCK,
            level_score_step: LEVEL_SCORE_STEP,
            celebration_min_blocks: CELEBRATION_MIN_BLOCKS,
            base_time_tenths: BASE_TIME_TENTHS,
            min_time_tenths: MIN_TIME_TENTHS,
            time_decay_tenths: TIME_DECAY_TENTHS,
        }
    }
}

impl Rules {
    /// Parse and validate a ruleset from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check the ruleset for values the engine cannot play with
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.min_value == 0 || self.min_value > self.max_value {
            return Err(RulesError::InvalidValueRange {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.min_samples == 0 || self.min_samples > self.max_samples {
            return Err(RulesError::InvalidSampleRange {
                min: self.min_samples,
                max: self.max_samples,
            });
        }
        if self.initial_rows == 0 || self.initial_rows >= GRID_HEIGHT {
            return Err(RulesError::InvalidInitialRows(self.initial_rows));
        }
        if self.level_score_step == 0 {
            return Err(RulesError::ZeroLevelStep);
        }
        if self.min_time_tenths == 0 || self.min_time_tenths > self.base_time_tenths {
            return Err(RulesError::InvalidCountdown {
                base: self.base_time_tenths,
                floor: self.min_time_tenths,
            });
        }
        Ok(())
    }

    /// Level reached at a given score (1-based)
    pub fn level_for_score(&self, score: u64) -> u32 {
        let level = score / self.level_score_step + 1;
        level.min(u32::MAX as u64) as u32
    }

    /// Points awarded for clearing `count` blocks at `level`. Saturates.
    pub fn clear_points(&self, count: usize, level: u32) -> u64 {
        (count as u64)
            .saturating_mul(self.points_per_block)
            .saturating_mul(level as u64)
    }

    /// Countdown per row at a given level, in tenths of a second
    pub fn max_time_for_level(&self, level: u32) -> u32 {
        let decay = level.saturating_sub(1).saturating_mul(self.time_decay_tenths);
        self.base_time_tenths
            .saturating_sub(decay)
            .max(self.min_time_tenths)
    }
}
