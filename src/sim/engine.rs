//! Game engine: the single state machine behind a session
//!
//! Every mutation goes through `GameEngine::apply`. A command is processed to
//! completion before it returns, so a clear (score, removal, new target,
//! level update and classic-mode row) is one indivisible transition.
//!
//! ```text
//! menu --start--> playing --row overflow--> gameover
//!   ^                |                          |
//!   +-----reset------+-----------reset----------+
//! ```

use std::cmp::Ordering;

use rand_pcg::Pcg32;

use super::grid::{Grid, RowInjection};
use super::state::{
    Block, BlockId, GameEvent, GameMode, GameStatus, IdSource, RngState, SequentialIds, Snapshot,
};
use super::target::generate_target;
use super::timer::{Countdown, CountdownStep, TickTimer, TimerHandle};
use crate::consts::GRID_HEIGHT;
use crate::rules::{Rules, RulesError};

/// Input commands (one discrete external event each)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartGame(GameMode),
    ToggleBlock(BlockId),
    /// Inject a row now, as if the countdown expired
    ForceAdvance,
    ResetToMenu,
    /// Countdown tick from the timer armed with this handle
    Tick(TimerHandle),
}

/// Falling-block sum puzzle engine
#[derive(Debug, Clone)]
pub struct GameEngine<I = SequentialIds> {
    rules: Rules,
    rng_state: RngState,
    rng: Pcg32,
    ids: I,
    status: GameStatus,
    mode: GameMode,
    grid: Grid,
    /// Insertion order kept; always a subset of the grid
    selection: Vec<BlockId>,
    target: u32,
    score: u64,
    level: u32,
    countdown: Countdown,
    timer: TickTimer,
}

impl GameEngine<SequentialIds> {
    /// Engine with the standard rules and sequential block ids
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Rules::default(), SequentialIds::default())
    }

    /// Engine with a custom ruleset
    pub fn with_rules(seed: u64, rules: Rules) -> Result<Self, RulesError> {
        Self::with_id_source(seed, rules, SequentialIds::default())
    }
}

impl<I: IdSource> GameEngine<I> {
    /// Engine with a custom ruleset and id generator
    pub fn with_id_source(seed: u64, rules: Rules, ids: I) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self::build(seed, rules, ids))
    }

    fn build(seed: u64, rules: Rules, ids: I) -> Self {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let grid = Grid::new();
        let target = generate_target(&grid, &rules, &mut rng).value;
        let countdown = Countdown::new(rules.base_time_tenths);
        Self {
            rules,
            rng_state,
            rng,
            ids,
            status: GameStatus::Menu,
            mode: GameMode::Classic,
            grid,
            selection: Vec::new(),
            target,
            score: 0,
            level: 1,
            countdown,
            timer: TickTimer::new(),
        }
    }

    /// Apply one command and return what happened, oldest event first
    pub fn apply(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match command {
            Command::StartGame(mode) => self.start(mode, &mut events),
            Command::ToggleBlock(id) => self.toggle(id, &mut events),
            Command::ForceAdvance => {
                if self.status == GameStatus::Playing {
                    self.add_row(&mut events);
                }
            }
            Command::ResetToMenu => self.reset(&mut events),
            Command::Tick(handle) => self.tick(handle, &mut events),
        }
        events
    }

    pub fn start_game(&mut self, mode: GameMode) -> Vec<GameEvent> {
        self.apply(Command::StartGame(mode))
    }

    pub fn toggle_block(&mut self, id: BlockId) -> Vec<GameEvent> {
        self.apply(Command::ToggleBlock(id))
    }

    pub fn force_advance(&mut self) -> Vec<GameEvent> {
        self.apply(Command::ForceAdvance)
    }

    pub fn reset_to_menu(&mut self) -> Vec<GameEvent> {
        self.apply(Command::ResetToMenu)
    }

    /// Feed elapsed real time (seconds). Fires the armed timer once per
    /// 100 ms of accumulated time; inert when no timer is armed.
    pub fn update(&mut self, elapsed_secs: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(handle) = self.timer.armed() else {
            return events;
        };
        let due = self.timer.advance(elapsed_secs);
        for _ in 0..due {
            if !self.timer.is_current(handle) {
                break;
            }
            self.tick(handle, &mut events);
        }
        events
    }

    fn start(&mut self, mode: GameMode, events: &mut Vec<GameEvent>) {
        self.mode = mode;
        self.status = GameStatus::Playing;
        self.score = 0;
        self.level = 1;
        self.selection.clear();

        self.grid.clear();
        for row in GRID_HEIGHT - self.rules.initial_rows..GRID_HEIGHT {
            self.grid
                .spawn_row(row, &self.rules, &mut self.rng, &mut self.ids);
        }
        self.regenerate_target();

        match mode {
            GameMode::Time => {
                self.countdown = Countdown::new(self.rules.base_time_tenths);
                self.timer.arm();
            }
            GameMode::Classic => {
                self.timer.cancel();
            }
        }

        log::info!(
            "Game started: mode={}, seed={}, target={}",
            mode.as_str(),
            self.rng_state.seed,
            self.target
        );
        events.push(GameEvent::GameStarted {
            mode,
            target: self.target,
        });
    }

    fn toggle(&mut self, id: BlockId, events: &mut Vec<GameEvent>) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else if self.grid.contains(id) {
            self.selection.push(id);
        } else {
            log::debug!("Ignoring toggle of unknown block {}", id);
            return;
        }
        self.evaluate_selection(events);
    }

    /// Compare the selection sum with the target: clear, bust or keep going
    fn evaluate_selection(&mut self, events: &mut Vec<GameEvent>) {
        let sum = self.current_sum();
        match sum.cmp(&self.target) {
            Ordering::Equal => self.clear_selection(events),
            Ordering::Greater => {
                log::debug!("Bust: {} > {}", sum, self.target);
                self.selection.clear();
                events.push(GameEvent::Bust { sum });
            }
            Ordering::Less => {}
        }
    }

    fn clear_selection(&mut self, events: &mut Vec<GameEvent>) {
        let count = self.selection.len();
        let points = self.rules.clear_points(count, self.level);
        self.score = self.score.saturating_add(points);

        let removed = self.grid.remove(&self.selection);
        debug_assert_eq!(removed.len(), count);
        let ids = std::mem::take(&mut self.selection);
        events.push(GameEvent::Cleared { ids, points });
        if count >= self.rules.celebration_min_blocks {
            events.push(GameEvent::Celebration { count });
        }

        self.regenerate_target();
        events.push(GameEvent::TargetChanged {
            target: self.target,
        });
        self.update_level(events);

        if self.mode == GameMode::Classic {
            self.add_row(events);
        }
    }

    /// Level follows score; the time mode countdown follows level
    fn update_level(&mut self, events: &mut Vec<GameEvent>) {
        let level = self.rules.level_for_score(self.score);
        if level != self.level {
            self.level = level;
            log::info!("Level {} (score {})", level, self.score);
            events.push(GameEvent::LevelUp { level });
        }
        if self.mode == GameMode::Time {
            self.countdown
                .set_max(self.rules.max_time_for_level(self.level));
        }
    }

    /// Loss check, then push a new row in from the bottom
    fn add_row(&mut self, events: &mut Vec<GameEvent>) {
        match self
            .grid
            .inject_row(&self.rules, &mut self.rng, &mut self.ids)
        {
            RowInjection::Overflow => {
                self.status = GameStatus::GameOver;
                self.timer.cancel();
                log::info!("Game over: score={}, level={}", self.score, self.level);
                events.push(GameEvent::GameOver {
                    score: self.score,
                    level: self.level,
                });
            }
            RowInjection::Injected => {
                if self.mode == GameMode::Time {
                    self.countdown.reset();
                }
                log::debug!("Row injected, stack height {}", self.stack_height());
                events.push(GameEvent::RowInjected);
            }
        }
    }

    fn tick(&mut self, handle: TimerHandle, events: &mut Vec<GameEvent>) {
        if self.status != GameStatus::Playing
            || self.mode != GameMode::Time
            || !self.timer.is_current(handle)
        {
            return;
        }
        if self.countdown.step() == CountdownStep::Expired {
            self.add_row(events);
        }
    }

    fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.timer.cancel();
        self.status = GameStatus::Menu;
        log::info!("Returned to menu");
        events.push(GameEvent::ReturnedToMenu);
    }

    fn regenerate_target(&mut self) {
        let target = generate_target(&self.grid, &self.rules, &mut self.rng);
        log::debug!("Target {} from {:?}", target.value, target.witness);
        self.target = target.value;
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    /// Live blocks, sorted by id
    pub fn blocks(&self) -> &[Block] {
        self.grid.blocks()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Selected ids in the order they were picked
    pub fn selected_ids(&self) -> &[BlockId] {
        &self.selection
    }

    pub fn is_selected(&self, id: BlockId) -> bool {
        self.selection.contains(&id)
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Seconds left before the next row (time mode)
    pub fn time_left(&self) -> f32 {
        self.countdown.time_left()
    }

    /// Full countdown for the current level (time mode)
    pub fn max_time(&self) -> f32 {
        self.countdown.max_time()
    }

    /// time_left / max_time, for a countdown bar
    pub fn time_fraction(&self) -> f32 {
        self.countdown.fraction()
    }

    /// Currently armed timer handle, if the countdown is running
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer.armed()
    }

    /// Sum of the selected blocks still on the grid
    pub fn current_sum(&self) -> u32 {
        self.grid.sum_of(&self.selection)
    }

    /// Occupied rows counted from the bottom (GRID_HEIGHT means the next row loses)
    pub fn stack_height(&self) -> usize {
        self.grid.top_row().map_or(0, |top| GRID_HEIGHT - top)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            mode: self.mode,
            grid: self.grid.blocks().to_vec(),
            selected_ids: self.selection.clone(),
            target: self.target,
            current_sum: self.current_sum(),
            score: self.score,
            level: self.level,
            time_left: self.time_left(),
            max_time: self.max_time(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_grid_for_test(&mut self, grid: Grid, target: u32) {
        self.grid = grid;
        self.selection.clear();
        self.target = target;
    }

    #[cfg(test)]
    pub(crate) fn set_score_for_test(&mut self, score: u64) {
        self.score = score;
        self.level = self.rules.level_for_score(score);
        if self.mode == GameMode::Time {
            self.countdown
                .set_max(self.rules.max_time_for_level(self.level));
        }
    }
}
