//! Time mode countdown and tick scheduling
//!
//! The engine owns a single `TickTimer`. Arming it always cancels the
//! previous handle first, and ticks carrying a stale handle are ignored,
//! so a leftover tick can never fire after a mode or status change.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CATCH_UP_TICKS, TICK_DT};
use crate::tenths_to_secs;

/// Identifies one arming of the tick timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// Cancelable fixed-cadence tick source
#[derive(Debug, Clone, Default)]
pub struct TickTimer {
    generation: u64,
    armed: Option<TimerHandle>,
    /// Real time accumulated toward the next tick (seconds)
    accumulator: f64,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any live handle and arm a fresh one
    pub fn arm(&mut self) -> TimerHandle {
        self.cancel();
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.armed = Some(handle);
        handle
    }

    /// Cancel the live handle. Safe to call repeatedly.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.accumulator = 0.0;
        self.armed.take()
    }

    pub fn armed(&self) -> Option<TimerHandle> {
        self.armed
    }

    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.armed == Some(handle)
    }

    /// Feed elapsed real time; returns how many ticks are due.
    /// Capped to avoid a catch-up spiral after long stalls.
    pub fn advance(&mut self, elapsed_secs: f64) -> u32 {
        if self.armed.is_none() || elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
            return 0;
        }
        // Tolerate float drift so ten 0.01s steps still produce a tick
        const EPSILON: f64 = 1e-9;

        self.accumulator += elapsed_secs;
        let mut due = 0;
        while self.accumulator + EPSILON >= TICK_DT && due < MAX_CATCH_UP_TICKS {
            self.accumulator -= TICK_DT;
            due += 1;
        }
        if due == MAX_CATCH_UP_TICKS {
            self.accumulator = self.accumulator.clamp(0.0, TICK_DT);
        }
        self.accumulator = self.accumulator.max(0.0);
        due
    }
}

/// Outcome of one countdown step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Running,
    /// The step would have reached zero; the countdown was reset
    Expired,
}

/// Per-row countdown, tracked in whole tenths of a second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    left_tenths: u32,
    max_tenths: u32,
}

impl Countdown {
    pub fn new(max_tenths: u32) -> Self {
        Self {
            left_tenths: max_tenths,
            max_tenths,
        }
    }

    /// Remove one tenth. If that would reach zero, refill instead.
    pub fn step(&mut self) -> CountdownStep {
        if self.left_tenths <= 1 {
            self.reset();
            CountdownStep::Expired
        } else {
            self.left_tenths -= 1;
            CountdownStep::Running
        }
    }

    pub fn reset(&mut self) {
        self.left_tenths = self.max_tenths;
    }

    /// Change the full duration without touching the time left
    pub fn set_max(&mut self, max_tenths: u32) {
        self.max_tenths = max_tenths;
    }

    pub fn left_tenths(&self) -> u32 {
        self.left_tenths
    }

    pub fn max_tenths(&self) -> u32 {
        self.max_tenths
    }

    pub fn time_left(&self) -> f32 {
        tenths_to_secs(self.left_tenths)
    }

    pub fn max_time(&self) -> f32 {
        tenths_to_secs(self.max_tenths)
    }

    /// Remaining fraction in [0, 1], for countdown bars
    pub fn fraction(&self) -> f32 {
        if self.max_tenths == 0 {
            0.0
        } else {
            (self.left_tenths as f32 / self.max_tenths as f32).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_cancels_previous_handle() {
        let mut timer = TickTimer::new();
        let first = timer.arm();
        let second = timer.arm();
        assert_ne!(first, second);
        assert!(!timer.is_current(first));
        assert!(timer.is_current(second));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = TickTimer::new();
        let handle = timer.arm();
        assert_eq!(timer.cancel(), Some(handle));
        assert_eq!(timer.cancel(), None);
        assert!(!timer.is_current(handle));
    }

    #[test]
    fn test_advance_accumulates_small_steps() {
        let mut timer = TickTimer::new();
        timer.arm();
        let mut due = 0;
        for _ in 0..10 {
            due += timer.advance(0.01);
        }
        assert_eq!(due, 1);
        assert_eq!(timer.advance(0.25), 2);
    }

    #[test]
    fn test_advance_caps_catch_up() {
        let mut timer = TickTimer::new();
        timer.arm();
        assert_eq!(timer.advance(60.0), MAX_CATCH_UP_TICKS);
        // Backlog is dropped, not carried over
        assert!(timer.advance(0.0) == 0);
        assert!(timer.advance(0.1) <= 2);
    }

    #[test]
    fn test_advance_inert_when_unarmed() {
        let mut timer = TickTimer::new();
        assert_eq!(timer.advance(1.0), 0);
    }

    #[test]
    fn test_countdown_expires_on_hundredth_step() {
        let mut countdown = Countdown::new(100);
        for _ in 0..99 {
            assert_eq!(countdown.step(), CountdownStep::Running);
        }
        assert_eq!(countdown.left_tenths(), 1);
        assert_eq!(countdown.step(), CountdownStep::Expired);
        assert_eq!(countdown.left_tenths(), 100);
    }

    #[test]
    fn test_countdown_set_max_keeps_time_left() {
        let mut countdown = Countdown::new(100);
        countdown.step();
        countdown.set_max(95);
        assert_eq!(countdown.left_tenths(), 99);
        assert!((countdown.max_time() - 9.5).abs() < 0.0001);
        countdown.reset();
        assert_eq!(countdown.left_tenths(), 95);
        assert!((countdown.fraction() - 1.0).abs() < 0.0001);
    }
}
