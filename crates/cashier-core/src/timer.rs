//! # Countdown
//!
//! The pure state machine behind the level timer. It never reads a clock:
//! the runtime calls [`Countdown::tick`] once per second, or
//! [`Countdown::elapse`] with several seconds when ticks were missed.
//!
//! ```text
//!            start / reset                 remaining hits 0
//!   Idle ─────────────────────► Running ───────────────────────► Expired
//!    ▲  ◄──────── stop ────────   │  ▲                              │
//!    │                            │  └──────── reset ───────────────┤
//!    └───────────────────── stop ─┴─────────────────────────────────┘
//! ```
//!
//! Expiry is reported exactly once; ticks on an expired or idle countdown
//! are inert.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Countdown lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Expired,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running with this many seconds left.
    Ticked { remaining_secs: u32 },
    /// Reached zero on this tick. Reported once.
    Expired,
    /// Not running; nothing changed.
    Inert,
}

/// Per-level countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    state: TimerState,
    remaining_secs: u32,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Idle`/`Expired` → `Running`. A running countdown is left alone.
    ///
    /// Returns true if the countdown was (re)started.
    pub fn start(&mut self, limit_secs: u32) -> bool {
        if self.state == TimerState::Running {
            return false;
        }
        self.reset(limit_secs);
        true
    }

    /// Forces `Running` with a fresh limit, whatever the current state.
    pub fn reset(&mut self, limit_secs: u32) {
        self.state = TimerState::Running;
        self.remaining_secs = limit_secs;
    }

    /// Forces `Idle`.
    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
    }

    /// One second passes.
    pub fn tick(&mut self) -> TickOutcome {
        self.elapse(1)
    }

    /// `secs` seconds pass at once. Remaining time saturates at zero.
    pub fn elapse(&mut self, secs: u32) -> TickOutcome {
        if self.state != TimerState::Running || secs == 0 {
            return TickOutcome::Inert;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(secs);
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            return TickOutcome::Expired;
        }

        TickOutcome::Ticked {
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_expiry_once() {
        let mut c = Countdown::new();
        assert!(c.start(3));
        assert_eq!(c.tick(), TickOutcome::Ticked { remaining_secs: 2 });
        assert_eq!(c.tick(), TickOutcome::Ticked { remaining_secs: 1 });
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert!(c.is_expired());

        // Idempotent expiry.
        assert_eq!(c.tick(), TickOutcome::Inert);
        assert_eq!(c.tick(), TickOutcome::Inert);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn test_idle_ticks_are_inert() {
        let mut c = Countdown::new();
        assert_eq!(c.tick(), TickOutcome::Inert);
        assert_eq!(c.state(), TimerState::Idle);
    }

    #[test]
    fn test_start_does_not_interrupt_running() {
        let mut c = Countdown::new();
        c.start(10);
        c.tick();
        assert!(!c.start(60));
        assert_eq!(c.remaining_secs(), 9);
    }

    #[test]
    fn test_start_after_expiry() {
        let mut c = Countdown::new();
        c.start(1);
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert!(c.start(5));
        assert_eq!(c.remaining_secs(), 5);
        assert!(c.is_running());
    }

    #[test]
    fn test_reset_forces_running() {
        let mut c = Countdown::new();
        c.start(10);
        c.tick();
        c.reset(60);
        assert_eq!(c.remaining_secs(), 60);
        assert!(c.is_running());
    }

    #[test]
    fn test_stop_prevents_expiry() {
        let mut c = Countdown::new();
        c.start(1);
        c.stop();
        assert_eq!(c.tick(), TickOutcome::Inert);
        assert_eq!(c.state(), TimerState::Idle);
    }

    #[test]
    fn test_missed_ticks_clamp_at_zero() {
        let mut c = Countdown::new();
        c.start(5);
        assert_eq!(c.elapse(2), TickOutcome::Ticked { remaining_secs: 3 });
        assert_eq!(c.elapse(40), TickOutcome::Expired);
        assert_eq!(c.remaining_secs(), 0);
        assert_eq!(c.elapse(1), TickOutcome::Inert);
    }
}
