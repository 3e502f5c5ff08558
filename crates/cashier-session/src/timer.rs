//! # Timer Controller
//!
//! Owns the scheduled tick task that drives a session's [`Countdown`].
//!
//! ## Cadence
//! ```text
//!   arm(now)            take_due(t)         take_due(t')
//!      │                    │                    │
//!      ▼                    ▼                    ▼
//!  ────┼─────────┼─────────┼─────────┼─────────┼──────► time
//!      t0     t0+1s     t0+2s     t0+3s     t0+4s
//!             └────┬────┘                 └─┬─┘
//!             2 ticks due                1 tick due
//! ```
//!
//! Ticks are counted, not accumulated: whoever asks first (the ticker task
//! or a settlement) consumes every tick whose instant has passed, so a
//! sleeping task that wakes late still applies the missed seconds in one
//! burst.
//!
//! ## Cancellation
//! Every `arm`/`disarm` bumps the epoch and aborts the previous task. A task
//! that wakes with an old epoch exits without touching the session.
//!
//! [`Countdown`]: cashier_core::Countdown

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug)]
pub struct TimerController {
    interval: Duration,
    epoch: u64,
    next_tick_at: Option<Instant>,
    handle: Option<JoinHandle<()>>,
}

impl TimerController {
    pub fn new(interval: Duration) -> Self {
        TimerController {
            interval,
            epoch: 0,
            next_tick_at: None,
            handle: None,
        }
    }

    /// Starts a fresh cadence from `now`, cancelling any previous task.
    ///
    /// Returns the epoch the new ticker task must carry.
    pub fn arm(&mut self, now: Instant) -> u64 {
        self.cancel_task();
        self.epoch += 1;
        self.next_tick_at = Some(now + self.interval);
        self.epoch
    }

    /// Hands over the task spawned for the current epoch.
    pub fn attach(&mut self, handle: JoinHandle<()>) {
        self.cancel_task();
        self.handle = Some(handle);
    }

    /// Stops ticking and cancels the task.
    pub fn disarm(&mut self) {
        self.cancel_task();
        self.epoch += 1;
        self.next_tick_at = None;
    }

    /// Forgets the task handle without aborting it.
    ///
    /// Used by the ticker itself before it ends the session, so the rest of
    /// its work is not cancelled from under it.
    pub fn detach(&mut self) {
        self.handle = None;
    }

    /// Consumes and counts every tick scheduled at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> u32 {
        let Some(next) = self.next_tick_at else {
            return 0;
        };
        if now < next {
            return 0;
        }

        let behind = now.duration_since(next).as_nanos() / self.interval.as_nanos().max(1);
        let due = u32::try_from(behind).unwrap_or(u32::MAX - 1) + 1;
        self.next_tick_at = Some(next + self.interval * due);
        due
    }

    pub fn next_tick_at(&self) -> Option<Instant> {
        self.next_tick_at
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch && self.next_tick_at.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick_at.is_some()
    }

    fn cancel_task(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.cancel_task();
    }
}
