//! # Game Session
//!
//! The synchronous session state machine. It owns [`SessionState`] and is
//! the only thing that mutates it; the async runtime wraps it in a lock and
//! feeds it ticks, submissions and settlements.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NotStarted ──start()──► Active ──────────────────────────► Ended      │
//! │       ▲                    │  ▲                                │        │
//! │       │       submit() ────┘  │ settle(ticket)                 │        │
//! │       │          │            │   ├─ score / lose a life       │        │
//! │       │          ▼            │   ├─ next customer / level     │        │
//! │       │     [pending]─────────┘   └─ out of lives / all levels─┤        │
//! │       │                                                        │        │
//! │       │         countdown hits 0 ─────── timeout ──────────────┤        │
//! │       │                                                        │        │
//! │       └───────────────────────── reset() ──────────────────────┘        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settlement
//! `submit` only judges the tray and buffers the verdict under a ticket.
//! The verdict is applied later by `settle(ticket)`. A ticket is good for
//! exactly one settlement and is invalidated by `reset()` or by the session
//! ending, so a late settlement can never touch a newer session.
//!
//! ## Example
//! ```rust
//! use cashier_core::session::{GameSession, Settlement};
//! use cashier_core::{LevelTable, Money, Outcome};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let mut session = GameSession::new(LevelTable::standard(), Money::from_cents(10_000));
//! session.start(&mut rng).unwrap();
//!
//! let pending = session.submit_staged().unwrap();
//! match session.settle(pending.ticket, &mut rng) {
//!     Settlement::Applied(report) => assert_eq!(report.outcome, pending.outcome),
//!     Settlement::Stale => unreachable!(),
//! }
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::{self, AmountDue};
use crate::denomination::Denomination;
use crate::error::{CoreError, CoreResult};
use crate::level::{Level, LevelTable};
use crate::money::Money;
use crate::progression::{self, Progress};
use crate::register::RegisterReadout;
use crate::scoring::{self, LifeEffect};
use crate::timer::{Countdown, TickOutcome, TimerState};
use crate::tray::CashTray;
use crate::types::{GameOverSummary, Outcome, SessionPhase, SessionState};
use crate::validation::check_change;

// =============================================================================
// Settlement Types
// =============================================================================

/// A judged submission waiting out its feedback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingSettlement {
    pub ticket: u64,
    pub outcome: Outcome,
}

/// What a settlement changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReport {
    pub outcome: Outcome,
    pub effect: LifeEffect,
    /// Only set for successful transactions.
    pub progress: Option<Progress>,
    /// Set when this settlement ended the session.
    pub ended: Option<GameOverSummary>,
}

/// Result of [`GameSession::settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Applied(SettlementReport),
    /// The ticket no longer matches anything: the session was reset, ended,
    /// or already settled it.
    Stale,
}

/// Result of letting time pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockEffect {
    /// The countdown is not running.
    Inert,
    Remaining { remaining_secs: u32 },
    /// The countdown hit zero and ended the session.
    TimedOut(GameOverSummary),
}

// =============================================================================
// Snapshot
// =============================================================================

/// Owned, read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub state: SessionState,
    pub amount_due: Option<AmountDue>,
    pub remaining_secs: u32,
    pub timer: TimerState,
    pub level: Option<Level>,
    pub register: Option<RegisterReadout>,
    pub settlement_pending: bool,
    pub terminal: Option<Outcome>,
}

// =============================================================================
// Game Session
// =============================================================================

#[derive(Debug, Clone)]
pub struct GameSession {
    levels: LevelTable,
    tender: Money,
    phase: SessionPhase,
    state: SessionState,
    due: Option<AmountDue>,
    countdown: Countdown,
    pending: Option<PendingSettlement>,
    next_ticket: u64,
    terminal: Option<Outcome>,
}

impl GameSession {
    pub fn new(levels: LevelTable, tender: Money) -> Self {
        let state = SessionState::initial(&levels);
        GameSession {
            levels,
            tender,
            phase: SessionPhase::NotStarted,
            state,
            due: None,
            countdown: Countdown::new(),
            pending: None,
            next_ticket: 1,
            terminal: None,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// `NotStarted → Active`: first level, fresh lives, first customer,
    /// countdown running.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CoreResult<()> {
        if self.phase != SessionPhase::NotStarted {
            return Err(CoreError::InvalidPhase {
                operation: "start",
                phase: self.phase,
            });
        }

        self.state = SessionState::initial(&self.levels);
        let level = *self.levels.first();
        self.due = Some(amount::generate(&level, rng));
        self.countdown.reset(level.time_limit_secs);
        self.pending = None;
        self.terminal = None;
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// Any phase `→ NotStarted`. Discards state, stops the countdown and
    /// voids any pending settlement.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::NotStarted;
        self.state = SessionState::initial(&self.levels);
        self.due = None;
        self.countdown.stop();
        self.pending = None;
        self.terminal = None;
    }

    // -------------------------------------------------------------------------
    // Staging
    // -------------------------------------------------------------------------

    /// Adds one note or coin to the tray. Returns the new count.
    pub fn stage(&mut self, denomination: Denomination) -> CoreResult<u32> {
        self.ensure_mutable("stage cash")?;
        self.state.cash.add(denomination)
    }

    /// Adds `count` of the same note or coin, all or none. Returns the new
    /// count.
    pub fn stage_many(&mut self, denomination: Denomination, count: u32) -> CoreResult<u32> {
        self.ensure_mutable("stage cash")?;
        self.state.cash.add_many(denomination, count)
    }

    /// Takes one note or coin back out of the tray. Returns the new count.
    pub fn unstage(&mut self, denomination: Denomination) -> CoreResult<u32> {
        self.ensure_mutable("unstage cash")?;
        self.state.cash.remove(denomination)
    }

    pub fn clear_tray(&mut self) -> CoreResult<()> {
        self.ensure_mutable("clear the tray")?;
        self.state.cash.clear();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Submission & Settlement
    // -------------------------------------------------------------------------

    /// Judges `tray` against the amount due and buffers the verdict.
    ///
    /// Nothing but the displayed tray changes until [`settle`](Self::settle)
    /// runs with the returned ticket.
    pub fn submit(&mut self, tray: CashTray) -> CoreResult<PendingSettlement> {
        self.ensure_mutable("submit")?;
        let due = self.due.ok_or(CoreError::InvalidPhase {
            operation: "submit",
            phase: self.phase,
        })?;

        let pending = PendingSettlement {
            ticket: self.next_ticket,
            outcome: check_change(&tray, &due),
        };
        self.next_ticket += 1;
        self.state.cash = tray;
        self.pending = Some(pending);
        Ok(pending)
    }

    /// Submits whatever is currently staged.
    pub fn submit_staged(&mut self) -> CoreResult<PendingSettlement> {
        let tray = self.state.cash.clone();
        self.submit(tray)
    }

    /// Applies the buffered verdict for `ticket`.
    ///
    /// ## Order
    /// 1. lives / score
    /// 2. tray cleared
    /// 3. on success: next customer, next level (countdown reset) or game
    ///    complete
    ///
    /// A failed customer keeps the same amount due.
    pub fn settle<R: Rng + ?Sized>(&mut self, ticket: u64, rng: &mut R) -> Settlement {
        if self.phase != SessionPhase::Active {
            return Settlement::Stale;
        }
        let pending = match self.pending {
            Some(p) if p.ticket == ticket => p,
            _ => return Settlement::Stale,
        };
        self.pending = None;

        let effect = scoring::apply_result(&mut self.state, pending.outcome);
        let mut report = SettlementReport {
            outcome: pending.outcome,
            effect,
            progress: None,
            ended: None,
        };

        match effect {
            LifeEffect::Terminate { outcome } => {
                self.state.cash.clear();
                report.ended = Some(self.end(outcome));
            }
            LifeEffect::LifeLost { .. } => {
                self.state.cash.clear();
            }
            LifeEffect::Scored { .. } => {
                let progress = progression::advance(&mut self.state, &self.levels);
                match progress {
                    Progress::NextCustomer { .. } => {
                        self.next_customer(rng);
                    }
                    Progress::LevelAdvanced { .. } => {
                        self.next_customer(rng);
                        if let Some(limit) = self.current_level().map(|l| l.time_limit_secs) {
                            self.countdown.reset(limit);
                        }
                    }
                    Progress::GameComplete => {
                        report.ended = Some(self.end(Outcome::Success));
                    }
                }
                report.progress = Some(progress);
            }
        }

        Settlement::Applied(report)
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// One second passes.
    pub fn tick(&mut self) -> ClockEffect {
        self.elapse(1)
    }

    /// Several seconds pass at once (missed ticks). The countdown clamps at
    /// zero and expiry ends the session immediately.
    pub fn elapse(&mut self, secs: u32) -> ClockEffect {
        if self.phase != SessionPhase::Active {
            return ClockEffect::Inert;
        }

        match self.countdown.elapse(secs) {
            TickOutcome::Inert => ClockEffect::Inert,
            TickOutcome::Ticked { remaining_secs } => ClockEffect::Remaining { remaining_secs },
            TickOutcome::Expired => ClockEffect::TimedOut(self.end(Outcome::Timeout)),
        }
    }

    /// Ends an active session with `timeout`, skipping any pending
    /// settlement. Does nothing once the session has ended.
    pub fn expire_timer(&mut self) -> Option<GameOverSummary> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        Some(self.end(Outcome::Timeout))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn tender(&self) -> Money {
        self.tender
    }

    pub fn amount_due(&self) -> Option<AmountDue> {
        self.due
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn timer_state(&self) -> TimerState {
        self.countdown.state()
    }

    pub fn pending_settlement(&self) -> Option<PendingSettlement> {
        self.pending
    }

    pub fn terminal_result(&self) -> Option<Outcome> {
        self.terminal
    }

    pub fn is_session_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// True once the level index has moved past the final level.
    pub fn is_game_complete(&self) -> bool {
        self.levels.is_beyond_last(self.state.level_index)
    }

    /// The level being played, `None` after the last one.
    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.state.level_index)
    }

    pub fn register_readout(&self) -> Option<RegisterReadout> {
        let due = self.due?;
        let level = self.current_level()?;
        Some(RegisterReadout::compute(&due, self.tender, level))
    }

    pub fn summary(&self) -> Option<GameOverSummary> {
        self.terminal
            .map(|outcome| GameOverSummary::new(outcome, self.state.score, self.state.level_index))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            state: self.state.clone(),
            amount_due: self.due,
            remaining_secs: self.countdown.remaining_secs(),
            timer: self.countdown.state(),
            level: self.current_level().copied(),
            register: self.register_readout(),
            settlement_pending: self.pending.is_some(),
            terminal: self.terminal,
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_mutable(&self, operation: &'static str) -> CoreResult<()> {
        match self.phase {
            SessionPhase::Active if self.pending.is_some() => Err(CoreError::SettlementPending),
            SessionPhase::Active => Ok(()),
            SessionPhase::Ended => Err(CoreError::SessionEnded),
            SessionPhase::NotStarted => Err(CoreError::InvalidPhase {
                operation,
                phase: self.phase,
            }),
        }
    }

    fn next_customer<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.due = self
            .current_level()
            .map(|level| amount::generate(level, rng));
    }

    /// Records the terminal result. Callers check the phase first, so this
    /// runs at most once per session.
    fn end(&mut self, outcome: Outcome) -> GameOverSummary {
        self.phase = SessionPhase::Ended;
        self.terminal = Some(outcome);
        self.countdown.stop();
        self.pending = None;
        GameOverSummary::new(outcome, self.state.score, self.state.level_index)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
