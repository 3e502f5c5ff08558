//! # Domain Types
//!
//! Core session types shared by every module.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SessionState   │   │    Outcome      │   │  SessionPhase   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cash           │   │  Success        │   │  NotStarted     │       │
//! │  │  customer_index │   │  Error          │   │  Active         │       │
//! │  │  remaining_lives│   │  Timeout        │   │  Ended          │       │
//! │  │  score          │   └─────────────────┘   └─────────────────┘       │
//! │  │  level_index    │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐                              │
//! │                        │ GameOverSummary │                              │
//! │                        │  outcome, score │                              │
//! │                        │  message        │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::level::LevelTable;
use crate::tray::CashTray;

// =============================================================================
// Outcome
// =============================================================================

/// Result of one customer transaction, or the terminal result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Error,
    Timeout,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Error => write!(f, "error"),
            Outcome::Timeout => write!(f, "timeout"),
        }
    }
}

// =============================================================================
// Session Phase
// =============================================================================

/// Top-level lifecycle of a session.
///
/// ```text
/// NotStarted ──start()──► Active ──terminal result──► Ended
///     ▲                                                 │
///     └──────────────────────reset()────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Active,
    Ended,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "not_started"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Ended => write!(f, "ended"),
        }
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Mutable per-session state.
///
/// Only the session machine writes to it; everything else reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionState {
    /// The player's staged change.
    pub cash: CashTray,

    /// Current customer within the level (1-4).
    pub customer_index: u8,

    /// Lives left; never below zero.
    pub remaining_lives: u32,

    /// Points earned so far.
    pub score: u32,

    /// Index into the level table. Equals the table length once every
    /// level has been cleared.
    pub level_index: usize,
}

impl SessionState {
    /// Fresh state on the first level.
    pub fn initial(levels: &LevelTable) -> Self {
        SessionState {
            cash: CashTray::new(),
            customer_index: 1,
            remaining_lives: levels.first().starting_lives,
            score: 0,
            level_index: 0,
        }
    }
}

// =============================================================================
// Game Over Summary
// =============================================================================

/// What the game-over screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameOverSummary {
    pub outcome: Outcome,
    pub score: u32,
    pub level_index: usize,
    pub message: String,
}

impl GameOverSummary {
    pub fn new(outcome: Outcome, score: u32, level_index: usize) -> Self {
        let message = match outcome {
            Outcome::Error => "You ran out of lives!",
            Outcome::Timeout => "You ran out of time!",
            Outcome::Success => "You completed all levels, well done!",
        };

        GameOverSummary {
            outcome,
            score,
            level_index,
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
