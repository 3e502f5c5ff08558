//! # cashier-core: Pure Game Rules for Cashier Chaos
//!
//! This crate is the **heart** of Cashier Chaos. It contains every game
//! rule as plain synchronous code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cashier Chaos Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cashier-cli (terminal)                       │   │
//! │  │    add 20 ──► submit ──► status ──► restart / home              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cashier-session (tokio runtime)                 │   │
//! │  │    SessionController, TimerController, GameHost, config         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cashier-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  amount   │  │validation │  │  scoring  │  │progression│  │   │
//! │  │   │ generate  │  │  change   │  │   lives   │  │ customers │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────────────────┐ │   │
//! │  │   │   timer   │  │ register  │  │  session (GameSession)    │ │   │
//! │  │   │ Countdown │  │  readout  │  │  owns SessionState        │ │   │
//! │  │   └───────────┘  └───────────┘  └───────────────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCKS • NO ASYNC • RNG SUPPLIED BY CALLER       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer cents (no floating point!)
//! - [`denomination`] - Notes and coins the player can hand back
//! - [`tray`] - The player's staged change
//! - [`level`] - Difficulty levels and the level table
//! - [`amount`] - Amount due and its generator
//! - [`validation`] - Change validation and input validators
//! - [`timer`] - Countdown state machine
//! - [`scoring`] - Lives and score
//! - [`progression`] - Customer slots and level advancement
//! - [`register`] - Till readout
//! - [`session`] - The session state machine
//! - [`types`] - Shared domain types
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cashier_core::{AmountDue, CashTray, Denomination};
//! use cashier_core::validation::validate_change;
//!
//! let due = AmountDue::new(0, 50).unwrap();
//! let tray = CashTray::from_counts([
//!     (Denomination::TwentyCents, 2),
//!     (Denomination::TenCents, 1),
//! ]).unwrap();
//!
//! // 20¢ + 20¢ + 10¢ is exactly 50¢, compared as integers
//! assert!(validate_change(&tray, &due));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod denomination;
pub mod error;
pub mod level;
pub mod money;
pub mod progression;
pub mod register;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod tray;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::AmountDue;
pub use denomination::{Denomination, DenominationKind};
pub use error::{CoreError, CoreResult, ValidationError};
pub use level::{Level, LevelTable};
pub use money::Money;
pub use progression::Progress;
pub use register::RegisterReadout;
pub use scoring::LifeEffect;
pub use session::{
    ClockEffect, GameSession, PendingSettlement, SessionSnapshot, Settlement, SettlementReport,
};
pub use timer::{Countdown, TickOutcome, TimerState};
pub use tray::CashTray;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customers served per level.
pub const CUSTOMERS_PER_LEVEL: u8 = 4;

/// Points for each correctly served customer.
pub const POINTS_PER_SUCCESS: u32 = 10;

/// Upper bound of the base amount drawn for a customer, in whole dollars.
pub const MAX_BASE_AMOUNT: u32 = 100;

/// The note every customer pays with ($100.00).
pub const DEFAULT_TENDER_CENTS: i64 = 10_000;

/// Maximum count of a single denomination in the tray.
///
/// ## Business Reason
/// Catches runaway input (holding a key down) long before any total could
/// overflow.
pub const MAX_TRAY_COUNT: u32 = 999;

/// Longest allowed level countdown, in seconds.
pub const MAX_TIME_LIMIT_SECS: u32 = 3600;

/// Most lives a level may grant.
pub const MAX_LIVES: u32 = 99;
