//! # Error Types
//!
//! Domain-specific error types for cashier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashier-core errors (this file)                                       │
//! │  ├── CoreError        - Game rule / session phase violations           │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  cashier-session errors (separate crate)                               │
//! │  └── SessionError     - Host, config and runtime failures              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → CliError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (denomination, phase, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::denomination::Denomination;
use crate::types::SessionPhase;

// =============================================================================
// Core Error
// =============================================================================

/// Core game rule errors.
///
/// None of these change session state: an operation that fails leaves the
/// session exactly as it was.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The operation is not allowed in the current session phase.
    ///
    /// ## When This Occurs
    /// - Staging cash before `start()`
    /// - Calling `start()` on a session that is already active
    #[error("Cannot {operation} while the session is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: SessionPhase,
    },

    /// The session already recorded its terminal result.
    #[error("Session has already ended")]
    SessionEnded,

    /// A submission is waiting out its feedback window.
    ///
    /// ## User Workflow
    /// ```text
    /// submit() ──► verdict shown ──► [500ms window] ──► settle()
    ///                                     │
    ///                     submit() again ─┘
    ///                                     │
    ///                                     ▼
    ///                            SettlementPending
    /// ```
    #[error("A submission is still being settled")]
    SettlementPending,

    /// Tried to take a note or coin out of an empty slot.
    #[error("No {0} in the tray to remove")]
    EmptyDenomination(Denomination),

    /// A tray slot is full.
    #[error("Cannot hold more than {max} of {denomination}")]
    TrayLimit {
        denomination: Denomination,
        max: u32,
    },

    /// Input does not name a known denomination.
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(String),

    /// A level table needs at least one level.
    #[error("Level table must contain at least one level")]
    EmptyLevelTable,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when configuration or player input doesn't meet
/// requirements. Used for early validation before game rules run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
