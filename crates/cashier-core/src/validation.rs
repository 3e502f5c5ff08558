//! # Validation Module
//!
//! Change validation plus the field validators that guard configuration
//! and tray input.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Config / front end payloads                                  │
//! │  ├── validate_level, validate_tray_count, validate_fractional_units    │
//! │  └── Reject bad input at the mutation boundary                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Game rule                                                    │
//! │  └── validate_change: tray total == amount due, to the cent            │
//! │                                                                         │
//! │  Layer 2 assumes Layer 1 held: it never sees negative counts.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashier_core::{AmountDue, CashTray, Denomination};
//! use cashier_core::validation::validate_change;
//!
//! let due = AmountDue::new(37, 0).unwrap();
//! let tray = CashTray::from_counts([
//!     (Denomination::Twenty, 1),
//!     (Denomination::Ten, 1),
//!     (Denomination::Five, 1),
//!     (Denomination::Two, 1),
//! ]).unwrap();
//!
//! assert!(validate_change(&tray, &due));
//! ```

use crate::amount::AmountDue;
use crate::error::ValidationError;
use crate::level::Level;
use crate::tray::CashTray;
use crate::types::Outcome;
use crate::{MAX_BASE_AMOUNT, MAX_LIVES, MAX_TIME_LIMIT_SECS, MAX_TRAY_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Change Validation
// =============================================================================

/// Checks whether the tray is exactly the amount due.
///
/// ## Rules
/// - Both sides are compared as integer cents
/// - No partial credit: $36.90 against $37.00 is simply wrong
/// - Pure: the same tray and amount always give the same answer
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Due: $37.00                                                            │
/// │                                                                         │
/// │  Tray: $20 + $10 + $5 + $2 = 3700¢ ──► validate_change ──► true        │
/// │  Tray: $20 + $10 + $5 + $1 + 50¢ = 3650¢ ──────────────► false        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_change(tray: &CashTray, due: &AmountDue) -> bool {
    tray.total() == due.total()
}

/// Maps a submission to its per-customer outcome.
pub fn check_change(tray: &CashTray, due: &AmountDue) -> Outcome {
    if validate_change(tray, due) {
        Outcome::Success
    } else {
        Outcome::Error
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a tray count coming from untrusted input.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_TRAY_COUNT
///
/// ## Example
/// ```rust
/// use cashier_core::validation::validate_tray_count;
///
/// assert_eq!(validate_tray_count(3).unwrap(), 3);
/// assert!(validate_tray_count(-1).is_err());
/// ```
pub fn validate_tray_count(count: i64) -> ValidationResult<u32> {
    if count < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "count".to_string(),
        });
    }

    if count > i64::from(MAX_TRAY_COUNT) {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 0,
            max: i64::from(MAX_TRAY_COUNT),
        });
    }

    u32::try_from(count).map_err(|_| ValidationError::InvalidFormat {
        field: "count".to_string(),
        reason: "does not fit in u32".to_string(),
    })
}

/// Validates the cents part of an amount (0-99).
pub fn validate_fractional_units(cents: u32) -> ValidationResult<u8> {
    if cents > 99 {
        return Err(ValidationError::OutOfRange {
            field: "fractional_units".to_string(),
            min: 0,
            max: 99,
        });
    }

    u8::try_from(cents).map_err(|_| ValidationError::InvalidFormat {
        field: "fractional_units".to_string(),
        reason: "does not fit in u8".to_string(),
    })
}

/// Validates a level definition.
///
/// ## Rules
/// - `multiplier` between 0 and MAX_BASE_AMOUNT (a larger multiple would
///   round every amount to zero)
/// - `time_limit_secs` between 1 and MAX_TIME_LIMIT_SECS
/// - `starting_lives` between 1 and MAX_LIVES
pub fn validate_level(level: &Level) -> ValidationResult<()> {
    if level.multiplier > MAX_BASE_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: "multiplier".to_string(),
            min: 0,
            max: i64::from(MAX_BASE_AMOUNT),
        });
    }

    if level.time_limit_secs == 0 {
        return Err(ValidationError::MustBePositive {
            field: "time_limit_secs".to_string(),
        });
    }

    if level.time_limit_secs > MAX_TIME_LIMIT_SECS {
        return Err(ValidationError::OutOfRange {
            field: "time_limit_secs".to_string(),
            min: 1,
            max: i64::from(MAX_TIME_LIMIT_SECS),
        });
    }

    if level.starting_lives == 0 {
        return Err(ValidationError::MustBePositive {
            field: "starting_lives".to_string(),
        });
    }

    if level.starting_lives > MAX_LIVES {
        return Err(ValidationError::OutOfRange {
            field: "starting_lives".to_string(),
            min: 1,
            max: i64::from(MAX_LIVES),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
