//! # Amount Due
//!
//! What each customer expects back, and how it is drawn.
//!
//! ## Generation Rule
//! ```text
//! base ← uniform [1, 100]
//!
//! multiplier ≥ 1:  whole = base - base % multiplier     cents = 0
//! multiplier = 0:  whole = base                         cents ← {0,10,…,90}
//! ```
//!
//! Rounding down can produce `whole == 0` (e.g. base 7 on a ×10 level):
//! that customer is owed nothing and the correct answer is an empty tray.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::level::Level;
use crate::money::Money;
use crate::validation::validate_fractional_units;
use crate::MAX_BASE_AMOUNT;

/// The exact change a customer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AmountDue {
    /// Whole dollars.
    pub whole_units: u32,

    /// Cents, 0-99.
    pub fractional_units: u8,
}

impl AmountDue {
    /// Creates a validated amount.
    pub fn new(whole_units: u32, fractional_units: u32) -> CoreResult<Self> {
        let fractional_units = validate_fractional_units(fractional_units)?;
        Ok(AmountDue {
            whole_units,
            fractional_units,
        })
    }

    /// The amount as integer cents.
    pub fn total(&self) -> Money {
        Money::from_major_minor(i64::from(self.whole_units), i64::from(self.fractional_units))
    }

    /// True when no coins are needed.
    pub fn is_whole(&self) -> bool {
        self.fractional_units == 0
    }
}

impl fmt::Display for AmountDue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.total())
    }
}

/// Draws the amount due for the next customer on `level`.
///
/// ## Example
/// ```rust
/// use cashier_core::amount::generate;
/// use cashier_core::level::Level;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let level = Level::new(5, 60, 3, true).unwrap();
/// let due = generate(&level, &mut StdRng::seed_from_u64(7));
/// assert_eq!(due.whole_units % 5, 0);
/// assert_eq!(due.fractional_units, 0);
/// ```
pub fn generate<R: Rng + ?Sized>(level: &Level, rng: &mut R) -> AmountDue {
    let base: u32 = rng.gen_range(1..=MAX_BASE_AMOUNT);

    if level.multiplier >= 1 {
        return AmountDue {
            whole_units: base - base % level.multiplier,
            fractional_units: 0,
        };
    }

    let tenths: u8 = rng.gen_range(0..10);
    AmountDue {
        whole_units: base,
        fractional_units: tenths * 10,
    }
}
