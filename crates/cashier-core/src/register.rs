//! # Register Readout
//!
//! What the till display shows for the current customer.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  RECEIVED         $100.00    │
//! │  TOTAL             $63.00    │
//! │  CHANGE            $37.00    │   ← "ERROR!" on a broken register
//! └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::AmountDue;
use crate::level::Level;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterReadout {
    /// What the customer handed over.
    pub received: Money,

    /// Price of the purchase.
    pub purchase_total: Money,

    /// Change due, or `None` when the register is broken.
    pub change: Option<Money>,
}

impl RegisterReadout {
    /// Builds the readout for `due` on `level`.
    ///
    /// The purchase total is derived from the tender, so it never goes below
    /// zero even if the amount due exceeds the tender.
    pub fn compute(due: &AmountDue, tender: Money, level: &Level) -> Self {
        let change = due.total();
        RegisterReadout {
            received: tender,
            purchase_total: (tender - change).clamp_non_negative(),
            change: level.register_functional.then_some(change),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.change.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TENDER_CENTS;

    #[test]
    fn test_working_register() {
        let level = Level::new(1, 60, 3, true).unwrap();
        let due = AmountDue::new(37, 0).unwrap();
        let readout = RegisterReadout::compute(&due, Money::from_cents(DEFAULT_TENDER_CENTS), &level);

        assert_eq!(readout.received.to_string(), "$100.00");
        assert_eq!(readout.purchase_total.to_string(), "$63.00");
        assert_eq!(readout.change, Some(Money::from_cents(3700)));
    }

    #[test]
    fn test_broken_register_hides_change() {
        let level = Level::new(0, 60, 3, false).unwrap();
        let due = AmountDue::new(12, 40).unwrap();
        let readout = RegisterReadout::compute(&due, Money::from_cents(DEFAULT_TENDER_CENTS), &level);

        assert!(readout.is_broken());
        assert_eq!(readout.purchase_total.cents(), 8760);
    }

    #[test]
    fn test_total_clamps_at_zero() {
        let level = Level::new(1, 60, 3, true).unwrap();
        let due = AmountDue::new(100, 0).unwrap();
        let readout = RegisterReadout::compute(&due, Money::from_cents(5000), &level);
        assert_eq!(readout.purchase_total, Money::zero());
    }
}
