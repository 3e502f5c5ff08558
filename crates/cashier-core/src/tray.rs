//! # Cash Tray
//!
//! The notes and coins the player has staged as change.
//!
//! ## Tray Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Player Action            Tray Operation          Tray Change           │
//! │  ─────────────            ──────────────          ───────────           │
//! │  Click $20 in drawer ───► add(Twenty) ──────────► counts[$20] += 1      │
//! │  Click $20 in tray ─────► remove(Twenty) ───────► counts[$20] -= 1      │
//! │  Customer settled ──────► clear() ──────────────► counts = {}           │
//! │                                                                         │
//! │  Counts are u32, and `remove` on an empty slot is an error, so a       │
//! │  negative count can never be constructed.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::denomination::{Denomination, DenominationKind};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::validate_tray_count;
use crate::MAX_TRAY_COUNT;

/// Mapping from denomination to staged count.
///
/// ## Invariants
/// - Zero counts are never stored (absent key == zero), so two trays with
///   the same money are `==` regardless of how they were built
/// - No count exceeds `MAX_TRAY_COUNT`
///
/// Deserialization goes through [`CashTray::from_counts`], so a payload from
/// a front end is held to the same rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(
    try_from = "BTreeMap<Denomination, u32>",
    into = "BTreeMap<Denomination, u32>"
)]
#[ts(export)]
pub struct CashTray(BTreeMap<Denomination, u32>);

impl CashTray {
    /// Creates an empty tray.
    pub fn new() -> Self {
        CashTray(BTreeMap::new())
    }

    /// Builds a tray from `(denomination, count)` pairs.
    ///
    /// Repeated denominations are summed.
    pub fn from_counts<I>(counts: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (Denomination, u32)>,
    {
        let mut tray = CashTray::new();
        for (denomination, count) in counts {
            tray.add_many(denomination, count)?;
        }
        Ok(tray)
    }

    /// Count currently staged for a denomination.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.0.get(&denomination).copied().unwrap_or(0)
    }

    /// Adds one note or coin. Returns the new count.
    pub fn add(&mut self, denomination: Denomination) -> CoreResult<u32> {
        self.add_many(denomination, 1)
    }

    /// Adds several of the same note or coin. Returns the new count.
    pub fn add_many(&mut self, denomination: Denomination, count: u32) -> CoreResult<u32> {
        let new_count = self
            .count(denomination)
            .checked_add(count)
            .filter(|c| *c <= MAX_TRAY_COUNT)
            .ok_or(CoreError::TrayLimit {
                denomination,
                max: MAX_TRAY_COUNT,
            })?;

        if new_count > 0 {
            self.0.insert(denomination, new_count);
        }
        Ok(new_count)
    }

    /// Removes one note or coin. Returns the new count.
    pub fn remove(&mut self, denomination: Denomination) -> CoreResult<u32> {
        let current = self.count(denomination);
        if current == 0 {
            return Err(CoreError::EmptyDenomination(denomination));
        }

        let new_count = current - 1;
        if new_count == 0 {
            self.0.remove(&denomination);
        } else {
            self.0.insert(denomination, new_count);
        }
        Ok(new_count)
    }

    /// Sets a count from untrusted input (e.g. a front end payload).
    ///
    /// Negative or oversized counts are rejected here, at the mutation
    /// boundary, so validation never sees them.
    pub fn set_count(&mut self, denomination: Denomination, count: i64) -> CoreResult<()> {
        let count = validate_tray_count(count)?;
        if count == 0 {
            self.0.remove(&denomination);
        } else {
            self.0.insert(denomination, count);
        }
        Ok(())
    }

    /// Empties the tray.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of notes and coins in the tray.
    pub fn piece_count(&self) -> u32 {
        self.0.values().sum()
    }

    /// Non-zero slots, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.0.iter().map(|(d, c)| (*d, *c))
    }

    /// Sum of the whole-unit notes.
    pub fn whole_total(&self) -> Money {
        self.subtotal(DenominationKind::Whole)
    }

    /// Sum of the fractional coins.
    ///
    /// Each `count × face` term is already whole cents, which is what
    /// rounding every coin product to the cent before summing amounts to.
    pub fn fractional_total(&self) -> Money {
        self.subtotal(DenominationKind::Fractional)
    }

    /// Grand total of the tray.
    pub fn total(&self) -> Money {
        self.whole_total() + self.fractional_total()
    }

    fn subtotal(&self, kind: DenominationKind) -> Money {
        self.iter()
            .filter(|(d, _)| d.kind() == kind)
            .map(|(d, c)| d.face_value().times(i64::from(c)))
            .sum()
    }
}

impl TryFrom<BTreeMap<Denomination, u32>> for CashTray {
    type Error = CoreError;

    fn try_from(counts: BTreeMap<Denomination, u32>) -> CoreResult<Self> {
        CashTray::from_counts(counts)
    }
}

impl From<CashTray> for BTreeMap<Denomination, u32> {
    fn from(tray: CashTray) -> Self {
        tray.0
    }
}
