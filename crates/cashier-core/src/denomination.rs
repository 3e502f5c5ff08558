//! # Denominations
//!
//! The notes and coins the player can put in the tray.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHOLE-UNIT (notes)          │  FRACTIONAL (coins)                      │
//! │  $20  $10  $5  $2  $1        │  $0.50  $0.20  $0.10                     │
//! │  2000 1000 500 200 100 ¢     │  50     20     10 ¢                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Face values are integer cents; see [`crate::money`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

/// Whether a denomination is a whole-unit note or a fractional coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominationKind {
    Whole,
    Fractional,
}

/// A single currency denomination.
///
/// Variants are declared largest first, so the derived `Ord` sorts a tray
/// from $20 down to $0.10.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum Denomination {
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "0.5")]
    FiftyCents,
    #[serde(rename = "0.2")]
    TwentyCents,
    #[serde(rename = "0.1")]
    TenCents,
}

impl Denomination {
    /// Whole-unit denominations, largest first.
    pub const WHOLE: [Denomination; 5] = [
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
        Denomination::Two,
        Denomination::One,
    ];

    /// Fractional denominations, largest first.
    pub const FRACTIONAL: [Denomination; 3] = [
        Denomination::FiftyCents,
        Denomination::TwentyCents,
        Denomination::TenCents,
    ];

    /// Every denomination, largest first.
    pub const ALL: [Denomination; 8] = [
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
        Denomination::Two,
        Denomination::One,
        Denomination::FiftyCents,
        Denomination::TwentyCents,
        Denomination::TenCents,
    ];

    /// Face value in cents.
    pub const fn face_value(self) -> Money {
        Money::from_cents(match self {
            Denomination::Twenty => 2000,
            Denomination::Ten => 1000,
            Denomination::Five => 500,
            Denomination::Two => 200,
            Denomination::One => 100,
            Denomination::FiftyCents => 50,
            Denomination::TwentyCents => 20,
            Denomination::TenCents => 10,
        })
    }

    pub const fn kind(self) -> DenominationKind {
        match self {
            Denomination::Twenty
            | Denomination::Ten
            | Denomination::Five
            | Denomination::Two
            | Denomination::One => DenominationKind::Whole,
            Denomination::FiftyCents | Denomination::TwentyCents | Denomination::TenCents => {
                DenominationKind::Fractional
            }
        }
    }

    /// Short label as typed by the player ("20", "0.5").
    pub const fn label(self) -> &'static str {
        match self {
            Denomination::Twenty => "20",
            Denomination::Ten => "10",
            Denomination::Five => "5",
            Denomination::Two => "2",
            Denomination::One => "1",
            Denomination::FiftyCents => "0.5",
            Denomination::TwentyCents => "0.2",
            Denomination::TenCents => "0.1",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face_value())
    }
}

/// Parses player input such as `20`, `$20`, `0.5`, `.50` or `50c`.
impl FromStr for Denomination {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let normalized = raw.trim_start_matches('$').to_lowercase();

        let parsed = match normalized.as_str() {
            "20" | "20.00" => Denomination::Twenty,
            "10" | "10.00" => Denomination::Ten,
            "5" | "5.00" => Denomination::Five,
            "2" | "2.00" => Denomination::Two,
            "1" | "1.00" => Denomination::One,
            "0.5" | ".5" | "0.50" | ".50" | "50c" => Denomination::FiftyCents,
            "0.2" | ".2" | "0.20" | ".20" | "20c" => Denomination::TwentyCents,
            "0.1" | ".1" | "0.10" | ".10" | "10c" => Denomination::TenCents,
            _ => return Err(CoreError::UnknownDenomination(raw.to_string())),
        };

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_are_disjoint_and_complete() {
        for d in Denomination::WHOLE {
            assert_eq!(d.kind(), DenominationKind::Whole);
            assert!(!Denomination::FRACTIONAL.contains(&d));
        }
        for d in Denomination::FRACTIONAL {
            assert_eq!(d.kind(), DenominationKind::Fractional);
        }
        assert_eq!(
            Denomination::WHOLE.len() + Denomination::FRACTIONAL.len(),
            Denomination::ALL.len()
        );
    }

    #[test]
    fn test_face_values_unique_and_descending() {
        let values: Vec<i64> = Denomination::ALL
            .iter()
            .map(|d| d.face_value().cents())
            .collect();
        assert_eq!(values, vec![2000, 1000, 500, 200, 100, 50, 20, 10]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("20".parse::<Denomination>().unwrap(), Denomination::Twenty);
        assert_eq!("$5".parse::<Denomination>().unwrap(), Denomination::Five);
        assert_eq!(" .5 ".parse::<Denomination>().unwrap(), Denomination::FiftyCents);
        assert_eq!("0.20".parse::<Denomination>().unwrap(), Denomination::TwentyCents);
        assert_eq!("10C".parse::<Denomination>().unwrap(), Denomination::TenCents);
        assert!(matches!(
            "3".parse::<Denomination>(),
            Err(CoreError::UnknownDenomination(_))
        ));
    }

    #[test]
    fn test_label_round_trips_through_parse() {
        for d in Denomination::ALL {
            assert_eq!(d.label().parse::<Denomination>().unwrap(), d);
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Denomination::FiftyCents).unwrap();
        assert_eq!(json, "\"0.5\"");
    }
}
