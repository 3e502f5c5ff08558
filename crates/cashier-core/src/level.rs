//! # Levels
//!
//! Difficulty configuration and the ordered level table.
//!
//! ## Level Knobs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  multiplier            10 → amounts like $30, $70 (no coins needed)     │
//! │                         1 → any whole amount                            │
//! │                         0 → whole amount plus 0-90 cents                │
//! │  time_limit_secs       countdown for the whole level (4 customers)      │
//! │  starting_lives        lives granted when a session starts              │
//! │  register_functional   false → register shows ERROR instead of change  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_level;

/// One difficulty level. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Level {
    /// Rounding multiple for amounts due; 0 means "include cents".
    pub multiplier: u32,

    /// Countdown for the level, in seconds.
    pub time_limit_secs: u32,

    /// Lives granted when a session starts on this level.
    pub starting_lives: u32,

    /// Whether the register displays the change due.
    #[serde(default = "default_register_functional")]
    pub register_functional: bool,
}

fn default_register_functional() -> bool {
    true
}

impl Level {
    /// Creates a validated level.
    pub fn new(
        multiplier: u32,
        time_limit_secs: u32,
        starting_lives: u32,
        register_functional: bool,
    ) -> CoreResult<Self> {
        let level = Level {
            multiplier,
            time_limit_secs,
            starting_lives,
            register_functional,
        };
        validate_level(&level)?;
        Ok(level)
    }

    /// True when amounts on this level never carry cents.
    #[inline]
    pub const fn rounds_to_whole(&self) -> bool {
        self.multiplier >= 1
    }
}

/// The fixed, ordered sequence of levels for a game.
///
/// ## Invariants
/// - Never empty
/// - Every level passed `validate_level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Level>", into = "Vec<Level>")]
pub struct LevelTable(Vec<Level>);

impl LevelTable {
    /// Builds a table, validating every level.
    pub fn new(levels: Vec<Level>) -> CoreResult<Self> {
        if levels.is_empty() {
            return Err(CoreError::EmptyLevelTable);
        }
        for level in &levels {
            validate_level(level)?;
        }
        Ok(LevelTable(levels))
    }

    /// The default five-level progression.
    ///
    /// Clean tens, then fives, then any whole amount, then cents, then cents
    /// with a broken register.
    pub fn standard() -> Self {
        LevelTable(vec![
            Level {
                multiplier: 10,
                time_limit_secs: 60,
                starting_lives: 3,
                register_functional: true,
            },
            Level {
                multiplier: 5,
                time_limit_secs: 60,
                starting_lives: 3,
                register_functional: true,
            },
            Level {
                multiplier: 1,
                time_limit_secs: 60,
                starting_lives: 3,
                register_functional: true,
            },
            Level {
                multiplier: 0,
                time_limit_secs: 90,
                starting_lives: 3,
                register_functional: true,
            },
            Level {
                multiplier: 0,
                time_limit_secs: 90,
                starting_lives: 3,
                register_functional: false,
            },
        ])
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.0.get(index)
    }

    /// The level a session starts on.
    pub fn first(&self) -> &Level {
        // Non-empty by construction.
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    /// True once `index` has moved past the final level.
    pub fn is_beyond_last(&self, index: usize) -> bool {
        index > self.last_index()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.0.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        LevelTable::standard()
    }
}

impl TryFrom<Vec<Level>> for LevelTable {
    type Error = CoreError;

    fn try_from(levels: Vec<Level>) -> Result<Self, Self::Error> {
        LevelTable::new(levels)
    }
}

impl From<LevelTable> for Vec<Level> {
    fn from(table: LevelTable) -> Self {
        table.0
    }
}
