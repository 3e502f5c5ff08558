//! # Level Progression
//!
//! Moves a served session to its next customer, next level, or the end.
//!
//! ```text
//!  customer 1 ─► 2 ─► 3 ─► 4 ──┬──► level + 1, customer 1   (LevelAdvanced)
//!                              │
//!                              └──► past the last level     (GameComplete)
//! ```
//!
//! The tray is cleared in the same call, so no staged cash survives into
//! the next customer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::level::LevelTable;
use crate::types::SessionState;
use crate::CUSTOMERS_PER_LEVEL;

/// Where the session went after a served customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progress {
    NextCustomer { customer_index: u8 },
    LevelAdvanced { level_index: usize },
    GameComplete,
}

/// Advances after a successful transaction.
pub fn advance(state: &mut SessionState, levels: &LevelTable) -> Progress {
    state.cash.clear();

    if state.customer_index < CUSTOMERS_PER_LEVEL {
        state.customer_index += 1;
        return Progress::NextCustomer {
            customer_index: state.customer_index,
        };
    }

    state.customer_index = 1;
    state.level_index += 1;

    if levels.is_beyond_last(state.level_index) {
        Progress::GameComplete
    } else {
        Progress::LevelAdvanced {
            level_index: state.level_index,
        }
    }
}
