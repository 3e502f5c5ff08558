//! # Lives and Score
//!
//! The only code that writes `score` and `remaining_lives`.
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────────────┐
//! │ Outcome  │ Effect                                                   │
//! ├──────────┼──────────────────────────────────────────────────────────┤
//! │ success  │ score += 10                                              │
//! │ error    │ lives ≤ 1 → lives = 0, terminate(error)                  │
//! │          │ otherwise lives -= 1                                     │
//! │ timeout  │ terminate(timeout), lives untouched                      │
//! └──────────┴──────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Outcome, SessionState};
use crate::POINTS_PER_SUCCESS;

/// What applying an outcome did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifeEffect {
    /// Points awarded; the customer was served.
    Scored { score: u32 },
    /// A life was lost but the session continues.
    LifeLost { remaining_lives: u32 },
    /// The session must end with this result.
    Terminate { outcome: Outcome },
}

/// Applies a transaction outcome to lives and score.
///
/// ## Example
/// ```rust
/// use cashier_core::scoring::{apply_result, LifeEffect};
/// use cashier_core::{LevelTable, Outcome, SessionState};
///
/// let mut state = SessionState::initial(&LevelTable::standard());
/// assert_eq!(apply_result(&mut state, Outcome::Success), LifeEffect::Scored { score: 10 });
/// ```
pub fn apply_result(state: &mut SessionState, outcome: Outcome) -> LifeEffect {
    match outcome {
        Outcome::Success => {
            state.score = state.score.saturating_add(POINTS_PER_SUCCESS);
            LifeEffect::Scored { score: state.score }
        }
        Outcome::Error => {
            if state.remaining_lives <= 1 {
                state.remaining_lives = 0;
                LifeEffect::Terminate {
                    outcome: Outcome::Error,
                }
            } else {
                state.remaining_lives -= 1;
                LifeEffect::LifeLost {
                    remaining_lives: state.remaining_lives,
                }
            }
        }
        Outcome::Timeout => LifeEffect::Terminate {
            outcome: Outcome::Timeout,
        },
    }
}
