//! # Terminal Rendering
//!
//! Plain-text views of the session plus the [`TerminalEmitter`] that prints
//! progress as it happens.
//!
//! ```text
//! Level 1 · Customer 2/4 · Lives 3 · Score 10 · 54s
//! ┌──────────────────────────────┐
//! │  RECEIVED          $100.00   │
//! │  TOTAL              $63.00   │
//! │  CHANGE             ERROR!   │
//! └──────────────────────────────┘
//! Tray: 1 × $20.00, 1 × $10.00 = $30.00
//! ```

use std::sync::Mutex;

use cashier_core::{
    AmountDue, CashTray, GameOverSummary, Level, LifeEffect, Money, Outcome, PendingSettlement,
    Progress, RegisterReadout, SessionPhase, SessionSnapshot, SettlementReport,
    CUSTOMERS_PER_LEVEL,
};
use cashier_session::SessionEventEmitter;

pub const TITLE: &str = "\
=== CASHIER CHAOS ===
Type 'start' to open the till, 'help' for commands.";

pub const ONBOARDING: &str = "\
How to play:
  Each customer pays with a $100 note. Give back exactly the change they
  are owed by putting notes and coins in the tray, then 'submit'.
  Four customers clear a level. A wrong tray costs a life. When the clock
  runs out, the shift is over.
  On some levels the register breaks and shows ERROR!: work the change out
  from RECEIVED and TOTAL yourself.";

// =============================================================================
// Views
// =============================================================================

/// The till display.
pub fn register(readout: &RegisterReadout) -> String {
    let change = readout
        .change
        .map(|c| c.to_string())
        .unwrap_or_else(|| "ERROR!".to_string());

    [
        "┌──────────────────────────────┐".to_string(),
        format!("│  {:<10}{:>15}   │", "RECEIVED", readout.received.to_string()),
        format!("│  {:<10}{:>15}   │", "TOTAL", readout.purchase_total.to_string()),
        format!("│  {:<10}{:>15}   │", "CHANGE", change),
        "└──────────────────────────────┘".to_string(),
    ]
    .join("\n")
}

/// One line listing the tray contents, largest first.
pub fn tray(tray: &CashTray) -> String {
    if tray.is_empty() {
        return "Tray: empty".to_string();
    }
    let pieces: Vec<String> = tray
        .iter()
        .map(|(denomination, count)| format!("{} × {}", count, denomination))
        .collect();
    format!("Tray: {} = {}", pieces.join(", "), tray.total())
}

pub fn game_over(summary: &GameOverSummary) -> String {
    // A completed game has moved past the last level.
    let (banner, reached) = match summary.outcome {
        Outcome::Success => ("*** SHIFT COMPLETE ***", "all levels".to_string()),
        Outcome::Error | Outcome::Timeout => (
            "*** GAME OVER ***",
            format!("level {}", summary.level_index + 1),
        ),
    };
    format!(
        "{}\n{}\nFinal score: {} ({})\nType 'restart' to play again or 'home' for the title screen.",
        banner, summary.message, summary.score, reached
    )
}

pub fn status(snapshot: &SessionSnapshot) -> String {
    match snapshot.phase {
        SessionPhase::NotStarted => TITLE.to_string(),
        SessionPhase::Ended => {
            let outcome = snapshot.terminal.unwrap_or(Outcome::Error);
            game_over(&GameOverSummary::new(
                outcome,
                snapshot.state.score,
                snapshot.state.level_index,
            ))
        }
        SessionPhase::Active => {
            let state = &snapshot.state;
            let mut lines = vec![format!(
                "Level {} · Customer {}/{} · Lives {} · Score {} · {}s",
                state.level_index + 1,
                state.customer_index,
                CUSTOMERS_PER_LEVEL,
                state.remaining_lives,
                state.score,
                snapshot.remaining_secs
            )];
            if let Some(readout) = &snapshot.register {
                lines.push(register(readout));
            }
            lines.push(tray(&state.cash));
            if snapshot.settlement_pending {
                lines.push("(customer is counting...)".to_string());
            }
            lines.join("\n")
        }
    }
}

pub fn verdict(pending: &PendingSettlement) -> &'static str {
    if pending.outcome.is_success() {
        "✓ Correct change!"
    } else {
        "✗ That's not right."
    }
}

pub fn settled(report: &SettlementReport) -> Option<String> {
    match (&report.effect, &report.progress) {
        (LifeEffect::LifeLost { remaining_lives }, _) => Some(format!(
            "The customer hands the tray back. Lives left: {}",
            remaining_lives
        )),
        (LifeEffect::Scored { score }, Some(Progress::LevelAdvanced { level_index })) => Some(
            format!("Level {} cleared! Score: {}", level_index, score),
        ),
        (LifeEffect::Scored { score }, _) => Some(format!("Score: {}", score)),
        (LifeEffect::Terminate { .. }, _) => None,
    }
}

// =============================================================================
// Terminal Emitter
// =============================================================================

/// Prints session progress to stdout.
///
/// Remembers the level it was last told about so a new customer can be shown
/// on the right register.
pub struct TerminalEmitter {
    tender: Money,
    level: Mutex<Option<Level>>,
}

impl TerminalEmitter {
    pub fn new(tender: Money) -> Self {
        TerminalEmitter {
            tender,
            level: Mutex::new(None),
        }
    }

    /// Whether a tick is worth a line: every ten seconds and the last five.
    fn announces(remaining_secs: u32) -> bool {
        remaining_secs <= 5 || remaining_secs % 10 == 0
    }
}

impl SessionEventEmitter for TerminalEmitter {
    fn emit_tick(&self, remaining_secs: u32) {
        if remaining_secs > 0 && Self::announces(remaining_secs) {
            println!("⏱ {}s left", remaining_secs);
        }
    }

    fn emit_verdict(&self, pending: &PendingSettlement) {
        println!("{}", verdict(pending));
    }

    fn emit_settled(&self, report: &SettlementReport) {
        if let Some(line) = settled(report) {
            println!("{}", line);
        }
    }

    fn emit_customer(&self, customer_index: u8, due: &AmountDue) {
        let level = *self.level.lock().unwrap_or_else(|e| e.into_inner());
        println!("Customer {}/{} is at the till.", customer_index, CUSTOMERS_PER_LEVEL);
        if let Some(level) = level {
            println!("{}", register(&RegisterReadout::compute(due, self.tender, &level)));
        }
    }

    fn emit_level(&self, level_index: usize, level: &Level) {
        *self.level.lock().unwrap_or_else(|e| e.into_inner()) = Some(*level);
        println!(
            "--- Level {} · {}s on the clock ---",
            level_index + 1,
            level.time_limit_secs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashier_core::{Denomination, GameSession, LevelTable, DEFAULT_TENDER_CENTS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_register_shows_change_or_error() {
        let due = AmountDue::new(37, 0).unwrap();
        let tender = Money::from_cents(DEFAULT_TENDER_CENTS);

        let working = RegisterReadout::compute(&due, tender, &Level::new(1, 60, 3, true).unwrap());
        let text = register(&working);
        assert!(text.contains("$63.00"));
        assert!(text.contains("$37.00"));

        let broken = RegisterReadout::compute(&due, tender, &Level::new(1, 60, 3, false).unwrap());
        let text = register(&broken);
        assert!(text.contains("ERROR!"));
        assert!(!text.contains("$37.00"));
    }

    #[test]
    fn test_tray_line() {
        let mut cash = CashTray::new();
        assert_eq!(tray(&cash), "Tray: empty");

        cash.add_many(Denomination::Twenty, 1).unwrap();
        cash.add_many(Denomination::FiftyCents, 2).unwrap();
        assert_eq!(tray(&cash), "Tray: 1 × $20.00, 2 × $0.50 = $21.00");
    }

    #[test]
    fn test_status_per_phase() {
        let mut session = GameSession::new(
            LevelTable::standard(),
            Money::from_cents(DEFAULT_TENDER_CENTS),
        );
        assert_eq!(status(&session.snapshot()), TITLE);

        session.start(&mut StdRng::seed_from_u64(1)).unwrap();
        let text = status(&session.snapshot());
        assert!(text.starts_with("Level 1 · Customer 1/4"));
        assert!(text.contains("Tray: empty"));

        session.expire_timer();
        assert!(status(&session.snapshot()).contains("You ran out of time!"));
    }

    #[test]
    fn test_game_over_banner() {
        let won = game_over(&GameOverSummary::new(Outcome::Success, 120, 3));
        assert!(won.starts_with("*** SHIFT COMPLETE ***"));
        assert!(won.contains("Final score: 120 (all levels)"));
        assert!(!won.contains("level 4"));

        let lost = game_over(&GameOverSummary::new(Outcome::Error, 0, 0));
        assert!(lost.contains("You ran out of lives!"));
        assert!(lost.contains("(level 1)"));
    }

    #[test]
    fn test_tick_announcements() {
        assert!(TerminalEmitter::announces(30));
        assert!(TerminalEmitter::announces(3));
        assert!(!TerminalEmitter::announces(27));
    }
}
