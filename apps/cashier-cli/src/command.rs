//! # Terminal Commands
//!
//! One input line maps to one [`Command`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INPUT                      COMMAND                                     │
//! │  start                      Start                                       │
//! │  +20 / add 20 / add 20 x3   Add { Twenty, 3 }                           │
//! │  -0.5 / remove 0.5          Remove { FiftyCents }                       │
//! │  submit / s / give          Submit                                      │
//! │  clear                      Clear                                       │
//! │  status / (empty line)      Status                                      │
//! │  restart / home / help      Restart / Home / Help                       │
//! │  quit / exit / q            Quit                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use cashier_core::Denomination;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Add {
        denomination: Denomination,
        count: u32,
    },
    Remove {
        denomination: Denomination,
    },
    Submit,
    Clear,
    Status,
    Restart,
    Home,
    Help,
    Quit,
}

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  start              open the till
  +20, add 20 x3     put notes or coins in the tray (20 10 5 2 1 0.5 0.2 0.1)
  -5, remove 5       take one back out
  submit             hand the tray to the customer
  clear              empty the tray
  status             show the register and the tray
  restart            start over right away
  home               back to the title screen
  quit               leave";

fn parse_denomination(raw: &str) -> Result<Denomination, CliError> {
    raw.parse::<Denomination>()
        .map_err(|e| CliError::unknown_command(e.to_string()))
}

/// Parses an optional `x3` / `3` repeat count.
fn parse_count(raw: Option<&str>) -> Result<u32, CliError> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    let digits = raw.strip_prefix(['x', '*']).unwrap_or(raw);
    match digits.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(CliError::unknown_command(format!(
            "Invalid count: {}",
            raw
        ))),
    }
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix('+') {
            let mut parts = rest.split_whitespace();
            let denomination = parse_denomination(parts.next().unwrap_or(""))?;
            let count = parse_count(parts.next())?;
            return Ok(Command::Add {
                denomination,
                count,
            });
        }
        if let Some(rest) = line.strip_prefix('-') {
            return Ok(Command::Remove {
                denomination: parse_denomination(rest)?,
            });
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or("").to_ascii_lowercase();
        let command = match verb.as_str() {
            "" | "status" | "st" => Command::Status,
            "start" | "play" => Command::Start,
            "add" | "a" => {
                let denomination = parse_denomination(parts.next().unwrap_or(""))?;
                let count = parse_count(parts.next())?;
                Command::Add {
                    denomination,
                    count,
                }
            }
            "remove" | "rm" | "r" => Command::Remove {
                denomination: parse_denomination(parts.next().unwrap_or(""))?,
            },
            "submit" | "s" | "give" => Command::Submit,
            "clear" | "c" => Command::Clear,
            "restart" => Command::Restart,
            "home" => Command::Home,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(CliError::unknown_command(format!(
                    "Unknown command: {} (type 'help')",
                    other
                )))
            }
        };

        if let Some(extra) = parts.next() {
            return Err(CliError::unknown_command(format!(
                "Unexpected argument: {}",
                extra
            )));
        }
        Ok(command)
    }
}
