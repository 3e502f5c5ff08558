//! # CLI Error Handling
//!
//! Every failure the terminal reports goes through [`CliError`], which pairs
//! a stable [`ErrorCode`] with a readable message.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Conversion Flow                                │
//! │                                                                         │
//! │  CoreError ──────┐                                                      │
//! │  SessionError ───┼──► CliError { code, message } ──► printed to stdout │
//! │  io::Error ──────┤                                   (or exit 1 when    │
//! │  bad command ────┘                                    fatal)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use tracing::error;

use cashier_core::CoreError;
use cashier_session::SessionError;

/// Error categories shown in brackets next to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input line did not parse into a command.
    UnknownCommand,
    /// A game rule refused the move (wrong phase, empty slot, pending).
    GameRule,
    /// Preloading or persisting failed.
    HostError,
    /// Config file or environment could not be used.
    ConfigError,
    /// Terminal or filesystem I/O.
    IoError,
}

/// Error returned by command handlers and `run()`.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_command(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownCommand, message)
    }

    /// True for errors that end the program instead of the current line.
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, ErrorCode::ConfigError | ErrorCode::IoError)
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::new(ErrorCode::GameRule, err.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Core(core) => core.into(),
            e if e.is_config_error() => {
                error!(error = %e, "Configuration error");
                CliError::new(ErrorCode::ConfigError, e.to_string())
            }
            e => {
                error!(error = %e, "Host error");
                CliError::new(ErrorCode::HostError, e.to_string())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        error!(error = %err, "Terminal I/O error");
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}
