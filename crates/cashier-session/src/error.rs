//! # Session Error Types
//!
//! Error types for the session runtime.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Game Rules    │  │      Host       │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core(..)       │  │  AssetPreload   │  │  InvalidConfig          │ │
//! │  │  (CoreError)    │  │  ReportPersist  │  │  ConfigLoadFailed       │ │
//! │  │                 │  │                 │  │  ConfigSaveFailed       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::CoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type covering runtime, host and config failures.
///
/// ## Design Principles
/// - Game rule violations pass through unchanged as `Core`
/// - Host failures carry the host's message
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Game Rule Errors
    // =========================================================================
    /// A game rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Host Errors
    // =========================================================================
    /// Assets could not be loaded; the session was not started.
    #[error("Failed to load game assets: {0}")]
    AssetPreload(String),

    /// The host could not store a session report.
    #[error("Failed to persist session report: {0}")]
    ReportPersist(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid session configuration.
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::ReportPersist(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SessionError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_)
                | SessionError::ConfigLoadFailed(_)
                | SessionError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the player caused this error and can simply try
    /// something else (wrong phase, empty slot, pending settlement).
    pub fn is_user_error(&self) -> bool {
        matches!(self, SessionError::Core(_))
    }
}
