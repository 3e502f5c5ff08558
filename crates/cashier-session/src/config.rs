//! # Game Configuration
//!
//! Configuration management for the session runtime.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CASHIER_SETTLEMENT_DELAY_MS=250                                    │
//! │     CASHIER_SKIP_ONBOARDING=1                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cashier-chaos/cashier.toml (Linux)                       │
//! │     ~/Library/Application Support/com.cashier.chaos/cashier.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     500ms settlement, 1s ticks, $100 tender, standard levels           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cashier.toml
//! [session]
//! settlement_delay_ms = 500
//! tick_interval_ms = 1000
//! show_onboarding = true
//! tender_cents = 10000
//!
//! [[levels]]
//! multiplier = 10
//! time_limit_secs = 60
//! starting_lives = 3
//!
//! [[levels]]
//! multiplier = 0
//! time_limit_secs = 90
//! starting_lives = 3
//! register_functional = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use cashier_core::{LevelTable, Money, DEFAULT_TENDER_CENTS};

use crate::error::{SessionError, SessionResult};

/// Longest feedback window the runtime accepts.
const MAX_SETTLEMENT_DELAY_MS: u64 = 10_000;

// =============================================================================
// Session Settings
// =============================================================================

/// Runtime knobs for one controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Feedback window between a submission and its settlement.
    #[serde(default = "default_settlement_delay")]
    pub settlement_delay_ms: u64,

    /// Length of one countdown second. Shorter values speed the game up.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Whether the first session shows the how-to-play screen.
    #[serde(default = "default_true")]
    pub show_onboarding: bool,

    /// The note every customer pays with.
    #[serde(default = "default_tender")]
    pub tender_cents: i64,

    /// Where the terminal front end appends session reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

fn default_settlement_delay() -> u64 {
    500
}

fn default_tick_interval() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_tender() -> i64 {
    DEFAULT_TENDER_CENTS
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            settlement_delay_ms: default_settlement_delay(),
            tick_interval_ms: default_tick_interval(),
            show_onboarding: true,
            tender_cents: default_tender(),
            report_path: None,
        }
    }
}

impl SessionConfig {
    pub fn settlement_delay(&self) -> Duration {
        Duration::from_millis(self.settlement_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn tender(&self) -> Money {
        Money::from_cents(self.tender_cents)
    }

    /// Validates the runtime knobs.
    pub fn validate(&self) -> SessionResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "tick_interval_ms must be greater than 0".into(),
            ));
        }

        if self.settlement_delay_ms > MAX_SETTLEMENT_DELAY_MS {
            return Err(SessionError::InvalidConfig(format!(
                "settlement_delay_ms must be at most {}",
                MAX_SETTLEMENT_DELAY_MS
            )));
        }

        if self.tender_cents <= 0 {
            return Err(SessionError::InvalidConfig(
                "tender_cents must be positive".into(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Main Game Configuration
// =============================================================================

/// Complete game configuration: runtime knobs plus the level table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub session: SessionConfig,

    /// Ordered levels. Validated on load; an empty list is rejected.
    #[serde(default)]
    pub levels: LevelTable,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cashier.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading game config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load game config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        let save_failed = |e: std::io::Error| SessionError::ConfigSaveFailed(e.to_string());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(save_failed)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(save_failed)?;

        info!(?path, "Game config saved");
        Ok(())
    }

    pub fn validate(&self) -> SessionResult<()> {
        self.session.validate()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key/value source.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CASHIER_SETTLEMENT_DELAY_MS") {
            match value.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding settlement delay from environment");
                    self.session.settlement_delay_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid CASHIER_SETTLEMENT_DELAY_MS"),
            }
        }

        if let Some(value) = lookup("CASHIER_TICK_INTERVAL_MS") {
            match value.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding tick interval from environment");
                    self.session.tick_interval_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid CASHIER_TICK_INTERVAL_MS"),
            }
        }

        if let Some(value) = lookup("CASHIER_SKIP_ONBOARDING") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.session.show_onboarding = false,
                "0" | "false" | "no" => self.session.show_onboarding = true,
                _ => warn!(value = %value, "Unknown CASHIER_SKIP_ONBOARDING value"),
            }
        }

        if let Some(path) = lookup("CASHIER_REPORT_PATH") {
            debug!(path = %path, "Overriding report path from environment");
            self.session.report_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cashier", "chaos")
            .map(|dirs| dirs.config_dir().join("cashier.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.session.settlement_delay_ms, 500);
        assert_eq!(config.session.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.session.tender().cents(), 10_000);
        assert_eq!(config.levels, LevelTable::standard());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GameConfig::default();

        config.session.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        config.session.tick_interval_ms = 1000;
        config.session.settlement_delay_ms = 60_000;
        assert!(config.validate().is_err());

        config.session.settlement_delay_ms = 0;
        config.session.tender_cents = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_levels() {
        let toml_str = r#"
            [session]
            settlement_delay_ms = 250

            [[levels]]
            multiplier = 2
            time_limit_secs = 45
            starting_lives = 5

            [[levels]]
            multiplier = 0
            time_limit_secs = 30
            starting_lives = 1
            register_functional = false
        "#;

        let config: GameConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.settlement_delay_ms, 250);
        assert_eq!(config.session.tick_interval_ms, 1000);
        assert_eq!(config.levels.len(), 2);
        assert_eq!(config.levels.first().starting_lives, 5);
        assert!(!config.levels.get(1).unwrap().register_functional);
    }

    #[test]
    fn test_toml_rejects_invalid_levels() {
        let toml_str = r#"
            [[levels]]
            multiplier = 2
            time_limit_secs = 0
            starting_lives = 5
        "#;
        assert!(toml::from_str::<GameConfig>(toml_str).is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = GameConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[session]"));
        assert!(toml_str.contains("[[levels]]"));

        let back: GameConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CASHIER_SETTLEMENT_DELAY_MS", "100"),
            ("CASHIER_TICK_INTERVAL_MS", "not-a-number"),
            ("CASHIER_SKIP_ONBOARDING", "true"),
            ("CASHIER_REPORT_PATH", "/tmp/reports.jsonl"),
        ]
        .into_iter()
        .collect();

        let mut config = GameConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.session.settlement_delay_ms, 100);
        assert_eq!(config.session.tick_interval_ms, 1000);
        assert!(!config.session.show_onboarding);
        assert_eq!(
            config.session.report_path,
            Some(PathBuf::from("/tmp/reports.jsonl"))
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load(Some(PathBuf::from("/nonexistent/cashier.toml")));
        assert!(config.is_ok());
    }

    #[test]
    fn test_save_io_failure_is_a_save_error() {
        let blocker =
            std::env::temp_dir().join(format!("cashier-blocker-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = GameConfig::default().save(Some(blocker.join("cashier.toml")));
        assert!(matches!(result, Err(SessionError::ConfigSaveFailed(_))));

        std::fs::remove_file(&blocker).unwrap();
    }
}
