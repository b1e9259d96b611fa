//! User settings for fintrack
//!
//! Manages display preferences, request timeouts and the lifetimes of login
//! codes and sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::error::FinError;

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Seconds to wait for a backend response before reporting a transport error
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Minutes a login code stays valid
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: i64,

    /// Days an issued session token stays valid
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,

    /// Default tracing filter when `FINTRACK_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// TUI redraw interval in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_code_ttl_minutes() -> i64 {
    10
}

fn default_session_ttl_days() -> i64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            request_timeout_secs: default_request_timeout_secs(),
            code_ttl_minutes: default_code_ttl_minutes(),
            session_ttl_days: default_session_ttl_days(),
            log_level: default_log_level(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, FinError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FinError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), FinError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Request timeout as a [`Duration`], never shorter than one second
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// TUI tick interval as a [`Duration`]
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.session_ttl_days, 30);
        assert_eq!(settings.code_ttl_minutes, 10);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "€".into();
        settings.request_timeout_secs = 30;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol":"£"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "£");
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.tick_rate_ms, 250);
    }

    #[test]
    fn test_timeout_floor() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
