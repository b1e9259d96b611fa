//! Path management for fintrack
//!
//! ## Path Resolution Order
//!
//! 1. `FINTRACK_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories` (e.g. `~/.config/fintrack`)
//! 3. `$HOME/.config/fintrack`

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FinError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "FINTRACK_DATA_DIR";

/// Manages all paths used by fintrack
#[derive(Debug, Clone)]
pub struct FintrackPaths {
    /// Base directory for all fintrack data
    base_dir: PathBuf,
}

impl FintrackPaths {
    /// Create a new FintrackPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, FinError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create FintrackPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the diagnostic log used while the TUI owns the terminal
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("fintrack.log")
    }

    /// Get the path to the client's persisted session token
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to recurring.json (fixed expenses and materialization records)
    pub fn recurring_file(&self) -> PathBuf {
        self.data_dir().join("recurring.json")
    }

    /// Get the path to goals.json (goals and their deposit ledgers)
    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    /// Get the path to users.json (users, pending login codes, sessions)
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), FinError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FinError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if fintrack has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, FinError> {
    if let Some(dirs) = ProjectDirs::from("", "", "fintrack") {
        return Ok(dirs.config_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| FinError::Config("Could not determine home directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("fintrack"))
}
