//! Diagnostic logging setup
//!
//! The filter comes from `FINTRACK_LOG` when set, otherwise from the
//! configured log level. Logs go to stderr, except while the TUI owns the
//! terminal; then they are appended to `fintrack.log`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{FinError, FinResult};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "FINTRACK_LOG";

/// Where log lines are written
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Filter from `FINTRACK_LOG`, falling back to `default_level`
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber
pub fn init(default_level: &str, target: LogTarget<'_>) -> FinResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(false);

    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| FinError::Config(format!("Failed to initialize logging: {}", e)))
}
