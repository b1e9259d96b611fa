//! Configuration module for fintrack
//!
//! - Base directory resolution with an environment override
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FintrackPaths;
pub use settings::Settings;
