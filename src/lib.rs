//! fintrack - Terminal personal-finance tracker
//!
//! This library provides the core of the fintrack application: a monthly
//! view over income and expenses, fixed (recurring) expenses that can be
//! materialized into a month, savings goals with a deposit ledger, and the
//! aggregation that turns a month of transactions into totals, category
//! breakdowns and an end-of-month forecast.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Error taxonomy (auth, validation, transport, ...)
//! - `models`: Core data models (money, periods, transactions, goals)
//! - `backend`: The backend contract and its local JSON implementation
//! - `session`: Sign-in state and token persistence
//! - `storage`: JSON file storage used by the local backend
//! - `services`: Period selection, stores, aggregation and the dashboard
//! - `audit`: Audit log of backend mutations
//! - `reports`, `display`: Monthly report and terminal formatting
//! - `cli`, `tui`: Command handlers and the interactive dashboard
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{FintrackPaths, Settings};
//!
//! let paths = FintrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod storage;
pub mod tui;

pub use error::{FinError, FinResult};
