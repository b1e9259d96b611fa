//! Reports module for fintrack
//!
//! The monthly report: overview, spending by category and forecast.

pub mod monthly;

pub use monthly::MonthlyReport;
