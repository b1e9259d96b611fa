//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the dashboard. Every data command runs against
//! a signed-in [`Dashboard`](crate::services::Dashboard).

pub mod auth;
pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use auth::{handle_history, handle_login, handle_logout, handle_whoami};
pub use goal::{handle_goal_command, GoalCommands};
pub use recurring::{handle_fixed_command, FixedCommands};
pub use report::handle_report;
pub use transaction::{handle_transaction_command, KindArg, TransactionCommands};

use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{FinError, FinResult};
use crate::models::category::{self, CATALOG};
use crate::models::Money;

/// Parse an amount argument such as "12.50" or "1 500"
pub fn parse_amount(input: &str) -> FinResult<Money> {
    Money::parse(input).map_err(|e| {
        FinError::Validation(format!(
            "Invalid amount '{}'. Use a format like '12.50' or '12'. Error: {}",
            input, e
        ))
    })
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(input: &str) -> FinResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| FinError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", input)))
}

/// Parse an ID argument, accepting both "7" and the prefixed form
pub fn parse_id<T: FromStr>(input: &str, what: &str) -> FinResult<T> {
    input
        .parse()
        .map_err(|_| FinError::Validation(format!("Invalid {} ID: '{}'", what, input)))
}

/// Check a category key against the catalog
pub fn parse_category(input: &str) -> FinResult<String> {
    let key = input.trim().to_lowercase();
    if category::find(&key).is_none() {
        return Err(FinError::Validation(format!(
            "Unknown category '{}'. Valid categories: {}",
            input,
            category::keys()
        )));
    }
    Ok(key)
}

/// Print the category catalog
pub fn print_categories() {
    println!("{:<14} {:<22} Color", "Key", "Label");
    println!("{}", "-".repeat(44));
    for cat in CATALOG {
        println!("{:<14} {:<22} {}", cat.key, cat.label, cat.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalId;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("twelve").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2025").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id::<GoalId>("goal-4", "goal").unwrap(), GoalId::new(4));
        assert_eq!(parse_id::<GoalId>("4", "goal").unwrap(), GoalId::new(4));
        assert!(parse_id::<GoalId>("four", "goal").is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(" Food ").unwrap(), "food");
        assert!(parse_category("pets").unwrap_err().is_validation());
    }
}
