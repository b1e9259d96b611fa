//! Display formatting for terminal output
//!
//! Tables for transactions, fixed expenses and goals, plus the shared text
//! helpers used by reports.

pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use goal::{format_goal_history, format_goal_table};
pub use report::{format_bar, format_percentage, truncate};
pub use recurring::{format_materialize_report, format_recurring_table};
pub use transaction::{format_transaction_details, format_transaction_table};
