//! Core data models for fintrack
//!
//! Transactions, recurring expense definitions, savings goals, the category
//! catalog and the money/period value types they share.

pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod recurring;
pub mod transaction;
pub mod user;

pub use category::Category;
pub use goal::{BudgetGoal, Deposit, NewGoal};
pub use ids::{DepositId, GoalId, RecurringId, TransactionId, UserId};
pub use money::Money;
pub use period::Period;
pub use recurring::{NewRecurringExpense, RecurringExpense};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
pub use user::{AuthToken, User};
