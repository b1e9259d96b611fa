//! Backend contract
//!
//! [`Backend`] is the data source the client talks to. Every call except
//! the two login steps requires a bearer token. Calls are plain
//! request/response: a mutation reports success or failure and nothing else
//! is assumed about local state until the caller reloads.
//!
//! [`local::LocalBackend`] implements the contract over JSON files.

pub mod auth;
pub mod local;
pub mod wire;

pub use auth::{CodeDelivery, MemoryDelivery, TerminalDelivery};
pub use local::LocalBackend;
pub use wire::{AuthResponse, MaterializeReport, SendCodeResponse, TransactionQuery};

use crate::error::FinResult;
use crate::models::{
    AuthToken, BudgetGoal, Deposit, DepositId, GoalId, Money, NewGoal, NewRecurringExpense,
    NewTransaction, Period, RecurringExpense, RecurringId, Transaction, TransactionId,
    TransactionKind, User,
};

/// Operations offered by the finance backend
pub trait Backend: Send + Sync {
    // auth

    /// Email a one-time login code
    fn send_code(&self, email: &str) -> FinResult<SendCodeResponse>;

    /// Exchange an emailed code for a session token
    fn verify_code(&self, email: &str, code: &str) -> FinResult<AuthResponse>;

    /// Resolve a token to its user; `FinError::Auth` when invalid or expired
    fn verify_token(&self, token: &AuthToken) -> FinResult<User>;

    /// End a session
    fn revoke_token(&self, token: &AuthToken) -> FinResult<()>;

    // transactions

    fn list_transactions(
        &self,
        token: &AuthToken,
        query: TransactionQuery,
    ) -> FinResult<Vec<Transaction>>;

    fn create_transaction(&self, token: &AuthToken, input: NewTransaction) -> FinResult<Transaction>;

    fn delete_transaction(
        &self,
        token: &AuthToken,
        id: TransactionId,
        kind: TransactionKind,
    ) -> FinResult<()>;

    // fixed (recurring) expenses

    fn list_recurring(&self, token: &AuthToken) -> FinResult<Vec<RecurringExpense>>;

    fn create_recurring(
        &self,
        token: &AuthToken,
        input: NewRecurringExpense,
    ) -> FinResult<RecurringExpense>;

    fn set_recurring_active(
        &self,
        token: &AuthToken,
        id: RecurringId,
        is_active: bool,
    ) -> FinResult<RecurringExpense>;

    fn delete_recurring(&self, token: &AuthToken, id: RecurringId) -> FinResult<()>;

    /// Turn every active definition into an expense for `period`, once
    fn materialize_recurring(&self, token: &AuthToken, period: Period) -> FinResult<MaterializeReport>;

    // planning (goals)

    fn list_goals(&self, token: &AuthToken) -> FinResult<Vec<BudgetGoal>>;

    fn create_goal(&self, token: &AuthToken, input: NewGoal) -> FinResult<BudgetGoal>;

    /// Append a ledger entry and return the goal with its new saved amount
    fn add_deposit(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        amount: Money,
        comment: Option<String>,
    ) -> FinResult<BudgetGoal>;

    fn set_goal_completed(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        is_completed: bool,
    ) -> FinResult<BudgetGoal>;

    fn delete_goal(&self, token: &AuthToken, goal_id: GoalId) -> FinResult<()>;

    fn list_deposits(&self, token: &AuthToken, goal_id: GoalId) -> FinResult<Vec<Deposit>>;

    fn update_deposit(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        deposit_id: DepositId,
        amount: Money,
        comment: Option<String>,
    ) -> FinResult<Deposit>;

    fn delete_deposit(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        deposit_id: DepositId,
    ) -> FinResult<()>;
}
