//! Dashboard controller
//!
//! Owns the session, the selected period and the client-side stores, and
//! routes every operation through the backend. Mutations follow one protocol:
//! validate locally, call the backend, and only after it acknowledges reload
//! the affected store. Nothing is merged into local state optimistically.
//!
//! Each reload is split into `begin_*` (issue a ticket), a fetch that needs
//! only the backend and token, and `apply_*` (hand the result to the store).
//! The synchronous `reload_*` helpers run all three in a row; the TUI runs the
//! fetch on its loader thread instead.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::backend::{Backend, MaterializeReport, TransactionQuery};
use crate::error::{FinError, FinResult};
use crate::models::goal::validate_deposit_amount;
use crate::models::{
    AuthToken, BudgetGoal, Deposit, DepositId, GoalId, Money, NewGoal, NewRecurringExpense,
    NewTransaction, Period, RecurringExpense, RecurringId, Transaction, TransactionId,
    TransactionKind,
};
use crate::session::Session;

use super::aggregation::MonthlySummary;
use super::period::PeriodSelector;
use super::store::{FetchTicket, GoalRegistry, RecurringRegistry, RegistryTicket, TransactionStore};

/// Transactions of one period, as returned by the backend
#[derive(Debug, Clone, Default)]
pub struct PeriodData {
    pub expenses: Vec<Transaction>,
    pub incomes: Vec<Transaction>,
}

/// Fetch both kinds of transactions for `period`
pub fn fetch_period(backend: &dyn Backend, token: &AuthToken, period: Period) -> FinResult<PeriodData> {
    let expenses =
        backend.list_transactions(token, TransactionQuery::for_period(TransactionKind::Expense, period))?;
    let incomes =
        backend.list_transactions(token, TransactionQuery::for_period(TransactionKind::Income, period))?;
    Ok(PeriodData { expenses, incomes })
}

fn invalid<E: std::fmt::Display>(e: E) -> FinError {
    FinError::Validation(e.to_string())
}

/// Signed-in view over one user's finances
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    session: Session,
    selector: PeriodSelector,
    transactions: TransactionStore,
    recurring: RecurringRegistry,
    goals: GoalRegistry,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>, session: Session, period: Period) -> Self {
        Self {
            backend,
            session,
            selector: PeriodSelector::new(period),
            transactions: TransactionStore::new(period),
            recurring: RecurringRegistry::new(),
            goals: GoalRegistry::new(),
        }
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Copy of the current token, for handing to another thread
    pub fn token(&self) -> FinResult<AuthToken> {
        self.session.token().cloned()
    }

    pub fn period(&self) -> Period {
        self.selector.current()
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn recurring(&self) -> &RecurringRegistry {
        &self.recurring
    }

    pub fn goals(&self) -> &GoalRegistry {
        &self.goals
    }

    /// Metrics for the selected period as seen on `today`
    pub fn summary(&self, today: NaiveDate) -> MonthlySummary {
        MonthlySummary::compute(
            self.transactions.list_expenses(),
            self.transactions.list_incomes(),
            self.recurring.list(),
            today,
            self.transactions.period(),
        )
    }

    /// Pass a backend result through the session, signing out on auth errors
    pub fn guard<T>(&mut self, result: FinResult<T>) -> FinResult<T> {
        self.session.guard(result)
    }

    fn call<T>(&mut self, op: impl FnOnce(&dyn Backend, &AuthToken) -> FinResult<T>) -> FinResult<T> {
        let token = self.token()?;
        let result = op(self.backend.as_ref(), &token);
        self.guard(result)
    }

    // Navigation

    /// Move the selection by `offset` months without fetching
    pub fn shift_period(&mut self, offset: i32) -> Period {
        self.selector.shift(offset)
    }

    /// Move the selection by `offset` months and reload its transactions
    pub fn navigate(&mut self, offset: i32) -> FinResult<Period> {
        let period = self.shift_period(offset);
        debug!(%period, "navigated");
        self.reload_transactions()?;
        Ok(period)
    }

    /// Jump to `period` and reload its transactions
    pub fn select(&mut self, period: Period) -> FinResult<()> {
        self.selector.set(period);
        self.reload_transactions()
    }

    // Two-phase reloads

    pub fn begin_transactions_fetch(&mut self) -> FetchTicket {
        self.transactions.begin_fetch(self.selector.current())
    }

    /// Hand a transaction fetch to the store; `Ok(false)` when it was stale
    pub fn apply_transactions(&mut self, ticket: FetchTicket, result: FinResult<PeriodData>) -> FinResult<bool> {
        let data = self.guard(result)?;
        if ticket.period != self.selector.current() {
            debug!(period = %ticket.period, "fetch no longer matches selection");
            return Ok(false);
        }
        Ok(self.transactions.complete_fetch(ticket, data.expenses, data.incomes))
    }

    pub fn begin_recurring_fetch(&mut self) -> RegistryTicket {
        self.recurring.begin_fetch()
    }

    pub fn apply_recurring(
        &mut self,
        ticket: RegistryTicket,
        result: FinResult<Vec<RecurringExpense>>,
    ) -> FinResult<bool> {
        let items = self.guard(result)?;
        Ok(self.recurring.complete_fetch(ticket, items))
    }

    pub fn begin_goals_fetch(&mut self) -> RegistryTicket {
        self.goals.begin_fetch()
    }

    pub fn apply_goals(&mut self, ticket: RegistryTicket, result: FinResult<Vec<BudgetGoal>>) -> FinResult<bool> {
        let goals = self.guard(result)?;
        Ok(self.goals.complete_fetch(ticket, goals))
    }

    pub fn apply_deposits(&mut self, goal_id: GoalId, result: FinResult<Vec<Deposit>>) -> FinResult<()> {
        let deposits = self.guard(result)?;
        self.goals.store_deposits(goal_id, deposits);
        Ok(())
    }

    // Synchronous reloads

    pub fn reload_transactions(&mut self) -> FinResult<()> {
        let ticket = self.begin_transactions_fetch();
        let result = self.call(|backend, token| fetch_period(backend, token, ticket.period));
        self.apply_transactions(ticket, result).map(|_| ())
    }

    pub fn reload_recurring(&mut self) -> FinResult<()> {
        let ticket = self.begin_recurring_fetch();
        let result = self.call(|backend, token| backend.list_recurring(token));
        self.apply_recurring(ticket, result).map(|_| ())
    }

    pub fn reload_goals(&mut self) -> FinResult<()> {
        let ticket = self.begin_goals_fetch();
        let result = self.call(|backend, token| backend.list_goals(token));
        self.apply_goals(ticket, result).map(|_| ())
    }

    /// Reload every store
    pub fn reload_all(&mut self) -> FinResult<()> {
        self.reload_transactions()?;
        self.reload_recurring()?;
        self.reload_goals()
    }

    /// Fetch and cache the ledger of one goal
    pub fn load_deposits(&mut self, goal_id: GoalId) -> FinResult<&[Deposit]> {
        let result = self.call(|backend, token| backend.list_deposits(token, goal_id));
        self.apply_deposits(goal_id, result)?;
        Ok(self.goals.deposits(goal_id).unwrap_or_default())
    }

    // Transactions

    pub fn add_transaction(&mut self, input: NewTransaction) -> FinResult<Transaction> {
        input.validate().map_err(invalid)?;
        let created = self.call(|backend, token| backend.create_transaction(token, input))?;
        info!(id = %created.id, kind = %created.kind, "transaction recorded");
        self.reload_transactions()?;
        Ok(created)
    }

    pub fn delete_transaction(&mut self, id: TransactionId, kind: TransactionKind) -> FinResult<()> {
        self.call(|backend, token| backend.delete_transaction(token, id, kind))?;
        info!(%id, "transaction deleted");
        self.reload_transactions()
    }

    // Recurring expenses

    pub fn add_recurring(&mut self, input: NewRecurringExpense) -> FinResult<RecurringExpense> {
        input.validate().map_err(invalid)?;
        let created = self.call(|backend, token| backend.create_recurring(token, input))?;
        info!(id = %created.id, "recurring expense added");
        self.reload_recurring()?;
        Ok(created)
    }

    pub fn set_recurring_active(&mut self, id: RecurringId, is_active: bool) -> FinResult<()> {
        self.call(|backend, token| backend.set_recurring_active(token, id, is_active))?;
        self.reload_recurring()
    }

    /// Flip the active flag of a loaded definition; returns the new state
    pub fn toggle_recurring(&mut self, id: RecurringId) -> FinResult<bool> {
        if !self.recurring.is_loaded() {
            self.reload_recurring()?;
        }
        let is_active = !self
            .recurring
            .get(id)
            .ok_or_else(|| FinError::recurring_not_found(id.to_string()))?
            .is_active;
        self.set_recurring_active(id, is_active)?;
        Ok(is_active)
    }

    pub fn delete_recurring(&mut self, id: RecurringId) -> FinResult<()> {
        self.call(|backend, token| backend.delete_recurring(token, id))?;
        info!(%id, "recurring expense deleted");
        self.reload_recurring()
    }

    /// Apply the active definitions to the selected period
    pub fn materialize(&mut self) -> FinResult<MaterializeReport> {
        let period = self.period();
        let report = self.call(|backend, token| backend.materialize_recurring(token, period))?;
        info!(
            %period,
            created = report.created.len(),
            skipped = report.skipped.len(),
            "recurring expenses applied"
        );
        self.reload_transactions()?;
        Ok(report)
    }

    // Goals

    pub fn add_goal(&mut self, input: NewGoal) -> FinResult<BudgetGoal> {
        input.validate().map_err(invalid)?;
        let created = self.call(|backend, token| backend.create_goal(token, input))?;
        info!(id = %created.id, "goal created");
        self.reload_goals()?;
        Ok(created)
    }

    /// Add to (or, with a negative amount, withdraw from) a goal
    pub fn deposit(&mut self, goal_id: GoalId, amount: Money, comment: Option<String>) -> FinResult<BudgetGoal> {
        validate_deposit_amount(amount).map_err(invalid)?;
        let goal = self.call(|backend, token| backend.add_deposit(token, goal_id, amount, comment))?;
        self.reconcile_goal(goal_id)?;
        Ok(goal)
    }

    pub fn update_deposit(
        &mut self,
        goal_id: GoalId,
        deposit_id: DepositId,
        amount: Money,
        comment: Option<String>,
    ) -> FinResult<Deposit> {
        validate_deposit_amount(amount).map_err(invalid)?;
        let updated = self.call(|backend, token| {
            backend.update_deposit(token, goal_id, deposit_id, amount, comment)
        })?;
        self.reconcile_goal(goal_id)?;
        Ok(updated)
    }

    pub fn delete_deposit(&mut self, goal_id: GoalId, deposit_id: DepositId) -> FinResult<()> {
        self.call(|backend, token| backend.delete_deposit(token, goal_id, deposit_id))?;
        self.reconcile_goal(goal_id)
    }

    pub fn set_goal_completed(&mut self, goal_id: GoalId, is_completed: bool) -> FinResult<()> {
        self.call(|backend, token| backend.set_goal_completed(token, goal_id, is_completed))?;
        self.reload_goals()
    }

    pub fn delete_goal(&mut self, goal_id: GoalId) -> FinResult<()> {
        self.call(|backend, token| backend.delete_goal(token, goal_id))?;
        info!(%goal_id, "goal deleted");
        self.reload_goals()
    }

    fn reconcile_goal(&mut self, goal_id: GoalId) -> FinResult<()> {
        self.reload_goals()?;
        self.load_deposits(goal_id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::local::tests::{login, open_backend, EMAIL};
    use crate::services::aggregation::category_sum;
    use crate::session::TokenStore;
    use chrono::{Datelike, Local};
    use tempfile::TempDir;

    fn dashboard(temp_dir: &TempDir) -> Dashboard {
        let (backend, outbox) = open_backend(temp_dir);
        let token = login(&backend, &outbox, EMAIL);
        let store = TokenStore::new(temp_dir.path().join("session.json"));
        store.save(&token).unwrap();
        let session = Session::restore(store).unwrap();
        let today = Local::now().date_naive();
        Dashboard::new(Arc::new(backend), session, Period::containing(today))
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn test_expense_flows_into_summary() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        dash.reload_all().unwrap();
        let before = dash.summary(today());

        dash.add_transaction(NewTransaction::expense(Money::from_units(500), "Market", "food").on(today()))
            .unwrap();
        let after = dash.summary(today());

        assert_eq!(after.total_expenses - before.total_expenses, Money::from_units(500));
        assert_eq!(
            category_sum(&after.category_breakdown, "food")
                - category_sum(&before.category_breakdown, "food"),
            Money::from_units(500)
        );
        assert_eq!(after.category_breakdown.len(), 1);
    }

    #[test]
    fn test_validation_happens_before_backend_call() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);

        let err = dash
            .add_transaction(NewTransaction::expense(Money::zero(), "Nothing", "food"))
            .unwrap_err();
        assert!(err.is_validation());

        let err = dash.deposit(GoalId::new(1), Money::zero(), None).unwrap_err();
        assert!(err.is_validation());
        assert!(dash.session().is_authenticated());
    }

    #[test]
    fn test_navigation_reloads_selected_period_only() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        let this_month = dash.period();
        let last_month_day = this_month.prev().start_date();

        dash.add_transaction(NewTransaction::income(Money::from_units(900), "Salary").on(last_month_day))
            .unwrap();
        assert!(dash.transactions().list_incomes().is_empty());

        assert_eq!(dash.navigate(-1).unwrap(), this_month.prev());
        assert_eq!(dash.transactions().list_incomes().len(), 1);
        assert!(!dash.summary(today()).is_current_period);

        dash.navigate(1).unwrap();
        assert!(dash.transactions().list_incomes().is_empty());
    }

    #[test]
    fn test_stale_fetch_is_ignored_after_navigation() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        let ticket = dash.begin_transactions_fetch();
        let token = dash.token().unwrap();
        let backend = dash.backend();
        let result = fetch_period(backend.as_ref(), &token, ticket.period);

        dash.shift_period(1);
        let newer = dash.begin_transactions_fetch();
        assert!(!dash.apply_transactions(ticket, result).unwrap());

        let result = fetch_period(backend.as_ref(), &token, newer.period);
        assert!(dash.apply_transactions(newer, result).unwrap());
        assert_eq!(dash.transactions().period(), dash.period());
    }

    #[test]
    fn test_materialize_twice_adds_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        dash.add_recurring(NewRecurringExpense {
            title: "Internet".into(),
            amount: Money::from_units(30),
            category: "utilities".into(),
            day_of_month: 1,
        })
        .unwrap();

        let first = dash.materialize().unwrap();
        assert_eq!(first.created.len(), 1);
        let second = dash.materialize().unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.skipped.len(), 1);

        let summary = dash.summary(today());
        assert_eq!(summary.total_expenses, Money::from_units(30));
        assert_eq!(summary.recurring_expenses, Money::from_units(30));
        assert_eq!(summary.total_recurring_monthly, Money::from_units(30));
        assert_eq!(dash.transactions().list_expenses()[0].date.month(), today().month());
    }

    #[test]
    fn test_toggle_recurring() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        let created = dash
            .add_recurring(NewRecurringExpense {
                title: "Gym".into(),
                amount: Money::from_units(25),
                category: "health".into(),
                day_of_month: 15,
            })
            .unwrap();

        assert!(!dash.toggle_recurring(created.id).unwrap());
        assert!(dash.recurring().list_active().is_empty());
        assert!(dash.toggle_recurring(created.id).unwrap());
        assert_eq!(dash.recurring().list_active().len(), 1);
        assert!(dash.toggle_recurring(RecurringId::new(999)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_goal_ledger_reconciles() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        let goal = dash
            .add_goal(NewGoal {
                title: "Bike".into(),
                category: "transport".into(),
                target_amount: Money::from_units(600),
                target_date: None,
            })
            .unwrap();

        dash.deposit(goal.id, Money::from_units(200), Some("first".into())).unwrap();
        dash.deposit(goal.id, Money::from_units(-50), None).unwrap();
        assert_eq!(dash.goals().get(goal.id).unwrap().saved_amount, Money::from_units(150));
        assert_eq!(dash.goals().deposits(goal.id).unwrap().len(), 2);

        let first = dash
            .goals()
            .deposits(goal.id)
            .unwrap()
            .iter()
            .find(|d| d.amount.is_positive())
            .unwrap()
            .id;
        dash.update_deposit(goal.id, first, Money::from_units(300), None).unwrap();
        assert_eq!(dash.goals().get(goal.id).unwrap().saved_amount, Money::from_units(250));

        dash.delete_deposit(goal.id, first).unwrap();
        assert_eq!(dash.goals().get(goal.id).unwrap().saved_amount, Money::from_units(-50));

        dash.set_goal_completed(goal.id, true).unwrap();
        assert!(dash.goals().get(goal.id).unwrap().is_completed);
        dash.delete_goal(goal.id).unwrap();
        assert!(dash.goals().list().is_empty());
    }

    #[test]
    fn test_rejected_token_signs_out() {
        let temp_dir = TempDir::new().unwrap();
        let mut dash = dashboard(&temp_dir);
        let token = dash.token().unwrap();
        dash.backend().revoke_token(&token).unwrap();

        let err = dash.reload_transactions().unwrap_err();
        assert!(err.is_auth());
        assert!(!dash.session().is_authenticated());
        assert!(dash.reload_goals().unwrap_err().is_auth());
    }
}
