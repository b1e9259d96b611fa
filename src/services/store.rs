//! Client-side caches of backend data
//!
//! The stores never change their contents locally. They are filled only by
//! completing a fetch, and each fetch is tagged with a ticket when it is
//! issued. A result is accepted only if its ticket is still the newest one
//! (and, for transactions, still for the selected period); anything else is a
//! stale response and is dropped.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    BudgetGoal, Deposit, GoalId, Period, RecurringExpense, RecurringId, Transaction,
};

/// Tag for an in-flight transaction fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub period: Period,
    pub generation: u64,
}

/// Tag for an in-flight registry fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryTicket {
    pub generation: u64,
}

/// Income and expense transactions of the selected period
#[derive(Debug, Clone)]
pub struct TransactionStore {
    period: Period,
    generation: u64,
    loaded: Option<Period>,
    expenses: Vec<Transaction>,
    incomes: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            generation: 0,
            loaded: None,
            expenses: Vec::new(),
            incomes: Vec::new(),
        }
    }

    /// Period the store is currently tracking
    pub fn period(&self) -> Period {
        self.period
    }

    /// Start a fetch for `period`, superseding every earlier ticket
    pub fn begin_fetch(&mut self, period: Period) -> FetchTicket {
        self.generation += 1;
        self.period = period;
        FetchTicket {
            period,
            generation: self.generation,
        }
    }

    /// Whether `ticket` would be accepted
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.period == self.period
    }

    /// Install a fetch result; returns false when `ticket` is stale
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        expenses: Vec<Transaction>,
        incomes: Vec<Transaction>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                period = %ticket.period,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale transaction fetch"
            );
            return false;
        }

        self.expenses = expenses;
        self.incomes = incomes;
        self.loaded = Some(ticket.period);
        true
    }

    /// Whether the data held belongs to the tracked period
    pub fn is_loaded(&self) -> bool {
        self.loaded == Some(self.period)
    }

    /// Expenses of the last accepted fetch
    pub fn list_expenses(&self) -> &[Transaction] {
        &self.expenses
    }

    /// Incomes of the last accepted fetch
    pub fn list_incomes(&self) -> &[Transaction] {
        &self.incomes
    }
}

/// Recurring expense definitions
#[derive(Debug, Clone, Default)]
pub struct RecurringRegistry {
    generation: u64,
    loaded: bool,
    items: Vec<RecurringExpense>,
}

impl RecurringRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) -> RegistryTicket {
        self.generation += 1;
        RegistryTicket {
            generation: self.generation,
        }
    }

    pub fn complete_fetch(&mut self, ticket: RegistryTicket, items: Vec<RecurringExpense>) -> bool {
        if ticket.generation != self.generation {
            debug!(generation = ticket.generation, "discarding stale recurring fetch");
            return false;
        }
        self.items = items;
        self.loaded = true;
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn list(&self) -> &[RecurringExpense] {
        &self.items
    }

    /// Definitions currently switched on
    pub fn list_active(&self) -> Vec<&RecurringExpense> {
        self.items.iter().filter(|d| d.is_active).collect()
    }

    pub fn get(&self, id: RecurringId) -> Option<&RecurringExpense> {
        self.items.iter().find(|d| d.id == id)
    }
}

/// Savings goals and the deposit ledgers fetched for them
#[derive(Debug, Clone, Default)]
pub struct GoalRegistry {
    generation: u64,
    loaded: bool,
    goals: Vec<BudgetGoal>,
    deposits: HashMap<GoalId, Vec<Deposit>>,
}

impl GoalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) -> RegistryTicket {
        self.generation += 1;
        RegistryTicket {
            generation: self.generation,
        }
    }

    /// Install a goal list; cached ledgers of goals that vanished are dropped
    pub fn complete_fetch(&mut self, ticket: RegistryTicket, goals: Vec<BudgetGoal>) -> bool {
        if ticket.generation != self.generation {
            debug!(generation = ticket.generation, "discarding stale goal fetch");
            return false;
        }
        self.deposits.retain(|id, _| goals.iter().any(|g| g.id == *id));
        self.goals = goals;
        self.loaded = true;
        true
    }

    /// Cache the ledger of one goal
    pub fn store_deposits(&mut self, goal_id: GoalId, deposits: Vec<Deposit>) {
        self.deposits.insert(goal_id, deposits);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn list(&self) -> &[BudgetGoal] {
        &self.goals
    }

    pub fn get(&self, id: GoalId) -> Option<&BudgetGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Cached ledger of `goal_id`, if it has been fetched
    pub fn deposits(&self, goal_id: GoalId) -> Option<&[Deposit]> {
        self.deposits.get(&goal_id).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionId, TransactionKind};
    use chrono::{NaiveDate, Utc};

    fn period(y: i32, m: u32) -> Period {
        Period::new(y, m).unwrap()
    }

    fn expense(id: i64, on: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            kind: TransactionKind::Expense,
            amount: Money::from_units(10),
            description: "coffee".into(),
            date: on,
            category: Some("restaurants".into()),
            recurring_id: None,
            created_at: Utc::now(),
        }
    }

    fn goal(id: i64) -> BudgetGoal {
        BudgetGoal {
            id: GoalId::new(id),
            title: format!("goal {}", id),
            category: "other".into(),
            target_amount: Money::from_units(100),
            saved_amount: Money::zero(),
            target_date: None,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut store = TransactionStore::new(period(2025, 1));
        let first = store.begin_fetch(period(2025, 1));
        let second = store.begin_fetch(period(2025, 1));

        let on = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert!(!store.complete_fetch(first, vec![expense(1, on)], vec![]));
        assert!(!store.is_loaded());

        assert!(store.complete_fetch(second, vec![expense(2, on)], vec![]));
        assert!(store.is_loaded());
        assert_eq!(store.list_expenses()[0].id, TransactionId::new(2));
    }

    #[test]
    fn test_late_reply_for_previous_period_is_dropped() {
        let mut store = TransactionStore::new(period(2025, 1));
        let january = store.begin_fetch(period(2025, 1));
        let february = store.begin_fetch(period(2025, 2));

        let feb_day = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        assert!(store.complete_fetch(february, vec![expense(5, feb_day)], vec![]));

        let jan_day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(!store.complete_fetch(january, vec![expense(1, jan_day)], vec![]));
        assert_eq!(store.period(), period(2025, 2));
        assert_eq!(store.list_expenses().len(), 1);
        assert_eq!(store.list_expenses()[0].date, feb_day);
    }

    #[test]
    fn test_navigation_marks_store_unloaded() {
        let mut store = TransactionStore::new(period(2025, 1));
        let ticket = store.begin_fetch(period(2025, 1));
        assert!(store.complete_fetch(ticket, vec![], vec![]));
        assert!(store.is_loaded());

        store.begin_fetch(period(2025, 2));
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_recurring_registry_active_filter() {
        let mut registry = RecurringRegistry::new();
        let stale = registry.begin_fetch();
        let ticket = registry.begin_fetch();

        let def = |id: i64, active: bool| RecurringExpense {
            id: RecurringId::new(id),
            title: "rent".into(),
            amount: Money::from_units(800),
            category: "utilities".into(),
            day_of_month: 1,
            is_active: active,
            created_at: Utc::now(),
        };

        assert!(!registry.complete_fetch(stale, vec![def(9, true)]));
        assert!(registry.complete_fetch(ticket, vec![def(1, true), def(2, false)]));
        assert_eq!(registry.list().len(), 2);
        assert_eq!(registry.list_active().len(), 1);
        assert!(registry.get(RecurringId::new(2)).is_some());
    }

    #[test]
    fn test_goal_registry_drops_ledgers_of_removed_goals() {
        let mut registry = GoalRegistry::new();
        let ticket = registry.begin_fetch();
        assert!(registry.complete_fetch(ticket, vec![goal(1), goal(2)]));
        registry.store_deposits(GoalId::new(1), vec![]);
        registry.store_deposits(GoalId::new(2), vec![]);

        let ticket = registry.begin_fetch();
        assert!(registry.complete_fetch(ticket, vec![goal(2)]));
        assert!(registry.deposits(GoalId::new(1)).is_none());
        assert!(registry.deposits(GoalId::new(2)).is_some());
        assert!(registry.get(GoalId::new(1)).is_none());
    }
}
