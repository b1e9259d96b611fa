//! Application state for the TUI
//!
//! The App owns the [`Dashboard`] and the request [`Loader`]. Reloads are
//! issued as tickets and completed when the loader replies; a mutation's
//! follow-up reloads are only issued once its acknowledgment arrives.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::FinError;
use crate::models::{
    BudgetGoal, GoalId, Period, RecurringExpense, RecurringId, Transaction, TransactionId,
    TransactionKind,
};
use crate::services::{Dashboard, MonthlySummary};

use super::dialogs::deposit::DepositFormState;
use super::dialogs::transaction::TransactionFormState;
use super::loader::{Loader, MutateFn, Payload, Request, Resource};

/// How long an informational status line stays visible
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Dashboard tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Transactions,
    Fixed,
    Analytics,
    Forecast,
    Goals,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Transactions,
        Tab::Fixed,
        Tab::Analytics,
        Tab::Forecast,
        Tab::Goals,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Transactions => "Transactions",
            Tab::Fixed => "Fixed",
            Tab::Analytics => "Analytics",
            Tab::Forecast => "Forecast",
            Tab::Goals => "Goals",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A destructive action awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteTransaction {
        id: TransactionId,
        kind: TransactionKind,
        description: String,
    },
    DeleteRecurring {
        id: RecurringId,
        title: String,
    },
    DeleteGoal {
        id: GoalId,
        title: String,
    },
    Materialize(Period),
}

impl PendingAction {
    pub fn message(&self) -> String {
        match self {
            PendingAction::DeleteTransaction { description, kind, .. } => {
                format!("Delete {} \"{}\"?", kind.as_str(), description)
            }
            PendingAction::DeleteRecurring { title, .. } => {
                format!("Delete fixed expense \"{}\"?", title)
            }
            PendingAction::DeleteGoal { title, .. } => {
                format!("Delete goal \"{}\" and its ledger?", title)
            }
            PendingAction::Materialize(period) => {
                format!("Record active fixed expenses for {}?", period.label())
            }
        }
    }
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    Confirm(PendingAction),
    AddTransaction,
    Deposit,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

/// Main application state
pub struct App {
    pub dashboard: Dashboard,
    pub settings: Settings,
    loader: Loader,

    pub should_quit: bool,
    pub active_tab: Tab,
    /// Selected row in the list of the active tab
    pub selected_index: usize,
    pub active_dialog: ActiveDialog,
    pub status: Option<StatusMessage>,
    /// Set once the session is gone; further requests are pointless
    pub signed_out: bool,
    pub today: NaiveDate,

    pub transaction_form: TransactionFormState,
    pub deposit_form: Option<DepositFormState>,
}

impl App {
    pub fn new(dashboard: Dashboard, settings: Settings) -> Self {
        let loader = Loader::spawn(dashboard.backend(), settings.request_timeout());
        Self {
            dashboard,
            settings,
            loader,
            should_quit: false,
            active_tab: Tab::default(),
            selected_index: 0,
            active_dialog: ActiveDialog::default(),
            status: None,
            signed_out: false,
            today: Local::now().date_naive(),
            transaction_form: TransactionFormState::default(),
            deposit_form: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    pub fn period(&self) -> Period {
        self.dashboard.period()
    }

    pub fn summary(&self) -> MonthlySummary {
        self.dashboard.summary(self.today)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_busy()
    }

    pub fn in_flight(&self) -> usize {
        self.loader.in_flight()
    }

    // Status line

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: message.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    /// Show an error; an auth error also ends the session
    pub fn report(&mut self, err: FinError) {
        let text = if err.is_auth() {
            self.signed_out = true;
            format!("{} (signed out)", err)
        } else {
            err.to_string()
        };
        self.status = Some(StatusMessage {
            text,
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    // Requests

    fn request(&mut self, request: Request) {
        let result = self
            .dashboard
            .token()
            .and_then(|token| self.loader.submit(token, request));
        if let Err(e) = result {
            self.report(e);
        }
    }

    /// Issue a fetch for one store
    pub fn reload(&mut self, resource: Resource) {
        match resource {
            Resource::Transactions => {
                let ticket = self.dashboard.begin_transactions_fetch();
                self.request(Request::Transactions(ticket));
            }
            Resource::Recurring => {
                let ticket = self.dashboard.begin_recurring_fetch();
                self.request(Request::Recurring(ticket));
            }
            Resource::Goals => {
                let ticket = self.dashboard.begin_goals_fetch();
                self.request(Request::Goals(ticket));
            }
            Resource::Deposits(goal_id) => self.request(Request::Deposits(goal_id)),
        }
    }

    pub fn reload_all(&mut self) {
        self.reload(Resource::Transactions);
        self.reload(Resource::Recurring);
        self.reload(Resource::Goals);
    }

    /// Send a mutation; `reload` runs after the backend acknowledges it
    pub fn mutate(&mut self, label: impl Into<String>, reload: Vec<Resource>, op: MutateFn) {
        let label = label.into();
        info!(%label, "submitting change");
        self.request(Request::Mutate { label, reload, op });
    }

    /// Apply finished requests and abandon timed-out ones
    pub fn process_replies(&mut self) {
        for reply in self.loader.poll() {
            self.apply(reply.payload);
        }
        for expired in self.loader.expire(Instant::now()) {
            self.report(expired.error);
        }
    }

    fn apply(&mut self, payload: Payload) {
        let outcome = match payload {
            Payload::Transactions(ticket, result) => self.dashboard.apply_transactions(ticket, result),
            Payload::Recurring(ticket, result) => self.dashboard.apply_recurring(ticket, result),
            Payload::Goals(ticket, result) => self.dashboard.apply_goals(ticket, result),
            Payload::Deposits(goal_id, result) => {
                self.dashboard.apply_deposits(goal_id, result).map(|_| true)
            }
            Payload::Mutated { label, reload, result } => match self.dashboard.guard(result) {
                Ok(message) => {
                    debug!(%label, "change acknowledged");
                    self.set_status(message);
                    for resource in reload {
                        self.reload(resource);
                    }
                    Ok(true)
                }
                Err(e) => Err(e),
            },
        };

        match outcome {
            Ok(true) => self.clamp_selection(),
            Ok(false) => debug!("stale reply ignored"),
            Err(e) => self.report(e),
        }
    }

    /// Periodic housekeeping
    pub fn on_tick(&mut self) {
        self.process_replies();
        self.today = Local::now().date_naive();
        if let Some(status) = &self.status {
            if !status.is_error && status.shown_at.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    // Navigation

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.selected_index = 0;
    }

    /// Move the selected period by `offset` months and fetch it
    pub fn shift_period(&mut self, offset: i32) {
        if offset == 0 {
            return;
        }
        let period = self.dashboard.shift_period(offset);
        debug!(%period, "period changed");
        self.selected_index = 0;
        self.reload(Resource::Transactions);
    }

    /// Jump back to the month containing today
    pub fn go_to_current_period(&mut self) {
        let current = Period::containing(self.today);
        let selected = self.period();
        let offset = (current.year() - selected.year()) * 12 + current.month() as i32
            - selected.month() as i32;
        self.shift_period(offset);
    }

    pub fn row_count(&self) -> usize {
        match self.active_tab {
            Tab::Transactions => self.transaction_rows().len(),
            Tab::Fixed => self.dashboard.recurring().list().len(),
            Tab::Goals => self.dashboard.goals().list().len(),
            Tab::Analytics => self.summary().category_breakdown.len(),
            Tab::Overview | Tab::Forecast => 0,
        }
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.row_count() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.row_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    // Selection

    /// Incomes and expenses of the period, newest first
    pub fn transaction_rows(&self) -> Vec<&Transaction> {
        let store = self.dashboard.transactions();
        let mut rows: Vec<&Transaction> = store
            .list_incomes()
            .iter()
            .chain(store.list_expenses())
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        rows
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.transaction_rows().get(self.selected_index).copied()
    }

    pub fn selected_recurring(&self) -> Option<&RecurringExpense> {
        self.dashboard.recurring().list().get(self.selected_index)
    }

    pub fn selected_goal(&self) -> Option<&BudgetGoal> {
        self.dashboard.goals().list().get(self.selected_index)
    }

    // Dialogs

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
        self.deposit_form = None;
    }

    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    /// Open the entry form; dates default to today, or the 1st of a past month
    pub fn open_add_transaction(&mut self, kind: TransactionKind) {
        let period = self.period();
        let date = (!period.is_current(self.today)).then(|| period.start_date());
        self.transaction_form = TransactionFormState::new(kind, date);
        self.open_dialog(ActiveDialog::AddTransaction);
    }

    pub fn submit_transaction_form(&mut self) {
        let input = match self.transaction_form.build() {
            Ok(input) => input,
            Err(message) => {
                self.transaction_form.set_error(message);
                return;
            }
        };
        self.close_dialog();

        let label = format!("add {}", input.kind.as_str());
        self.mutate(
            label,
            vec![Resource::Transactions],
            Box::new(move |backend, token| {
                let created = backend.create_transaction(token, input)?;
                Ok(format!(
                    "Recorded {} \"{}\" ({})",
                    created.kind.as_str(),
                    created.description,
                    created.id
                ))
            }),
        );
    }

    pub fn open_deposit(&mut self) {
        if let Some(goal) = self.selected_goal() {
            self.deposit_form = Some(DepositFormState::new(goal.id, goal.title.clone()));
            self.open_dialog(ActiveDialog::Deposit);
        }
    }

    pub fn submit_deposit_form(&mut self) {
        let Some(form) = self.deposit_form.as_mut() else {
            return;
        };
        let (amount, comment) = match form.build() {
            Ok(values) => values,
            Err(message) => {
                form.set_error(message);
                return;
            }
        };
        let goal_id = form.goal_id;
        self.close_dialog();

        let symbol = self.settings.currency_symbol.clone();
        self.mutate(
            format!("deposit to {}", goal_id),
            vec![Resource::Goals, Resource::Deposits(goal_id)],
            Box::new(move |backend, token| {
                let goal = backend.add_deposit(token, goal_id, amount, comment)?;
                Ok(format!(
                    "{}: saved {} of {}",
                    goal.title,
                    goal.saved_amount.format_with_symbol(&symbol),
                    goal.target_amount.format_with_symbol(&symbol)
                ))
            }),
        );
    }

    /// Ask before deleting whatever is selected in the active tab
    pub fn confirm_delete_selected(&mut self) {
        let action = match self.active_tab {
            Tab::Transactions => self.selected_transaction().map(|t| PendingAction::DeleteTransaction {
                id: t.id,
                kind: t.kind,
                description: t.description.clone(),
            }),
            Tab::Fixed => self.selected_recurring().map(|r| PendingAction::DeleteRecurring {
                id: r.id,
                title: r.title.clone(),
            }),
            Tab::Goals => self.selected_goal().map(|g| PendingAction::DeleteGoal {
                id: g.id,
                title: g.title.clone(),
            }),
            _ => None,
        };
        if let Some(action) = action {
            self.open_dialog(ActiveDialog::Confirm(action));
        }
    }

    pub fn confirm_materialize(&mut self) {
        let period = self.period();
        self.open_dialog(ActiveDialog::Confirm(PendingAction::Materialize(period)));
    }

    pub fn execute(&mut self, action: PendingAction) {
        self.close_dialog();
        match action {
            PendingAction::DeleteTransaction { id, kind, .. } => self.mutate(
                format!("delete {}", id),
                vec![Resource::Transactions],
                Box::new(move |backend, token| {
                    backend.delete_transaction(token, id, kind)?;
                    Ok(format!("Deleted {}", id))
                }),
            ),
            PendingAction::DeleteRecurring { id, .. } => self.mutate(
                format!("delete {}", id),
                vec![Resource::Recurring],
                Box::new(move |backend, token| {
                    backend.delete_recurring(token, id)?;
                    Ok(format!("Deleted {}", id))
                }),
            ),
            PendingAction::DeleteGoal { id, .. } => self.mutate(
                format!("delete {}", id),
                vec![Resource::Goals],
                Box::new(move |backend, token| {
                    backend.delete_goal(token, id)?;
                    Ok(format!("Deleted {}", id))
                }),
            ),
            PendingAction::Materialize(period) => self.mutate(
                format!("fixed expenses for {}", period),
                vec![Resource::Transactions],
                Box::new(move |backend, token| {
                    let report = backend.materialize_recurring(token, period)?;
                    Ok(format!(
                        "Fixed expenses for {}: {} created, {} skipped",
                        period,
                        report.created.len(),
                        report.skipped.len()
                    ))
                }),
            ),
        }
    }

    /// Pause or resume the selected fixed expense
    pub fn toggle_selected_recurring(&mut self) {
        let Some((id, active)) = self.selected_recurring().map(|r| (r.id, r.is_active)) else {
            return;
        };
        self.mutate(
            format!("toggle {}", id),
            vec![Resource::Recurring],
            Box::new(move |backend, token| {
                let updated = backend.set_recurring_active(token, id, !active)?;
                let state = if updated.is_active { "active" } else { "paused" };
                Ok(format!("{} is now {}", updated.title, state))
            }),
        );
    }

    /// Mark the selected goal completed, or reopen it
    pub fn toggle_selected_goal(&mut self) {
        let Some((id, completed)) = self.selected_goal().map(|g| (g.id, g.is_completed)) else {
            return;
        };
        self.mutate(
            format!("complete {}", id),
            vec![Resource::Goals],
            Box::new(move |backend, token| {
                let updated = backend.set_goal_completed(token, id, !completed)?;
                let state = if updated.is_completed { "completed" } else { "reopened" };
                Ok(format!("{} {}", updated.title, state))
            }),
        );
    }

    /// Fetch the ledger of the selected goal
    pub fn load_selected_ledger(&mut self) {
        if let Some(id) = self.selected_goal().map(|g| g.id) {
            self.reload(Resource::Deposits(id));
        }
    }
}
