//! File-backed implementation of the backend contract
//!
//! Enforces everything the client relies on the server for: token
//! authentication, per-user scoping, input validation, saved amounts that
//! always equal the deposit ledger, and at most one materialized expense per
//! (definition, year, month).

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::config::{FintrackPaths, Settings};
use crate::error::{FinError, FinResult};
use crate::models::category::DEFAULT_CATEGORY;
use crate::models::goal::validate_deposit_amount;
use crate::models::user::{normalize_email, validate_email, validate_login_code};
use crate::models::{
    AuthToken, BudgetGoal, Deposit, DepositId, GoalId, Money, NewGoal, NewRecurringExpense,
    NewTransaction, Period, RecurringExpense, RecurringId, Transaction, TransactionId,
    TransactionKind, User,
};
use crate::storage::users::{PendingCode, SessionRecord};
use crate::storage::Storage;

use super::auth::{code_matches, generate_code, generate_token, hash_code, CodeDelivery, MAX_CODE_ATTEMPTS};
use super::wire::{
    AuthResponse, MaterializeReport, MaterializedExpense, SendCodeResponse, SkippedRecurring,
    TransactionQuery,
};
use super::Backend;

/// Reason reported for a definition already applied to the month
pub const ALREADY_MATERIALIZED: &str = "Already created for this month";

/// Backend that keeps all data in the fintrack data directory
pub struct LocalBackend {
    storage: Storage,
    delivery: Arc<dyn CodeDelivery>,
    code_ttl: Duration,
    session_ttl: Duration,
}

impl LocalBackend {
    /// Open the data directory and load every repository
    pub fn open(
        paths: FintrackPaths,
        settings: &Settings,
        delivery: Arc<dyn CodeDelivery>,
    ) -> FinResult<Self> {
        let storage = Storage::new(paths)?;
        storage.load_all()?;
        debug!(dir = %storage.paths().data_dir().display(), "local backend opened");

        Ok(Self {
            storage,
            delivery,
            code_ttl: Duration::minutes(settings.code_ttl_minutes),
            session_ttl: Duration::days(settings.session_ttl_days),
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Drop in-memory transaction changes that did not reach disk
    fn discard_unsaved_transactions(&self, cause: FinError) -> FinError {
        if let Err(e) = self.storage.transactions.load() {
            warn!(error = %e, "failed to reload transactions after a failed write");
        }
        cause
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn authenticate(&self, token: &AuthToken) -> FinResult<User> {
        let session = self
            .storage
            .users
            .find_session(token.expose())?
            .ok_or_else(|| FinError::Auth("Invalid token".into()))?;

        if session.expires_at <= Utc::now() {
            self.storage.users.remove_session(token.expose())?;
            self.storage.users.save()?;
            return Err(FinError::Auth("Token expired".into()));
        }

        self.storage
            .users
            .get(session.user_id)?
            .ok_or_else(|| FinError::Auth("User not found".into()))
    }

    fn validation<E: std::fmt::Display>(e: E) -> FinError {
        FinError::Validation(e.to_string())
    }
}

impl Backend for LocalBackend {
    fn send_code(&self, email: &str) -> FinResult<SendCodeResponse> {
        validate_email(email).map_err(FinError::Validation)?;
        let email = normalize_email(email);

        let code = generate_code();
        self.storage.users.put_code(PendingCode {
            email: email.clone(),
            code_hash: hash_code(&code)?,
            expires_at: Utc::now() + self.code_ttl,
            failed_attempts: 0,
        })?;
        self.storage.users.save()?;

        self.delivery.deliver(&email, &code)?;
        info!(%email, "login code issued");

        Ok(SendCodeResponse {
            message: format!("Code sent to {}", email),
        })
    }

    fn verify_code(&self, email: &str, code: &str) -> FinResult<AuthResponse> {
        validate_email(email).map_err(FinError::Validation)?;
        validate_login_code(code).map_err(FinError::Validation)?;
        let email = normalize_email(email);
        let users = &self.storage.users;

        let pending = users
            .get_code(&email)?
            .ok_or_else(|| FinError::Auth("No login code was requested for this email".into()))?;

        if pending.expires_at <= Utc::now() {
            users.remove_code(&email)?;
            users.save()?;
            return Err(FinError::Auth("Login code expired".into()));
        }

        if !code_matches(code.trim(), &pending.code_hash) {
            let attempts = users.record_failed_attempt(&email)?;
            if attempts >= MAX_CODE_ATTEMPTS {
                users.remove_code(&email)?;
                users.save()?;
                warn!(%email, "login code invalidated after too many attempts");
                return Err(FinError::Auth(
                    "Too many attempts, request a new code".into(),
                ));
            }
            users.save()?;
            return Err(FinError::Auth("Invalid login code".into()));
        }

        users.remove_code(&email)?;
        let user = users.find_or_create(&email)?;
        let token = generate_token();
        let now = Utc::now();
        users.insert_session(SessionRecord {
            token: token.expose().to_string(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        })?;
        let purged = users.purge_expired(now)?;
        users.save()?;

        info!(user = %user.id, purged, "session issued");
        Ok(AuthResponse { token, user })
    }

    fn verify_token(&self, token: &AuthToken) -> FinResult<User> {
        self.authenticate(token)
    }

    fn revoke_token(&self, token: &AuthToken) -> FinResult<()> {
        if self.storage.users.remove_session(token.expose())? {
            self.storage.users.save()?;
            info!("session revoked");
        }
        Ok(())
    }

    fn list_transactions(
        &self,
        token: &AuthToken,
        query: TransactionQuery,
    ) -> FinResult<Vec<Transaction>> {
        let user = self.authenticate(token)?;
        self.storage
            .transactions
            .list(user.id, query.kind, query.period()?)
    }

    fn create_transaction(&self, token: &AuthToken, mut input: NewTransaction) -> FinResult<Transaction> {
        let user = self.authenticate(token)?;

        if input.kind == TransactionKind::Expense && input.category.is_none() {
            input.category = Some(DEFAULT_CATEGORY.to_string());
        }
        input.validate().map_err(Self::validation)?;

        let date = input.date.unwrap_or_else(|| self.today());
        let txn = self.storage.transactions.insert_with(user.id, |id| Transaction {
            id,
            kind: input.kind,
            amount: input.amount,
            description: input.description.trim().to_string(),
            date,
            category: input.category.clone(),
            recurring_id: None,
            created_at: Utc::now(),
        })?;
        self.storage.transactions.save()?;

        self.storage.record(AuditEntry::create(
            user.id,
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        ));
        debug!(id = %txn.id, kind = %txn.kind, "transaction created");
        Ok(txn)
    }

    fn delete_transaction(
        &self,
        token: &AuthToken,
        id: TransactionId,
        kind: TransactionKind,
    ) -> FinResult<()> {
        let user = self.authenticate(token)?;
        let removed = self
            .storage
            .transactions
            .delete(user.id, id, kind)?
            .ok_or_else(|| FinError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.record(AuditEntry::delete(
            user.id,
            EntityType::Transaction,
            id.to_string(),
            Some(removed.description.clone()),
            &removed,
        ));
        Ok(())
    }

    fn list_recurring(&self, token: &AuthToken) -> FinResult<Vec<RecurringExpense>> {
        let user = self.authenticate(token)?;
        self.storage.recurring.list(user.id)
    }

    fn create_recurring(
        &self,
        token: &AuthToken,
        input: NewRecurringExpense,
    ) -> FinResult<RecurringExpense> {
        let user = self.authenticate(token)?;
        input.validate().map_err(Self::validation)?;

        let item = self.storage.recurring.insert_with(user.id, |id| RecurringExpense {
            id,
            title: input.title.trim().to_string(),
            amount: input.amount,
            category: input.category.clone(),
            day_of_month: input.day_of_month,
            is_active: true,
            created_at: Utc::now(),
        })?;
        self.storage.recurring.save()?;

        self.storage.record(AuditEntry::create(
            user.id,
            EntityType::RecurringExpense,
            item.id.to_string(),
            Some(item.title.clone()),
            &item,
        ));
        Ok(item)
    }

    fn set_recurring_active(
        &self,
        token: &AuthToken,
        id: RecurringId,
        is_active: bool,
    ) -> FinResult<RecurringExpense> {
        let user = self.authenticate(token)?;
        let before = self
            .storage
            .recurring
            .get(user.id, id)?
            .ok_or_else(|| FinError::recurring_not_found(id.to_string()))?;
        let after = self
            .storage
            .recurring
            .set_active(user.id, id, is_active)?
            .ok_or_else(|| FinError::recurring_not_found(id.to_string()))?;
        self.storage.recurring.save()?;

        self.storage.record(AuditEntry::update(
            user.id,
            EntityType::RecurringExpense,
            id.to_string(),
            Some(after.title.clone()),
            &before,
            &after,
        ));
        Ok(after)
    }

    fn delete_recurring(&self, token: &AuthToken, id: RecurringId) -> FinResult<()> {
        let user = self.authenticate(token)?;
        let removed = self
            .storage
            .recurring
            .delete(user.id, id)?
            .ok_or_else(|| FinError::recurring_not_found(id.to_string()))?;
        self.storage.recurring.save()?;

        self.storage.record(AuditEntry::delete(
            user.id,
            EntityType::RecurringExpense,
            id.to_string(),
            Some(removed.title.clone()),
            &removed,
        ));
        Ok(())
    }

    fn materialize_recurring(&self, token: &AuthToken, period: Period) -> FinResult<MaterializeReport> {
        let user = self.authenticate(token)?;
        let today = self.today();
        let mut report = MaterializeReport::empty(period);

        let mut created = Vec::new();
        for definition in self.storage.recurring.list(user.id)? {
            if !definition.is_active {
                continue;
            }

            let date = definition.booking_date(period, today);
            let inserted = self.storage.transactions.insert_materialized(
                user.id,
                definition.id,
                period,
                |id| Transaction {
                    id,
                    kind: TransactionKind::Expense,
                    amount: definition.amount,
                    description: definition.materialized_description(),
                    date,
                    category: Some(definition.category.clone()),
                    recurring_id: Some(definition.id),
                    created_at: Utc::now(),
                },
            );
            let txn = match inserted {
                Ok(Some(txn)) => txn,
                Ok(None) => {
                    report.skipped.push(SkippedRecurring {
                        fixed_expense_id: definition.id,
                        title: definition.title.clone(),
                        reason: ALREADY_MATERIALIZED.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(self.discard_unsaved_transactions(e)),
            };

            report.created.push(MaterializedExpense {
                id: txn.id,
                amount: txn.amount,
                category: definition.category.clone(),
                description: txn.description.clone(),
                date,
                fixed_expense_id: definition.id,
                fixed_expense_title: definition.title.clone(),
            });
            created.push(txn);
        }

        if !created.is_empty() {
            if let Err(e) = self.storage.transactions.save() {
                return Err(self.discard_unsaved_transactions(e));
            }
        }
        report.total = report.created.len();

        for txn in &created {
            self.storage.record(AuditEntry::create(
                user.id,
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.description.clone()),
                txn,
            ));
        }

        info!(
            %period,
            created = report.created.len(),
            skipped = report.skipped.len(),
            "recurring expenses materialized"
        );
        Ok(report)
    }

    fn list_goals(&self, token: &AuthToken) -> FinResult<Vec<BudgetGoal>> {
        let user = self.authenticate(token)?;
        self.storage.goals.list(user.id)
    }

    fn create_goal(&self, token: &AuthToken, input: NewGoal) -> FinResult<BudgetGoal> {
        let user = self.authenticate(token)?;
        input.validate().map_err(Self::validation)?;

        let goal = self.storage.goals.insert_with(user.id, |id| BudgetGoal {
            id,
            title: input.title.trim().to_string(),
            category: input.category.clone(),
            target_amount: input.target_amount,
            saved_amount: Money::zero(),
            target_date: input.target_date,
            is_completed: false,
            created_at: Utc::now(),
        })?;
        self.storage.goals.save()?;

        self.storage.record(AuditEntry::create(
            user.id,
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &goal,
        ));
        Ok(goal)
    }

    fn add_deposit(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        amount: Money,
        comment: Option<String>,
    ) -> FinResult<BudgetGoal> {
        let user = self.authenticate(token)?;
        validate_deposit_amount(amount).map_err(Self::validation)?;

        let (deposit, goal) = self
            .storage
            .goals
            .add_deposit(user.id, goal_id, amount, clean_comment(comment))?
            .ok_or_else(|| FinError::goal_not_found(goal_id.to_string()))?;
        self.storage.goals.save()?;

        self.storage.record(AuditEntry::create(
            user.id,
            EntityType::Deposit,
            deposit.id.to_string(),
            Some(goal.title.clone()),
            &deposit,
        ));
        Ok(goal)
    }

    fn set_goal_completed(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        is_completed: bool,
    ) -> FinResult<BudgetGoal> {
        let user = self.authenticate(token)?;
        let before = self
            .storage
            .goals
            .get(user.id, goal_id)?
            .ok_or_else(|| FinError::goal_not_found(goal_id.to_string()))?;
        let after = self
            .storage
            .goals
            .set_completed(user.id, goal_id, is_completed)?
            .ok_or_else(|| FinError::goal_not_found(goal_id.to_string()))?;
        self.storage.goals.save()?;

        self.storage.record(AuditEntry::update(
            user.id,
            EntityType::Goal,
            goal_id.to_string(),
            Some(after.title.clone()),
            &before,
            &after,
        ));
        Ok(after)
    }

    fn delete_goal(&self, token: &AuthToken, goal_id: GoalId) -> FinResult<()> {
        let user = self.authenticate(token)?;
        let removed = self
            .storage
            .goals
            .delete(user.id, goal_id)?
            .ok_or_else(|| FinError::goal_not_found(goal_id.to_string()))?;
        self.storage.goals.save()?;

        self.storage.record(AuditEntry::delete(
            user.id,
            EntityType::Goal,
            goal_id.to_string(),
            Some(removed.title.clone()),
            &removed,
        ));
        Ok(())
    }

    fn list_deposits(&self, token: &AuthToken, goal_id: GoalId) -> FinResult<Vec<Deposit>> {
        let user = self.authenticate(token)?;
        self.storage
            .goals
            .list_deposits(user.id, goal_id)?
            .ok_or_else(|| FinError::goal_not_found(goal_id.to_string()))
    }

    fn update_deposit(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        deposit_id: DepositId,
        amount: Money,
        comment: Option<String>,
    ) -> FinResult<Deposit> {
        let user = self.authenticate(token)?;
        validate_deposit_amount(amount).map_err(Self::validation)?;

        let (before, after) = self
            .storage
            .goals
            .update_deposit(user.id, goal_id, deposit_id, amount, clean_comment(comment))?
            .ok_or_else(|| FinError::deposit_not_found(deposit_id.to_string()))?;
        self.storage.goals.save()?;

        self.storage.record(AuditEntry::update(
            user.id,
            EntityType::Deposit,
            deposit_id.to_string(),
            None,
            &before,
            &after,
        ));
        Ok(after)
    }

    fn delete_deposit(
        &self,
        token: &AuthToken,
        goal_id: GoalId,
        deposit_id: DepositId,
    ) -> FinResult<()> {
        let user = self.authenticate(token)?;
        let removed = self
            .storage
            .goals
            .delete_deposit(user.id, goal_id, deposit_id)?
            .ok_or_else(|| FinError::deposit_not_found(deposit_id.to_string()))?;
        self.storage.goals.save()?;

        self.storage.record(AuditEntry::delete(
            user.id,
            EntityType::Deposit,
            deposit_id.to_string(),
            None,
            &removed,
        ));
        Ok(())
    }
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
