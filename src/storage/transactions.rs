//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. Every record
//! is owned by one user and only visible to that user.
//!
//! The same file holds the materialization records, so an expense produced
//! from a recurring definition and the record marking that month as done are
//! always written together.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FinError;
use crate::models::{Period, RecurringId, Transaction, TransactionId, TransactionKind, UserId};

use super::file_io::JsonFile;
use super::Owned;

/// Marks a recurring definition as already applied for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializationRecord {
    pub recurring_id: RecurringId,
    pub year: i32,
    pub month: u32,
    pub transaction_id: TransactionId,
    pub created_at: DateTime<Utc>,
}

impl MaterializationRecord {
    fn covers(&self, recurring_id: RecurringId, period: Period) -> bool {
        self.recurring_id == recurring_id && self.year == period.year() && self.month == period.month()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    #[serde(default)]
    next_id: i64,
    #[serde(default)]
    transactions: Vec<Owned<Transaction>>,
    #[serde(default)]
    materialized: Vec<MaterializationRecord>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    file: JsonFile<TransactionData>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), FinError> {
        self.file.load()
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), FinError> {
        self.file.save()
    }

    /// Assign the next ID, build the transaction and store it
    pub fn insert_with<F>(&self, owner: UserId, build: F) -> Result<Transaction, FinError>
    where
        F: FnOnce(TransactionId) -> Transaction,
    {
        let mut data = self.file.write()?;
        data.next_id += 1;
        let txn = build(TransactionId::new(data.next_id));
        data.transactions.push(Owned::new(owner, txn.clone()));
        Ok(txn)
    }

    /// Store an expense produced by `recurring_id` together with its record
    ///
    /// Returns `None` when the definition was already applied for `period`.
    pub fn insert_materialized<F>(
        &self,
        owner: UserId,
        recurring_id: RecurringId,
        period: Period,
        build: F,
    ) -> Result<Option<Transaction>, FinError>
    where
        F: FnOnce(TransactionId) -> Transaction,
    {
        let mut data = self.file.write()?;
        if data.materialized.iter().any(|m| m.covers(recurring_id, period)) {
            return Ok(None);
        }
        data.next_id += 1;
        let txn = build(TransactionId::new(data.next_id));
        data.transactions.push(Owned::new(owner, txn.clone()));
        data.materialized.push(MaterializationRecord {
            recurring_id,
            year: period.year(),
            month: period.month(),
            transaction_id: txn.id,
            created_at: Utc::now(),
        });
        Ok(Some(txn))
    }

    /// Transactions of one kind, optionally limited to a period, newest first
    pub fn list(
        &self,
        owner: UserId,
        kind: TransactionKind,
        period: Option<Period>,
    ) -> Result<Vec<Transaction>, FinError> {
        let data = self.file.read()?;

        let mut transactions: Vec<_> = data
            .transactions
            .iter()
            .filter(|r| r.owner == owner && r.item.kind == kind)
            .filter(|r| period.map_or(true, |p| p.contains(r.item.date)))
            .map(|r| r.item.clone())
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(transactions)
    }

    pub fn get(&self, owner: UserId, id: TransactionId) -> Result<Option<Transaction>, FinError> {
        let data = self.file.read()?;
        Ok(data
            .transactions
            .iter()
            .find(|r| r.owner == owner && r.item.id == id)
            .map(|r| r.item.clone()))
    }

    /// Delete a transaction of the given kind, returning it if it existed
    pub fn delete(
        &self,
        owner: UserId,
        id: TransactionId,
        kind: TransactionKind,
    ) -> Result<Option<Transaction>, FinError> {
        let mut data = self.file.write()?;
        let position = data
            .transactions
            .iter()
            .position(|r| r.owner == owner && r.item.id == id && r.item.kind == kind);
        Ok(position.map(|i| data.transactions.remove(i).item))
    }

    /// Total number of stored transactions across all users
    pub fn count(&self) -> Result<usize, FinError> {
        let data = self.file.read()?;
        Ok(data.transactions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn add(
        repo: &TransactionRepository,
        owner: i64,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Transaction {
        repo.insert_with(UserId::new(owner), |id| Transaction {
            id,
            kind,
            amount: Money::from_units(10),
            description: "test".into(),
            date,
            category: (kind == TransactionKind::Expense).then(|| "food".to_string()),
            recurring_id: None,
            created_at: Utc::now(),
        })
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ids_are_sequential() {
        let (_temp_dir, repo) = create_test_repo();
        let a = add(&repo, 1, TransactionKind::Expense, date(2025, 1, 1));
        let b = add(&repo, 2, TransactionKind::Income, date(2025, 1, 1));
        assert_eq!(a.id, TransactionId::new(1));
        assert_eq!(b.id, TransactionId::new(2));
    }

    #[test]
    fn test_list_filters_owner_kind_and_period() {
        let (_temp_dir, repo) = create_test_repo();
        add(&repo, 1, TransactionKind::Expense, date(2025, 1, 5));
        add(&repo, 1, TransactionKind::Expense, date(2025, 1, 20));
        add(&repo, 1, TransactionKind::Expense, date(2025, 2, 1));
        add(&repo, 1, TransactionKind::Income, date(2025, 1, 10));
        add(&repo, 2, TransactionKind::Expense, date(2025, 1, 10));

        let jan = Period::new(2025, 1).unwrap();
        let expenses = repo
            .list(UserId::new(1), TransactionKind::Expense, Some(jan))
            .unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].date, date(2025, 1, 20));
        assert_eq!(expenses[1].date, date(2025, 1, 5));

        let all = repo.list(UserId::new(1), TransactionKind::Expense, None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_delete_requires_matching_owner_and_kind() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = add(&repo, 1, TransactionKind::Expense, date(2025, 1, 5));

        assert!(repo
            .delete(UserId::new(2), txn.id, TransactionKind::Expense)
            .unwrap()
            .is_none());
        assert!(repo
            .delete(UserId::new(1), txn.id, TransactionKind::Income)
            .unwrap()
            .is_none());
        assert!(repo
            .delete(UserId::new(1), txn.id, TransactionKind::Expense)
            .unwrap()
            .is_some());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let (temp_dir, repo) = create_test_repo();
        let txn = add(&repo, 1, TransactionKind::Expense, date(2025, 1, 5));
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();

        let loaded = repo2.get(UserId::new(1), txn.id).unwrap().unwrap();
        assert_eq!(loaded, txn);

        let next = add(&repo2, 1, TransactionKind::Income, date(2025, 1, 6));
        assert_eq!(next.id, TransactionId::new(2));
    }

    #[test]
    fn test_materialized_expense_and_record_persist_together() {
        let (temp_dir, repo) = create_test_repo();
        let rent = RecurringId::new(3);
        let march = Period::new(2024, 3).unwrap();
        let build = |id| Transaction {
            id,
            kind: TransactionKind::Expense,
            amount: Money::from_units(900),
            description: "Rent (auto-payment)".into(),
            date: date(2024, 3, 25),
            category: Some("utilities".into()),
            recurring_id: Some(rent),
            created_at: Utc::now(),
        };

        let first = repo.insert_materialized(UserId::new(1), rent, march, build).unwrap();
        assert!(first.is_some());
        assert!(repo.insert_materialized(UserId::new(1), rent, march, build).unwrap().is_none());
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
        assert!(reloaded.insert_materialized(UserId::new(1), rent, march, build).unwrap().is_none());
        assert!(reloaded
            .insert_materialized(UserId::new(1), rent, march.next(), build)
            .unwrap()
            .is_some());
    }
}
