//! Storage layer for fintrack
//!
//! JSON file storage with atomic writes and per-user ownership of records.

pub mod file_io;
pub mod goals;
pub mod recurring;
pub mod transactions;
pub mod users;

pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use recurring::RecurringRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use serde::{Deserialize, Serialize};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::FintrackPaths;
use crate::error::FinError;
use crate::models::UserId;

/// A stored record tagged with the user that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owned<T> {
    pub owner: UserId,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Owned<T> {
    pub fn new(owner: UserId, item: T) -> Self {
        Self { owner, item }
    }
}

pub(crate) fn lock_error<E: std::fmt::Display>(e: E) -> FinError {
    FinError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FintrackPaths,
    pub transactions: TransactionRepository,
    pub recurring: RecurringRepository,
    pub goals: GoalRepository,
    pub users: UserRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: FintrackPaths) -> Result<Self, FinError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            recurring: RecurringRepository::new(paths.recurring_file()),
            goals: GoalRepository::new(paths.goals_file()),
            users: UserRepository::new(paths.users_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &FintrackPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), FinError> {
        self.transactions.load()?;
        self.recurring.load()?;
        self.goals.load()?;
        self.users.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FinError> {
        self.transactions.save()?;
        self.recurring.save()?;
        self.goals.save()?;
        self.users.save()?;
        Ok(())
    }

    /// Append to the audit log; failures are logged, never propagated
    pub fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            tracing::warn!(error = %e, entity = %entry.entity_type, "failed to write audit entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::EntityType;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
        storage.save_all().unwrap();
        assert!(temp_dir.path().join("data").join("goals.json").exists());
    }

    #[test]
    fn test_record_appends_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage.record(AuditEntry::create(
            UserId::new(1),
            EntityType::Goal,
            "goal-1",
            None,
            &serde_json::json!({}),
        ));
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }
}
