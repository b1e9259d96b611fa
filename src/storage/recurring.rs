//! Recurring expense repository
//!
//! Definitions only. The records that make applying a definition idempotent
//! live next to the transactions they produce.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::FinError;
use crate::models::{RecurringExpense, RecurringId, UserId};

use super::file_io::JsonFile;
use super::Owned;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecurringData {
    #[serde(default)]
    next_id: i64,
    #[serde(default)]
    items: Vec<Owned<RecurringExpense>>,
}

/// Repository for recurring expense persistence
pub struct RecurringRepository {
    file: JsonFile<RecurringData>,
}

impl RecurringRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn load(&self) -> Result<(), FinError> {
        self.file.load()
    }

    pub fn save(&self) -> Result<(), FinError> {
        self.file.save()
    }

    /// Assign the next ID, build the definition and store it
    pub fn insert_with<F>(&self, owner: UserId, build: F) -> Result<RecurringExpense, FinError>
    where
        F: FnOnce(RecurringId) -> RecurringExpense,
    {
        let mut data = self.file.write()?;
        data.next_id += 1;
        let item = build(RecurringId::new(data.next_id));
        data.items.push(Owned::new(owner, item.clone()));
        Ok(item)
    }

    /// All definitions of a user, ordered by due day
    pub fn list(&self, owner: UserId) -> Result<Vec<RecurringExpense>, FinError> {
        let data = self.file.read()?;
        let mut items: Vec<_> = data
            .items
            .iter()
            .filter(|r| r.owner == owner)
            .map(|r| r.item.clone())
            .collect();
        items.sort_by(|a, b| a.day_of_month.cmp(&b.day_of_month).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    pub fn get(&self, owner: UserId, id: RecurringId) -> Result<Option<RecurringExpense>, FinError> {
        let data = self.file.read()?;
        Ok(data
            .items
            .iter()
            .find(|r| r.owner == owner && r.item.id == id)
            .map(|r| r.item.clone()))
    }

    /// Set the active flag, returning the updated definition
    pub fn set_active(
        &self,
        owner: UserId,
        id: RecurringId,
        is_active: bool,
    ) -> Result<Option<RecurringExpense>, FinError> {
        let mut data = self.file.write()?;
        Ok(data
            .items
            .iter_mut()
            .find(|r| r.owner == owner && r.item.id == id)
            .map(|r| {
                r.item.is_active = is_active;
                r.item.clone()
            }))
    }

    /// Delete a definition
    pub fn delete(&self, owner: UserId, id: RecurringId) -> Result<Option<RecurringExpense>, FinError> {
        let mut data = self.file.write()?;
        let Some(position) = data
            .items
            .iter()
            .position(|r| r.owner == owner && r.item.id == id)
        else {
            return Ok(None);
        };
        Ok(Some(data.items.remove(position).item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, RecurringRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = RecurringRepository::new(temp_dir.path().join("recurring.json"));
        (temp_dir, repo)
    }

    fn add(repo: &RecurringRepository, owner: i64, title: &str, day: u32) -> RecurringExpense {
        repo.insert_with(UserId::new(owner), |id| RecurringExpense {
            id,
            title: title.into(),
            amount: Money::from_units(50),
            category: "utilities".into(),
            day_of_month: day,
            is_active: true,
            created_at: Utc::now(),
        })
        .unwrap()
    }

    #[test]
    fn test_list_sorted_by_day() {
        let (_temp_dir, repo) = create_test_repo();
        add(&repo, 1, "Rent", 25);
        add(&repo, 1, "Phone", 3);
        add(&repo, 2, "Elsewhere", 1);

        let items = repo.list(UserId::new(1)).unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Phone", "Rent"]);
    }

    #[test]
    fn test_set_active() {
        let (_temp_dir, repo) = create_test_repo();
        let item = add(&repo, 1, "Rent", 25);

        let updated = repo.set_active(UserId::new(1), item.id, false).unwrap().unwrap();
        assert!(!updated.is_active);
        assert!(repo.set_active(UserId::new(2), item.id, false).unwrap().is_none());
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let (temp_dir, repo) = create_test_repo();
        let item = add(&repo, 1, "Rent", 25);

        assert!(repo.delete(UserId::new(2), item.id).unwrap().is_none());
        repo.save().unwrap();

        let reloaded = RecurringRepository::new(temp_dir.path().join("recurring.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.delete(UserId::new(1), item.id).unwrap(), Some(item));
        assert!(reloaded.list(UserId::new(1)).unwrap().is_empty());
    }
}
