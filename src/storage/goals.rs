//! Goal repository
//!
//! Goals and their deposit ledgers live in one file. Every ledger mutation
//! recomputes the goal's saved amount from its deposits.

use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::FinError;
use crate::models::{BudgetGoal, Deposit, DepositId, GoalId, Money, UserId};

use super::file_io::JsonFile;
use super::Owned;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GoalData {
    #[serde(default)]
    next_goal_id: i64,
    #[serde(default)]
    next_deposit_id: i64,
    #[serde(default)]
    goals: Vec<Owned<BudgetGoal>>,
    #[serde(default)]
    deposits: Vec<Deposit>,
}

impl GoalData {
    fn goal_mut(&mut self, owner: UserId, id: GoalId) -> Option<&mut BudgetGoal> {
        self.goals
            .iter_mut()
            .find(|r| r.owner == owner && r.item.id == id)
            .map(|r| &mut r.item)
    }

    fn owns(&self, owner: UserId, id: GoalId) -> bool {
        self.goals.iter().any(|r| r.owner == owner && r.item.id == id)
    }

    fn recompute_saved(&mut self, owner: UserId, id: GoalId) -> Option<BudgetGoal> {
        let saved: Money = self
            .deposits
            .iter()
            .filter(|d| d.goal_id == id)
            .map(|d| d.amount)
            .sum();
        self.goal_mut(owner, id).map(|goal| {
            goal.saved_amount = saved;
            goal.clone()
        })
    }
}

/// Repository for goal and deposit persistence
pub struct GoalRepository {
    file: JsonFile<GoalData>,
}

impl GoalRepository {
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

    /// Assign the next ID, build the goal and store it
    pub fn insert_with<F>(&self, owner: UserId, build: F) -> Result<BudgetGoal, FinError>
    where
        F: FnOnce(GoalId) -> BudgetGoal,
    {
        let mut data = self.file.write()?;
        data.next_goal_id += 1;
        let goal = build(GoalId::new(data.next_goal_id));
        data.goals.push(Owned::new(owner, goal.clone()));
        Ok(goal)
    }

    /// Open goals first, then by target date (undated last)
    pub fn list(&self, owner: UserId) -> Result<Vec<BudgetGoal>, FinError> {
        let data = self.file.read()?;
        let mut goals: Vec<_> = data
            .goals
            .iter()
            .filter(|r| r.owner == owner)
            .map(|r| r.item.clone())
            .collect();
        goals.sort_by(|a, b| {
            a.is_completed
                .cmp(&b.is_completed)
                .then_with(|| match (a.target_date, b.target_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                })
                .then(a.id.cmp(&b.id))
        });
        Ok(goals)
    }

    pub fn get(&self, owner: UserId, id: GoalId) -> Result<Option<BudgetGoal>, FinError> {
        let data = self.file.read()?;
        Ok(data
            .goals
            .iter()
            .find(|r| r.owner == owner && r.item.id == id)
            .map(|r| r.item.clone()))
    }

    pub fn set_completed(
        &self,
        owner: UserId,
        id: GoalId,
        is_completed: bool,
    ) -> Result<Option<BudgetGoal>, FinError> {
        let mut data = self.file.write()?;
        Ok(data.goal_mut(owner, id).map(|goal| {
            goal.is_completed = is_completed;
            goal.clone()
        }))
    }

    /// Delete a goal together with its ledger
    pub fn delete(&self, owner: UserId, id: GoalId) -> Result<Option<BudgetGoal>, FinError> {
        let mut data = self.file.write()?;
        let Some(position) = data
            .goals
            .iter()
            .position(|r| r.owner == owner && r.item.id == id)
        else {
            return Ok(None);
        };
        let removed = data.goals.remove(position).item;
        data.deposits.retain(|d| d.goal_id != id);
        Ok(Some(removed))
    }

    /// Append a ledger entry; `None` when the goal is not the owner's
    pub fn add_deposit(
        &self,
        owner: UserId,
        goal_id: GoalId,
        amount: Money,
        comment: Option<String>,
    ) -> Result<Option<(Deposit, BudgetGoal)>, FinError> {
        let mut data = self.file.write()?;
        if !data.owns(owner, goal_id) {
            return Ok(None);
        }

        data.next_deposit_id += 1;
        let deposit = Deposit {
            id: DepositId::new(data.next_deposit_id),
            goal_id,
            amount,
            comment,
            created_at: Utc::now(),
        };
        data.deposits.push(deposit.clone());
        Ok(data
            .recompute_saved(owner, goal_id)
            .map(|goal| (deposit, goal)))
    }

    /// Ledger of a goal, newest first
    pub fn list_deposits(&self, owner: UserId, goal_id: GoalId) -> Result<Option<Vec<Deposit>>, FinError> {
        let data = self.file.read()?;
        if !data.owns(owner, goal_id) {
            return Ok(None);
        }
        let mut deposits: Vec<_> = data
            .deposits
            .iter()
            .filter(|d| d.goal_id == goal_id)
            .cloned()
            .collect();
        deposits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(Some(deposits))
    }

    /// Rewrite a ledger entry, returning the entry before and after the edit
    pub fn update_deposit(
        &self,
        owner: UserId,
        goal_id: GoalId,
        deposit_id: DepositId,
        amount: Money,
        comment: Option<String>,
    ) -> Result<Option<(Deposit, Deposit)>, FinError> {
        let mut data = self.file.write()?;
        if !data.owns(owner, goal_id) {
            return Ok(None);
        }
        let Some(entry) = data
            .deposits
            .iter_mut()
            .find(|d| d.goal_id == goal_id && d.id == deposit_id)
        else {
            return Ok(None);
        };
        let before = entry.clone();
        entry.amount = amount;
        entry.comment = comment;
        let after = entry.clone();
        data.recompute_saved(owner, goal_id);
        Ok(Some((before, after)))
    }

    pub fn delete_deposit(
        &self,
        owner: UserId,
        goal_id: GoalId,
        deposit_id: DepositId,
    ) -> Result<Option<Deposit>, FinError> {
        let mut data = self.file.write()?;
        if !data.owns(owner, goal_id) {
            return Ok(None);
        }
        let Some(position) = data
            .deposits
            .iter()
            .position(|d| d.goal_id == goal_id && d.id == deposit_id)
        else {
            return Ok(None);
        };
        let removed = data.deposits.remove(position);
        data.recompute_saved(owner, goal_id);
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GoalRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        (temp_dir, repo)
    }

    fn add_goal(repo: &GoalRepository, owner: i64, title: &str) -> BudgetGoal {
        repo.insert_with(UserId::new(owner), |id| BudgetGoal {
            id,
            title: title.into(),
            category: "other".into(),
            target_amount: Money::from_units(1000),
            saved_amount: Money::zero(),
            target_date: None,
            is_completed: false,
            created_at: Utc::now(),
        })
        .unwrap()
    }

    fn saved(repo: &GoalRepository, id: GoalId) -> Money {
        repo.get(UserId::new(1), id).unwrap().unwrap().saved_amount
    }

    #[test]
    fn test_saved_amount_tracks_ledger() {
        let (_temp_dir, repo) = create_test_repo();
        let goal = add_goal(&repo, 1, "Laptop");
        let owner = UserId::new(1);

        let (first, _) = repo
            .add_deposit(owner, goal.id, Money::from_units(300), None)
            .unwrap()
            .unwrap();
        let (second, updated) = repo
            .add_deposit(owner, goal.id, Money::from_units(-50), Some("fix".into()))
            .unwrap()
            .unwrap();
        assert_eq!(updated.saved_amount, Money::from_units(250));

        repo.update_deposit(owner, goal.id, first.id, Money::from_units(400), None)
            .unwrap()
            .unwrap();
        assert_eq!(saved(&repo, goal.id), Money::from_units(350));

        repo.delete_deposit(owner, goal.id, second.id).unwrap().unwrap();
        assert_eq!(saved(&repo, goal.id), Money::from_units(400));

        let ledger = repo.list_deposits(owner, goal.id).unwrap().unwrap();
        let total: Money = ledger.iter().map(|d| d.amount).sum();
        assert_eq!(total, saved(&repo, goal.id));
    }

    #[test]
    fn test_foreign_goal_is_invisible() {
        let (_temp_dir, repo) = create_test_repo();
        let goal = add_goal(&repo, 1, "Laptop");
        let stranger = UserId::new(2);

        assert!(repo
            .add_deposit(stranger, goal.id, Money::from_units(1), None)
            .unwrap()
            .is_none());
        assert!(repo.list_deposits(stranger, goal.id).unwrap().is_none());
        assert!(repo.delete(stranger, goal.id).unwrap().is_none());
    }

    #[test]
    fn test_list_order() {
        let (_temp_dir, repo) = create_test_repo();
        let undated = add_goal(&repo, 1, "Undated");
        let later = repo
            .insert_with(UserId::new(1), |id| BudgetGoal {
                target_date: NaiveDate::from_ymd_opt(2026, 6, 1),
                ..add_goal_template(id, "Later")
            })
            .unwrap();
        let sooner = repo
            .insert_with(UserId::new(1), |id| BudgetGoal {
                target_date: NaiveDate::from_ymd_opt(2025, 6, 1),
                ..add_goal_template(id, "Sooner")
            })
            .unwrap();
        repo.set_completed(UserId::new(1), sooner.id, true).unwrap();

        let order: Vec<_> = repo
            .list(UserId::new(1))
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(order, vec![later.id, undated.id, sooner.id]);
    }

    fn add_goal_template(id: GoalId, title: &str) -> BudgetGoal {
        BudgetGoal {
            id,
            title: title.into(),
            category: "other".into(),
            target_amount: Money::from_units(100),
            saved_amount: Money::zero(),
            target_date: None,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_delete_goal_drops_ledger() {
        let (temp_dir, repo) = create_test_repo();
        let goal = add_goal(&repo, 1, "Trip");
        repo.add_deposit(UserId::new(1), goal.id, Money::from_units(5), None)
            .unwrap();
        repo.save().unwrap();

        let reloaded = GoalRepository::new(temp_dir.path().join("goals.json"));
        reloaded.load().unwrap();
        assert_eq!(saved(&reloaded, goal.id), Money::from_units(5));

        reloaded.delete(UserId::new(1), goal.id).unwrap().unwrap();
        assert!(reloaded.list(UserId::new(1)).unwrap().is_empty());
    }
}
