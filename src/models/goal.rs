//! Savings goals and their deposit ledgers
//!
//! A goal is a savings target. Deposits add to the saved amount; a negative
//! deposit is a withdrawal. The backend keeps `saved_amount` equal to the sum
//! of the goal's deposits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category;
use super::ids::{DepositId, GoalId};
use super::money::Money;

/// Share of the target below which the remaining amount is flagged as low
pub const LOW_REMAINING_PERCENT: f64 = 20.0;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetGoal {
    pub id: GoalId,
    pub title: String,
    pub category: String,
    pub target_amount: Money,
    pub saved_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl BudgetGoal {
    pub fn category_label(&self) -> &str {
        category::label_for(&self.category)
    }
}

impl fmt::Display for BudgetGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} / {})",
            self.title, self.saved_amount, self.target_amount
        )
    }
}

/// One ledger entry of a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: DepositId,
    pub goal_id: GoalId,
    /// Positive for a deposit, negative for a withdrawal
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Deposit {
    pub fn is_withdrawal(&self) -> bool {
        self.amount.is_negative()
    }
}

/// Input for creating a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub category: String,
    pub target_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

impl NewGoal {
    /// Validate the input
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }
        if !self.target_amount.is_within_limit() {
            return Err(GoalValidationError::AmountTooLarge(self.target_amount));
        }
        if category::find(&self.category).is_none() {
            return Err(GoalValidationError::UnknownCategory(self.category.clone()));
        }
        Ok(())
    }
}

/// Check a deposit amount before sending it
pub fn validate_deposit_amount(amount: Money) -> Result<(), GoalValidationError> {
    if amount.is_zero() {
        Err(GoalValidationError::ZeroDeposit)
    } else if !amount.is_within_limit() {
        Err(GoalValidationError::AmountTooLarge(amount))
    } else {
        Ok(())
    }
}

/// Validation errors for goals and deposits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyTitle,
    NonPositiveTarget(Money),
    AmountTooLarge(Money),
    UnknownCategory(String),
    ZeroDeposit,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title cannot be empty"),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Target amount must be greater than zero, got {}", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the limit of {}", amount, Money::MAX_AMOUNT)
            }
            Self::UnknownCategory(key) => write!(
                f,
                "Unknown category '{}'. Valid categories: {}",
                key,
                category::keys()
            ),
            Self::ZeroDeposit => write!(f, "Deposit amount cannot be zero"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_goal() {
        let mut goal = NewGoal {
            title: "Vacation".into(),
            category: "entertainment".into(),
            target_amount: Money::from_units(2000),
            target_date: None,
        };
        assert!(goal.validate().is_ok());

        goal.target_amount = Money::from_units(-1);
        assert!(matches!(
            goal.validate(),
            Err(GoalValidationError::NonPositiveTarget(_))
        ));

        goal.target_amount = Money::from_units(1);
        goal.title = String::new();
        assert_eq!(goal.validate(), Err(GoalValidationError::EmptyTitle));
    }

    #[test]
    fn test_deposit_amount() {
        assert!(validate_deposit_amount(Money::from_units(10)).is_ok());
        assert!(validate_deposit_amount(Money::from_units(-10)).is_ok());
        assert_eq!(
            validate_deposit_amount(Money::zero()),
            Err(GoalValidationError::ZeroDeposit)
        );
    }
}
