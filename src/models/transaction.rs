//! Transaction model
//!
//! A transaction is a dated income or expense. Expenses carry a catalog
//! category; incomes never do. Transactions produced by materializing a
//! recurring expense remember which definition they came from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category;
use super::ids::{RecurringId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Always positive; the direction comes from `kind`
    pub amount: Money,

    pub description: String,

    pub date: NaiveDate,

    /// Catalog key, present only for expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Set when the expense was materialized from a recurring definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<RecurringId>,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Whether this expense came from a recurring definition
    pub fn is_recurring(&self) -> bool {
        self.recurring_id.is_some()
    }

    /// Category label for display, empty for incomes
    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .map(category::label_for)
            .unwrap_or("")
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Input for creating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Defaults to today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    pub fn expense(amount: Money, description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount,
            description: description.into(),
            category: Some(category.into()),
            date: None,
        }
    }

    pub fn income(amount: Money, description: impl Into<String>) -> Self {
        Self {
            kind: TransactionKind::Income,
            amount,
            description: description.into(),
            category: None,
            date: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Validate the input
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_limit() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        match (self.kind, self.category.as_deref()) {
            (TransactionKind::Expense, None) => Err(TransactionValidationError::MissingCategory),
            (TransactionKind::Expense, Some(key)) if category::find(key).is_none() => {
                Err(TransactionValidationError::UnknownCategory(key.to_string()))
            }
            (TransactionKind::Income, Some(_)) => {
                Err(TransactionValidationError::CategoryOnIncome)
            }
            _ => Ok(()),
        }
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    EmptyDescription,
    MissingCategory,
    UnknownCategory(String),
    CategoryOnIncome,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero, got {}", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the limit of {}", amount, Money::MAX_AMOUNT)
            }
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::MissingCategory => write!(f, "Expenses require a category"),
            Self::UnknownCategory(key) => write!(
                f,
                "Unknown category '{}'. Valid categories: {}",
                key,
                category::keys()
            ),
            Self::CategoryOnIncome => write!(f, "Income cannot have a category"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_inputs() {
        assert!(NewTransaction::expense(Money::from_units(5), "Coffee", "restaurants")
            .validate()
            .is_ok());
        assert!(NewTransaction::income(Money::from_units(5000), "Salary")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let input = NewTransaction::income(Money::zero(), "Nothing");
        assert_eq!(
            input.validate(),
            Err(TransactionValidationError::NonPositiveAmount(Money::zero()))
        );
    }

    #[test]
    fn test_rejects_amount_over_limit() {
        let over = Money::MAX_AMOUNT + Money::from_cents(1);
        let input = NewTransaction::income(over, "Lottery");
        assert_eq!(
            input.validate(),
            Err(TransactionValidationError::AmountTooLarge(over))
        );
    }

    #[test]
    fn test_category_rules() {
        let mut expense = NewTransaction::expense(Money::from_units(5), "Taxi", "transport");
        expense.category = None;
        assert_eq!(
            expense.validate(),
            Err(TransactionValidationError::MissingCategory)
        );

        expense.category = Some("yachts".into());
        assert!(matches!(
            expense.validate(),
            Err(TransactionValidationError::UnknownCategory(_))
        ));

        let mut income = NewTransaction::income(Money::from_units(5), "Gift");
        income.category = Some("food".into());
        assert_eq!(
            income.validate(),
            Err(TransactionValidationError::CategoryOnIncome)
        );
    }

    #[test]
    fn test_rejects_blank_description() {
        let input = NewTransaction::expense(Money::from_units(5), "   ", "food");
        assert_eq!(
            input.validate(),
            Err(TransactionValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_wire_shape() {
        let input = NewTransaction::expense(Money::from_cents(50000), "Groceries", "food")
            .on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 50000);
        assert_eq!(json["date"], "2025-03-01");
    }
}
