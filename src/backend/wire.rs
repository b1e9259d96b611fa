//! Request and response shapes exchanged with the backend
//!
//! Field names serialize in camelCase to match the JSON API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FinError, FinResult};
use crate::models::{
    AuthToken, Money, Period, RecurringId, TransactionId, TransactionKind, User,
};

/// Reply to a `send_code` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub message: String,
}

/// Reply to a successful `verify_code`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: AuthToken,
    pub user: User,
}

/// Filter for listing transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl TransactionQuery {
    /// Every transaction of `kind`, regardless of date
    pub fn all(kind: TransactionKind) -> Self {
        Self {
            kind,
            year: None,
            month: None,
        }
    }

    pub fn for_period(kind: TransactionKind, period: Period) -> Self {
        Self {
            kind,
            year: Some(period.year()),
            month: Some(period.month()),
        }
    }

    /// The period window. `None` lists every date; a partial or invalid
    /// pair is rejected rather than widened to all dates.
    pub fn period(&self) -> FinResult<Option<Period>> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Period::new(year, month)
                .map(Some)
                .map_err(|e| FinError::Validation(e.to_string())),
            (None, None) => Ok(None),
            _ => Err(FinError::Validation(
                "Year and month must be given together".into(),
            )),
        }
    }
}

/// One expense created by materialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedExpense {
    pub id: TransactionId,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub fixed_expense_id: RecurringId,
    pub fixed_expense_title: String,
}

/// A definition left alone by materialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecurring {
    pub fixed_expense_id: RecurringId,
    pub title: String,
    pub reason: String,
}

/// Outcome of applying recurring expenses to a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializeReport {
    pub created: Vec<MaterializedExpense>,
    pub skipped: Vec<SkippedRecurring>,
    /// Number of expenses created
    pub total: usize,
    pub year: i32,
    pub month: u32,
}

impl MaterializeReport {
    pub fn empty(period: Period) -> Self {
        Self {
            created: Vec::new(),
            skipped: Vec::new(),
            total: 0,
            year: period.year(),
            month: period.month(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_period() {
        let may = Period::new(2025, 5).unwrap();
        let query = TransactionQuery::for_period(TransactionKind::Income, may);
        assert_eq!(query.period().unwrap(), Some(may));
        assert_eq!(TransactionQuery::all(TransactionKind::Income).period().unwrap(), None);

        let json = serde_json::to_value(query).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["year"], 2025);
        assert_eq!(json["month"], 5);
    }

    #[test]
    fn test_query_rejects_partial_or_invalid_period() {
        let mut query = TransactionQuery::all(TransactionKind::Expense);
        query.year = Some(2025);
        query.month = Some(13);
        assert!(query.period().unwrap_err().is_validation());

        query.month = None;
        assert!(query.period().unwrap_err().is_validation());

        query.year = None;
        query.month = Some(4);
        assert!(query.period().unwrap_err().is_validation());
    }

    #[test]
    fn test_materialized_expense_field_names() {
        let expense = MaterializedExpense {
            id: TransactionId::new(4),
            amount: Money::from_units(30),
            category: "utilities".into(),
            description: "Internet (auto-payment)".into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            fixed_expense_id: RecurringId::new(2),
            fixed_expense_title: "Internet".into(),
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["fixedExpenseId"], 2);
        assert_eq!(json["fixedExpenseTitle"], "Internet");
    }
}
