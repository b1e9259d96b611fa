//! Recurring ("fixed") expense definitions
//!
//! A definition is a template: it never counts toward a month's totals by
//! itself. Materialization turns an active definition into a concrete
//! expense transaction for one (year, month), at most once.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category;
use super::ids::RecurringId;
use super::money::Money;
use super::period::Period;

/// Suffix appended to the title of a materialized expense
pub const AUTO_PAYMENT_SUFFIX: &str = "(auto-payment)";

/// A monthly recurring expense template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: RecurringId,
    pub title: String,
    pub amount: Money,
    pub category: String,
    /// Day of the month the payment is due, 1..=31
    pub day_of_month: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RecurringExpense {
    /// Date the materialized expense is booked on
    ///
    /// The due day is clamped to the month's length. In the month containing
    /// `today` a due day still in the future is booked on `today` instead.
    pub fn booking_date(&self, period: Period, today: NaiveDate) -> NaiveDate {
        let mut day = self.day_of_month;
        if period.is_current(today) && day > today.day() {
            day = today.day();
        }
        period.clamped_date(day)
    }

    /// Description given to the materialized expense
    pub fn materialized_description(&self) -> String {
        format!("{} {}", self.title, AUTO_PAYMENT_SUFFIX)
    }

    pub fn category_label(&self) -> &str {
        category::label_for(&self.category)
    }
}

impl fmt::Display for RecurringExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} on day {})", self.title, self.amount, self.day_of_month)
    }
}

/// Input for creating a recurring expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringExpense {
    pub title: String,
    pub amount: Money,
    pub category: String,
    pub day_of_month: u32,
}

impl NewRecurringExpense {
    /// Validate the input
    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        if self.title.trim().is_empty() {
            return Err(RecurringValidationError::EmptyTitle);
        }

        if !self.amount.is_positive() {
            return Err(RecurringValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_limit() {
            return Err(RecurringValidationError::AmountTooLarge(self.amount));
        }

        if category::find(&self.category).is_none() {
            return Err(RecurringValidationError::UnknownCategory(
                self.category.clone(),
            ));
        }

        if !(1..=31).contains(&self.day_of_month) {
            return Err(RecurringValidationError::DayOutOfRange(self.day_of_month));
        }

        Ok(())
    }
}

/// Validation errors for recurring expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    EmptyTitle,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    UnknownCategory(String),
    DayOutOfRange(u32),
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero, got {}", amount)
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
            Self::DayOutOfRange(day) => {
                write!(f, "Day of month must be between 1 and 31, got {}", day)
            }
        }
    }
}

impl std::error::Error for RecurringValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(day_of_month: u32) -> RecurringExpense {
        RecurringExpense {
            id: RecurringId::new(1),
            title: "Rent".into(),
            amount: Money::from_units(900),
            category: "utilities".into(),
            day_of_month,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_booking_date_past_month_clamps_to_length() {
        let feb = Period::new(2023, 2).unwrap();
        let today = date(2023, 5, 10);
        assert_eq!(definition(31).booking_date(feb, today), date(2023, 2, 28));
        assert_eq!(definition(5).booking_date(feb, today), date(2023, 2, 5));
    }

    #[test]
    fn test_booking_date_current_month_never_in_future() {
        let may = Period::new(2023, 5).unwrap();
        let today = date(2023, 5, 10);
        assert_eq!(definition(25).booking_date(may, today), date(2023, 5, 10));
        assert_eq!(definition(3).booking_date(may, today), date(2023, 5, 3));
    }

    #[test]
    fn test_materialized_description() {
        assert_eq!(definition(1).materialized_description(), "Rent (auto-payment)");
    }

    #[test]
    fn test_validate() {
        let mut input = NewRecurringExpense {
            title: "Internet".into(),
            amount: Money::from_units(30),
            category: "utilities".into(),
            day_of_month: 15,
        };
        assert!(input.validate().is_ok());

        input.day_of_month = 32;
        assert_eq!(
            input.validate(),
            Err(RecurringValidationError::DayOutOfRange(32))
        );

        input.day_of_month = 0;
        assert!(input.validate().is_err());

        input.day_of_month = 1;
        input.category = "unknown".into();
        assert!(matches!(
            input.validate(),
            Err(RecurringValidationError::UnknownCategory(_))
        ));
    }
}
