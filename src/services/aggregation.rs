//! Monthly aggregation and forecasting
//!
//! Pure functions that turn one month's transactions and the recurring
//! definitions into totals, a category breakdown and an end-of-month
//! projection. Nothing here does I/O or fails: empty inputs yield zeros and
//! every percentage with a zero denominator is reported as 0.

use chrono::{Datelike, NaiveDate};

use crate::models::category::CATALOG;
use crate::models::goal::LOW_REMAINING_PERCENT;
use crate::models::{BudgetGoal, Money, Period, RecurringExpense, Transaction};

/// Spending in one catalog category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Catalog key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Display color as `#rrggbb`
    pub color: &'static str,
    /// Sum of expenses in this category
    pub sum: Money,
    /// Share of total expenses
    pub percent: f64,
}

/// Derived metrics for one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub period: Period,
    pub total_income: Money,
    /// All expenses in the period, materialized recurring ones included
    pub total_expenses: Money,
    /// Expenses not produced by a recurring definition
    pub regular_expenses: Money,
    /// Expenses materialized from recurring definitions
    pub recurring_expenses: Money,
    /// Planned monthly load of the active definitions; informational only
    pub total_recurring_monthly: Money,
    /// `total_income - total_expenses`
    pub balance: Money,
    /// Non-zero categories, largest first
    pub category_breakdown: Vec<CategoryTotal>,
    pub is_current_period: bool,
    pub days_in_month: u32,
    pub days_remaining: u32,
    pub daily_average: Money,
    pub projected_expenses: Money,
    pub projected_balance: Money,
    /// Share of the month elapsed, 0 for other periods
    pub month_progress: f64,
    /// Share of income already spent
    pub expense_share_of_income: f64,
}

impl MonthlySummary {
    /// Compute the summary for `period` as seen on `today`
    ///
    /// `expenses` and `incomes` must already be limited to `period`.
    pub fn compute(
        expenses: &[Transaction],
        incomes: &[Transaction],
        recurring: &[RecurringExpense],
        today: NaiveDate,
        period: Period,
    ) -> Self {
        let total_income: Money = incomes.iter().map(|t| t.amount).sum();
        let total_expenses: Money = expenses.iter().map(|t| t.amount).sum();
        let recurring_expenses: Money = expenses
            .iter()
            .filter(|t| t.is_recurring())
            .map(|t| t.amount)
            .sum();
        let total_recurring_monthly = total_recurring_monthly(recurring);

        let forecast = Forecast::project(total_expenses, today, period);

        Self {
            period,
            total_income,
            total_expenses,
            regular_expenses: total_expenses - recurring_expenses,
            recurring_expenses,
            total_recurring_monthly,
            balance: total_income - total_expenses,
            category_breakdown: category_breakdown(expenses),
            is_current_period: forecast.is_current_period,
            days_in_month: forecast.days_in_month,
            days_remaining: forecast.days_remaining,
            daily_average: forecast.daily_average,
            projected_expenses: forecast.projected_expenses,
            projected_balance: total_income - forecast.projected_expenses,
            month_progress: forecast.month_progress,
            expense_share_of_income: total_expenses.percent_of(total_income),
        }
    }

    /// Whether anything was recorded in the period
    pub fn is_empty(&self) -> bool {
        self.total_income.is_zero() && self.total_expenses.is_zero()
    }
}

/// End-of-month projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub is_current_period: bool,
    pub days_in_month: u32,
    pub days_remaining: u32,
    pub daily_average: Money,
    pub projected_expenses: Money,
    pub month_progress: f64,
}

impl Forecast {
    /// Project `total_expenses` to the end of `period`
    ///
    /// Only the month containing `today` is projected. For any other month
    /// the average and remaining days are zero and the projection equals the
    /// actual total.
    pub fn project(total_expenses: Money, today: NaiveDate, period: Period) -> Self {
        let days_in_month = period.days_in_month();
        let is_current_period = period.is_current(today);

        if !is_current_period {
            return Self {
                is_current_period,
                days_in_month,
                days_remaining: 0,
                daily_average: Money::zero(),
                projected_expenses: total_expenses,
                month_progress: 0.0,
            };
        }

        let elapsed = today.day();
        let days_remaining = days_in_month.saturating_sub(elapsed);
        let daily_average = total_expenses.div_round(i64::from(elapsed));
        let month_progress = if days_in_month == 0 {
            0.0
        } else {
            f64::from(elapsed) / f64::from(days_in_month) * 100.0
        };

        Self {
            is_current_period,
            days_in_month,
            days_remaining,
            daily_average,
            projected_expenses: total_expenses + daily_average * i64::from(days_remaining),
            month_progress,
        }
    }
}

/// Sum of the amounts of active definitions
pub fn total_recurring_monthly(recurring: &[RecurringExpense]) -> Money {
    recurring
        .iter()
        .filter(|d| d.is_active)
        .map(|d| d.amount)
        .sum()
}

/// Expense totals per catalog category
///
/// Categories with a zero sum are omitted, as are expenses whose key is not in
/// the catalog. Entries are ordered by descending sum, then catalog order.
pub fn category_breakdown(expenses: &[Transaction]) -> Vec<CategoryTotal> {
    let total: Money = expenses
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum();

    let mut breakdown: Vec<CategoryTotal> = CATALOG
        .iter()
        .filter_map(|cat| {
            let sum: Money = expenses
                .iter()
                .filter(|t| t.is_expense() && t.category.as_deref() == Some(cat.key))
                .map(|t| t.amount)
                .sum();
            if sum.is_zero() {
                return None;
            }
            Some(CategoryTotal {
                key: cat.key,
                label: cat.label,
                color: cat.color,
                sum,
                percent: sum.percent_of(total),
            })
        })
        .collect();

    breakdown.sort_by(|a, b| b.sum.cmp(&a.sum));
    breakdown
}

/// Sum for one category key, zero when absent
pub fn category_sum(breakdown: &[CategoryTotal], key: &str) -> Money {
    breakdown
        .iter()
        .find(|c| c.key == key)
        .map(|c| c.sum)
        .unwrap_or_default()
}

/// Progress of a savings goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Saved as a share of the target; may exceed 100
    pub percent: f64,
    /// `percent` limited to 0..=100 for gauges
    pub clamped_percent: f64,
    /// Amount still to save, never negative
    pub remaining: Money,
    pub is_reached: bool,
    /// Less than a fifth of the target is left to save
    pub is_low_remaining: bool,
}

/// Progress figures for `goal`
pub fn goal_progress(goal: &BudgetGoal) -> GoalProgress {
    let percent = goal.saved_amount.percent_of(goal.target_amount);
    let remaining = goal.target_amount - goal.saved_amount;
    let remaining = if remaining.is_negative() {
        Money::zero()
    } else {
        remaining
    };
    let is_reached = goal.target_amount.is_positive() && remaining.is_zero();
    let remaining_percent = remaining.percent_of(goal.target_amount);

    GoalProgress {
        percent,
        clamped_percent: percent.clamp(0.0, 100.0),
        remaining,
        is_reached,
        is_low_remaining: !is_reached
            && goal.target_amount.is_positive()
            && remaining_percent < LOW_REMAINING_PERCENT,
    }
}
