//! Monthly Report
//!
//! Overview, category breakdown and end-of-month forecast for one period,
//! rendered for the terminal or exported as CSV.

use std::io::Write;

use chrono::NaiveDate;

use crate::display::report::{double_separator, format_bar, format_percentage, separator};
use crate::error::{FinError, FinResult};
use crate::models::{BudgetGoal, Money, Period, Transaction};
use crate::services::{goal_progress, Dashboard, MonthlySummary};

const WIDTH: usize = 64;

/// Everything shown for one month
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    /// Derived metrics
    pub summary: MonthlySummary,
    /// Expenses of the period, newest first
    pub expenses: Vec<Transaction>,
    /// Incomes of the period, newest first
    pub incomes: Vec<Transaction>,
    /// Open goals
    pub goals: Vec<BudgetGoal>,
    /// Currency symbol used for amounts
    pub symbol: String,
}

impl MonthlyReport {
    /// Build the report from a dashboard whose stores are loaded
    pub fn generate(dashboard: &Dashboard, today: NaiveDate, symbol: &str) -> Self {
        Self {
            summary: dashboard.summary(today),
            expenses: dashboard.transactions().list_expenses().to_vec(),
            incomes: dashboard.transactions().list_incomes().to_vec(),
            goals: dashboard
                .goals()
                .list()
                .iter()
                .filter(|g| !g.is_completed)
                .cloned()
                .collect(),
            symbol: symbol.to_string(),
        }
    }

    pub fn period(&self) -> Period {
        self.summary.period
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.symbol)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let s = &self.summary;
        let mut output = String::new();

        output.push_str(&format!("Monthly Report: {}\n", s.period.label()));
        output.push_str(&double_separator(WIDTH));
        output.push('\n');

        output.push_str(&format!("{:<28} {:>16}\n", "Income", self.money(s.total_income)));
        output.push_str(&format!("{:<28} {:>16}\n", "Expenses", self.money(s.total_expenses)));
        output.push_str(&format!("{:<28} {:>16}\n", "  regular", self.money(s.regular_expenses)));
        output.push_str(&format!("{:<28} {:>16}\n", "  fixed", self.money(s.recurring_expenses)));
        output.push_str(&format!("{:<28} {:>16}\n", "Balance", self.money(s.balance)));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Spent of income",
            format_percentage(s.expense_share_of_income)
        ));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Planned fixed per month",
            self.money(s.total_recurring_monthly)
        ));

        output.push_str("\nBy category\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        if s.category_breakdown.is_empty() {
            output.push_str("  No expenses recorded.\n");
        }
        let max = s
            .category_breakdown
            .first()
            .map(|c| c.sum.cents() as f64)
            .unwrap_or(0.0);
        for cat in &s.category_breakdown {
            output.push_str(&format!(
                "  {:<22} {:>12} {:>6} {}\n",
                cat.label,
                self.money(cat.sum),
                format_percentage(cat.percent),
                format_bar(cat.sum.cents() as f64, max, 16)
            ));
        }

        output.push_str("\nForecast\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        if s.is_current_period {
            output.push_str(&format!(
                "  Day {} of {} ({} left)   {}\n",
                s.days_in_month - s.days_remaining,
                s.days_in_month,
                s.days_remaining,
                format_bar(s.month_progress, 100.0, 20)
            ));
            output.push_str(&format!("  {:<26} {:>16}\n", "Daily average", self.money(s.daily_average)));
            output.push_str(&format!(
                "  {:<26} {:>16}\n",
                "Projected expenses",
                self.money(s.projected_expenses)
            ));
            output.push_str(&format!(
                "  {:<26} {:>16}\n",
                "Projected balance",
                self.money(s.projected_balance)
            ));
        } else {
            output.push_str("  Not the current month; figures above are final.\n");
        }

        if !self.goals.is_empty() {
            output.push_str("\nGoals\n");
            output.push_str(&separator(WIDTH));
            output.push('\n');
            for goal in &self.goals {
                let progress = goal_progress(goal);
                output.push_str(&format!(
                    "  {:<22} {:>12} / {:<12} {}\n",
                    goal.title,
                    self.money(goal.saved_amount),
                    self.money(goal.target_amount),
                    format_percentage(progress.percent)
                ));
            }
        }

        output
    }

    /// Export the period's transactions and totals as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> FinResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| FinError::Export(e.to_string());

        csv.write_record(["Date", "Type", "Description", "Category", "Amount"])
            .map_err(export_err)?;

        let mut rows: Vec<&Transaction> = self.incomes.iter().chain(&self.expenses).collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        for txn in rows {
            let date = txn.date.format("%Y-%m-%d").to_string();
            let amount = txn.amount.to_string();
            csv.write_record([
                date.as_str(),
                txn.kind.as_str(),
                txn.description.as_str(),
                txn.category_label(),
                amount.as_str(),
            ])
            .map_err(export_err)?;
        }

        let s = &self.summary;
        let period = s.period.to_string();
        for (label, amount) in [
            ("TOTAL INCOME", s.total_income),
            ("TOTAL EXPENSES", s.total_expenses),
            ("BALANCE", s.balance),
            ("PROJECTED EXPENSES", s.projected_expenses),
        ] {
            let amount = amount.to_string();
            csv.write_record([period.as_str(), "summary", label, "", amount.as_str()])
                .map_err(export_err)?;
        }

        csv.flush().map_err(|e| FinError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionId, TransactionKind};
    use chrono::Utc;

    fn txn(id: i64, kind: TransactionKind, cents: i64, description: &str, day: u32) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            kind,
            amount: Money::from_cents(cents),
            description: description.into(),
            date: NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
            category: (kind == TransactionKind::Expense).then(|| "food".to_string()),
            recurring_id: None,
            created_at: Utc::now(),
        }
    }

    fn report(today: NaiveDate) -> MonthlyReport {
        let expenses = vec![txn(2, TransactionKind::Expense, 4550, "Bread, milk", 10)];
        let incomes = vec![txn(1, TransactionKind::Income, 100000, "Salary", 1)];
        let period = Period::new(2025, 2).unwrap();
        MonthlyReport {
            summary: MonthlySummary::compute(&expenses, &incomes, &[], today, period),
            expenses,
            incomes,
            goals: Vec::new(),
            symbol: "$".into(),
        }
    }

    #[test]
    fn test_format_terminal_current_month() {
        let output = report(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()).format_terminal();
        assert!(output.contains("Monthly Report: February 2025"));
        assert!(output.contains("$1000.00"));
        assert!(output.contains("Groceries"));
        assert!(output.contains("Day 10 of 28 (18 left)"));
        assert!(output.contains("Projected expenses"));
    }

    #[test]
    fn test_format_terminal_past_month() {
        let output = report(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).format_terminal();
        assert!(output.contains("figures above are final"));
        assert!(!output.contains("Daily average"));
    }

    #[test]
    fn test_export_csv() {
        let mut buf = Vec::new();
        report(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .export_csv(&mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Date,Type,Description,Category,Amount");
        assert_eq!(lines[1], "2025-02-01,income,Salary,,1000.00");
        assert_eq!(lines[2], "2025-02-10,expense,\"Bread, milk\",Groceries,45.50");
        assert!(lines.contains(&"2025-02,summary,BALANCE,,954.50"));
        assert!(lines.contains(&"2025-02,summary,PROJECTED EXPENSES,,45.50"));
    }
}
