//! Recurring expense display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backend::MaterializeReport;
use crate::models::{Money, RecurringExpense};
use crate::services::aggregation::total_recurring_monthly;

#[derive(Tabled)]
struct RecurringRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Day")]
    day: u32,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format definitions as a table followed by the active monthly load
pub fn format_recurring_table(items: &[RecurringExpense], symbol: &str) -> String {
    if items.is_empty() {
        return "No fixed expenses defined.".to_string();
    }

    let rows: Vec<RecurringRow> = items
        .iter()
        .map(|d| RecurringRow {
            id: d.id.to_string(),
            title: d.title.clone(),
            category: d.category_label().to_string(),
            day: d.day_of_month,
            amount: d.amount.format_with_symbol(symbol),
            status: if d.is_active { "active" } else { "paused" },
        })
        .collect();

    format!(
        "{}\nActive monthly total: {}",
        Table::new(rows).with(Style::sharp()),
        total_recurring_monthly(items).format_with_symbol(symbol)
    )
}

/// Summarize a materialization run
pub fn format_materialize_report(report: &MaterializeReport, symbol: &str) -> String {
    let mut output = format!(
        "Fixed expenses for {}-{:02}: {} created, {} skipped\n",
        report.year,
        report.month,
        report.created.len(),
        report.skipped.len()
    );

    for created in &report.created {
        output.push_str(&format!(
            "  + {} {} on {}\n",
            created.description,
            created.amount.format_with_symbol(symbol),
            created.date.format("%Y-%m-%d")
        ));
    }
    for skipped in &report.skipped {
        output.push_str(&format!("  - {}: {}\n", skipped.title, skipped.reason));
    }

    if !report.created.is_empty() {
        let sum: Money = report.created.iter().map(|c| c.amount).sum();
        output.push_str(&format!("Total: {}\n", sum.format_with_symbol(symbol)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::wire::SkippedRecurring;
    use crate::models::{Money, Period, RecurringId};
    use chrono::Utc;

    fn definition(id: i64, active: bool) -> RecurringExpense {
        RecurringExpense {
            id: RecurringId::new(id),
            title: "Rent".into(),
            amount: Money::from_units(700),
            category: "utilities".into(),
            day_of_month: 3,
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_table_shows_status_and_load() {
        let output = format_recurring_table(&[definition(1, true), definition(2, false)], "$");
        assert!(output.contains("fix-1"));
        assert!(output.contains("paused"));
        assert!(output.contains("Active monthly total: $700.00"));
    }

    #[test]
    fn test_report_lists_skipped() {
        let mut report = MaterializeReport::empty(Period::new(2025, 4).unwrap());
        report.skipped.push(SkippedRecurring {
            fixed_expense_id: RecurringId::new(1),
            title: "Rent".into(),
            reason: "Already created for this month".into(),
        });
        let output = format_materialize_report(&report, "$");
        assert!(output.starts_with("Fixed expenses for 2025-04: 0 created, 1 skipped"));
        assert!(output.contains("Rent: Already created"));
        assert!(!output.contains("Total:"));
    }
}
