//! Goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{BudgetGoal, Deposit};
use crate::services::aggregation::goal_progress;

use super::report::{format_bar, format_percentage};

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Due")]
    due: String,
}

#[derive(Tabled)]
struct DepositRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

/// Format goals as a table with a progress bar per goal
pub fn format_goal_table(goals: &[BudgetGoal], symbol: &str) -> String {
    if goals.is_empty() {
        return "No goals yet.".to_string();
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|g| {
            let progress = goal_progress(g);
            let status = if g.is_completed {
                " done"
            } else if progress.is_reached {
                " reached"
            } else {
                ""
            };
            GoalRow {
                id: g.id.to_string(),
                title: g.title.clone(),
                category: g.category_label().to_string(),
                saved: g.saved_amount.format_with_symbol(symbol),
                target: g.target_amount.format_with_symbol(symbol),
                progress: format!(
                    "{} {}{}",
                    format_bar(progress.clamped_percent, 100.0, 10),
                    format_percentage(progress.percent),
                    status
                ),
                due: g
                    .target_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            }
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Format one goal with its deposit ledger
pub fn format_goal_history(goal: &BudgetGoal, deposits: &[Deposit], symbol: &str) -> String {
    let progress = goal_progress(goal);
    let mut output = String::new();

    output.push_str(&format!("Goal:      {} ({})\n", goal.title, goal.id));
    output.push_str(&format!("Category:  {}\n", goal.category_label()));
    output.push_str(&format!(
        "Saved:     {} of {} ({})\n",
        goal.saved_amount.format_with_symbol(symbol),
        goal.target_amount.format_with_symbol(symbol),
        format_percentage(progress.percent)
    ));
    output.push_str(&format!(
        "Remaining: {}{}\n",
        progress.remaining.format_with_symbol(symbol),
        if progress.is_low_remaining { " (almost there)" } else { "" }
    ));
    if let Some(date) = goal.target_date {
        output.push_str(&format!("Due:       {}\n", date.format("%Y-%m-%d")));
    }
    output.push('\n');

    if deposits.is_empty() {
        output.push_str("No deposits yet.");
        return output;
    }

    let rows: Vec<DepositRow> = deposits
        .iter()
        .map(|d| DepositRow {
            id: d.id.to_string(),
            when: d.created_at.format("%Y-%m-%d %H:%M").to_string(),
            amount: d.amount.format_with_symbol(symbol),
            comment: d.comment.clone().unwrap_or_default(),
        })
        .collect();
    output.push_str(&Table::new(rows).with(Style::sharp()).to_string());
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepositId, GoalId, Money};
    use chrono::Utc;

    fn goal(saved: i64) -> BudgetGoal {
        BudgetGoal {
            id: GoalId::new(2),
            title: "Laptop".into(),
            category: "other".into(),
            target_amount: Money::from_units(1000),
            saved_amount: Money::from_units(saved),
            target_date: None,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_goal_table() {
        let output = format_goal_table(&[goal(250)], "$");
        assert!(output.contains("goal-2"));
        assert!(output.contains("$250.00"));
        assert!(output.contains("25%"));
        assert_eq!(format_goal_table(&[], "$"), "No goals yet.");
    }

    #[test]
    fn test_history_lists_deposits() {
        let deposits = vec![Deposit {
            id: DepositId::new(8),
            goal_id: GoalId::new(2),
            amount: Money::from_units(-50),
            comment: Some("repair".into()),
            created_at: Utc::now(),
        }];
        let output = format_goal_history(&goal(900), &deposits, "$");
        assert!(output.contains("almost there"));
        assert!(output.contains("dep-8"));
        assert!(output.contains("-$50.00"));
        assert!(output.contains("repair"));
    }
}
