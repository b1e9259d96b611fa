//! Forecast tab
//!
//! End-of-month projection at the current daily spending rate. Only the
//! month containing today is projected; other months show their actuals.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use crate::services::MonthlySummary;
use crate::tui::app::App;

use super::{money_span, panel, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.dashboard.transactions().is_loaded() {
        render_loading(frame, area, "Forecast");
        return;
    }

    let summary = app.summary();
    let symbol = app.symbol();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    let progress_label = if summary.is_current_period {
        format!(
            "{:.0}% of the month gone, {} days left",
            summary.month_progress, summary.days_remaining
        )
    } else {
        "Not the current month".to_string()
    };
    let gauge = Gauge::default()
        .block(panel("Month progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((summary.month_progress / 100.0).clamp(0.0, 1.0))
        .label(progress_label);
    frame.render_widget(gauge, rows[0]);

    let line = |label: &str, value: Span<'static>| {
        Line::from(vec![Span::raw(format!("{:<24}", label)), value])
    };

    let mut lines = vec![
        line("Spent so far", Span::raw(summary.total_expenses.format_with_symbol(symbol))),
        line("Income", Span::raw(summary.total_income.format_with_symbol(symbol))),
    ];

    if summary.is_current_period {
        lines.push(line(
            "Daily average",
            Span::raw(summary.daily_average.format_with_symbol(symbol)),
        ));
        lines.push(line(
            "Projected expenses",
            Span::styled(
                summary.projected_expenses.format_with_symbol(symbol),
                Style::default().fg(Color::Yellow),
            ),
        ));
        lines.extend(expense_split(&summary, symbol));
        lines.push(line(
            "Projected balance",
            money_span(summary.projected_balance, symbol),
        ));
    } else {
        lines.extend(expense_split(&summary, symbol));
        lines.push(line("Final balance", money_span(summary.balance, symbol)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Projections are only made for the current month.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(panel("Forecast")), rows[1]);
}

/// Regular and fixed expenses recorded so far
fn expense_split(summary: &MonthlySummary, symbol: &str) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    [
        ("  regular", summary.regular_expenses),
        ("  fixed", summary.recurring_expenses),
    ]
    .into_iter()
    .map(|(label, amount)| {
        Line::from(vec![
            Span::styled(format!("{:<24}", label), dim),
            Span::styled(amount.format_with_symbol(symbol), dim),
        ])
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Period};
    use chrono::NaiveDate;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_expense_split_shows_regular_and_fixed() {
        let june = Period::new(2024, 6).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut summary = MonthlySummary::compute(&[], &[], &[], today, june);
        summary.regular_expenses = Money::from_units(40);
        summary.recurring_expenses = Money::from_units(900);

        let lines = expense_split(&summary, "$");
        assert_eq!(lines.len(), 2);
        assert!(text(&lines[0]).contains("regular"));
        assert!(text(&lines[0]).contains("$40.00"));
        assert!(text(&lines[1]).contains("fixed"));
        assert!(text(&lines[1]).contains("$900.00"));
    }
}
