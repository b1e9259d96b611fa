//! Overview tab
//!
//! Income, expenses and balance of the month, how much of the income has
//! been spent, and the fixed expense and goal totals.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use crate::models::Money;
use crate::services::MonthlySummary;
use crate::tui::app::App;

use super::{money_span, panel, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.dashboard.transactions().is_loaded() {
        render_loading(frame, area, "Overview");
        return;
    }

    let summary = app.summary();
    let symbol = app.symbol();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Cards
            Constraint::Length(3), // Spending gauge
            Constraint::Min(4),    // Details
        ])
        .split(area);

    render_cards(frame, &summary, symbol, rows[0]);
    render_spending_gauge(frame, &summary, rows[1]);
    render_details(frame, app, &summary, rows[2]);
}

fn render_cards(frame: &mut Frame, summary: &MonthlySummary, symbol: &str, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let card = |title: &str, value: Span<'static>| {
        Paragraph::new(Line::from(value.patch_style(Style::default().add_modifier(Modifier::BOLD))))
            .block(panel(title))
    };

    let expenses = Span::styled(
        summary.total_expenses.format_with_symbol(symbol),
        Style::default().fg(Color::Red),
    );

    frame.render_widget(card("Income", money_span(summary.total_income, symbol)), cards[0]);
    frame.render_widget(card("Expenses", expenses), cards[1]);
    frame.render_widget(card("Balance", money_span(summary.balance, symbol)), cards[2]);
}

fn render_spending_gauge(frame: &mut Frame, summary: &MonthlySummary, area: Rect) {
    let share = summary.expense_share_of_income;
    let color = if share > 100.0 {
        Color::Red
    } else if share > 80.0 {
        Color::Yellow
    } else {
        Color::Green
    };

    let label = if summary.total_income.is_zero() {
        "No income recorded".to_string()
    } else {
        format!("{:.1}% of income spent", share)
    };

    let gauge = Gauge::default()
        .block(panel("Spending"))
        .gauge_style(Style::default().fg(color))
        .ratio((share / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_details(frame: &mut Frame, app: &App, summary: &MonthlySummary, area: Rect) {
    let symbol = app.symbol();
    let goals = app.dashboard.goals().list();
    let open_goals = goals.iter().filter(|g| !g.is_completed).count();

    let line = |label: &str, value: Span<'static>| {
        Line::from(vec![
            Span::styled(format!("{:<28}", label), Style::default().fg(Color::White)),
            value,
        ])
    };
    let plain = |amount: Money| Span::raw(amount.format_with_symbol(symbol));

    let mut lines = vec![
        line("Regular expenses", plain(summary.regular_expenses)),
        line("Fixed expenses recorded", plain(summary.recurring_expenses)),
        line("Fixed expenses per month", plain(summary.total_recurring_monthly)),
        line(
            "Transactions",
            Span::raw(format!(
                "{} income, {} expense",
                app.dashboard.transactions().list_incomes().len(),
                app.dashboard.transactions().list_expenses().len()
            )),
        ),
        line("Open goals", Span::raw(open_goals.to_string())),
    ];

    if summary.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Nothing recorded this month. Press a to add an expense, i for income.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(panel("Details")), area);
}
