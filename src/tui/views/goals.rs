//! Goals tab
//!
//! Savings goals with their progress, and the ledger of the selected goal
//! once it has been loaded.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::{format_bar, truncate};
use crate::models::BudgetGoal;
use crate::services::goal_progress;
use crate::tui::app::App;
use crate::tui::layout::columns;

use super::{money_span, panel, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let registry = app.dashboard.goals();
    if !registry.is_loaded() {
        render_loading(frame, area, "Goals");
        return;
    }

    if registry.list().is_empty() {
        let text = Paragraph::new("No goals yet. Add one with `fintrack goal add`.")
            .block(panel("Goals"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let (list_area, ledger_area) = columns(area, 62);
    render_goal_table(frame, app, list_area);
    render_ledger(frame, app, ledger_area);
}

fn progress_color(goal: &BudgetGoal) -> Color {
    let progress = goal_progress(goal);
    if goal.is_completed || progress.is_reached {
        Color::Green
    } else if progress.is_low_remaining {
        Color::Yellow
    } else {
        Color::White
    }
}

fn render_goal_table(frame: &mut Frame, app: &App, area: Rect) {
    let symbol = app.symbol();
    let header = Row::new(["Goal", "Saved", "Target", "Progress"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .dashboard
        .goals()
        .list()
        .iter()
        .map(|goal| {
            let progress = goal_progress(goal);
            let title = if goal.is_completed {
                format!("✓ {}", truncate(&goal.title, 20))
            } else {
                truncate(&goal.title, 22)
            };
            Row::new(vec![
                Cell::from(title),
                Cell::from(goal.saved_amount.format_with_symbol(symbol)),
                Cell::from(goal.target_amount.format_with_symbol(symbol)),
                Cell::from(format!(
                    "{} {:>3.0}%",
                    format_bar(progress.clamped_percent, 100.0, 10),
                    progress.percent
                )),
            ])
            .style(Style::default().fg(progress_color(goal)))
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel("Goals"))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_ledger(frame: &mut Frame, app: &App, area: Rect) {
    let Some(goal) = app.selected_goal() else {
        frame.render_widget(Paragraph::new("").block(panel("Ledger")), area);
        return;
    };

    let symbol = app.symbol();
    let progress = goal_progress(goal);
    let mut lines = vec![
        Line::from(Span::styled(
            goal.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} · {}",
            goal.category_label(),
            goal.target_date
                .map(|d| format!("due {}", d))
                .unwrap_or_else(|| "no due date".to_string())
        )),
        Line::from(vec![
            Span::raw("Remaining: "),
            Span::raw(progress.remaining.format_with_symbol(symbol)),
        ]),
        Line::from(""),
    ];

    match app.dashboard.goals().deposits(goal.id) {
        None => lines.push(Line::from(Span::styled(
            "Press Enter to load the ledger",
            Style::default().fg(Color::DarkGray),
        ))),
        Some([]) => lines.push(Line::from("No deposits yet")),
        Some(deposits) => {
            for deposit in deposits.iter().rev() {
                let mut spans = vec![
                    Span::raw(format!("{} ", deposit.created_at.format("%Y-%m-%d"))),
                    money_span(deposit.amount, symbol),
                ];
                if let Some(comment) = &deposit.comment {
                    spans.push(Span::styled(
                        format!("  {}", truncate(comment, 24)),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                lines.push(Line::from(spans));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines).block(panel("Ledger")), area);
}
