//! Fixed expenses tab

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::truncate;
use crate::tui::app::App;

use super::{category_color, panel, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let registry = app.dashboard.recurring();
    if !registry.is_loaded() {
        render_loading(frame, area, "Fixed expenses");
        return;
    }

    let symbol = app.symbol();
    let summary = app.summary();
    let title = format!(
        "Fixed expenses · {} of {} active · {} per month · {} recorded in {}",
        registry.list_active().len(),
        registry.list().len(),
        summary.total_recurring_monthly.format_with_symbol(symbol),
        summary.recurring_expenses.format_with_symbol(symbol),
        app.period()
    );

    let items = registry.list();
    if items.is_empty() {
        let text = Paragraph::new("No fixed expenses. Add one with `fintrack fixed add`.")
            .block(panel(title))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let header = Row::new(["", "Title", "Category", "Day", "Amount"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            let (marker, style) = if item.is_active {
                ("●", Style::default().fg(Color::White))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(truncate(&item.title, 30)),
                Cell::from(item.category_label().to_string())
                    .style(Style::default().fg(category_color(&item.category))),
                Cell::from(item.day_of_month.to_string()),
                Cell::from(item.amount.format_with_symbol(symbol)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(4),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}
