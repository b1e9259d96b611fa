//! Analytics tab
//!
//! Expense breakdown by category as a bar chart with a percentage table.

use ratatui::{
    layout::{Constraint, Direction, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::format_percentage;
use crate::services::CategoryTotal;
use crate::tui::app::App;
use crate::tui::layout::columns;

use super::{category_color, panel, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.dashboard.transactions().is_loaded() {
        render_loading(frame, area, "Analytics");
        return;
    }

    let summary = app.summary();
    let breakdown = &summary.category_breakdown;

    if breakdown.is_empty() {
        let text = Paragraph::new("No expenses this month.")
            .block(panel("Spending by category"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let (chart_area, table_area) = columns(area, 60);
    render_chart(frame, breakdown, app.symbol(), chart_area);
    render_table(frame, app, breakdown, table_area);
}

fn render_chart(frame: &mut Frame, breakdown: &[CategoryTotal], symbol: &str, area: Rect) {
    let bars: Vec<Bar> = breakdown
        .iter()
        .map(|entry| {
            let color = category_color(entry.key);
            Bar::default()
                .value(entry.sum.cents().max(0) as u64)
                .text_value(entry.sum.format_with_symbol(symbol))
                .label(Line::from(entry.label))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Spending by category"))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_table(frame: &mut Frame, app: &App, breakdown: &[CategoryTotal], area: Rect) {
    let symbol = app.symbol();
    let header = Row::new(["Category", "Amount", "Share"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = breakdown
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.label).style(Style::default().fg(category_color(entry.key))),
                Cell::from(entry.sum.format_with_symbol(symbol)),
                Cell::from(format_percentage(entry.percent)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel("Totals"))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}
