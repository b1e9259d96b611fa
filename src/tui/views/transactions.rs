//! Transactions tab
//!
//! Incomes and expenses of the selected month in one list, newest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::truncate;
use crate::models::TransactionKind;
use crate::tui::app::App;

use super::{category_color, panel, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let store = app.dashboard.transactions();
    if !store.is_loaded() {
        render_loading(frame, area, "Transactions");
        return;
    }

    let rows_data = app.transaction_rows();
    let title = format!(
        "Transactions · {} income, {} expense",
        store.list_incomes().len(),
        store.list_expenses().len()
    );

    if rows_data.is_empty() {
        let text = Paragraph::new("No transactions this month. Press a or i to add one.")
            .block(panel(title))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let symbol = app.symbol();
    let date_format = app.settings.date_format.as_str();

    let header = Row::new(["Date", "Type", "Description", "Category", "Amount"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);

    let rows: Vec<Row> = rows_data
        .iter()
        .map(|txn| {
            let (kind, amount, color) = match txn.kind {
                TransactionKind::Income => (
                    "income",
                    format!("+{}", txn.amount.format_with_symbol(symbol)),
                    Color::Green,
                ),
                TransactionKind::Expense => (
                    "expense",
                    format!("-{}", txn.amount.format_with_symbol(symbol)),
                    Color::Red,
                ),
            };
            let category = match txn.category.as_deref() {
                Some(key) => Cell::from(txn.category_label().to_string())
                    .style(Style::default().fg(category_color(key))),
                None => Cell::from("-"),
            };
            let description = if txn.is_recurring() {
                format!("{} ↻", truncate(&txn.description, 30))
            } else {
                truncate(&txn.description, 32)
            };

            Row::new(vec![
                Cell::from(txn.date.format(date_format).to_string()),
                Cell::from(kind),
                Cell::from(description),
                category,
                Cell::from(amount).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}
