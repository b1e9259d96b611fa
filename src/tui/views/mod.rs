//! TUI views
//!
//! One view per dashboard tab, plus the tab bar and status bar.

pub mod analytics;
pub mod fixed;
pub mod forecast;
pub mod goals;
pub mod overview;
pub mod status_bar;
pub mod transactions;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::models::category;
use crate::models::Money;

use super::app::{ActiveDialog, App, Tab};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_tabs(frame, app, layout.tabs);

    match app.active_tab {
        Tab::Overview => overview::render(frame, app, layout.body),
        Tab::Transactions => transactions::render(frame, app, layout.body),
        Tab::Fixed => fixed::render(frame, app, layout.body),
        Tab::Analytics => analytics::render(frame, app, layout.body),
        Tab::Forecast => forecast::render(frame, app, layout.body),
        Tab::Goals => goals::render(frame, app, layout.body),
    }

    status_bar::render(frame, app, layout.status_bar);

    match &app.active_dialog {
        ActiveDialog::None => {}
        ActiveDialog::Help => dialogs::help::render(frame, app),
        ActiveDialog::Confirm(action) => dialogs::confirm::render(frame, action),
        ActiveDialog::AddTransaction => dialogs::transaction::render(frame, app),
        ActiveDialog::Deposit => dialogs::deposit::render(frame, app),
    }
}

/// Tab bar; the block title carries the selected month
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let period = app.period();
    let marker = if period.is_current(app.today) { " (this month)" } else { "" };
    let block = Block::default()
        .title(format!(" fintrack · ◀ {}{} ▶ ", period.label(), marker))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Bordered panel used by every view
pub(crate) fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Placeholder shown until a store has been loaded once
pub(crate) fn render_loading(frame: &mut Frame, area: Rect, title: &str) {
    let text = Paragraph::new("Loading…")
        .block(panel(title))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Chart color of a category key
pub(crate) fn category_color(key: &str) -> Color {
    category::find(key)
        .map(|c| {
            let (r, g, b) = c.rgb();
            Color::Rgb(r, g, b)
        })
        .unwrap_or(Color::Gray)
}

/// Green for positive, red for negative amounts
pub(crate) fn money_span(amount: Money, symbol: &str) -> Span<'static> {
    let color = if amount.is_negative() {
        Color::Red
    } else if amount.is_zero() {
        Color::White
    } else {
        Color::Green
    };
    Span::styled(amount.format_with_symbol(symbol), Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_color() {
        assert_eq!(category_color("food"), Color::Rgb(0x0E, 0xA5, 0xE9));
        assert_eq!(category_color("nope"), Color::Gray);
    }

    #[test]
    fn test_money_span_color() {
        assert_eq!(money_span(Money::from_units(-3), "$").style.fg, Some(Color::Red));
        assert_eq!(money_span(Money::from_units(3), "$").content, "$3.00");
    }
}
