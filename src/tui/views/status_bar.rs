//! Status bar view
//!
//! Balance of the selected month, loading state, the last status message
//! and key hints.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

use super::money_span;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" Balance: ", Style::default().fg(Color::White))];

    if app.dashboard.transactions().is_loaded() {
        let balance = money_span(app.summary().balance, app.symbol());
        spans.push(balance.patch_style(Style::default().add_modifier(Modifier::BOLD)));
    } else {
        spans.push(Span::styled("-", Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(
        app.period().to_string(),
        Style::default().fg(Color::Cyan),
    ));

    if app.is_loading() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("loading ({})", app.in_flight()),
            Style::default().fg(Color::Magenta),
        ));
    }

    if let Some(status) = &app.status {
        let color = if status.is_error { Color::Red } else { Color::Yellow };
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    let hints = " q:Quit  ?:Help  [/]:Month ";
    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    if padding_len > 0 {
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
