//! Help dialog
//!
//! Global keys plus the keys of the active tab

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{App, Tab};
use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(app.active_tab))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn help_lines(tab: Tab) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Global Keys"),
        Line::from(""),
        key_line("q", "Quit"),
        key_line("?", "Show/hide help"),
        key_line("Tab/1-6", "Switch tab"),
        key_line("[ ] or ←/→", "Previous/next month"),
        key_line("t", "Back to this month"),
        key_line("j/k", "Move selection"),
        key_line("r", "Reload everything"),
        key_line("a / i", "Add expense / income"),
        key_line("m", "Record fixed expenses for the month"),
        Line::from(""),
    ];

    let tab_keys: &[(&'static str, &'static str)] = match tab {
        Tab::Transactions => &[("d", "Delete selected transaction")],
        Tab::Fixed => &[("Space", "Pause/resume"), ("d", "Delete fixed expense")],
        Tab::Goals => &[
            ("+", "Deposit or withdraw"),
            ("Enter", "Show ledger"),
            ("Space", "Complete/reopen"),
            ("d", "Delete goal"),
        ],
        Tab::Overview | Tab::Analytics | Tab::Forecast => &[],
    };

    if !tab_keys.is_empty() {
        lines.push(heading(tab.title()));
        lines.push(Line::from(""));
        lines.extend(tab_keys.iter().map(|&(key, desc)| key_line(key, desc)));
    }

    lines
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    ))
}

fn key_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(desc),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_specific_section() {
        assert!(help_lines(Tab::Goals).len() > help_lines(Tab::Overview).len());
    }
}
