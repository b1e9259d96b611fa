//! Goal deposit dialog
//!
//! A negative amount records a withdrawal.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::goal::validate_deposit_amount;
use crate::models::{GoalId, Money};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepositField {
    #[default]
    Amount,
    Comment,
}

/// State for the deposit dialog
#[derive(Debug, Clone)]
pub struct DepositFormState {
    pub goal_id: GoalId,
    pub goal_title: String,
    pub focused_field: DepositField,
    pub amount_input: TextInput,
    pub comment_input: TextInput,
    pub error_message: Option<String>,
}

impl DepositFormState {
    pub fn new(goal_id: GoalId, goal_title: impl Into<String>) -> Self {
        let mut state = Self {
            goal_id,
            goal_title: goal_title.into(),
            focused_field: DepositField::Amount,
            amount_input: TextInput::new().label("Amount").placeholder("-50 to withdraw"),
            comment_input: TextInput::new().label("Comment").placeholder("optional"),
            error_message: None,
        };
        state.amount_input.focused = true;
        state
    }

    pub fn toggle_field(&mut self) {
        self.focused_field = match self.focused_field {
            DepositField::Amount => DepositField::Comment,
            DepositField::Comment => DepositField::Amount,
        };
        self.amount_input.focused = self.focused_field == DepositField::Amount;
        self.comment_input.focused = self.focused_field == DepositField::Comment;
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            DepositField::Amount => &mut self.amount_input,
            DepositField::Comment => &mut self.comment_input,
        }
    }

    /// Amount and comment, validated
    pub fn build(&self) -> Result<(Money, Option<String>), String> {
        let amount = Money::parse(self.amount_input.value()).map_err(|e| e.to_string())?;
        validate_deposit_amount(amount).map_err(|e| e.to_string())?;

        let comment = self.comment_input.value().trim();
        let comment = (!comment.is_empty()).then(|| comment.to_string());
        Ok((amount, comment))
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Render the deposit dialog
pub fn render(frame: &mut Frame, app: &App) {
    let Some(form) = app.deposit_form.as_ref() else {
        return;
    };

    let area = centered_rect_fixed(56, 9, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Deposit to {} ", form.goal_title))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(&form.amount_input, rows[0]);
    frame.render_widget(&form.comment_input, rows[1]);

    if let Some(error) = &form.error_message {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            rows[2],
        );
    }

    let keys = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Switch  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(keys), rows[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawal_and_comment() {
        let mut form = DepositFormState::new(GoalId::new(1), "Vacation");
        form.amount_input = TextInput::new().content("-50");
        form.comment_input = TextInput::new().content("  tickets ");

        let (amount, comment) = form.build().unwrap();
        assert_eq!(amount, Money::from_units(-50));
        assert_eq!(comment.as_deref(), Some("tickets"));
    }

    #[test]
    fn test_zero_rejected() {
        let mut form = DepositFormState::new(GoalId::new(1), "Vacation");
        form.amount_input = TextInput::new().content("0");
        assert!(form.build().unwrap_err().contains("zero"));
    }
}
