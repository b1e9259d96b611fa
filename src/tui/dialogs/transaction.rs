//! Transaction entry dialog
//!
//! Modal form for recording an income or expense. The kind is fixed when the
//! dialog opens; incomes have no category field. The form is validated
//! locally and only a valid input is sent to the backend.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::models::category::{self, DEFAULT_CATEGORY};
use crate::models::{Money, NewTransaction, TransactionKind};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// Which field is currently focused in the transaction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionField {
    #[default]
    Amount,
    Description,
    Category,
    Date,
}

/// State for the transaction form dialog
#[derive(Debug, Clone)]
pub struct TransactionFormState {
    pub kind: TransactionKind,
    pub focused_field: TransactionField,
    pub amount_input: TextInput,
    pub description_input: TextInput,
    pub category_input: TextInput,
    pub date_input: TextInput,
    pub error_message: Option<String>,
}

impl Default for TransactionFormState {
    fn default() -> Self {
        Self::new(TransactionKind::Expense, None)
    }
}

impl TransactionFormState {
    /// Empty form; `date` pre-fills the date field
    pub fn new(kind: TransactionKind, date: Option<NaiveDate>) -> Self {
        let date_input = TextInput::new().label("Date").placeholder("today (YYYY-MM-DD)");
        let mut state = Self {
            kind,
            focused_field: TransactionField::Amount,
            amount_input: TextInput::new().label("Amount").placeholder("0.00"),
            description_input: TextInput::new().label("Description"),
            category_input: TextInput::new()
                .label("Category")
                .placeholder(DEFAULT_CATEGORY),
            date_input: match date {
                Some(d) => date_input.content(d.format("%Y-%m-%d").to_string()),
                None => date_input,
            },
            error_message: None,
        };
        state.update_focus();
        state
    }

    fn fields(&self) -> &'static [TransactionField] {
        match self.kind {
            TransactionKind::Expense => &[
                TransactionField::Amount,
                TransactionField::Description,
                TransactionField::Category,
                TransactionField::Date,
            ],
            TransactionKind::Income => &[
                TransactionField::Amount,
                TransactionField::Description,
                TransactionField::Date,
            ],
        }
    }

    fn step(&mut self, forward: bool) {
        let fields = self.fields();
        let pos = fields
            .iter()
            .position(|f| *f == self.focused_field)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % fields.len()
        } else {
            (pos + fields.len() - 1) % fields.len()
        };
        self.focused_field = fields[next];
        self.update_focus();
    }

    pub fn next_field(&mut self) {
        self.step(true);
    }

    pub fn prev_field(&mut self) {
        self.step(false);
    }

    fn update_focus(&mut self) {
        self.amount_input.focused = self.focused_field == TransactionField::Amount;
        self.description_input.focused = self.focused_field == TransactionField::Description;
        self.category_input.focused = self.focused_field == TransactionField::Category;
        self.date_input.focused = self.focused_field == TransactionField::Date;
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            TransactionField::Amount => &mut self.amount_input,
            TransactionField::Description => &mut self.description_input,
            TransactionField::Category => &mut self.category_input,
            TransactionField::Date => &mut self.date_input,
        }
    }

    /// Build and validate the backend input
    pub fn build(&self) -> Result<NewTransaction, String> {
        let amount = Money::parse(self.amount_input.value()).map_err(|e| e.to_string())?;
        let description = self.description_input.value().trim().to_string();

        let mut input = match self.kind {
            TransactionKind::Expense => {
                let key = self.category_input.value().trim().to_lowercase();
                let key = if key.is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    key
                };
                NewTransaction::expense(amount, description, key)
            }
            TransactionKind::Income => NewTransaction::income(amount, description),
        };

        let date = self.date_input.value().trim();
        if !date.is_empty() {
            let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| "Invalid date format. Use YYYY-MM-DD".to_string())?;
            input = input.on(parsed);
        }

        input.validate().map_err(|e| e.to_string())?;
        Ok(input)
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Render the transaction dialog
pub fn render(frame: &mut Frame, app: &App) {
    let form = &app.transaction_form;
    let area = centered_rect_fixed(64, 13, frame.area());
    frame.render_widget(Clear, area);

    let title = match form.kind {
        TransactionKind::Expense => " Add Expense ",
        TransactionKind::Income => " Add Income ",
    };
    let block = Block::default()
        .title(title)
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
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Description
            Constraint::Length(1), // Category
            Constraint::Length(1), // Date
            Constraint::Length(1),
            Constraint::Min(2), // Hint or error
            Constraint::Length(1), // Keys
        ])
        .split(inner);

    frame.render_widget(&form.amount_input, rows[0]);
    frame.render_widget(&form.description_input, rows[1]);
    if form.kind == TransactionKind::Expense {
        frame.render_widget(&form.category_input, rows[2]);
    }
    frame.render_widget(&form.date_input, rows[3]);

    let message = match &form.error_message {
        Some(error) => Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
        None if form.focused_field == TransactionField::Category => Line::from(Span::styled(
            category::keys(),
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), rows[5]);

    let keys = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(keys), rows[6]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut TransactionFormState, amount: &str, description: &str) {
        form.amount_input = TextInput::new().content(amount);
        form.description_input = TextInput::new().content(description);
    }

    #[test]
    fn test_expense_defaults_category() {
        let mut form = TransactionFormState::new(TransactionKind::Expense, None);
        fill(&mut form, "12.50", "Lunch");

        let input = form.build().unwrap();
        assert_eq!(input.amount, Money::from_cents(1250));
        assert_eq!(input.category.as_deref(), Some(DEFAULT_CATEGORY));
        assert!(input.date.is_none());
    }

    #[test]
    fn test_income_skips_category_field() {
        let mut form = TransactionFormState::new(TransactionKind::Income, None);
        form.next_field();
        form.next_field();
        assert_eq!(form.focused_field, TransactionField::Date);

        fill(&mut form, "3000", "Salary");
        form.category_input = TextInput::new().content("food");
        let input = form.build().unwrap();
        assert!(input.category.is_none());
    }

    #[test]
    fn test_invalid_input_is_rejected_locally() {
        let mut form = TransactionFormState::new(TransactionKind::Expense, None);
        fill(&mut form, "abc", "Lunch");
        assert!(form.build().is_err());

        fill(&mut form, "5", "   ");
        assert!(form.build().unwrap_err().contains("Description"));

        fill(&mut form, "5", "Lunch");
        form.category_input = TextInput::new().content("pets");
        assert!(form.build().unwrap_err().contains("Unknown category"));

        form.category_input = TextInput::new().content("Food");
        form.date_input = TextInput::new().content("2025/02/03");
        assert!(form.build().unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_prefilled_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let mut form = TransactionFormState::new(TransactionKind::Expense, Some(date));
        fill(&mut form, "1", "Bus");
        assert_eq!(form.build().unwrap().date, Some(date));
    }
}
