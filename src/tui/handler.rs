//! Event handler for the TUI
//!
//! Routes keyboard events to the open dialog, or to the global and
//! tab-specific bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::TransactionKind;

use super::app::{ActiveDialog, App, Tab};
use super::event::Event;
use super::widgets::TextInput;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => app.on_tick(),
        Event::Resize(_, _) => {}
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
    } else {
        handle_normal_key(app, key);
    }
}

/// Handle keys when no dialog is open
fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        // Tabs
        KeyCode::Tab => app.switch_tab(app.active_tab.next()),
        KeyCode::BackTab => app.switch_tab(app.active_tab.prev()),
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.switch_tab(Tab::ALL[index]);
        }

        // Period
        KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left => app.shift_period(-1),
        KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right => app.shift_period(1),
        KeyCode::Char('t') => app.go_to_current_period(),

        // Selection
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Home => app.selected_index = 0,

        KeyCode::Char('r') => {
            app.reload_all();
            app.set_status("Reloading…");
        }
        KeyCode::Char('a') => app.open_add_transaction(TransactionKind::Expense),
        KeyCode::Char('i') => app.open_add_transaction(TransactionKind::Income),
        KeyCode::Char('m') => app.confirm_materialize(),
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_delete_selected(),

        _ => handle_tab_key(app, key),
    }
}

/// Keys that only mean something on one tab
fn handle_tab_key(app: &mut App, key: KeyEvent) {
    match (app.active_tab, key.code) {
        (Tab::Fixed, KeyCode::Char(' ')) => app.toggle_selected_recurring(),
        (Tab::Goals, KeyCode::Char(' ')) => app.toggle_selected_goal(),
        (Tab::Goals, KeyCode::Char('+')) => app.open_deposit(),
        (Tab::Goals, KeyCode::Enter) => app.load_selected_ledger(),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog.clone() {
        ActiveDialog::None => {}
        ActiveDialog::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.close_dialog();
            }
        }
        ActiveDialog::Confirm(action) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.execute(action),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::AddTransaction => match key.code {
            KeyCode::Esc => app.close_dialog(),
            KeyCode::Enter => app.submit_transaction_form(),
            KeyCode::Tab | KeyCode::Down => app.transaction_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => app.transaction_form.prev_field(),
            _ => {
                app.transaction_form.error_message = None;
                edit_input(app.transaction_form.focused_input(), key);
            }
        },
        ActiveDialog::Deposit => {
            let Some(form) = app.deposit_form.as_mut() else {
                app.close_dialog();
                return;
            };
            match key.code {
                KeyCode::Esc => app.close_dialog(),
                KeyCode::Enter => app.submit_deposit_form(),
                KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
                _ => {
                    form.error_message = None;
                    edit_input(form.focused_input(), key);
                }
            }
        }
    }
}

/// Apply an editing key to a text input
fn edit_input(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::local::tests::{login, open_backend, EMAIL};
    use crate::config::Settings;
    use crate::models::Period;
    use crate::services::Dashboard;
    use crate::session::{Session, TokenStore};
    use chrono::Local;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn app(temp_dir: &TempDir) -> App {
        let (backend, outbox) = open_backend(temp_dir);
        let token = login(&backend, &outbox, EMAIL);
        let store = TokenStore::new(temp_dir.path().join("session.json"));
        store.save(&token).unwrap();
        let session = Session::restore(store).unwrap();
        let period = Period::containing(Local::now().date_naive());
        App::new(Dashboard::new(Arc::new(backend), session, period), Settings::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_tab_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.active_tab, Tab::Goals);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::Overview);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_tab, Tab::Goals);
    }

    #[test]
    fn test_period_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);
        let start = app.period();

        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.period(), start.shift(-2));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.period(), start.prev());
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.period(), start);
    }

    #[test]
    fn test_typing_into_form_does_not_trigger_bindings() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.active_dialog, ActiveDialog::AddTransaction);

        type_text(&mut app, "12.5");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "quiet tram");

        assert!(!app.should_quit);
        assert_eq!(app.transaction_form.amount_input.value(), "12.5");
        assert_eq!(app.transaction_form.description_input.value(), "quiet tram");

        press(&mut app, KeyCode::Esc);
        assert!(!app.has_dialog());
    }

    #[test]
    fn test_confirm_can_be_cancelled() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('m'));
        assert!(matches!(app.active_dialog, ActiveDialog::Confirm(_)));
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.has_dialog());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_quit_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);
        handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(app.should_quit);
    }
}
