//! Modal dialogs for the TUI

pub mod confirm;
pub mod deposit;
pub mod help;
pub mod transaction;
