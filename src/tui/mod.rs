//! Terminal dashboard
//!
//! Tabbed views over the selected month: overview, transactions, fixed
//! expenses, analytics, forecast and goals. Backend calls go through a
//! background loader so the interface stays responsive.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod loader;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
