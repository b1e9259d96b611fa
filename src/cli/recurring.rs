//! Fixed (recurring) expense CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_materialize_report, format_recurring_table};
use crate::error::FinResult;
use crate::models::{NewRecurringExpense, RecurringId};
use crate::services::{parse_or_current, Dashboard};

use super::{parse_amount, parse_category, parse_id};

/// Fixed expense subcommands
#[derive(Subcommand)]
pub enum FixedCommands {
    /// Define a monthly fixed expense
    Add {
        /// Title (e.g., "Rent")
        title: String,
        /// Monthly amount
        amount: String,
        /// Category key
        #[arg(short, long, default_value = "utilities")]
        category: String,
        /// Day of the month it is due (1-31)
        #[arg(short, long, default_value = "1")]
        day: u32,
    },
    /// List fixed expenses
    List,
    /// Pause or resume a fixed expense
    Toggle {
        /// Fixed expense ID
        id: String,
    },
    /// Delete a fixed expense
    Delete {
        /// Fixed expense ID
        id: String,
    },
    /// Record the active fixed expenses as expenses of a month
    Apply {
        /// Month: YYYY-MM, a month name, "last" or "next"
        #[arg(short, long)]
        period: Option<String>,
    },
}

/// Handle a fixed expense command
pub fn handle_fixed_command(
    dashboard: &mut Dashboard,
    settings: &Settings,
    cmd: FixedCommands,
) -> FinResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        FixedCommands::Add {
            title,
            amount,
            category,
            day,
        } => {
            let input = NewRecurringExpense {
                title,
                amount: parse_amount(&amount)?,
                category: parse_category(&category)?,
                day_of_month: day,
            };
            let created = dashboard.add_recurring(input)?;
            println!("Added fixed expense: {}", created);
            println!("  ID: {}", created.id);
        }

        FixedCommands::List => {
            dashboard.reload_recurring()?;
            println!("{}", format_recurring_table(dashboard.recurring().list(), symbol));
        }

        FixedCommands::Toggle { id } => {
            let id: RecurringId = parse_id(&id, "fixed expense")?;
            let active = dashboard.toggle_recurring(id)?;
            println!("{} is now {}", id, if active { "active" } else { "paused" });
        }

        FixedCommands::Delete { id } => {
            let id: RecurringId = parse_id(&id, "fixed expense")?;
            dashboard.delete_recurring(id)?;
            println!("Deleted {}", id);
        }

        FixedCommands::Apply { period } => {
            let period = parse_or_current(period.as_deref(), Local::now().date_naive())?;
            dashboard.select(period)?;
            let report = dashboard.materialize()?;
            print!("{}", format_materialize_report(&report, symbol));
        }
    }

    Ok(())
}
