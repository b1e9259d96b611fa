//! Transaction CLI commands
//!
//! One command set serves both incomes and expenses; the kind is an argument.

use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::FinResult;
use crate::models::category::DEFAULT_CATEGORY;
use crate::models::{Money, NewTransaction, Transaction, TransactionId, TransactionKind};
use crate::services::{parse_or_current, Dashboard};

use super::{parse_amount, parse_category, parse_date, parse_id};

/// Transaction kind as a CLI argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// income or expense
        #[arg(value_enum)]
        kind: KindArg,
        /// Amount (e.g., "12.50")
        amount: String,
        /// What it was for
        description: String,
        /// Category key for expenses (see `fintrack categories`)
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transactions of a month
    List {
        /// Only this kind
        #[arg(value_enum)]
        kind: Option<KindArg>,
        /// Month: YYYY-MM, a month name, "last" or "next"
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// income or expense
        #[arg(value_enum)]
        kind: KindArg,
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    dashboard: &mut Dashboard,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let today = Local::now().date_naive();

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            description,
            category,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            let date = date.as_deref().map(parse_date).transpose()?;
            let input = build_input(kind.into(), amount, description, category, date)?;

            let created = dashboard.add_transaction(input)?;
            println!("Recorded {}", created.kind.as_str());
            print!("{}", format_transaction_details(&created, symbol));
        }

        TransactionCommands::List { kind, period } => {
            let period = parse_or_current(period.as_deref(), today)?;
            dashboard.select(period)?;

            let store = dashboard.transactions();
            let show = |title: &str, items: &[Transaction]| {
                println!("{} for {}", title, period.label());
                println!("{}", format_transaction_table(items, symbol, &settings.date_format));
            };
            match kind {
                Some(KindArg::Income) => show("Income", store.list_incomes()),
                Some(KindArg::Expense) => show("Expenses", store.list_expenses()),
                None => {
                    show("Income", store.list_incomes());
                    println!();
                    show("Expenses", store.list_expenses());
                }
            }
        }

        TransactionCommands::Delete { kind, id } => {
            let id: TransactionId = parse_id(&id, "transaction")?;
            dashboard.delete_transaction(id, kind.into())?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

fn build_input(
    kind: TransactionKind,
    amount: Money,
    description: String,
    category: Option<String>,
    date: Option<NaiveDate>,
) -> FinResult<NewTransaction> {
    let mut input = match kind {
        TransactionKind::Expense => {
            let category = match category {
                Some(c) => parse_category(&c)?,
                None => DEFAULT_CATEGORY.to_string(),
            };
            NewTransaction::expense(amount, description, category)
        }
        TransactionKind::Income => {
            let mut input = NewTransaction::income(amount, description);
            // Passed through so validation reports it
            input.category = category;
            input
        }
    };
    input.date = date;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_defaults_to_other() {
        let input = build_input(TransactionKind::Expense, Money::from_units(5), "Tea".into(), None, None)
            .unwrap();
        assert_eq!(input.category.as_deref(), Some("other"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_income_with_category_fails_validation() {
        let input = build_input(
            TransactionKind::Income,
            Money::from_units(5),
            "Gift".into(),
            Some("food".into()),
            None,
        )
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_unknown_expense_category() {
        let err = build_input(
            TransactionKind::Expense,
            Money::from_units(5),
            "Toy".into(),
            Some("pets".into()),
            None,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
