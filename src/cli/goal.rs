//! Goal CLI commands
//!
//! Goals are savings targets. Deposits add to the saved amount and
//! withdrawals take from it; both land in the goal's ledger.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_goal_history, format_goal_table};
use crate::error::{FinError, FinResult};
use crate::models::{DepositId, GoalId, NewGoal};
use crate::services::Dashboard;

use super::{parse_amount, parse_category, parse_date, parse_id};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Title (e.g., "Vacation")
        title: String,
        /// Amount to save
        target: String,
        /// Category key
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },
    /// List goals
    List {
        /// Include completed goals
        #[arg(short, long)]
        all: bool,
    },
    /// Put money into a goal
    Deposit {
        /// Goal ID
        goal: String,
        /// Amount
        amount: String,
        /// Optional note
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Take money out of a goal
    Withdraw {
        /// Goal ID
        goal: String,
        /// Amount
        amount: String,
        /// Optional note
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Show a goal and its ledger
    History {
        /// Goal ID
        goal: String,
    },
    /// Change a ledger entry
    EditDeposit {
        /// Goal ID
        goal: String,
        /// Deposit ID
        deposit: String,
        /// New amount; negative for a withdrawal
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// New note
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Remove a ledger entry
    RemoveDeposit {
        /// Goal ID
        goal: String,
        /// Deposit ID
        deposit: String,
    },
    /// Mark a goal as completed
    Complete {
        /// Goal ID
        goal: String,
        /// Reopen instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a goal and its ledger
    Delete {
        /// Goal ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    dashboard: &mut Dashboard,
    settings: &Settings,
    cmd: GoalCommands,
) -> FinResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Add {
            title,
            target,
            category,
            due,
        } => {
            let input = NewGoal {
                title,
                category: parse_category(&category)?,
                target_amount: parse_amount(&target)?,
                target_date: due.as_deref().map(parse_date).transpose()?,
            };
            let created = dashboard.add_goal(input)?;
            println!("Created goal: {}", created);
            println!("  ID: {}", created.id);
        }

        GoalCommands::List { all } => {
            dashboard.reload_goals()?;
            let goals: Vec<_> = dashboard
                .goals()
                .list()
                .iter()
                .filter(|g| all || !g.is_completed)
                .cloned()
                .collect();
            println!("{}", format_goal_table(&goals, symbol));
        }

        GoalCommands::Deposit {
            goal,
            amount,
            comment,
        } => {
            let goal_id = parse_goal(&goal)?;
            let amount = parse_amount(&amount)?;
            if amount.is_negative() {
                return Err(FinError::Validation(
                    "Deposit amount must be positive; use `fintrack goal withdraw`".into(),
                ));
            }
            let updated = dashboard.deposit(goal_id, amount, comment)?;
            println!(
                "Saved {} toward {}: now {}",
                amount.format_with_symbol(symbol),
                updated.title,
                updated.saved_amount.format_with_symbol(symbol)
            );
        }

        GoalCommands::Withdraw {
            goal,
            amount,
            comment,
        } => {
            let goal_id = parse_goal(&goal)?;
            let amount = parse_amount(&amount)?.abs();
            let updated = dashboard.deposit(goal_id, -amount, comment)?;
            println!(
                "Withdrew {} from {}: now {}",
                amount.format_with_symbol(symbol),
                updated.title,
                updated.saved_amount.format_with_symbol(symbol)
            );
        }

        GoalCommands::History { goal } => {
            let goal_id = parse_goal(&goal)?;
            dashboard.reload_goals()?;
            let found = dashboard
                .goals()
                .get(goal_id)
                .cloned()
                .ok_or_else(|| FinError::goal_not_found(goal_id.to_string()))?;
            let deposits = dashboard.load_deposits(goal_id)?;
            println!("{}", format_goal_history(&found, deposits, symbol));
        }

        GoalCommands::EditDeposit {
            goal,
            deposit,
            amount,
            comment,
        } => {
            let goal_id = parse_goal(&goal)?;
            let deposit_id: DepositId = parse_id(&deposit, "deposit")?;
            let updated = dashboard.update_deposit(goal_id, deposit_id, parse_amount(&amount)?, comment)?;
            println!(
                "Updated {}: {}",
                updated.id,
                updated.amount.format_with_symbol(symbol)
            );
        }

        GoalCommands::RemoveDeposit { goal, deposit } => {
            let goal_id = parse_goal(&goal)?;
            let deposit_id: DepositId = parse_id(&deposit, "deposit")?;
            dashboard.delete_deposit(goal_id, deposit_id)?;
            println!("Removed {} from {}", deposit_id, goal_id);
        }

        GoalCommands::Complete { goal, undo } => {
            let goal_id = parse_goal(&goal)?;
            dashboard.set_goal_completed(goal_id, !undo)?;
            if undo {
                println!("Reopened {}", goal_id);
            } else {
                println!("Completed {}", goal_id);
            }
        }

        GoalCommands::Delete { goal } => {
            let goal_id = parse_goal(&goal)?;
            dashboard.delete_goal(goal_id)?;
            println!("Deleted {}", goal_id);
        }
    }

    Ok(())
}

fn parse_goal(input: &str) -> FinResult<GoalId> {
    parse_id(input, "goal")
}
