use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::debug;

use fintrack::backend::{Backend, LocalBackend, TerminalDelivery};
use fintrack::cli::{
    handle_fixed_command, handle_goal_command, handle_history, handle_login, handle_logout,
    handle_report, handle_transaction_command, handle_whoami, FixedCommands, GoalCommands,
    TransactionCommands,
};
use fintrack::config::{FintrackPaths, Settings};
use fintrack::logging::{self, LogTarget};
use fintrack::models::Period;
use fintrack::services::Dashboard;
use fintrack::session::{Session, TokenStore};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Terminal personal-finance tracker",
    long_about = "fintrack keeps a month-by-month record of income and expenses, \
                  applies fixed monthly expenses, tracks savings goals and \
                  forecasts where the month will end."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard
    #[command(alias = "ui")]
    Tui,

    /// Sign in with a one-time code sent to your email
    Login {
        /// Account email
        email: String,
        /// Code received by email (prompted for when omitted)
        #[arg(long)]
        code: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List the expense categories
    Categories,

    /// Income and expense management
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Fixed monthly expenses
    #[command(subcommand)]
    Fixed(FixedCommands),

    /// Savings goals and their deposits
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Monthly summary, breakdown and forecast
    Report {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        period: Option<String>,
        /// Write the report as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show recent entries from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let log_file = paths.log_file();
    let log_target = match cli.command {
        Some(Commands::Tui) => LogTarget::File(&log_file),
        _ => LogTarget::Stderr,
    };
    logging::init(&settings.log_level, log_target)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("fintrack - Terminal personal-finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack login <email>' to sign in.");
            println!("Run 'fintrack tui' to launch the dashboard.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing fintrack at: {}", paths.data_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'fintrack login <email>' to sign in.");
            return Ok(());
        }
        Commands::Config => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Log file:         {}", paths.log_file().display());
            println!("Initialized:      {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Request timeout:  {}s", settings.request_timeout().as_secs());
            println!("  Login code TTL:   {} min", settings.code_ttl_minutes);
            println!("  Session TTL:      {} days", settings.session_ttl_days);
            println!("  Log level:        {}", settings.log_level);
            return Ok(());
        }
        Commands::Categories => {
            fintrack::cli::print_categories();
            return Ok(());
        }
        _ => {}
    }

    let local = Arc::new(LocalBackend::open(
        paths.clone(),
        &settings,
        Arc::new(TerminalDelivery),
    )?);
    let backend: Arc<dyn Backend> = local.clone();
    let mut session = Session::restore(TokenStore::new(paths.session_file()))?;
    debug!(signed_in = session.is_authenticated(), "session restored");

    match command {
        Commands::Login { email, code } => handle_login(backend.as_ref(), &mut session, &email, code)?,
        Commands::Logout => handle_logout(backend.as_ref(), &mut session)?,
        Commands::Whoami => handle_whoami(backend.as_ref(), &mut session)?,
        Commands::History { count } => handle_history(&local, &mut session, count)?,
        command => {
            let today = Local::now().date_naive();
            let mut dashboard = Dashboard::new(backend, session, Period::containing(today));

            match command {
                Commands::Txn(cmd) => handle_transaction_command(&mut dashboard, &settings, cmd)?,
                Commands::Fixed(cmd) => handle_fixed_command(&mut dashboard, &settings, cmd)?,
                Commands::Goal(cmd) => handle_goal_command(&mut dashboard, &settings, cmd)?,
                Commands::Report { period, csv } => {
                    handle_report(&mut dashboard, &settings, period, csv)?
                }
                Commands::Tui => {
                    // Fail fast instead of opening an empty dashboard
                    dashboard.token()?;
                    fintrack::tui::run_tui(dashboard, settings)?;
                }
                _ => {}
            }
        }
    }

    Ok(())
}
