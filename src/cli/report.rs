//! Report CLI command

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;

use crate::config::Settings;
use crate::error::{FinError, FinResult};
use crate::reports::MonthlyReport;
use crate::services::{parse_or_current, Dashboard};

/// Print the monthly report, or write it as CSV to `csv`
pub fn handle_report(
    dashboard: &mut Dashboard,
    settings: &Settings,
    period: Option<String>,
    csv: Option<PathBuf>,
) -> FinResult<()> {
    let today = Local::now().date_naive();
    let period = parse_or_current(period.as_deref(), today)?;

    dashboard.select(period)?;
    dashboard.reload_recurring()?;
    dashboard.reload_goals()?;

    let report = MonthlyReport::generate(dashboard, today, &settings.currency_symbol);

    match csv {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| FinError::Export(format!("Cannot create {}: {}", path.display(), e)))?;
            report.export_csv(BufWriter::new(file))?;
            println!("Report for {} written to {}", period, path.display());
        }
        None => print!("{}", report.format_terminal()),
    }

    Ok(())
}
