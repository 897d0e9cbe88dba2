//! CLI commands for spreadsheet export
//!
//! Writes the full backup, a filtered report or a yearly report to a file in
//! the output directory.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::error::FinTrackResult;
use crate::export::{
    backup_workbook, export_file_name, report_workbook, write_workbook, yearly_file_name,
    yearly_workbook, ExportFormat,
};
use crate::services::analytics;
use crate::storage::Storage;

use super::PeriodArgs;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Everything: summary, transactions, categories and vault
    Backup {
        /// xlsx or csv (csv keeps only the transactions sheet)
        #[arg(short, long, default_value = "xlsx")]
        format: ExportFormat,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Summary and transactions for a period
    Report {
        #[command(flatten)]
        period: PeriodArgs,
        /// xlsx or csv (csv keeps only the transactions sheet)
        #[arg(short, long, default_value = "xlsx")]
        format: ExportFormat,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Yearly summary plus one sheet per month (xlsx only)
    Yearly {
        /// Calendar year, defaults to the current one
        year: Option<i32>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> FinTrackResult<()> {
    let state = storage.ledger.snapshot()?;
    let today = Local::now().date_naive();

    let (path, rows) = match cmd {
        ExportCommands::Backup { format, output } => {
            let name = export_file_name("Backup", &state.profile, today, format.extension());
            let path = target(&output, &name)?;
            write_workbook(&backup_workbook(&state), &path, format)?;
            (path, state.transactions.len())
        }

        ExportCommands::Report {
            period,
            format,
            output,
        } => {
            let period = period.to_period()?;
            let transactions = analytics::filter_period(&state.transactions, &period);
            let name = export_file_name(&period.report_label(), &state.profile, today, format.extension());
            let path = target(&output, &name)?;
            write_workbook(&report_workbook(&transactions), &path, format)?;
            (path, transactions.len())
        }

        ExportCommands::Yearly { year, output } => {
            let year = year.unwrap_or_else(|| today.year());
            let workbook = yearly_workbook(&state, year);
            let path = target(&output, &yearly_file_name(year, &state.profile))?;
            write_workbook(&workbook, &path, ExportFormat::Xlsx)?;
            let rows = state
                .transactions
                .iter()
                .filter(|t| t.day().year() == year)
                .count();
            (path, rows)
        }
    };

    tracing::info!(path = %path.display(), rows, "export written");
    println!("Exported {} transaction(s) to {}", rows, path.display());

    Ok(())
}

fn target(dir: &Path, file_name: &str) -> FinTrackResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(file_name))
}
