//! Report CLI commands

use clap::Subcommand;

use crate::display::report::format_breakdown;
use crate::error::FinTrackResult;
use crate::services::analytics;
use crate::storage::Storage;

use super::PeriodArgs;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income and expense per category for a period
    Analytics {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

/// Handle a report command
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> FinTrackResult<()> {
    match cmd {
        ReportCommands::Analytics { period } => {
            let period = period.to_period()?;
            let (transactions, currency) = storage
                .ledger
                .read(|s| (analytics::filter_period(&s.transactions, &period), s.profile.currency.clone()))?;

            let breakdown = analytics::category_breakdown(&transactions);
            print!("{}", format_breakdown(&breakdown, &period, &currency));
        }
    }

    Ok(())
}
