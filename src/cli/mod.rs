//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod category;
pub mod daily;
pub mod export;
pub mod import;
pub mod profile;
pub mod report;
pub mod transaction;
pub mod vault;

pub use backup::{handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use daily::{handle_remind_command, handle_tip_command};
pub use export::{handle_export_command, ExportCommands};
pub use import::handle_import_command;
pub use profile::{handle_profile_command, ProfileCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use vault::{handle_vault_command, VaultCommands};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Args;

use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{Amount, ReportPeriod};

/// Parse a user-supplied amount
pub(crate) fn parse_amount(s: &str) -> FinTrackResult<Amount> {
    Amount::parse(s).map_err(|e| FinTrackError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse a `YYYY-MM-DD` date
pub(crate) fn parse_day(s: &str) -> FinTrackResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        FinTrackError::Validation(format!("Invalid date '{}' (expected YYYY-MM-DD)", s))
    })
}

/// Timestamp for a transaction: the given day at midnight UTC, or now
pub(crate) fn transaction_date(date: Option<&str>) -> FinTrackResult<DateTime<Utc>> {
    match date {
        Some(s) => {
            let day = parse_day(s)?;
            let midnight = day
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| FinTrackError::Validation(format!("Invalid date '{}'", s)))?;
            Ok(Utc.from_utc_datetime(&midnight))
        }
        None => Ok(Utc::now()),
    }
}

/// Period filter shared by reports and exports
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// Month number (1-12) or "all"
    #[arg(long)]
    pub month: Option<String>,

    /// Week of the month (1-5) or "all"
    #[arg(long)]
    pub week: Option<String>,

    /// Calendar year
    #[arg(long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    /// Build and validate the period
    pub fn to_period(&self) -> FinTrackResult<ReportPeriod> {
        let period = ReportPeriod {
            year: self.year,
            month: parse_part(self.month.as_deref(), "month")?,
            week: parse_part(self.week.as_deref(), "week")?,
        };
        period.validate().map_err(FinTrackError::Validation)?;
        Ok(period)
    }
}

fn parse_part(value: Option<&str>, what: &str) -> FinTrackResult<Option<u32>> {
    match value.map(str::trim) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| FinTrackError::Validation(format!("Invalid {} '{}'", what, v))),
    }
}
