//! Spreadsheet export and import for FinTrack
//!
//! - `workbook`: in-memory sheets and cells
//! - `sheets`: ledger to workbook mapping (backup, report, yearly report)
//! - `xlsx`: Excel files via `rust_xlsxwriter` / `calamine`
//! - `csv`: single-sheet CSV files

pub mod csv;
pub mod sheets;
pub mod workbook;
pub mod xlsx;

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

pub use sheets::{
    backup_workbook, export_file_name, format_date, report_workbook, summary_rows,
    yearly_file_name, yearly_workbook, CATEGORY_SHEET, LEGACY_TRANSACTIONS_SHEET,
    SUMMARY_SHEET, TRANSACTIONS_SHEET, VAULT_SHEET, YEARLY_SUMMARY_SHEET,
};
pub use workbook::{Cell, Record, Sheet, Workbook};

use crate::error::{FinTrackError, FinTrackResult};

/// File format for exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("Unknown export format '{}' (expected xlsx or csv)", other)),
        }
    }
}

/// Write a workbook in the given format
///
/// CSV holds a single sheet, so only the `All Transactions` sheet is written.
pub fn write_workbook(workbook: &Workbook, path: &Path, format: ExportFormat) -> FinTrackResult<()> {
    match format {
        ExportFormat::Xlsx => xlsx::write_xlsx(workbook, path),
        ExportFormat::Csv => {
            let sheet = workbook.sheet(TRANSACTIONS_SHEET).ok_or_else(|| {
                FinTrackError::Export(format!(
                    "CSV export needs an '{}' sheet; use xlsx for this report",
                    TRANSACTIONS_SHEET
                ))
            })?;
            let file = File::create(path)
                .map_err(|e| FinTrackError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
            csv::write_csv(sheet, BufWriter::new(file))
        }
    }
}

/// Read a spreadsheet, choosing the codec from the file extension
pub fn read_workbook(path: &Path) -> FinTrackResult<Workbook> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            let file = File::open(path)
                .map_err(|e| FinTrackError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
            let mut workbook = Workbook::new();
            workbook.push(csv::read_csv(file)?);
            Ok(workbook)
        }
        "xlsx" | "xlsm" | "xls" | "ods" => xlsx::read_xlsx(path),
        other => Err(FinTrackError::InvalidFormat(format!(
            "Unsupported file type '.{}' (expected .xlsx or .csv)",
            other
        ))),
    }
}
