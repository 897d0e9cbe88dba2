//! Ledger to workbook mapping
//!
//! Builds the three workbook layouts FinTrack writes: the full backup, the
//! filtered report and the yearly report.

use chrono::{Datelike, NaiveDate};

use crate::models::{AppState, CategoryKind, Transaction, TransactionType, UserProfile, MONTHS};

use super::workbook::{Cell, Sheet, Workbook};

pub const SUMMARY_SHEET: &str = "Summary Report";
pub const TRANSACTIONS_SHEET: &str = "All Transactions";
pub const LEGACY_TRANSACTIONS_SHEET: &str = "Transactions";
pub const VAULT_SHEET: &str = "Vault Transactions";
pub const CATEGORY_SHEET: &str = "Category Config";
pub const YEARLY_SUMMARY_SHEET: &str = "Yearly Summary";

pub const SUMMARY_HEADERS: [&str; 3] = ["Type", "Category", "Total"];
pub const TRANSACTION_HEADERS: [&str; 6] =
    ["ID", "Type", "Amount", "Category", "Date", "Description"];
pub const MONTH_HEADERS: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];
pub const CATEGORY_HEADERS: [&str; 2] = ["Type", "Name"];

/// `M/D/YYYY`, no zero padding
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

fn type_label(kind: TransactionType) -> String {
    kind.as_str().to_uppercase()
}

/// Totals per `(type, category)`, income first then expense
///
/// Categories keep the order they first appear in; other types are left out.
pub fn summary_rows(transactions: &[Transaction]) -> Vec<(TransactionType, String, f64)> {
    let mut rows = Vec::new();

    for kind in [TransactionType::Income, TransactionType::Expense] {
        let mut totals: Vec<(String, f64)> = Vec::new();

        for txn in transactions.iter().filter(|t| t.transaction_type == kind) {
            match totals.iter_mut().find(|(c, _)| *c == txn.category) {
                Some((_, total)) => *total += txn.amount.value(),
                None => totals.push((txn.category.clone(), txn.amount.value())),
            }
        }

        rows.extend(totals.into_iter().map(|(c, t)| (kind, c, t)));
    }

    rows
}

fn summary_sheet(name: &str, transactions: &[Transaction]) -> Sheet {
    let mut sheet = Sheet::new(name, &SUMMARY_HEADERS);
    for (kind, category, total) in summary_rows(transactions) {
        sheet.push_row(vec![
            Cell::from(type_label(kind)),
            Cell::from(category),
            Cell::from(total),
        ]);
    }
    sheet
}

/// One row per transaction with the `All Transactions` columns
pub fn transactions_sheet(name: &str, transactions: &[Transaction]) -> Sheet {
    let mut sheet = Sheet::new(name, &TRANSACTION_HEADERS);
    for txn in transactions {
        sheet.push_row(vec![
            Cell::from(txn.id.to_string()),
            Cell::from(type_label(txn.transaction_type)),
            Cell::from(txn.amount.value()),
            Cell::from(txn.category.clone()),
            Cell::from(format_date(txn.day())),
            Cell::from(txn.description.clone()),
        ]);
    }
    sheet
}

fn category_sheet(state: &AppState) -> Sheet {
    let mut sheet = Sheet::new(CATEGORY_SHEET, &CATEGORY_HEADERS);
    for kind in [CategoryKind::Income, CategoryKind::Expense] {
        for name in state.categories.list(kind) {
            sheet.push_row(vec![Cell::from(kind.label()), Cell::from(name.clone())]);
        }
    }
    sheet
}

/// Full backup: summary, main ledger, category lists and vault ledger
pub fn backup_workbook(state: &AppState) -> Workbook {
    let mut workbook = Workbook::new();
    workbook.push(summary_sheet(SUMMARY_SHEET, &state.transactions));
    workbook.push(transactions_sheet(TRANSACTIONS_SHEET, &state.transactions));
    workbook.push(category_sheet(state));
    workbook.push(transactions_sheet(VAULT_SHEET, &state.vault_transactions));
    workbook
}

/// Filtered report: summary and rows only
pub fn report_workbook(transactions: &[Transaction]) -> Workbook {
    let mut workbook = Workbook::new();
    workbook.push(summary_sheet(SUMMARY_SHEET, transactions));
    workbook.push(transactions_sheet(TRANSACTIONS_SHEET, transactions));
    workbook
}

/// Yearly report: a summary plus one sheet per month that has entries
pub fn yearly_workbook(state: &AppState, year: i32) -> Workbook {
    let yearly: Vec<Transaction> = state
        .transactions
        .iter()
        .filter(|t| t.day().year() == year)
        .cloned()
        .collect();

    let mut workbook = Workbook::new();
    workbook.push(summary_sheet(YEARLY_SUMMARY_SHEET, &yearly));

    for (index, month) in MONTHS.iter().enumerate() {
        let mut sheet = Sheet::new(*month, &MONTH_HEADERS);
        for txn in yearly.iter().filter(|t| t.day().month0() as usize == index) {
            sheet.push_row(vec![
                Cell::from(format_date(txn.day())),
                Cell::from(type_label(txn.transaction_type)),
                Cell::from(txn.category.clone()),
                Cell::from(txn.amount.value()),
                Cell::from(txn.description.clone()),
            ]);
        }
        if !sheet.is_empty() {
            workbook.push(sheet);
        }
    }

    workbook
}

/// `FinTrack_<label>_<Name>_<YYYY-MM-DD>.xlsx`
pub fn export_file_name(label: &str, profile: &UserProfile, today: NaiveDate, extension: &str) -> String {
    format!(
        "FinTrack_{}_{}_{}.{}",
        label,
        profile.file_slug(),
        today.format("%Y-%m-%d"),
        extension
    )
}

/// `FinTrack_Full_Year_<year>_<Name>.xlsx`
pub fn yearly_file_name(year: i32, profile: &UserProfile) -> String {
    format!("FinTrack_Full_Year_{}_{}.xlsx", year, profile.file_slug())
}
