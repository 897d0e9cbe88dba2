//! Spreadsheet import service
//!
//! Reads a workbook written by FinTrack (or edited by hand) back into the
//! ledger. Parsing is lenient: missing or odd cells fall back to defaults and
//! are reported as warnings. The merge replaces only what the workbook
//! carries, and a JSON snapshot is taken before anything is saved.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::audit::Operation;
use crate::backup::BackupManager;
use crate::config::settings::BackupRetention;
use crate::error::{FinTrackError, FinTrackResult};
use crate::export::{
    read_workbook, Cell, Record, Sheet, Workbook, CATEGORY_SHEET, LEGACY_TRANSACTIONS_SHEET,
    TRANSACTIONS_SHEET, VAULT_SHEET,
};
use crate::models::{
    Amount, AppState, Transaction, TransactionId, TransactionType, DEFAULT_CATEGORY,
};
use crate::storage::Storage;

use super::ledger::relink;

/// What a workbook contributes to the state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedData {
    /// Replaces the main ledger
    pub transactions: Vec<Transaction>,
    /// Replaces the vault ledger, when the workbook has a vault sheet
    pub vault_transactions: Option<Vec<Transaction>>,
    /// Replaces the income list, when the workbook has a category sheet
    pub income_categories: Option<Vec<String>>,
    /// Replaces the expense list, when the workbook has a category sheet
    pub expense_categories: Option<Vec<String>>,
    /// Cells that were defaulted, by sheet and row
    pub warnings: Vec<String>,
}

impl ImportedData {
    /// Apply to a state, leaving fields the workbook didn't carry alone
    ///
    /// Spreadsheets don't carry `linkedId`, so withdrawal/mirror pairs are
    /// linked again after the merge. Returns the number of pairs linked.
    pub fn merge_into(self, state: &mut AppState) -> usize {
        state.transactions = self.transactions;

        if let Some(vault) = self.vault_transactions {
            state.vault_transactions = vault;
        }
        if let Some(income) = self.income_categories {
            state.categories.income = income;
        }
        if let Some(expense) = self.expense_categories {
            state.categories.expense = expense;
        }

        state.categories.ensure_reserved();
        relink(state)
    }
}

/// Result of a completed import
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Main ledger entries imported
    pub imported: usize,
    /// Vault entries imported, if the workbook carried them
    pub vault_imported: Option<usize>,
    /// Whether category lists were replaced
    pub categories_replaced: bool,
    /// Snapshot taken before the merge
    pub backup_path: PathBuf,
    /// Defaulted cells
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn summary(&self) -> String {
        let mut summary = format!("Imported {} transactions", self.imported);
        if let Some(vault) = self.vault_imported {
            summary.push_str(&format!(", {} vault transactions", vault));
        }
        if self.categories_replaced {
            summary.push_str(", categories");
        }
        summary
    }
}

/// Parse a workbook without touching any state
///
/// Fails with `InvalidFormat` when there is no transactions sheet.
pub fn parse_workbook(workbook: &Workbook, now: DateTime<Utc>) -> FinTrackResult<ImportedData> {
    let sheet = workbook
        .sheet(TRANSACTIONS_SHEET)
        .or_else(|| workbook.sheet(LEGACY_TRANSACTIONS_SHEET))
        .ok_or_else(|| FinTrackError::InvalidFormat("No transactions found.".into()))?;

    let mut data = ImportedData::default();

    data.transactions = parse_transactions(sheet, TransactionType::Expense, now, &mut data.warnings);

    if let Some(vault) = workbook.sheet(VAULT_SHEET) {
        data.vault_transactions = Some(parse_transactions(
            vault,
            TransactionType::VaultIn,
            now,
            &mut data.warnings,
        ));
    }

    if let Some(categories) = workbook.sheet(CATEGORY_SHEET) {
        let (income, expense) = parse_categories(categories);
        data.income_categories = Some(income);
        data.expense_categories = Some(expense);
    }

    Ok(data)
}

fn parse_transactions(
    sheet: &Sheet,
    default_type: TransactionType,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> Vec<Transaction> {
    sheet
        .records()
        .enumerate()
        .filter(|(_, record)| !record.is_blank())
        .map(|(idx, record)| {
            // +2: one for the header row, one for 1-based numbering
            let row = idx + 2;
            parse_row(&record, default_type, now, &mut |msg: String| {
                warnings.push(format!("{} row {}: {}", sheet.name, row, msg))
            })
        })
        .collect()
}

fn parse_row(
    record: &Record<'_>,
    default_type: TransactionType,
    now: DateTime<Utc>,
    warn: &mut dyn FnMut(String),
) -> Transaction {
    let id = match record.get("ID").as_text() {
        Some(id) => TransactionId::from_raw(id),
        None => TransactionId::new(),
    };

    let transaction_type = match record.get("Type").as_text() {
        Some(raw) => TransactionType::from_wire(&raw).unwrap_or_else(|| {
            warn(format!("unknown type '{}', using {}", raw, default_type));
            default_type
        }),
        None => default_type,
    };

    let amount = match record.get("Amount").as_number() {
        Some(n) => n,
        None => {
            warn("amount missing or not a number, using 0".into());
            0.0
        }
    };

    let category = record
        .get("Category")
        .as_text()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let date = match record.get("Date") {
        Cell::Empty => now,
        cell => parse_date(cell).unwrap_or_else(|| {
            warn(format!("unreadable date '{}', using today", cell));
            now
        }),
    };

    let description = record.get("Description").as_text().unwrap_or_default();

    Transaction {
        id,
        transaction_type,
        amount: Amount::new(amount),
        category,
        date,
        description,
        borrowed_from: None,
        repay_date: None,
        linked_id: None,
    }
}

/// Parse a date cell: RFC 3339, `YYYY-MM-DD`, `M/D/YYYY` or a spreadsheet serial
pub fn parse_date(cell: &Cell) -> Option<DateTime<Utc>> {
    match cell {
        Cell::Number(serial) => from_serial(*serial),
        Cell::Text(s) => {
            let s = s.trim();

            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }

            for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(Utc.from_utc_datetime(&dt));
                }
            }

            for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
                if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                    return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
                }
            }

            s.parse::<f64>().ok().and_then(from_serial)
        }
        Cell::Empty => None,
    }
}

/// Spreadsheet serial day number (days since 1899-12-30)
fn from_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    let dt = epoch.checked_add_signed(Duration::seconds(seconds))?;
    Some(Utc.from_utc_datetime(&dt))
}

fn parse_categories(sheet: &Sheet) -> (Vec<String>, Vec<String>) {
    let mut income = Vec::new();
    let mut expense = Vec::new();

    for record in sheet.records() {
        let Some(name) = record.get("Name").as_text() else {
            continue;
        };

        match record.get("Type").as_text().as_deref() {
            Some("Income") => income.push(name),
            Some("Expense") => expense.push(name),
            _ => {}
        }
    }

    (income, expense)
}

/// Service for importing spreadsheets into the ledger
pub struct ImportService<'a> {
    storage: &'a Storage,
    retention: BackupRetention,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage, retention: BackupRetention) -> Self {
        Self { storage, retention }
    }

    /// Read a file and import it
    pub fn import_file(&self, path: &Path) -> FinTrackResult<ImportResult> {
        let workbook = read_workbook(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.import_workbook(&workbook, &source)
    }

    /// Import an in-memory workbook
    ///
    /// On any error the stored state is left exactly as it was.
    pub fn import_workbook(&self, workbook: &Workbook, source: &str) -> FinTrackResult<ImportResult> {
        let data = parse_workbook(workbook, Utc::now())?;

        for warning in &data.warnings {
            tracing::warn!(source, "{}", warning);
        }

        let current = self.storage.ledger.snapshot()?;
        let manager = BackupManager::new(self.storage.paths().clone(), self.retention.clone());
        let (backup_path, _) = manager.backup_with_retention(&current)?;

        let imported = data.transactions.len();
        let vault_imported = data.vault_transactions.as_ref().map(Vec::len);
        let categories_replaced = data.income_categories.is_some();
        let warnings = data.warnings.clone();

        let mut next = current;
        let relinked = data.merge_into(&mut next);

        self.storage.ledger.replace(next)?;
        self.storage.ledger.save()?;

        let result = ImportResult {
            imported,
            vault_imported,
            categories_replaced,
            backup_path,
            warnings,
        };

        self.storage
            .log_replace(Operation::Import, source, result.summary())?;

        tracing::info!(source, imported, relinked, "import complete");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinTrackPaths;
    use crate::export::{backup_workbook, report_workbook};
    use crate::models::{CategoryKind, VAULT_DEDUCTION};
    use crate::services::LedgerService;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state.transactions = vec![
            Transaction::new(
                TransactionType::Expense,
                Amount::new(12.75),
                "Food",
                Utc.with_ymd_and_hms(2025, 2, 3, 18, 30, 0).unwrap(),
            )
            .with_description("Dinner"),
            Transaction::new(
                TransactionType::Income,
                Amount::new(2500.0),
                "Salary",
                Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap(),
            ),
        ];
        state.vault_transactions = vec![Transaction::new(
            TransactionType::VaultIn,
            Amount::new(300.0),
            "Emergency Fund",
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        )];
        state.categories.add(CategoryKind::Expense, "Pets");
        state
    }

    fn key(t: &Transaction) -> (String, TransactionType, f64, String, NaiveDate, String) {
        (
            t.id.to_string(),
            t.transaction_type,
            t.amount.value(),
            t.category.clone(),
            t.day(),
            t.description.clone(),
        )
    }

    #[test]
    fn test_backup_roundtrip_keeps_transactions() {
        let state = sample_state();
        let data = parse_workbook(&backup_workbook(&state), now()).unwrap();

        let original: Vec<_> = state.transactions.iter().map(key).collect();
        let imported: Vec<_> = data.transactions.iter().map(key).collect();
        assert_eq!(imported, original);

        let vault: Vec<_> = data.vault_transactions.as_ref().unwrap().iter().map(key).collect();
        assert_eq!(vault, state.vault_transactions.iter().map(key).collect::<Vec<_>>());

        assert!(data.warnings.is_empty());
        assert!(data.expense_categories.unwrap().contains(&"Pets".to_string()));
    }

    #[test]
    fn test_roundtrip_truncates_time_of_day() {
        let state = sample_state();
        let data = parse_workbook(&backup_workbook(&state), now()).unwrap();

        assert_eq!(
            data.transactions[0].date,
            Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_transactions_sheet() {
        let mut wb = Workbook::new();
        wb.push(Sheet::new("Summary Report", &["Type", "Category", "Total"]));

        let err = parse_workbook(&wb, now()).unwrap_err();
        assert!(matches!(err, FinTrackError::InvalidFormat(_)));
    }

    #[test]
    fn test_legacy_sheet_name_and_defaults() {
        let mut sheet = Sheet::new(
            LEGACY_TRANSACTIONS_SHEET,
            &["ID", "Type", "Amount", "Category", "Date", "Description"],
        );
        sheet.push_row(vec![
            Cell::Empty,
            Cell::Empty,
            Cell::text("abc"),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ]);
        sheet.push_row(vec![Cell::Empty; 6]);
        let mut wb = Workbook::new();
        wb.push(sheet);

        let data = parse_workbook(&wb, now()).unwrap();

        assert_eq!(data.transactions.len(), 1);
        let t = &data.transactions[0];
        assert!(!t.id.as_str().is_empty());
        assert_eq!(t.transaction_type, TransactionType::Expense);
        assert_eq!(t.amount.value(), 0.0);
        assert_eq!(t.category, DEFAULT_CATEGORY);
        assert_eq!(t.date, now());
        assert_eq!(t.description, "");
        assert_eq!(data.warnings.len(), 1);
        assert!(data.vault_transactions.is_none());
        assert!(data.income_categories.is_none());
    }

    #[test]
    fn test_unknown_type_becomes_expense_with_warning() {
        let mut sheet = Sheet::new(TRANSACTIONS_SHEET, &["Type", "Amount"]);
        sheet.push_row(vec![Cell::text("REFUND"), Cell::Number(4.0)]);
        sheet.push_row(vec![Cell::text("Income"), Cell::Number(9.0)]);
        let mut wb = Workbook::new();
        wb.push(sheet);

        let data = parse_workbook(&wb, now()).unwrap();
        assert_eq!(data.transactions[0].transaction_type, TransactionType::Expense);
        assert_eq!(data.transactions[1].transaction_type, TransactionType::Income);
        assert!(data.warnings[0].contains("row 2"));
        assert!(data.warnings[0].contains("REFUND"));
    }

    #[test]
    fn test_command_line_aliases_are_not_type_names() {
        let mut sheet = Sheet::new(TRANSACTIONS_SHEET, &["Type", "Amount"]);
        sheet.push_row(vec![Cell::text("Deposit"), Cell::Number(4.0)]);
        sheet.push_row(vec![Cell::text("loan"), Cell::Number(9.0)]);
        sheet.push_row(vec![Cell::text("VAULT_IN"), Cell::Number(2.0)]);
        let mut wb = Workbook::new();
        wb.push(sheet);

        let data = parse_workbook(&wb, now()).unwrap();
        assert_eq!(data.transactions[0].transaction_type, TransactionType::Expense);
        assert_eq!(data.transactions[1].transaction_type, TransactionType::Expense);
        assert_eq!(data.transactions[2].transaction_type, TransactionType::VaultIn);
        assert_eq!(data.warnings.len(), 2);
    }

    #[test]
    fn test_parse_date_formats() {
        let midnight = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();

        assert_eq!(parse_date(&Cell::text("3/7/2025")), Some(midnight(2025, 3, 7)));
        assert_eq!(parse_date(&Cell::text("2025-03-07")), Some(midnight(2025, 3, 7)));
        assert_eq!(
            parse_date(&Cell::text("2025-03-07T10:15:00Z")),
            Some(Utc.with_ymd_and_hms(2025, 3, 7, 10, 15, 0).unwrap())
        );
        assert_eq!(parse_date(&Cell::Number(45723.0)), Some(midnight(2025, 3, 7)));
        assert_eq!(parse_date(&Cell::text("someday")), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn test_category_config_rebuilds_lists() {
        let mut cats = Sheet::new(CATEGORY_SHEET, &["Type", "Name"]);
        cats.push_row(vec![Cell::text("Income"), Cell::text("Consulting")]);
        cats.push_row(vec![Cell::text("Expense"), Cell::text("Coffee")]);
        cats.push_row(vec![Cell::text("Vault"), Cell::text("Boat")]);
        let mut wb = report_workbook(&[]);
        wb.push(cats);

        let mut state = AppState::default();
        let vault_before = state.categories.vault.clone();
        parse_workbook(&wb, now()).unwrap().merge_into(&mut state);

        assert_eq!(state.categories.income, vec!["Consulting".to_string()]);
        assert_eq!(
            state.categories.expense,
            vec!["Coffee".to_string(), VAULT_DEDUCTION.to_string()]
        );
        assert_eq!(state.categories.vault, vault_before);
    }

    #[test]
    fn test_merge_keeps_fields_not_in_workbook() {
        let mut state = sample_state();
        state.profile.name = "Riley".into();

        parse_workbook(&report_workbook(&[]), now())
            .unwrap()
            .merge_into(&mut state);

        assert!(state.transactions.is_empty());
        assert_eq!(state.vault_transactions.len(), 1);
        assert!(state.categories.contains(CategoryKind::Expense, "Pets"));
        assert_eq!(state.profile.name, "Riley");
    }

    #[test]
    fn test_import_takes_backup_and_audits() {
        let (_temp, storage) = create_test_storage();
        storage.ledger.replace(sample_state()).unwrap();
        storage.ledger.save().unwrap();

        let service = ImportService::new(&storage, BackupRetention::default());
        let result = service
            .import_workbook(&report_workbook(&[]), "report.xlsx")
            .unwrap();

        assert_eq!(result.imported, 0);
        assert!(result.backup_path.exists());
        assert!(storage.ledger.snapshot().unwrap().transactions.is_empty());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.last().unwrap().operation, Operation::Import);
    }

    #[test]
    fn test_imported_backup_keeps_vault_pairs_linked() {
        let (_temp, storage) = create_test_storage();
        let ledger = LedgerService::new(&storage);
        let at = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        ledger
            .add_main_transaction(Transaction::new(TransactionType::Income, Amount::new(200.0), "Salary", at))
            .unwrap();
        ledger
            .add_vault_transaction(Transaction::new(TransactionType::VaultIn, Amount::new(80.0), "Emergency Fund", at))
            .unwrap();
        let (withdrawal, _) = ledger
            .add_vault_transaction(
                Transaction::new(TransactionType::VaultOut, Amount::new(25.0), "Emergency Fund", at)
                    .with_description("Dentist"),
            )
            .unwrap();

        let workbook = backup_workbook(&storage.ledger.snapshot().unwrap());
        ImportService::new(&storage, BackupRetention::default())
            .import_workbook(&workbook, "backup.xlsx")
            .unwrap();

        let removed = ledger.delete_linked(&withdrawal.id).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(ledger.check_links().unwrap().is_consistent());

        let state = storage.ledger.snapshot().unwrap();
        assert!(state.transactions.iter().all(|t| t.category != VAULT_DEDUCTION));
    }

    #[test]
    fn test_failed_import_leaves_state() {
        let (_temp, storage) = create_test_storage();
        storage.ledger.replace(sample_state()).unwrap();
        let before = storage.ledger.snapshot().unwrap();

        let service = ImportService::new(&storage, BackupRetention::default());
        assert!(service.import_workbook(&Workbook::new(), "empty.xlsx").is_err());

        assert_eq!(storage.ledger.snapshot().unwrap(), before);
    }
}
