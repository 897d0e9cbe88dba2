//! Backup restoration for FinTrack
//!
//! Handles restoring the state file from backup archives.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::paths::FinTrackPaths;
use crate::error::{FinTrackError, FinTrackResult};
use crate::storage::write_json_atomic;

use super::manager::BackupArchive;

/// Handles restoring from backups
pub struct RestoreManager {
    paths: FinTrackPaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: FinTrackPaths) -> Self {
        Self { paths }
    }

    /// Restore data from a backup file
    ///
    /// This overwrites the current state file with the backup contents.
    pub fn restore_from_file(&self, backup_path: &Path) -> FinTrackResult<RestoreResult> {
        let archive = read_archive(backup_path)?;
        self.restore_from_archive(&archive)
    }

    /// Restore data from a parsed backup archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> FinTrackResult<RestoreResult> {
        self.paths.ensure_directories()?;
        write_json_atomic(self.paths.state_file(), &archive.state)?;

        Ok(RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            transactions: archive.state.transactions.len(),
            vault_transactions: archive.state.vault_transactions.len(),
        })
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> FinTrackResult<ValidationResult> {
        let archive = read_archive(backup_path)?;
        let reserved_present = archive
            .state
            .categories
            .contains(crate::models::CategoryKind::Expense, crate::models::VAULT_DEDUCTION);

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            transactions: archive.state.transactions.len(),
            vault_transactions: archive.state.vault_transactions.len(),
            reserved_present,
        })
    }
}

fn read_archive(backup_path: &Path) -> FinTrackResult<BackupArchive> {
    let contents = fs::read_to_string(backup_path)
        .map_err(|e| FinTrackError::Io(format!("Failed to read backup file: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| FinTrackError::Json(format!("Failed to parse backup file: {}", e)))
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// Schema version of the restored backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Main ledger entries restored
    pub transactions: usize,
    /// Vault entries restored
    pub vault_transactions: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} transactions and {} vault transactions from {}",
            self.transactions,
            self.vault_transactions,
            self.backup_date.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// Schema version of the backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Main ledger entries in the archive
    pub transactions: usize,
    /// Vault entries in the archive
    pub vault_transactions: usize,
    /// Whether the expense list still carries the vault deduction tag
    pub reserved_present: bool,
}

impl ValidationResult {
    /// Get a summary of what data is present
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Backup v{}: {} transactions, {} vault transactions",
            self.schema_version, self.transactions, self.vault_transactions
        );
        if !self.reserved_present {
            summary.push_str(" (reserved category missing, will be restored on load)");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::BackupManager;
    use crate::config::settings::BackupRetention;
    use crate::models::{Amount, AppState, Transaction, TransactionType};
    use crate::storage::read_json;
    use tempfile::TempDir;

    fn create_test_env() -> (RestoreManager, BackupManager, FinTrackPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let backup_manager = BackupManager::new(paths.clone(), BackupRetention::default());
        let restore_manager = RestoreManager::new(paths.clone());

        (restore_manager, backup_manager, paths, temp_dir)
    }

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state.transactions.push(Transaction::new(
            TransactionType::Income,
            Amount::new(500.0),
            "Salary",
            Utc::now(),
        ));
        state
    }

    #[test]
    fn test_restore_from_backup() {
        let (restore_manager, backup_manager, paths, _temp) = create_test_env();
        let state = sample_state();

        let backup_path = backup_manager.create_backup_of(&state).unwrap();
        write_json_atomic(paths.state_file(), &AppState::default()).unwrap();

        let result = restore_manager.restore_from_file(&backup_path).unwrap();
        assert_eq!(result.transactions, 1);
        assert!(result.summary().contains("1 transactions"));

        let restored: AppState = read_json(paths.state_file()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_validate_backup() {
        let (restore_manager, backup_manager, _paths, _temp) = create_test_env();

        let backup_path = backup_manager.create_backup_of(&sample_state()).unwrap();
        let result = restore_manager.validate_backup(&backup_path).unwrap();

        assert_eq!(result.schema_version, 1);
        assert_eq!(result.transactions, 1);
        assert!(result.reserved_present);
        assert!(result.summary().contains("Backup v1"));
    }

    #[test]
    fn test_restore_recreates_data_dir() {
        let (restore_manager, backup_manager, paths, temp) = create_test_env();

        let backup_path = backup_manager.create_backup_of(&sample_state()).unwrap();
        fs::remove_dir_all(temp.path().join("data")).unwrap();

        restore_manager.restore_from_file(&backup_path).unwrap();
        assert!(paths.state_file().exists());
    }

    #[test]
    fn test_invalid_archive_is_rejected() {
        let (restore_manager, _backup_manager, _paths, temp) = create_test_env();
        let bogus = temp.path().join("backups").join("backup-20250101-000000.json");
        fs::write(&bogus, "{}").unwrap();

        assert!(restore_manager.validate_backup(&bogus).is_err());
    }
}
