//! Ledger repository for JSON storage
//!
//! Holds the whole [`AppState`] in memory and persists it as one blob in
//! state.json. A blob is either read back verbatim or, when absent, replaced
//! by defaults; it is never partially migrated.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinTrackError;
use crate::models::AppState;

use super::file_io::{read_json, write_json_atomic};

/// Repository for the serialized application state
pub struct LedgerRepository {
    path: PathBuf,
    data: RwLock<AppState>,
}

impl LedgerRepository {
    /// Create a new repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(AppState::default()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load state from disk, falling back to defaults when the file is absent
    pub fn load(&self) -> Result<(), FinTrackError> {
        let mut loaded: AppState = read_json(&self.path)?;
        if loaded.categories.ensure_reserved() {
            tracing::warn!(path = %self.path.display(), "reserved expense category was missing, re-added");
        }

        let mut data = self.data.write().map_err(|e| {
            FinTrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = loaded;

        Ok(())
    }

    /// Save the whole state to disk
    pub fn save(&self) -> Result<(), FinTrackError> {
        let data = self.data.read().map_err(|e| {
            FinTrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        write_json_atomic(&self.path, &*data)
    }

    /// Run a read-only closure against the state
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> Result<R, FinTrackError> {
        let data = self.data.read().map_err(|e| {
            FinTrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(f(&data))
    }

    /// Clone the current state
    pub fn snapshot(&self) -> Result<AppState, FinTrackError> {
        self.read(AppState::clone)
    }

    /// Run a mutation against the state
    ///
    /// The closure validates before it mutates: when it returns an error the
    /// state must be left untouched.
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut AppState) -> Result<R, FinTrackError>,
    ) -> Result<R, FinTrackError> {
        let mut data = self.data.write().map_err(|e| {
            FinTrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        f(&mut data)
    }

    /// Replace the whole state
    pub fn replace(&self, state: AppState) -> Result<(), FinTrackError> {
        self.update(|data| {
            *data = state;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Transaction, TransactionType};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, LedgerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = LedgerRepository::new(temp_dir.path().join("state.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_temp_dir, repo) = create_test_repo();
        let state = repo.snapshot().unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn test_save_and_reload() {
        let (_temp_dir, repo) = create_test_repo();

        repo.update(|state| {
            state.transactions.push(Transaction::new(
                TransactionType::Income,
                Amount::new(1000.0),
                "Salary",
                Utc::now(),
            ));
            state.profile.name = "Riley".to_string();
            Ok(())
        })
        .unwrap();
        repo.save().unwrap();

        let reloaded = LedgerRepository::new(repo.path().clone());
        reloaded.load().unwrap();
        let state = reloaded.snapshot().unwrap();

        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.profile.name, "Riley");
    }

    #[test]
    fn test_failed_update_leaves_state() {
        let (_temp_dir, repo) = create_test_repo();

        let result: Result<(), _> =
            repo.update(|_| Err(FinTrackError::Validation("nope".into())));

        assert!(result.is_err());
        assert_eq!(repo.snapshot().unwrap(), AppState::default());
    }

    #[test]
    fn test_corrupt_blob_is_reported() {
        let (_temp_dir, repo) = create_test_repo();
        std::fs::write(repo.path(), "{ truncated").unwrap();

        assert!(repo.load().is_err());
    }
}
