//! Storage layer for FinTrack
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation, plus the audit log every mutation is recorded in.

pub mod file_io;
pub mod ledger;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use ledger::LedgerRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::paths::FinTrackPaths;
use crate::error::{FinTrackError, FinTrackResult};

/// Main storage coordinator
pub struct Storage {
    paths: FinTrackPaths,
    pub ledger: LedgerRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: FinTrackPaths) -> Result<Self, FinTrackError> {
        paths.ensure_directories()?;

        Ok(Self {
            ledger: LedgerRepository::new(paths.state_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &FinTrackPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> FinTrackResult<()> {
        self.ledger.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> FinTrackResult<()> {
        self.ledger.save()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.state_file().exists()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FinTrackResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> FinTrackResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FinTrackResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record a whole-state replacement (import or restore)
    pub fn log_replace(
        &self,
        operation: Operation,
        source: impl Into<String>,
        summary: String,
    ) -> FinTrackResult<()> {
        self.audit
            .log(&AuditEntry::replace(operation, source, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());

        storage.load_all().unwrap();
        storage.save_all().unwrap();
        assert!(storage.is_initialized());
    }

    #[test]
    fn test_log_helpers_append() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage
            .log_create(EntityType::Category, "income/Bonus", None, &"Bonus")
            .unwrap();
        storage
            .log_replace(Operation::Restore, "backup-1", "3 transactions".into())
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Restore);
    }
}
