//! Backup manager for FinTrack
//!
//! Snapshots the serialized application state into timestamped JSON archives
//! and prunes everything beyond the configured count.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::FinTrackPaths;
use crate::config::settings::BackupRetention;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::AppState;
use crate::storage::read_json;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    /// Schema version for migration support
    pub schema_version: u32,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Full application state at that moment
    pub state: AppState,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: FinTrackPaths,
    retention: BackupRetention,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: FinTrackPaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    /// Snapshot the state currently on disk
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> FinTrackResult<PathBuf> {
        let state: AppState = read_json(self.paths.state_file())?;
        self.create_backup_of(&state)
    }

    /// Snapshot a given state
    pub fn create_backup_of(&self, state: &AppState) -> FinTrackResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            FinTrackError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive {
            schema_version: 1,
            created_at: now,
            state: state.clone(),
        };

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| FinTrackError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| FinTrackError::Io(format!("Failed to write backup file: {}", e)))?;

        tracing::debug!(path = %backup_path.display(), "backup written");

        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> FinTrackResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| FinTrackError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| FinTrackError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Delete every backup beyond the newest `max_backups`
    pub fn enforce_retention(&self) -> FinTrackResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        for backup in backups
            .into_iter()
            .skip(self.retention.max_backups as usize)
        {
            fs::remove_file(&backup.path)
                .map_err(|e| FinTrackError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Snapshot a state and then enforce retention
    pub fn backup_with_retention(
        &self,
        state: &AppState,
    ) -> FinTrackResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup_of(state)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> FinTrackResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS[-mmm]`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;

    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let manager = BackupManager::new(paths, BackupRetention { max_backups: 3 });
        (manager, temp_dir)
    }

    #[test]
    fn test_create_backup_without_state_file() {
        let (manager, _temp) = create_test_manager();

        let backup_path = manager.create_backup().unwrap();
        assert!(backup_path.exists());

        let contents = fs::read_to_string(&backup_path).unwrap();
        let archive: BackupArchive = serde_json::from_str(&contents).unwrap();
        assert_eq!(archive.schema_version, 1);
        assert_eq!(archive.state, AppState::default());
    }

    #[test]
    fn test_backup_captures_given_state() {
        let (manager, _temp) = create_test_manager();
        let mut state = AppState::default();
        state.profile.name = "Riley".into();

        let path = manager.create_backup_of(&state).unwrap();
        let archive: BackupArchive =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(archive.state.profile.name, "Riley");
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _temp) = create_test_manager();

        manager.create_backup().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        manager.create_backup().unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].created_at >= backups[1].created_at);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager();

        for _ in 0..5 {
            manager.create_backup().unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 3);
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager();
        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup().unwrap();
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, path);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);

        assert!(parse_backup_timestamp("20251127-143022-456").is_some());
        assert!(parse_backup_timestamp("garbage").is_none());
    }
}
