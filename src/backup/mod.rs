//! Backup system for FinTrack
//!
//! Provides rolling snapshots of the application state and restore
//! functionality.
//!
//! - `BackupManager`: creates snapshots and prunes old ones
//! - `RestoreManager`: validates and restores snapshots
//!
//! A snapshot is a JSON file holding `schema_version`, `created_at` and the
//! full `state` blob. Imports take one automatically before replacing data.
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::backup::{BackupManager, RestoreManager};
//!
//! let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());
//! let (path, _pruned) = manager.backup_with_retention(&state)?;
//!
//! let result = RestoreManager::new(paths).restore_from_file(&path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
