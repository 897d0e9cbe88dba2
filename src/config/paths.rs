//! Path management for FinTrack
//!
//! ## Path Resolution Order
//!
//! 1. `FINTRACK_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `fintrack` (e.g. `~/.config/fintrack`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FinTrackError;

/// Environment variable that overrides the data root
pub const DATA_DIR_ENV: &str = "FINTRACK_DATA_DIR";

/// Manages all paths used by FinTrack
#[derive(Debug, Clone)]
pub struct FinTrackPaths {
    /// Base directory for all FinTrack data
    base_dir: PathBuf,
}

impl FinTrackPaths {
    /// Create a new FinTrackPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and
    /// `FINTRACK_DATA_DIR` is not set.
    pub fn new() -> Result<Self, FinTrackError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create FinTrackPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the serialized application state
    pub fn state_file(&self) -> PathBuf {
        self.data_dir().join("state.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), FinTrackError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinTrackError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FinTrackError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| FinTrackError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if FinTrack has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, FinTrackError> {
    ProjectDirs::from("", "", "fintrack")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            FinTrackError::Config(format!(
                "Could not determine a config directory; set {}",
                DATA_DIR_ENV
            ))
        })
}
