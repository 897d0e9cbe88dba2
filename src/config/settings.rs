//! User settings for FinTrack
//!
//! Holds the flags that live outside the ledger blob (onboarding, notification
//! opt-in, daily markers) together with logging, backup and tip preferences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::FinTrackPaths;
use crate::error::FinTrackError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of snapshots to keep
    pub max_backups: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { max_backups: 20 }
    }
}

/// Settings for the daily tip service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipSettings {
    /// Whether to call the remote service at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Model name passed to the generate endpoint
    #[serde(default = "default_tip_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TipSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_tip_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User settings for FinTrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Whether `fintrack init` has been completed
    #[serde(default)]
    pub onboarding_completed: bool,

    /// Whether the user opted into daily reminders
    #[serde(default)]
    pub notifications_enabled: bool,

    /// Day the daily tip/analysis was last produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_daily_analysis: Option<NaiveDate>,

    /// Day the last reminder fired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reminder_date: Option<NaiveDate>,

    /// Most recent tip text, reused for the rest of the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tip: Option<String>,

    /// Date format used for terminal output (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Tip service configuration
    #[serde(default)]
    pub tips: TipSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_tip_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            onboarding_completed: false,
            notifications_enabled: false,
            last_daily_analysis: None,
            last_reminder_date: None,
            last_tip: None,
            date_format: default_date_format(),
            log_level: default_log_level(),
            backup_retention: BackupRetention::default(),
            tips: TipSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FinTrackPaths) -> Result<Self, FinTrackError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FinTrackError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinTrackError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinTrackPaths) -> Result<(), FinTrackError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FinTrackError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            FinTrackError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
