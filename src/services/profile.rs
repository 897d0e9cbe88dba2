//! Profile service
//!
//! Reads and updates the user profile stored alongside the ledgers.

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::profile::parse_reminder_time;
use crate::models::UserProfile;
use crate::storage::Storage;

/// Fields to change on the profile; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub reminder_time: Option<String>,
    pub notifications_enabled: Option<bool>,
}

impl ProfileUpdate {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.currency.is_none()
            && self.reminder_time.is_none()
            && self.notifications_enabled.is_none()
    }
}

/// Service for profile management
pub struct ProfileService<'a> {
    storage: &'a Storage,
}

impl<'a> ProfileService<'a> {
    /// Create a new profile service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Current profile
    pub fn get(&self) -> FinTrackResult<UserProfile> {
        self.storage.ledger.read(|state| state.profile.clone())
    }

    /// Apply an update and mirror the notifications flag into `settings`
    ///
    /// `Settings::notifications_enabled` is the flag reminders read; the
    /// profile keeps a copy for display and spreadsheet export. Returns the
    /// profile and whether `settings` changed; the caller persists `settings`.
    pub fn update_with_settings(
        &self,
        update: ProfileUpdate,
        settings: &mut Settings,
    ) -> FinTrackResult<(UserProfile, bool)> {
        let profile = self.update(update)?;

        let changed = settings.notifications_enabled != profile.notifications_enabled;
        settings.notifications_enabled = profile.notifications_enabled;

        Ok((profile, changed))
    }

    /// Apply an update to the stored profile only
    ///
    /// Callers that change `notifications_enabled` should go through
    /// [`ProfileService::update_with_settings`], since reminders are gated on
    /// the settings flag and not on this copy.
    pub fn update(&self, update: ProfileUpdate) -> FinTrackResult<UserProfile> {
        let before = self.get()?;
        if update.is_empty() {
            return Ok(before);
        }

        let mut after = before.clone();

        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(FinTrackError::Validation("Name cannot be empty".into()));
            }
            after.name = name.to_string();
        }

        if let Some(currency) = update.currency {
            let currency = currency.trim();
            if currency.is_empty() {
                return Err(FinTrackError::Validation(
                    "Currency symbol cannot be empty".into(),
                ));
            }
            after.currency = currency.to_string();
        }

        if let Some(reminder) = update.reminder_time {
            let time = parse_reminder_time(&reminder).ok_or_else(|| {
                FinTrackError::Validation(format!(
                    "Invalid reminder time '{}', expected HH:MM",
                    reminder
                ))
            })?;
            after.reminder_time = time.format("%H:%M").to_string();
        }

        if let Some(enabled) = update.notifications_enabled {
            after.notifications_enabled = enabled;
        }

        if after == before {
            return Ok(after);
        }

        let profile = after.clone();
        self.storage.ledger.update(|state| {
            state.profile = profile;
            Ok(())
        })?;
        self.storage.ledger.save()?;

        self.storage.log_update(
            EntityType::Profile,
            "profile",
            Some(after.name.clone()),
            &before,
            &after,
            Some(diff_summary(&before, &after)),
        )?;

        Ok(after)
    }
}

fn diff_summary(before: &UserProfile, after: &UserProfile) -> String {
    let mut changes = Vec::new();

    if before.name != after.name {
        changes.push(format!("name: {} -> {}", before.name, after.name));
    }
    if before.currency != after.currency {
        changes.push(format!("currency: {} -> {}", before.currency, after.currency));
    }
    if before.reminder_time != after.reminder_time {
        changes.push(format!(
            "reminder: {} -> {}",
            before.reminder_time, after.reminder_time
        ));
    }
    if before.notifications_enabled != after.notifications_enabled {
        changes.push(format!(
            "notifications: {} -> {}",
            before.notifications_enabled, after.notifications_enabled
        ));
    }

    changes.join(", ")
}
