//! Profile CLI commands

use clap::{Subcommand, ValueEnum};

use crate::config::paths::FinTrackPaths;
use crate::config::settings::Settings;
use crate::error::FinTrackResult;
use crate::models::UserProfile;
use crate::services::{ProfileService, ProfileUpdate};
use crate::storage::Storage;

/// On/off switch for flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the current profile
    Show,

    /// Change profile fields
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Currency symbol (e.g. $, €, ৳)
        #[arg(long)]
        currency: Option<String>,
        /// Daily reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
        /// Daily reminders
        #[arg(long, value_enum)]
        notifications: Option<Toggle>,
    },
}

/// Handle a profile command
pub fn handle_profile_command(
    storage: &Storage,
    paths: &FinTrackPaths,
    settings: &mut Settings,
    cmd: ProfileCommands,
) -> FinTrackResult<()> {
    let service = ProfileService::new(storage);

    match cmd {
        ProfileCommands::Show => {
            print!("{}", format_profile(&service.get()?));
        }

        ProfileCommands::Set {
            name,
            currency,
            reminder,
            notifications,
        } => {
            let (profile, settings_changed) = service.update_with_settings(
                ProfileUpdate {
                    name,
                    currency,
                    reminder_time: reminder,
                    notifications_enabled: notifications.map(Toggle::enabled),
                },
                settings,
            )?;
            if settings_changed {
                settings.save(paths)?;
            }

            println!("Profile updated.");
            print!("{}", format_profile(&profile));
        }
    }

    Ok(())
}

fn format_profile(profile: &UserProfile) -> String {
    format!(
        "Name:          {}\nCurrency:      {}\nReminder time: {}\nNotifications: {}\n",
        profile.name,
        profile.currency,
        profile.reminder_time,
        if profile.notifications_enabled { "on" } else { "off" }
    )
}
