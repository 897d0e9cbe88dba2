//! User profile

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Currency symbols offered during setup, with their codes
pub const CURRENCIES: [(&str, &str); 6] = [
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("৳", "BDT"),
    ("₹", "INR"),
    ("¥", "JPY"),
];

/// Who is using the tracker and how they like it displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub currency: String,
    /// Daily reminder time, `HH:MM`
    pub reminder_time: String,
    #[serde(default)]
    pub notifications_enabled: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Guest User".to_string(),
            currency: "$".to_string(),
            reminder_time: "22:00".to_string(),
            notifications_enabled: false,
        }
    }
}

impl UserProfile {
    /// Parsed reminder time, if the stored string is valid
    pub fn reminder(&self) -> Option<NaiveTime> {
        parse_reminder_time(&self.reminder_time)
    }

    /// Name with whitespace runs replaced by underscores, for file names
    pub fn file_slug(&self) -> String {
        self.name.split_whitespace().collect::<Vec<_>>().join("_")
    }
}

/// Parse an `HH:MM` string
pub fn parse_reminder_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.name, "Guest User");
        assert_eq!(profile.reminder(), NaiveTime::from_hms_opt(22, 0, 0));
    }

    #[test]
    fn test_reminder_time_parsing() {
        assert_eq!(parse_reminder_time("07:45"), NaiveTime::from_hms_opt(7, 45, 0));
        assert!(parse_reminder_time("25:00").is_none());
        assert!(parse_reminder_time("soon").is_none());
    }

    #[test]
    fn test_file_slug() {
        let profile = UserProfile {
            name: "Ada  Lovelace Jr".to_string(),
            ..UserProfile::default()
        };
        assert_eq!(profile.file_slug(), "Ada_Lovelace_Jr");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(UserProfile::default()).unwrap();
        assert_eq!(json["reminderTime"], "22:00");
        assert_eq!(json["notificationsEnabled"], false);
    }
}
