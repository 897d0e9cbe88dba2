//! Daily logging reminder
//!
//! A reminder is due once the profile's reminder time has passed, provided the
//! user opted in and nothing fired yet today. Delivery goes through an
//! injected [`Notifier`].

use chrono::NaiveDateTime;

use crate::config::settings::Settings;
use crate::error::FinTrackResult;
use crate::models::UserProfile;

pub const REMINDER_TITLE: &str = "FinTrack";

/// Delivers a reminder to the user
pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> FinTrackResult<()>;
}

/// Writes reminders to stdout
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) -> FinTrackResult<()> {
        println!("[{}] {}", title, body);
        Ok(())
    }
}

/// Decides when a reminder is due and sends it
pub struct ReminderService<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> ReminderService<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Whether a reminder should fire at local time `now`
    pub fn due(&self, profile: &UserProfile, settings: &Settings, now: NaiveDateTime) -> bool {
        if !settings.notifications_enabled {
            return false;
        }

        let Some(at) = profile.reminder() else {
            tracing::warn!(time = %profile.reminder_time, "invalid reminder time in profile");
            return false;
        };

        now.time() >= at && settings.last_reminder_date != Some(now.date())
    }

    /// Send the reminder if due, recording the day in `settings`
    ///
    /// Returns whether a reminder was sent. The caller persists `settings`.
    pub fn fire(
        &self,
        profile: &UserProfile,
        settings: &mut Settings,
        now: NaiveDateTime,
    ) -> FinTrackResult<bool> {
        if !self.due(profile, settings, now) {
            return Ok(false);
        }

        let body = format!(
            "Hi {}, don't forget to log today's transactions.",
            profile.name
        );
        self.notifier.notify(REMINDER_TITLE, &body)?;
        settings.last_reminder_date = Some(now.date());

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, body: &str) -> FinTrackResult<()> {
            self.sent.borrow_mut().push(body.to_string());
            Ok(())
        }
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn opted_in() -> Settings {
        Settings {
            notifications_enabled: true,
            ..Settings::default()
        }
    }

    #[test]
    fn test_not_due_before_time() {
        let service = ReminderService::new(RecordingNotifier::default());
        let profile = UserProfile::default();

        assert!(!service.due(&profile, &opted_in(), at(1, 21, 59)));
        assert!(service.due(&profile, &opted_in(), at(1, 22, 0)));
    }

    #[test]
    fn test_not_due_when_opted_out() {
        let service = ReminderService::new(RecordingNotifier::default());
        assert!(!service.due(&UserProfile::default(), &Settings::default(), at(1, 23, 0)));
    }

    #[test]
    fn test_fires_once_per_day() {
        let service = ReminderService::new(RecordingNotifier::default());
        let profile = UserProfile::default();
        let mut settings = opted_in();

        assert!(service.fire(&profile, &mut settings, at(1, 22, 30)).unwrap());
        assert!(!service.fire(&profile, &mut settings, at(1, 23, 0)).unwrap());
        assert!(service.fire(&profile, &mut settings, at(2, 22, 0)).unwrap());

        let sent = service.notifier.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("Guest User"));
    }

    #[test]
    fn test_invalid_reminder_time_never_fires() {
        let service = ReminderService::new(RecordingNotifier::default());
        let profile = UserProfile {
            reminder_time: "whenever".into(),
            ..UserProfile::default()
        };
        assert!(!service.due(&profile, &opted_in(), at(1, 23, 59)));
    }
}
