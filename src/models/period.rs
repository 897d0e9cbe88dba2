//! Report period representation
//!
//! A period narrows transactions by calendar year, month and week of the
//! month. Each part is optional; an unset part matches everything.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// English month names, January first
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a month (1-12)
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Week of the month a day falls in: days 1-7 are week 1, 29-31 are week 5
pub fn week_of_month(date: NaiveDate) -> u32 {
    (date.day() + 6) / 7
}

/// Filter applied by analytics and filtered reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPeriod {
    pub year: Option<i32>,
    /// 1-12
    pub month: Option<u32>,
    /// 1-5
    pub week: Option<u32>,
}

impl ReportPeriod {
    /// Everything
    pub fn all_time() -> Self {
        Self::default()
    }

    /// One calendar month of one year
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            week: None,
        }
    }

    /// Narrow to one week of the month
    pub fn with_week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }

    /// Check the parts are in range
    pub fn validate(&self) -> Result<(), String> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(format!("Month must be 1-12, got {}", month));
            }
        }
        if let Some(week) = self.week {
            if !(1..=5).contains(&week) {
                return Err(format!("Week must be 1-5, got {}", week));
            }
        }
        Ok(())
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| date.month() == m)
            && self.week.map_or(true, |w| week_of_month(date) == w)
    }

    /// Label used in report file names, e.g. `March_Week_2_Report`
    pub fn report_label(&self) -> String {
        let month = self.month.and_then(month_name).unwrap_or("All_Time");
        match self.week {
            Some(week) => format!("{}_Week_{}_Report", month, week),
            None => format!("{}_Report", month),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(month) = self.month.and_then(month_name) {
            parts.push(month.to_string());
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(week) = self.week {
            parts.push(format!("week {}", week));
        }

        if parts.is_empty() {
            write!(f, "All time")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_of_month(date(2025, 1, 1)), 1);
        assert_eq!(week_of_month(date(2025, 1, 7)), 1);
        assert_eq!(week_of_month(date(2025, 1, 8)), 2);
        assert_eq!(week_of_month(date(2025, 1, 28)), 4);
        assert_eq!(week_of_month(date(2025, 1, 31)), 5);
    }

    #[test]
    fn test_contains() {
        let period = ReportPeriod::month(2025, 3).with_week(2);
        assert!(period.contains(date(2025, 3, 10)));
        assert!(!period.contains(date(2025, 3, 15)));
        assert!(!period.contains(date(2024, 3, 10)));

        assert!(ReportPeriod::all_time().contains(date(1999, 12, 31)));

        let any_year = ReportPeriod {
            month: Some(6),
            ..ReportPeriod::default()
        };
        assert!(any_year.contains(date(2020, 6, 1)));
        assert!(any_year.contains(date(2025, 6, 30)));
    }

    #[test]
    fn test_report_label() {
        assert_eq!(ReportPeriod::all_time().report_label(), "All_Time_Report");
        assert_eq!(
            ReportPeriod::month(2025, 3).with_week(2).report_label(),
            "March_Week_2_Report"
        );
    }

    #[test]
    fn test_validate() {
        assert!(ReportPeriod::month(2025, 13).validate().is_err());
        assert!(ReportPeriod::all_time().with_week(6).validate().is_err());
        assert!(ReportPeriod::month(2025, 12).with_week(5).validate().is_ok());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
