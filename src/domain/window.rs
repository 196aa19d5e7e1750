use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{DATE_FORMAT, parse_timestamp};

/// Length of the trailing window used by weekly reports.
pub const WEEK_DAYS: i64 = 7;

/// Time filter applied to ledger rows during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "now", rename_all = "snake_case")]
pub enum TimeWindow {
    AllTime,
    /// Rows whose date text matches the reference day.
    Today(NaiveDateTime),
    /// Rows at or after `now - 7 days`.
    Last7Days(NaiveDateTime),
}

impl TimeWindow {
    /// Returns true if a stored timestamp text falls inside this window.
    ///
    /// `Today` compares only the first 10 characters of the text, so rows with
    /// a damaged time suffix still count. `Last7Days` requires the full
    /// timestamp to parse.
    pub fn contains(&self, timestamp_text: &str) -> bool {
        match self {
            TimeWindow::AllTime => true,
            TimeWindow::Today(now) => {
                let day = now.format(DATE_FORMAT).to_string();
                timestamp_text.get(..day.len()) == Some(day.as_str())
            }
            TimeWindow::Last7Days(now) => parse_timestamp(timestamp_text)
                .is_some_and(|timestamp| timestamp >= week_start(*now)),
        }
    }
}

/// Inclusive lower bound of the trailing week ending at `now`.
pub fn week_start(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(WEEK_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_all_time_accepts_anything() {
        assert!(TimeWindow::AllTime.contains("2001-01-01 00:00"));
        assert!(TimeWindow::AllTime.contains("garbage"));
    }

    #[test]
    fn test_today_is_a_prefix_match() {
        let window = TimeWindow::Today(now());
        assert!(window.contains("2024-06-10 00:01"));
        assert!(window.contains("2024-06-10 23:59"));
        assert!(window.contains("2024-06-10 broken"));
        assert!(!window.contains("2024-06-09 23:59"));
        assert!(!window.contains("2024-06"));
        assert!(!window.contains(""));
    }

    #[test]
    fn test_last_7_days_boundary() {
        let window = TimeWindow::Last7Days(now());
        assert!(window.contains("2024-06-03 12:30"));
        assert!(!window.contains("2024-06-03 12:29"));
        assert!(window.contains("2024-06-10 12:30"));
        // Future rows are still past the lower bound
        assert!(window.contains("2024-06-20 08:00"));
    }

    #[test]
    fn test_last_7_days_requires_full_timestamp() {
        let window = TimeWindow::Last7Days(now());
        assert!(!window.contains("2024-06-10"));
        assert!(!window.contains("2024-06-10 broken"));
    }
}
