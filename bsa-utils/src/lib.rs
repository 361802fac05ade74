//! Shared utility functions for BSA crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

    /// Calendar date format used for record dates ("YYYY-MM-DD").
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Timestamp format persisted in the store. Lexicographic order matches
    /// chronological order.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Format a timestamp as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a timestamp in "YYYY-MM-DD HH:MM:SS" format
    pub fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        Ok(NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)?)
    }

    /// Inclusive bounds of a calendar month: the first day at 00:00:00 and
    /// the last day at 23:59:59.
    ///
    /// Returns `None` for an out-of-range year or month.
    pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
        Some((
            first.and_time(NaiveTime::MIN),
            last.and_hms_opt(23, 59, 59)?,
        ))
    }

    /// Inclusive bounds of a calendar year: Jan 1 00:00:00 to Dec 31 23:59:59.
    pub fn year_bounds(year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (start, _) = month_bounds(year, 1)?;
        let (_, end) = month_bounds(year, 12)?;
        Some((start, end))
    }

    /// The (year, month) immediately before the month containing `date`.
    pub fn previous_month(date: &NaiveDate) -> (i32, u32) {
        if date.month() == 1 {
            (date.year() - 1, 12)
        } else {
            (date.year(), date.month() - 1)
        }
    }

}

/// Numeric helpers
pub mod numbers {
    /// Round to one decimal place, half away from zero.
    pub fn round1(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round1() {
            assert_eq!(round1(61.2244), 61.2);
            assert_eq!(round1(-12.34), -12.3);
            assert_eq!(round1(7.96), 8.0);
            assert_eq!(round1(0.0), 0.0);
            assert_eq!(round1(100.0), 100.0);
        }
    }
}
