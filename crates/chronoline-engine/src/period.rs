//! Date formatting for event periods.

use std::fmt;

use chrono::NaiveDate;

/// Display format for a single day, e.g. `Mar 9, 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// A start/end pair of an event that has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Build a period when both ends are known.
    pub fn from_bounds(start: NaiveDate, end: Option<NaiveDate>) -> Option<Self> {
        end.map(|end| Self { start, end })
    }

    /// Number of calendar days covered, counting both ends.
    ///
    /// Returns `None` when `end` is before `start`.
    pub fn days(&self) -> Option<i64> {
        let span = (self.end - self.start).num_days();
        (span >= 0).then_some(span + 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DISPLAY_DATE_FORMAT),
            self.end.format(DISPLAY_DATE_FORMAT)
        )?;
        match self.days() {
            Some(1) => write!(f, " (1 day)"),
            Some(days) => write!(f, " ({days} days)"),
            None => write!(f, " (ends before it starts)"),
        }
    }
}

/// Format a single day for display.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_period_without_end() {
        assert!(Period::from_bounds(date(2024, 1, 1), None).is_none());
    }

    #[test]
    fn test_period_display() {
        let period = Period::from_bounds(date(2024, 3, 1), Some(date(2024, 3, 9))).unwrap();
        assert_eq!(period.to_string(), "Mar 1, 2024 to Mar 9, 2024 (9 days)");
    }

    #[test]
    fn test_single_day_period() {
        let period = Period::from_bounds(date(2024, 2, 29), Some(date(2024, 2, 29))).unwrap();
        assert_eq!(period.days(), Some(1));
        assert!(period.to_string().ends_with("(1 day)"));
    }

    #[test]
    fn test_period_across_leap_day() {
        let period = Period::from_bounds(date(2024, 2, 28), Some(date(2024, 3, 1))).unwrap();
        assert_eq!(period.days(), Some(3));
    }

    #[test]
    fn test_inverted_period() {
        let period = Period::from_bounds(date(2024, 3, 9), Some(date(2024, 3, 1))).unwrap();
        assert_eq!(period.days(), None);
        assert!(period.to_string().contains("ends before it starts"));
    }
}
