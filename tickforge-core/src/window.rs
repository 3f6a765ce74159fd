//! Trailing time windows ending at "now".

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Drop the sub-second part of `t`.
pub fn truncate_to_second(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}

/// `[now − days, now)` with `now` truncated to the second. `None` if the
/// start would fall outside the representable range.
pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Option<TimeWindow> {
    let end = truncate_to_second(now);
    let span = Duration::try_days(days)?;
    let start = end.checked_sub_signed(span)?;
    Some(TimeWindow { start, end })
}

/// `[now − years, now)` in calendar years. `None` if the start would fall
/// outside the representable range.
pub fn trailing_years(now: DateTime<Utc>, years: u32) -> Option<TimeWindow> {
    let end = truncate_to_second(now);
    let start = end.checked_sub_months(Months::new(years.checked_mul(12)?))?;
    Some(TimeWindow { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncation_drops_nanos() {
        let t = Utc.with_ymd_and_hms(2025, 12, 8, 10, 0, 0).unwrap() + Duration::milliseconds(750);
        assert_eq!(
            truncate_to_second(t),
            Utc.with_ymd_and_hms(2025, 12, 8, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn trailing_days_window() {
        let now = Utc.with_ymd_and_hms(2025, 12, 8, 10, 0, 0).unwrap();
        let w = trailing_days(now, 5).unwrap();
        assert_eq!(w.start, Utc.with_ymd_and_hms(2025, 12, 3, 10, 0, 0).unwrap());
        assert_eq!(w.end, now);
        assert_eq!(w.span(), Duration::days(5));
        assert!(!w.is_empty());
        assert!(trailing_days(now, 0).unwrap().is_empty());
    }

    #[test]
    fn absurd_day_counts_are_rejected() {
        let now = Utc.with_ymd_and_hms(2025, 12, 8, 10, 0, 0).unwrap();
        assert!(trailing_days(now, i64::MAX).is_none());
        assert!(trailing_days(now, 1_000_000_000).is_none());
    }

    #[test]
    fn trailing_years_uses_calendar_years() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        let w = trailing_years(now, 10).unwrap();
        assert_eq!(w.start, Utc.with_ymd_and_hms(2014, 2, 28, 0, 0, 0).unwrap());
    }
}
