//! Strictly positive candle duration.

use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Length of one candle. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandleInterval(Duration);

impl CandleInterval {
    /// Reject zero and negative durations.
    pub fn new(duration: Duration) -> Result<Self, EngineError> {
        if duration <= Duration::zero() {
            return Err(EngineError::NonPositiveInterval {
                seconds: duration.num_seconds(),
            });
        }
        Ok(Self(duration))
    }

    pub fn from_secs(secs: i64) -> Result<Self, EngineError> {
        Self::new(Duration::seconds(secs))
    }

    pub fn hours(hours: i64) -> Result<Self, EngineError> {
        Self::new(Duration::hours(hours))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    /// Number of whole intervals that fit in `[start, end)`; zero when empty.
    pub fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
        let span = total_nanos(end - start);
        if span <= 0 {
            return 0;
        }
        usize::try_from(span / total_nanos(self.0)).unwrap_or(usize::MAX)
    }

    /// Number of intervals whose start lies in `[start, end)`: the candle
    /// count of a series over that range.
    pub fn starts_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
        let span = total_nanos(end - start);
        if span <= 0 {
            return 0;
        }
        let step = total_nanos(self.0);
        usize::try_from((span + step - 1) / step).unwrap_or(usize::MAX)
    }
}

fn total_nanos(d: Duration) -> i128 {
    let secs = d.num_seconds();
    let rest = (d - Duration::seconds(secs)).num_nanoseconds().unwrap_or(0);
    secs as i128 * 1_000_000_000 + rest as i128
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.num_seconds();
        if self.0 != Duration::seconds(secs) {
            write!(f, "{}ms", self.0.num_milliseconds())
        } else if secs % 3600 == 0 {
            write!(f, "{}h", secs / 3600)
        } else {
            write!(f, "{secs}s")
        }
    }
}
