//! Validation errors raised at the engine's boundary.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("candle interval must be positive (got {seconds}s)")]
    NonPositiveInterval { seconds: i64 },

    #[error("empty time range: start {start} is not before end {end}")]
    EmptyRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
