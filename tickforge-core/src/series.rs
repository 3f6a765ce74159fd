//! Series building: consecutive candles across a time range.

use crate::aggregate::aggregate_with;
use crate::config::EngineConfig;
use crate::domain::{CandleInterval, CandleSeries};
use crate::error::EngineError;
use crate::sampler::PriceSampler;
use chrono::{DateTime, Utc};

/// Largest number of candles reserved up front; longer series grow on demand.
pub const MAX_CAPACITY_HINT: usize = 1 << 16;

fn capacity_hint(start: DateTime<Utc>, end: DateTime<Utc>, interval: CandleInterval) -> usize {
    interval.count_between(start, end).min(MAX_CAPACITY_HINT)
}

/// Candles for every interval whose start lies in `[start, end)`.
///
/// The last candle may extend past `end`. An empty or inverted range yields an
/// empty series.
pub fn build_series(
    config: &EngineConfig,
    symbol: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: CandleInterval,
) -> CandleSeries {
    let sampler = PriceSampler::new(config, symbol);
    let mut series = CandleSeries::with_capacity(symbol, capacity_hint(start, end, interval));

    let step = interval.duration();
    let mut t = start;
    while t < end {
        series.push(aggregate_with(&sampler, config.samples_per_candle, t, interval));
        t += step;
    }

    series
}

/// Like [`build_series`], but rejects ranges with `start >= end`.
pub fn try_build_series(
    config: &EngineConfig,
    symbol: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: CandleInterval,
) -> Result<CandleSeries, EngineError> {
    if start >= end {
        return Err(EngineError::EmptyRange { start, end });
    }
    Ok(build_series(config, symbol, start, end, interval))
}
