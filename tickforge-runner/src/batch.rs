//! Multi-symbol series generation.
//!
//! Symbols are independent, so each series is built on the rayon pool.
//! Output order matches request order.

use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;
use tickforge_core::{build_series, CandleInterval, CandleSeries, EngineConfig, TimeWindow};

/// Default cap on candles in one batch, summed over symbols.
pub const DEFAULT_BATCH_CANDLE_LIMIT: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request would produce {count} candles, limit is {limit}")]
pub struct TooManyCandles {
    pub count: usize,
    pub limit: usize,
}

/// One batch: the same window and interval for every symbol.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub symbols: Vec<String>,
    pub window: TimeWindow,
    pub interval: CandleInterval,
}

impl BatchRequest {
    /// Candles the batch will produce, summed over symbols.
    pub fn candle_count(&self) -> usize {
        self.interval
            .starts_between(self.window.start, self.window.end)
            .saturating_mul(self.symbols.len())
    }

    /// Candle count, or an error when it exceeds `limit`.
    pub fn check_limit(&self, limit: usize) -> Result<usize, TooManyCandles> {
        let count = self.candle_count();
        if count > limit {
            return Err(TooManyCandles { count, limit });
        }
        Ok(count)
    }
}

/// Build one series per requested symbol.
pub fn generate_batch(config: &EngineConfig, request: &BatchRequest) -> Vec<CandleSeries> {
    let started = Instant::now();
    let series: Vec<CandleSeries> = request
        .symbols
        .par_iter()
        .map(|symbol| {
            build_series(
                config,
                symbol,
                request.window.start,
                request.window.end,
                request.interval,
            )
        })
        .collect();

    tracing::debug!(
        symbols = request.symbols.len(),
        candles = series.iter().map(CandleSeries::len).sum::<usize>(),
        interval = %request.interval,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated batch"
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn request(symbols: &[&str], hours: i64) -> BatchRequest {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        BatchRequest {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            window: TimeWindow {
                start,
                end: start + Duration::hours(hours),
            },
            interval: CandleInterval::hours(1).unwrap(),
        }
    }

    #[test]
    fn preserves_request_order() {
        let config = EngineConfig::default();
        let req = request(&["SILVER", "BTC-USD", "GOLD"], 12);
        let batch = generate_batch(&config, &req);
        let symbols: Vec<_> = batch.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SILVER", "BTC-USD", "GOLD"]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let config = EngineConfig::default();
        let req = request(&["A", "B", "C", "D", "E", "F", "G", "H"], 48);
        let batch = generate_batch(&config, &req);
        for series in &batch {
            let expected = build_series(
                &config,
                &series.symbol,
                req.window.start,
                req.window.end,
                req.interval,
            );
            assert_eq!(series, &expected);
        }
    }

    #[test]
    fn candle_count_matches_output() {
        let config = EngineConfig::default();
        let mut req = request(&["GOLD", "SILVER"], 10);
        req.window.end = req.window.end + Duration::minutes(30);
        let batch = generate_batch(&config, &req);
        let produced: usize = batch.iter().map(CandleSeries::len).sum();
        assert_eq!(req.candle_count(), produced);
        assert_eq!(produced, 22);
    }

    #[test]
    fn limit_rejects_oversized_batches() {
        let req = request(&["GOLD", "SILVER"], 10);
        assert_eq!(req.check_limit(20), Ok(20));
        assert_eq!(
            req.check_limit(19),
            Err(TooManyCandles {
                count: 20,
                limit: 19
            })
        );
    }

    #[test]
    fn nanosecond_interval_is_counted_not_built() {
        let mut req = request(&["GOLD"], 24 * 30);
        req.interval = CandleInterval::new(Duration::nanoseconds(1)).unwrap();
        let err = req.check_limit(DEFAULT_BATCH_CANDLE_LIMIT).unwrap_err();
        assert_eq!(err.count, 2_592_000_000_000_000);
    }

    #[test]
    fn empty_window_counts_zero() {
        let mut req = request(&["GOLD"], 0);
        req.window.end = req.window.start;
        assert_eq!(req.candle_count(), 0);
        assert!(generate_batch(&EngineConfig::default(), &req)[0].is_empty());
    }
}
