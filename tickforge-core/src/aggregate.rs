//! Candle aggregation over a fixed sample grid.

use crate::config::EngineConfig;
use crate::domain::{Candle, CandleInterval};
use crate::sampler::PriceSampler;
use chrono::{DateTime, Utc};

/// Sample `samples_per_candle` evenly spaced prices across the interval and
/// reduce them to OHLC. The first sample sits on `start`, the last on
/// `start + interval` (less any sub-nanosecond remainder of the step).
pub fn aggregate_with(
    sampler: &PriceSampler<'_>,
    samples: usize,
    start: DateTime<Utc>,
    interval: CandleInterval,
) -> Candle {
    let samples = samples.max(2);
    let step = interval.duration() / (samples as i32 - 1);

    let open = sampler.price_at(start);
    let mut high = open;
    let mut low = open;
    let mut close = open;

    for i in 1..samples {
        let price = sampler.price_at(start + step * i as i32);
        high = high.max(price);
        low = low.min(price);
        close = price;
    }

    Candle {
        symbol: sampler.symbol().to_string(),
        timestamp: start,
        open,
        high,
        low,
        close,
    }
}

/// One candle of `symbol` starting at `start`.
pub fn aggregate_candle(
    config: &EngineConfig,
    symbol: &str,
    start: DateTime<Utc>,
    interval: CandleInterval,
) -> Candle {
    let sampler = PriceSampler::new(config, symbol);
    aggregate_with(&sampler, config.samples_per_candle, start, interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_price;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
    }

    #[test]
    fn open_and_close_are_endpoint_samples() {
        let config = EngineConfig::default();
        let interval = CandleInterval::hours(1).unwrap();
        let candle = aggregate_candle(&config, "BTC-USD", start(), interval);

        assert_eq!(candle.open, sample_price(&config, "BTC-USD", start()));
        // 3600 s / 119 steps: the last sample lands on start + 119 · step.
        let step = interval.duration() / 119;
        assert_eq!(
            candle.close,
            sample_price(&config, "BTC-USD", start() + step * 119)
        );
        assert_eq!(candle.timestamp, start());
        assert_eq!(candle.symbol, "BTC-USD");
    }

    #[test]
    fn candle_is_consistent() {
        let config = EngineConfig::default();
        for hours in [1, 4, 24, 300] {
            let interval = CandleInterval::hours(hours).unwrap();
            let candle = aggregate_candle(&config, "ETH-USD", start(), interval);
            assert!(candle.is_consistent(), "{hours}h: {candle:?}");
        }
    }

    #[test]
    fn high_and_low_bound_every_sample() {
        let config = EngineConfig::default();
        let interval = CandleInterval::hours(24).unwrap();
        let candle = aggregate_candle(&config, "GOLD", start(), interval);
        let step = interval.duration() / 119;
        for i in 0..120 {
            let price = sample_price(&config, "GOLD", start() + step * i);
            assert!(price <= candle.high && price >= candle.low);
        }
    }

    #[test]
    fn sub_bucket_interval_yields_flat_candle_shape() {
        // A 5 s candle aligned to a 10 s boundary sits inside one noise
        // bucket, so only regime drift moves the price.
        let config = EngineConfig::default();
        let interval = CandleInterval::new(Duration::seconds(5)).unwrap();
        let t = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let candle = aggregate_candle(&config, "SILVER", t, interval);
        assert!(candle.range() / candle.open < 1e-4);
    }

    #[test]
    fn custom_sample_count() {
        let config = EngineConfig {
            samples_per_candle: 2,
            ..EngineConfig::default()
        };
        let interval = CandleInterval::hours(1).unwrap();
        let candle = aggregate_candle(&config, "GOLD", start(), interval);
        let end = start() + Duration::hours(1);
        assert_eq!(candle.close, sample_price(&config, "GOLD", end));
        assert_eq!(candle.high, candle.open.max(candle.close));
        assert_eq!(candle.low, candle.open.min(candle.close));
    }
}
