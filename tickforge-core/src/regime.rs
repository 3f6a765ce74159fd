//! Regime multipliers: slow, continuous drift of price level and volatility.
//!
//! The timeline of each symbol is cut into buckets of a per-symbol length.
//! A (price, volatility) multiplier pair is anchored at the start of every
//! bucket by hashing the symbol together with the bucket index; between two
//! anchors the pair is blended with a smoothstep weight so the join between
//! buckets has zero slope on both sides.
//!
//! Bucket length and phase are drawn once per symbol from
//! [`EngineConfig::regime_interval_secs`], which keeps different symbols from
//! switching regime at the same instants.

use crate::config::EngineConfig;
use crate::seed::{draw_in, rng_from_seed, SeedBuilder};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Domain tag separating horizon draws from profile draws.
const HORIZON_TAG: &[u8] = b"tickforge/regime-horizon/";

/// Price and volatility multipliers in effect at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeMultiplier {
    pub price: f64,
    pub volatility: f64,
}

/// Bucket grid of one symbol: bucket length and phase shift, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeHorizon {
    pub interval_secs: i64,
    pub phase_secs: i64,
}

impl RegimeHorizon {
    fn shifted(&self, unix_secs: i64) -> i64 {
        unix_secs + self.phase_secs
    }

    /// Index of the bucket containing `unix_secs` (floor division).
    pub fn bucket_index(&self, unix_secs: i64) -> i64 {
        self.shifted(unix_secs).div_euclid(self.interval_secs)
    }

    /// Position inside the bucket, in `[0, 1)`.
    pub fn progress(&self, unix_secs: i64) -> f64 {
        self.shifted(unix_secs).rem_euclid(self.interval_secs) as f64 / self.interval_secs as f64
    }

    /// Unix second at which bucket `index` starts.
    pub fn bucket_start(&self, index: i64) -> i64 {
        index * self.interval_secs - self.phase_secs
    }
}

/// Smoothstep kernel `t²(3 − 2t)`; zero slope at 0 and 1.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Bucket length and phase of `symbol`.
pub fn regime_horizon(config: &EngineConfig, symbol: &str) -> RegimeHorizon {
    let seed = SeedBuilder::new()
        .bytes(HORIZON_TAG)
        .bytes(symbol.as_bytes())
        .finish();
    let mut rng = rng_from_seed(seed);

    let range = config.regime_interval_secs;
    let interval_secs = if range.min >= range.max {
        range.min
    } else {
        rng.gen_range(range.min..range.max)
    };
    let phase_secs = rng.gen_range(0..interval_secs);

    RegimeHorizon {
        interval_secs,
        phase_secs,
    }
}

/// Multiplier pair anchored at the start of bucket `index`.
pub fn anchor(config: &EngineConfig, symbol: &str, index: i64) -> RegimeMultiplier {
    let seed = SeedBuilder::new().bytes(symbol.as_bytes()).i64(index).finish();
    let mut rng = rng_from_seed(seed);
    let price = draw_in(&mut rng, config.price_multiplier_range);
    let volatility = draw_in(&mut rng, config.volatility_multiplier_range);
    RegimeMultiplier { price, volatility }
}

/// Interpolated multiplier at `unix_secs` on a known horizon.
pub fn multiplier_at(
    config: &EngineConfig,
    symbol: &str,
    horizon: &RegimeHorizon,
    unix_secs: i64,
) -> RegimeMultiplier {
    let index = horizon.bucket_index(unix_secs);
    let start = anchor(config, symbol, index);
    let end = anchor(config, symbol, index + 1);
    let weight = smoothstep(horizon.progress(unix_secs));

    RegimeMultiplier {
        price: start.price + (end.price - start.price) * weight,
        volatility: start.volatility + (end.volatility - start.volatility) * weight,
    }
}

/// Multiplier pair of `symbol` at `instant`.
pub fn regime_multiplier(
    config: &EngineConfig,
    symbol: &str,
    instant: DateTime<Utc>,
) -> RegimeMultiplier {
    let horizon = regime_horizon(config, symbol);
    multiplier_at(config, symbol, &horizon, instant.timestamp())
}
