//! Instantaneous price of a symbol.
//!
//! `price = base_price · price_mult · (1 + variation)` where `variation` is
//! uniform in `±base_volatility · vol_mult` and is shared by every instant in
//! the same noise bucket.

use crate::config::EngineConfig;
use crate::profile::{symbol_profile, symbol_seed, SymbolProfile};
use crate::regime::{multiplier_at, regime_horizon, RegimeHorizon, RegimeMultiplier};
use crate::seed::{deterministic_uniform, SeedBuilder};
use chrono::{DateTime, Utc};

/// Per-symbol state that does not depend on time, derived once and reused
/// across many price evaluations.
#[derive(Debug, Clone)]
pub struct PriceSampler<'a> {
    config: &'a EngineConfig,
    symbol: &'a str,
    seed: u64,
    profile: SymbolProfile,
    horizon: RegimeHorizon,
}

impl<'a> PriceSampler<'a> {
    pub fn new(config: &'a EngineConfig, symbol: &'a str) -> Self {
        Self {
            config,
            symbol,
            seed: symbol_seed(symbol),
            profile: symbol_profile(config, symbol),
            horizon: regime_horizon(config, symbol),
        }
    }

    pub fn symbol(&self) -> &str {
        self.symbol
    }

    pub fn profile(&self) -> SymbolProfile {
        self.profile
    }

    pub fn horizon(&self) -> RegimeHorizon {
        self.horizon
    }

    pub fn multiplier_at(&self, instant: DateTime<Utc>) -> RegimeMultiplier {
        multiplier_at(self.config, self.symbol, &self.horizon, instant.timestamp())
    }

    /// Unit noise draw for the bucket containing `unix_secs`.
    fn noise(&self, unix_secs: i64) -> f64 {
        let bucket = unix_secs.div_euclid(self.config.noise_bucket_secs);
        let seed = SeedBuilder::new().u64(self.seed).i64(bucket).finish();
        deterministic_uniform(seed)
    }

    pub fn price_at(&self, instant: DateTime<Utc>) -> f64 {
        let unix_secs = instant.timestamp();
        let multiplier = multiplier_at(self.config, self.symbol, &self.horizon, unix_secs);

        let effective_price = self.profile.base_price * multiplier.price;
        let effective_volatility = self.profile.base_volatility * multiplier.volatility;

        let variation =
            self.noise(unix_secs) * 2.0 * effective_volatility - effective_volatility;
        effective_price * (1.0 + variation)
    }
}

/// Price of `symbol` at `instant`.
pub fn sample_price(config: &EngineConfig, symbol: &str, instant: DateTime<Utc>) -> f64 {
    PriceSampler::new(config, symbol).price_at(instant)
}
