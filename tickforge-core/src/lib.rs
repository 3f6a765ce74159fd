//! Tickforge Core: deterministic synthetic OHLC price engine.
//!
//! Every price is a pure function of `(config, symbol, instant)`:
//! - Seed derivation (BLAKE3 → `StdRng` → uniform draws)
//! - Symbol profiles (base price and base volatility)
//! - Regime multipliers interpolated with smoothstep between hashed anchors
//! - Price sampling with 10-second noise buckets
//! - Candle aggregation over a fixed sample grid and series building
//!
//! Nothing here holds state between calls, so any of these functions can be
//! called from any number of threads.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod duration;
pub mod error;
pub mod profile;
pub mod regime;
pub mod sampler;
pub mod seed;
pub mod series;
pub mod window;

pub use aggregate::aggregate_candle;
pub use config::{ConfigError, EngineConfig, SecondsRange, ValueRange};
pub use domain::{Candle, CandleInterval, CandleSeries};
pub use duration::{parse_duration, DurationParseError};
pub use error::EngineError;
pub use profile::{symbol_profile, SymbolProfile};
pub use regime::{regime_horizon, regime_multiplier, RegimeHorizon, RegimeMultiplier};
pub use sampler::{sample_price, PriceSampler};
pub use series::{build_series, try_build_series};
pub use window::{trailing_days, trailing_years, truncate_to_second, TimeWindow};
