//! Engine configuration: the tunable ranges and grid constants.
//!
//! Loaded once at startup (TOML) and then shared read-only. `Default` carries
//! the stock constants, so an empty config file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Seconds in one day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Upper bound on `samples_per_candle`.
pub const MAX_SAMPLES_PER_CANDLE: usize = 100_000;

/// Closed `[min, max]` range of floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Range of regime bucket lengths in seconds, `[min, max)`. With
/// `min == max` every symbol uses exactly `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: i64,
    pub max: i64,
}

impl SecondsRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// A degenerate range: every symbol uses exactly `secs`.
    pub const fn fixed(secs: i64) -> Self {
        Self { min: secs, max: secs }
    }
}

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid range for {field}: [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("samples_per_candle must be between 2 and 100000 (got {0})")]
    SampleCount(usize),

    #[error(
        "worst-case noise amplitude {0} reaches 100%; lower volatility_range.max or volatility_multiplier_range.max"
    )]
    UnboundedVariation(f64),

    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base price range for symbol profiles.
    pub price_range: ValueRange,
    /// Base volatility range for symbol profiles.
    pub volatility_range: ValueRange,
    /// Regime multiplier range applied to the base price.
    pub price_multiplier_range: ValueRange,
    /// Regime multiplier range applied to the base volatility.
    pub volatility_multiplier_range: ValueRange,
    /// Per-symbol regime bucket length in seconds.
    pub regime_interval_secs: SecondsRange,
    /// Width of the window sharing one fine-noise draw.
    pub noise_bucket_secs: i64,
    /// Price samples per candle.
    pub samples_per_candle: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_range: ValueRange::new(1.0, 200_000.0),
            volatility_range: ValueRange::new(0.05, 0.20),
            price_multiplier_range: ValueRange::new(0.2, 1.5),
            volatility_multiplier_range: ValueRange::new(0.2, 0.8),
            regime_interval_secs: SecondsRange::new(100 * SECS_PER_DAY, 900 * SECS_PER_DAY),
            noise_bucket_secs: 10,
            samples_per_candle: 120,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every range and the worst-case noise amplitude.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.price_range.check("price_range")?;
        self.volatility_range.check("volatility_range")?;
        self.price_multiplier_range.check("price_multiplier_range")?;
        self.volatility_multiplier_range
            .check("volatility_multiplier_range")?;

        positive("price_range.min", self.price_range.min)?;
        positive(
            "price_multiplier_range.min",
            self.price_multiplier_range.min,
        )?;
        positive(
            "volatility_multiplier_range.min",
            self.volatility_multiplier_range.min,
        )?;
        if self.volatility_range.min < 0.0 {
            return Err(ConfigError::InvalidRange {
                field: "volatility_range",
                min: self.volatility_range.min,
                max: self.volatility_range.max,
            });
        }

        let regime = self.regime_interval_secs;
        positive("regime_interval_secs.min", regime.min as f64)?;
        if regime.min > regime.max {
            return Err(ConfigError::InvalidRange {
                field: "regime_interval_secs",
                min: regime.min as f64,
                max: regime.max as f64,
            });
        }
        positive("noise_bucket_secs", self.noise_bucket_secs as f64)?;

        if !(2..=MAX_SAMPLES_PER_CANDLE).contains(&self.samples_per_candle) {
            return Err(ConfigError::SampleCount(self.samples_per_candle));
        }

        let worst = self.volatility_range.max * self.volatility_multiplier_range.max;
        if worst >= 1.0 {
            return Err(ConfigError::UnboundedVariation(worst));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
