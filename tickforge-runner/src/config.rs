//! File configuration: engine constants plus batch export settings.
//!
//! ```toml
//! [engine]
//! noise_bucket_secs = 10
//!
//! [export]
//! symbols = ["BTC-USD", "GOLD"]
//! years = 10
//! interval = "300h"
//! layout = "grouped"
//! output = "market_data.csv"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tickforge_core::{
    parse_duration, CandleInterval, ConfigError, DurationParseError, EngineConfig, EngineError,
};

use crate::batch::DEFAULT_BATCH_CANDLE_LIMIT;
use crate::export::CsvLayout;

/// Symbols exported when none are configured.
pub const DEFAULT_SYMBOLS: [&str; 6] = [
    "BTC-USD",
    "ETH-USD",
    "STABLE-COIN",
    "GOLD",
    "PLATINUM",
    "SILVER",
];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("engine config: {0}")]
    Engine(#[from] ConfigError),

    #[error("export interval: {0}")]
    IntervalSyntax(#[from] DurationParseError),

    #[error("export interval: {0}")]
    Interval(#[from] EngineError),

    #[error("export needs at least one non-empty symbol")]
    NoSymbols,

    #[error("export years must be positive")]
    NoYears,
}

/// Batch export settings (`[export]` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub symbols: Vec<String>,
    /// Trailing window length in calendar years.
    pub years: u32,
    /// Candle length as a duration string.
    pub interval: String,
    pub layout: CsvLayout,
    pub output: PathBuf,
    /// Largest batch the CLI will generate, summed over symbols.
    pub max_candles: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            years: 10,
            interval: "300h".to_string(),
            layout: CsvLayout::Grouped,
            output: PathBuf::from("market_data.csv"),
            max_candles: DEFAULT_BATCH_CANDLE_LIMIT,
        }
    }
}

impl ExportSettings {
    pub fn candle_interval(&self) -> Result<CandleInterval, SettingsError> {
        let duration = parse_duration(&self.interval)?;
        Ok(CandleInterval::new(duration)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.symbols.iter().all(|s| s.trim().is_empty()) {
            return Err(SettingsError::NoSymbols);
        }
        if self.years == 0 {
            return Err(SettingsError::NoYears);
        }
        self.candle_interval()?;
        Ok(())
    }
}

/// Whole config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickforgeConfig {
    pub engine: EngineConfig,
    pub export: ExportSettings,
}

impl TickforgeConfig {
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let config: Self = toml::from_str(content)?;
        config.engine.validate()?;
        config.export.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
