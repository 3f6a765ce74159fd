//! Tickforge Runner: batch generation and CSV export.
//!
//! This crate builds on `tickforge-core` to provide:
//! - Multi-symbol series generation on the rayon pool
//! - CSV export in grouped or interleaved layout
//! - TOML config file loading (engine constants plus export settings)

pub mod batch;
pub mod config;
pub mod export;

pub use batch::{generate_batch, BatchRequest, TooManyCandles, DEFAULT_BATCH_CANDLE_LIMIT};
pub use config::{ExportSettings, SettingsError, TickforgeConfig, DEFAULT_SYMBOLS};
pub use export::{export_csv, export_to_file, write_csv, CsvLayout, TIME_FORMAT};
