//! Domain types for Tickforge

pub mod candle;
pub mod interval;

pub use candle::{Candle, CandleSeries};
pub use interval::CandleInterval;
