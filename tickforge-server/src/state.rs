use chrono::{DateTime, Utc};
use std::sync::Arc;
use tickforge_core::EngineConfig;

use crate::config::ServerConfig;

/// Source of "now" for trailing windows.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub engine: EngineConfig,
    pub max_candles: usize,
    clock: Clock,
}

impl AppState {
    pub fn new(engine: EngineConfig, config: &ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            engine,
            max_candles: config.max_candles,
            clock: Arc::new(Utc::now),
        })
    }

    /// State with a fixed or scripted clock.
    pub fn with_clock(engine: EngineConfig, max_candles: usize, clock: Clock) -> Arc<Self> {
        Arc::new(Self {
            engine,
            max_candles,
            clock,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("max_candles", &self.max_candles)
            .finish_non_exhaustive()
    }
}
