//! Symbol profiles: the stable base price and volatility of a symbol.

use crate::config::EngineConfig;
use crate::seed::{draw_in, rng_from_seed, seed_from_bytes};
use serde::{Deserialize, Serialize};

/// Base price and base volatility derived from a symbol's identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolProfile {
    pub base_price: f64,
    pub base_volatility: f64,
}

/// Root seed of a symbol: the hash of its raw bytes.
pub fn symbol_seed(symbol: &str) -> u64 {
    seed_from_bytes(symbol.as_bytes())
}

/// Derive the profile of `symbol`. The price is the first draw of the symbol's
/// stream, the volatility the second.
pub fn symbol_profile(config: &EngineConfig, symbol: &str) -> SymbolProfile {
    let mut rng = rng_from_seed(symbol_seed(symbol));
    let base_price = draw_in(&mut rng, config.price_range);
    let base_volatility = draw_in(&mut rng, config.volatility_range);
    SymbolProfile {
        base_price,
        base_volatility,
    }
}
