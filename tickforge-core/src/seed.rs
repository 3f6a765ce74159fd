//! Deterministic seed derivation.
//!
//! Every random-looking value in the engine comes from the same chain:
//! identifying bytes are hashed with BLAKE3 into a 64-bit seed, the seed drives
//! a `StdRng`, and the generator yields uniforms in `[0, 1)`. Because the seed
//! depends only on the bytes, the same symbol and time bucket always produce
//! the same draws regardless of call order or thread.

use crate::config::ValueRange;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Incremental builder for a seed over several byte fields.
///
/// Integers are written big-endian so the hash input is unambiguous when a
/// variable-length field (the symbol) is followed by a fixed-width one.
#[derive(Debug, Clone, Default)]
pub struct SeedBuilder {
    hasher: blake3::Hasher,
}

impl SeedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.hasher.update(bytes);
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.hasher.update(&value.to_be_bytes());
        self
    }

    pub fn i64(mut self, value: i64) -> Self {
        self.hasher.update(&value.to_be_bytes());
        self
    }

    /// First eight bytes of the digest, little-endian.
    pub fn finish(&self) -> u64 {
        let hash = self.hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }
}

/// Seed for a single byte sequence.
pub fn seed_from_bytes(bytes: &[u8]) -> u64 {
    SeedBuilder::new().bytes(bytes).finish()
}

/// Create a seeded `StdRng`.
pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// First uniform draw in `[0, 1)` of the stream seeded by `seed`.
pub fn deterministic_uniform(seed: u64) -> f64 {
    rng_from_seed(seed).gen::<f64>()
}

/// Affinely map a unit value `u ∈ [0, 1)` into `range`.
pub fn map_unit(u: f64, range: ValueRange) -> f64 {
    range.min + u * (range.max - range.min)
}

/// Draw the next uniform from `rng` and map it into `range`.
pub fn draw_in(rng: &mut StdRng, range: ValueRange) -> f64 {
    map_unit(rng.gen::<f64>(), range)
}
