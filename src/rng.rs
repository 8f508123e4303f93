//! Randomness for board generation and unconstrained moves.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), which is fast and
//! works with WASM. Entropy is sourced from `getrandom` (browser crypto API).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A seedable RNG wrapper.
///
/// Can be seeded for deterministic replay, or created from system entropy.
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max). `max` must be non-zero.
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Pick one item uniformly, or `None` for an empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        Some(items[self.gen_range(items.len())])
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
