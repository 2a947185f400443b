//! Seeding helpers for reproducible rollouts.
//!
//! The navigation environment itself is deterministic; randomness only enters
//! through policies (e.g. [`crate::rollout::RandomPolicy`]) and the per-episode
//! seeds an evaluation run hands to `reset`.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default RNG stream used across the crate.
pub type RngStream = ChaCha8Rng;

/// Expands one root seed into a deterministic sequence of sub-seeds (SplitMix64).
#[derive(Clone, Debug)]
pub struct SeedSequence {
    state: u64,
}

impl SeedSequence {
    pub fn new(seed: u64) -> Self { Self { state: seed } }

    pub fn next_subseed(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    pub fn split_n(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.next_subseed()).collect()
    }
}

/// `n` sub-seeds derived from `seed`.
pub fn split_n(seed: u64, n: usize) -> Vec<u64> { SeedSequence::new(seed).split_n(n) }

pub fn rng_from_seed(seed: u64) -> RngStream { RngStream::seed_from_u64(seed) }
