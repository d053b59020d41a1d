//! Seeded random context for deterministic resolution.

use hadron_env::RandomSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random source backed by a seeded ChaCha8 stream.
///
/// Every subsystem that needs its own stream (kinematics, resonance masses,
/// initial conditions, one stream per worker candidate) derives it from the
/// master seed with [`SimContext::derive`], so adding a consumer never shifts
/// the draws seen by another.
#[derive(Debug, Clone)]
pub struct SimContext {
    /// Seed this stream was created from
    seed: u64,

    rng: ChaCha8Rng,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed for a named sub-stream of `master_seed`.
    ///
    /// `master_seed * golden_ratio_prime + stream * prime`
    pub fn derive_seed(master_seed: u64, stream: u64) -> u64 {
        master_seed
            .wrapping_mul(0x9e3779b97f4a7c15)
            .wrapping_add(stream.wrapping_mul(0x517cc1b727220a95))
    }

    /// Independent context for sub-stream `stream` of this context's seed.
    pub fn derive(&self, stream: u64) -> Self {
        Self::new(Self::derive_seed(self.seed, stream))
    }

    /// Uniform draw in `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.canonical()
    }
}

impl RandomSource for SimContext {
    fn canonical(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}
