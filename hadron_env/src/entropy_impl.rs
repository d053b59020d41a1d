//! Production implementation of RandomSource using OS entropy.

use crate::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Production random source backed by `StdRng` seeded from the OS.
///
/// This is the "real" implementation used for physics runs where
/// reproducibility is not required.
pub struct EntropyRandom {
    rng: StdRng,
}

impl EntropyRandom {
    /// Creates a new EntropyRandom.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn canonical(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
