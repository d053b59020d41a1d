//! Run configuration.

use hadron_core::REALLY_SMALL;
use serde::{Deserialize, Serialize};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Candidates per scenario
    pub events: usize,

    /// Collision energy in GeV for the two-body scenarios
    pub sqrt_s: f64,

    /// Worker threads for parallel resolution
    pub workers: usize,

    /// Conservation tolerance per four-momentum component (GeV)
    pub tolerance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            events: 100,
            sqrt_s: 1.8,
            workers: 4,
            tolerance: REALLY_SMALL,
        }
    }
}
