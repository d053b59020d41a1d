//! Hadron Environment Abstraction Layer
//!
//! This crate defines everything the interaction core consumes but does not
//! own:
//! - Particle pool (`live_process()`, `contains()`)
//! - Species registry (`lookup()`)
//! - Randomness (`canonical()`, `isotropic_direction()`)
//! - Resonance mass sampling (`sample_mass()`)
//!
//! By routing all entropy through `RandomSource`, a resolved interaction
//! becomes reproducible from its seed.
//!
//! # Example
//!
//! ```ignore
//! use hadron_env::{ParticlePool, RandomSource};
//!
//! fn resolve<P: ParticlePool, R: RandomSource>(pool: &P, rng: &mut R, action: &mut Action) {
//!     if action.is_valid(pool) {
//!         action.generate_final_state(rng, &mut PoleMassSampler)?;
//!     }
//! }
//! ```

mod context;
mod entropy_impl;
mod error;
mod pool;
mod types;

pub use context::RandomSource;
pub use entropy_impl::EntropyRandom;
pub use error::EnvError;
pub use pool::{ParticlePool, PoleMassSampler, ResonanceMassSampler, SpeciesRegistry};
pub use types::{ParticleId, ParticleType, PdgCode, ProcessId, WIDTH_CUTOFF};
