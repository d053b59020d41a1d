//! Read-side abstractions for the particle pool, species registry and
//! resonance mass sampling.

use crate::error::EnvError;
use crate::types::{ParticleId, ParticleType, PdgCode, ProcessId};
use std::sync::Arc;

/// Read-only view of the live particle pool.
///
/// The interaction core only ever reads the pool: it asks whether a particle
/// still exists and which process last touched it. Applying a resolved
/// interaction is the caller's job.
///
/// # Staleness
///
/// ```text
/// queue candidate (snapshot id_process = 7)
///         |
///         |  another interaction consumes the particle -> pool id_process = 9
///         v
/// is_valid(pool): 7 != 9 -> stale, candidate discarded
/// ```
pub trait ParticlePool {
    /// Returns the live `id_process` of the particle, or `None` if the
    /// particle no longer exists (it decayed or scattered inelastically).
    fn live_process(&self, id: ParticleId) -> Option<ProcessId>;

    /// Returns true if the pool still holds the particle.
    fn contains(&self, id: ParticleId) -> bool {
        self.live_process(id).is_some()
    }
}

/// Species lookup by PDG code.
pub trait SpeciesRegistry {
    /// Returns the shared species record for `pdg`.
    fn lookup(&self, pdg: PdgCode) -> Result<Arc<ParticleType>, EnvError>;

    /// Looks up several species at once, e.g. to build a branch final state.
    fn lookup_all(&self, codes: &[PdgCode]) -> Result<Vec<Arc<ParticleType>>, EnvError> {
        codes.iter().map(|pdg| self.lookup(*pdg)).collect()
    }
}

/// Samples the mass of an unstable species.
///
/// Treated as an opaque function by the core. Implementations own their
/// random stream.
pub trait ResonanceMassSampler {
    /// Samples a mass for `resonance` produced together with a partner of
    /// mass `partner_mass` at total CM energy `sqrt_s`.
    ///
    /// The result must lie in `[resonance.minimum_mass(), sqrt_s - partner_mass]`.
    fn sample_mass(&mut self, resonance: &ParticleType, partner_mass: f64, sqrt_s: f64) -> f64;
}

/// Sampler that always returns the pole mass.
///
/// Useful when resonance shapes are irrelevant, e.g. for threshold tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoleMassSampler;

impl ResonanceMassSampler for PoleMassSampler {
    fn sample_mass(&mut self, resonance: &ParticleType, partner_mass: f64, sqrt_s: f64) -> f64 {
        resonance
            .mass
            .min(sqrt_s - partner_mass)
            .max(resonance.minimum_mass())
    }
}

impl<P: ParticlePool + ?Sized> ParticlePool for &P {
    fn live_process(&self, id: ParticleId) -> Option<ProcessId> {
        (**self).live_process(id)
    }
}
