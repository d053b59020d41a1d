//! Common types shared between the interaction core and its collaborators.

use serde::{Deserialize, Serialize};

/// Width below which a species is treated as stable (GeV).
pub const WIDTH_CUTOFF: f64 = 1e-6;

/// Unique identifier of a particle in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

impl std::fmt::Display for ParticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the process that last altered a particle.
///
/// Process ids increase monotonically over a run; a particle created by
/// the initial conditions carries `ProcessId::INITIAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ProcessId(pub u32);

impl ProcessId {
    pub const INITIAL: ProcessId = ProcessId(0);

    /// Returns the id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Particle Data Group species code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PdgCode(pub i32);

impl PdgCode {
    /// Placeholder marking "no particle"; branches led by it are never selected.
    pub const INVALID: PdgCode = PdgCode(0);

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl std::fmt::Display for PdgCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static properties of a particle species.
///
/// Shared between particles as `Arc<ParticleType>`; two particles are of
/// the same species when their PDG codes match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleType {
    /// PDG code
    pub pdg: PdgCode,

    /// Human-readable name (e.g. "π⁺", "Δ⁺⁺")
    pub name: String,

    /// Pole mass in GeV
    pub mass: f64,

    /// Total width in GeV (zero for stable species)
    pub width: f64,

    /// Lowest mass the species can be produced with (decay threshold)
    minimum_mass: f64,
}

impl ParticleType {
    /// Creates a stable species with a fixed mass.
    pub fn stable(pdg: PdgCode, name: &str, mass: f64) -> Self {
        Self {
            pdg,
            name: name.to_string(),
            mass,
            width: 0.0,
            minimum_mass: mass,
        }
    }

    /// Creates an unstable species whose mass is sampled between
    /// `minimum_mass` and the available energy.
    pub fn resonance(pdg: PdgCode, name: &str, mass: f64, width: f64, minimum_mass: f64) -> Self {
        Self {
            pdg,
            name: name.to_string(),
            mass,
            width,
            minimum_mass,
        }
    }

    /// The placeholder species used for "no interaction" branches.
    pub fn invalid() -> Self {
        Self::stable(PdgCode::INVALID, "invalid", 0.0)
    }

    pub fn is_stable(&self) -> bool {
        self.width < WIDTH_CUTOFF
    }

    /// Minimum mass; equals the pole mass for stable species.
    pub fn minimum_mass(&self) -> f64 {
        if self.is_stable() {
            self.mass
        } else {
            self.minimum_mass
        }
    }
}

impl std::fmt::Display for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.pdg)
    }
}
