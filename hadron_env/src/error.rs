//! Error types for the collaborator layer.

use crate::types::{ParticleId, PdgCode};
use thiserror::Error;

/// Errors raised by pools and species registries.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Registry has no entry for this PDG code
    #[error("Unknown species: {0}")]
    UnknownSpecies(PdgCode),

    /// Pool has no live particle with this id
    #[error("Unknown particle: {0}")]
    UnknownParticle(ParticleId),

    /// Species definition is inconsistent (e.g. minimum mass above pole mass)
    #[error("Invalid species {pdg}: {reason}")]
    InvalidSpecies { pdg: PdgCode, reason: String },
}

impl EnvError {
    /// Creates an invalid-species error.
    pub fn invalid_species(pdg: PdgCode, reason: impl Into<String>) -> Self {
        Self::InvalidSpecies {
            pdg,
            reason: reason.into(),
        }
    }
}
