//! Particle records: snapshots of pool entries and freshly produced particles.

use crate::fourvector::FourVector;
use hadron_env::{ParticleId, ParticleType, PdgCode, ProcessId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State of one particle.
///
/// As an incoming snapshot it is an independent copy of the pool entry at
/// the time the candidate was queued. As an outgoing particle it has no id
/// until the pool assigns one on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleData {
    id: Option<ParticleId>,
    species: Arc<ParticleType>,
    momentum: FourVector,
    position: FourVector,
    id_process: ProcessId,
}

impl ParticleData {
    /// Creates a particle of the given species at rest at the origin with
    /// its pole mass.
    pub fn new(species: Arc<ParticleType>) -> Self {
        let momentum = FourVector::new(species.mass, 0.0, 0.0, 0.0);
        Self {
            id: None,
            species,
            momentum,
            position: FourVector::zeros(),
            id_process: ProcessId::INITIAL,
        }
    }

    pub fn with_id(mut self, id: ParticleId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_momentum(mut self, momentum: FourVector) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_position(mut self, position: FourVector) -> Self {
        self.position = position;
        self
    }

    pub fn with_id_process(mut self, id_process: ProcessId) -> Self {
        self.id_process = id_process;
        self
    }

    pub fn id(&self) -> Option<ParticleId> {
        self.id
    }

    pub fn species(&self) -> &Arc<ParticleType> {
        &self.species
    }

    pub fn pdgcode(&self) -> PdgCode {
        self.species.pdg
    }

    pub fn momentum(&self) -> FourVector {
        self.momentum
    }

    pub fn position(&self) -> FourVector {
        self.position
    }

    pub fn id_process(&self) -> ProcessId {
        self.id_process
    }

    /// Invariant mass of the current four-momentum.
    pub fn effective_mass(&self) -> f64 {
        self.momentum.abs()
    }

    pub fn set_id(&mut self, id: ParticleId) {
        self.id = Some(id);
    }

    pub fn set_4momentum(&mut self, momentum: FourVector) {
        self.momentum = momentum;
    }

    pub fn set_id_process(&mut self, id_process: ProcessId) {
        self.id_process = id_process;
    }
}

impl std::fmt::Display for ParticleData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} {}", self.species.name, id)?,
            None => write!(f, "{} #?", self.species.name)?,
        }
        write!(f, " p={} x={}", self.momentum, self.position)
    }
}
