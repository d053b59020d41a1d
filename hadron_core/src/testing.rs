//! Shared fixtures for unit tests.

use crate::fourvector::FourVector;
use crate::particle::ParticleData;
use hadron_env::{ParticleId, ParticlePool, ParticleType, PdgCode, ProcessId, RandomSource};
use std::collections::HashMap;
use std::sync::Arc;

/// Random source replaying a fixed sequence of draws.
pub struct FixedDraws {
    draws: Vec<f64>,
    next: usize,
}

impl FixedDraws {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for FixedDraws {
    fn canonical(&mut self) -> f64 {
        let r = self.draws[self.next];
        self.next += 1;
        r
    }
}

/// Pool backed by a plain map of id -> id_process.
pub struct MapPool(HashMap<ParticleId, ProcessId>);

impl MapPool {
    pub fn from_pairs(pairs: &[(u32, u32)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(id, process)| (ParticleId(*id), ProcessId(*process)))
                .collect(),
        )
    }
}

impl ParticlePool for MapPool {
    fn live_process(&self, id: ParticleId) -> Option<ProcessId> {
        self.0.get(&id).copied()
    }
}

pub fn species(pdg: i32, mass: f64) -> Arc<ParticleType> {
    Arc::new(ParticleType::stable(PdgCode(pdg), "test", mass))
}

pub fn pion() -> Arc<ParticleType> {
    Arc::new(ParticleType::stable(PdgCode(211), "π⁺", 0.138))
}

pub fn nucleon() -> Arc<ParticleType> {
    Arc::new(ParticleType::stable(PdgCode(2212), "p", 0.938))
}

pub fn kaon() -> Arc<ParticleType> {
    Arc::new(ParticleType::stable(PdgCode(321), "K⁺", 0.494))
}

pub fn snapshot(id: u32, species: Arc<ParticleType>, momentum: FourVector, process: ProcessId) -> ParticleData {
    ParticleData::new(species)
        .with_id(ParticleId(id))
        .with_momentum(momentum)
        .with_id_process(process)
}
