//! In-memory particle store with optimistic commit.
//!
//! The store owns the canonical particle state. Candidates hold snapshots;
//! a candidate is applied with [`ParticleStore::commit`], which re-validates
//! it against the live `id_process` tags first:
//!
//! ```text
//! candidate A {#1, #2}    candidate B {#2, #3}
//!        |                        |
//!   commit(A): valid              |
//!   #2.id_process = 5             |
//!                            commit(B): #2 is 5, snapshot says 0
//!                            -> Stale, nothing applied
//! ```

use crate::error::SimError;
use hadron_core::{Action, FourVector, ParticleData};
use hadron_env::{EnvError, ParticleId, ParticlePool, ParticleType, PdgCode, ProcessId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// An incoming particle was consumed or altered since the snapshot
    Stale,

    /// The final state was written under a new process id
    Committed {
        id_process: ProcessId,
        /// Ids of the particles now carrying the final state
        particles: Vec<ParticleId>,
        /// Ids were kept (same species in and out)
        elastic: bool,
    },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}

/// The live particle pool of a simulation.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: HashMap<ParticleId, ParticleData>,

    /// Next id handed out
    next_id: u32,

    /// Most recent process id
    last_process: ProcessId,
}

impl ParticleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a particle and returns a snapshot carrying its new id.
    pub fn spawn(
        &mut self,
        species: Arc<ParticleType>,
        momentum: FourVector,
        position: FourVector,
    ) -> ParticleData {
        let particle = ParticleData::new(species)
            .with_momentum(momentum)
            .with_position(position)
            .with_id_process(self.last_process);
        self.insert(particle)
    }

    /// Inserts a particle under a fresh id and returns the stored copy.
    fn insert(&mut self, mut particle: ParticleData) -> ParticleData {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        particle.set_id(id);
        self.particles.insert(id, particle.clone());
        particle
    }

    pub fn get(&self, id: ParticleId) -> Option<&ParticleData> {
        self.particles.get(&id)
    }

    /// Owned copy of a live particle, for building a candidate.
    pub fn snapshot(&self, id: ParticleId) -> Result<ParticleData, EnvError> {
        self.particles
            .get(&id)
            .cloned()
            .ok_or(EnvError::UnknownParticle(id))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles, sorted by id.
    pub fn particles(&self) -> Vec<&ParticleData> {
        let mut all: Vec<&ParticleData> = self.particles.values().collect();
        all.sort_by_key(|p| p.id());
        all
    }

    /// Sum of all live four-momenta.
    pub fn total_momentum(&self) -> FourVector {
        self.particles.values().map(|p| p.momentum()).sum()
    }

    pub fn last_process(&self) -> ProcessId {
        self.last_process
    }

    /// Applies a resolved candidate.
    ///
    /// Stale candidates are rejected without touching the store. If the
    /// final state has the same species as the initial state, the incoming
    /// ids are reused and their `id_process` bumped; otherwise the incoming
    /// particles are removed and the outgoing ones inserted under fresh ids.
    ///
    /// # Errors
    /// `Unresolved` if the candidate has no outgoing particles.
    pub fn commit(&mut self, action: &Action) -> Result<CommitOutcome, SimError> {
        if action.outgoing_particles().is_empty() {
            return Err(SimError::Unresolved);
        }
        if !action.is_valid(&*self) {
            debug!("Stale candidate: {}", action);
            return Ok(CommitOutcome::Stale);
        }

        self.last_process = self.last_process.next();
        let id_process = self.last_process;

        let elastic = same_species(action.incoming(), action.outgoing_particles());
        let particles = if elastic {
            self.replace_in_place(action, id_process)
        } else {
            for incoming in action.incoming() {
                if let Some(id) = incoming.id() {
                    self.particles.remove(&id);
                }
            }
            action
                .outgoing_particles()
                .iter()
                .filter_map(|p| {
                    let mut particle = p.clone();
                    particle.set_id_process(id_process);
                    self.insert(particle).id()
                })
                .collect()
        };

        debug!(
            "Committed process {} ({}): {:?}",
            id_process,
            if elastic { "elastic" } else { "inelastic" },
            particles
        );
        Ok(CommitOutcome::Committed {
            id_process,
            particles,
            elastic,
        })
    }

    /// Writes each outgoing particle over an incoming one of the same species.
    fn replace_in_place(&mut self, action: &Action, id_process: ProcessId) -> Vec<ParticleId> {
        let mut free: Vec<(PdgCode, ParticleId)> = action
            .incoming()
            .iter()
            .filter_map(|p| p.id().map(|id| (p.pdgcode(), id)))
            .collect();

        let mut ids = Vec::with_capacity(action.outgoing_particles().len());
        for outgoing in action.outgoing_particles() {
            let slot = free.iter().position(|(pdg, _)| *pdg == outgoing.pdgcode());
            if let Some(slot) = slot {
                let (_, id) = free.remove(slot);
                let mut particle = outgoing.clone();
                particle.set_id(id);
                particle.set_id_process(id_process);
                self.particles.insert(id, particle);
                ids.push(id);
            }
        }
        ids
    }
}

impl ParticlePool for ParticleStore {
    fn live_process(&self, id: ParticleId) -> Option<ProcessId> {
        self.particles.get(&id).map(|p| p.id_process())
    }
}

/// Same multiset of PDG codes.
fn same_species(incoming: &[ParticleData], outgoing: &[ParticleData]) -> bool {
    if incoming.len() != outgoing.len() {
        return false;
    }
    let mut a: Vec<PdgCode> = incoming.iter().map(|p| p.pdgcode()).collect();
    let mut b: Vec<PdgCode> = outgoing.iter().map(|p| p.pdgcode()).collect();
    a.sort();
    b.sort();
    a == b
}
