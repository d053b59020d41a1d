//! Interaction candidates.
//!
//! An [`Action`] is one possible collision, decay or wall crossing found by
//! the collision search. It holds copies of the incoming particles, the
//! weighted list of possible outcomes and the time at which it would take
//! effect. Resolution picks one outcome and fills the outgoing particles;
//! applying them to the pool is left to the caller.
//!
//! # Lifecycle
//!
//! ```text
//! Action::new(incoming, t)          snapshot incoming particles
//!        |
//! append_branch / append_branches   cross sections or partial widths
//!        |
//! is_valid(pool)                    drop if any incoming particle changed
//!        |
//! generate_final_state(rng, ...)    choose channel + sample kinematics
//!        |
//! caller commits outgoing to pool
//! ```

use crate::conservation::{ConservationAuditor, ConservationReport};
use crate::error::ActionError;
use crate::fourvector::FourVector;
use crate::particle::ParticleData;
use crate::process_branch::{ProcessBranch, ProcessBranchList};
use hadron_env::{ParticlePool, ParticleType, PdgCode, ProcessId, RandomSource, ResonanceMassSampler};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// What kind of interaction a candidate represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// One unstable particle decays
    Decay,

    /// Two or more particles collide
    Collision,

    /// A particle crosses a boundary; no final state is sampled
    WallCrossing,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Decay => "Decay",
            ActionKind::Collision => "Collision",
            ActionKind::WallCrossing => "WallCrossing",
        };
        write!(f, "{}", name)
    }
}

/// A candidate interaction.
#[derive(Debug, Clone)]
pub struct Action {
    /// Snapshots of the incoming particles, fixed at construction
    incoming: Vec<ParticleData>,

    /// Particles produced by resolution (empty until then)
    pub(crate) outgoing: Vec<ParticleData>,

    /// Possible outcomes and their total weight
    branches: ProcessBranchList,

    /// Simulation time at which the interaction takes effect
    time_of_execution: f64,

    kind: ActionKind,
}

impl Action {
    /// Creates a candidate from snapshots of the incoming particles.
    ///
    /// # Errors
    /// `NoIncomingParticles` if `incoming` is empty.
    pub fn new(
        incoming: Vec<ParticleData>,
        time_of_execution: f64,
        kind: ActionKind,
    ) -> Result<Self, ActionError> {
        if incoming.is_empty() {
            return Err(ActionError::NoIncomingParticles);
        }
        Ok(Self {
            incoming,
            outgoing: Vec::new(),
            branches: ProcessBranchList::new(),
            time_of_execution,
            kind,
        })
    }

    /// Adds one possible outcome.
    pub fn append_branch(&mut self, branch: ProcessBranch) {
        self.branches.push(branch);
    }

    /// Merges a list of outcomes, e.g. elastic, resonance and string
    /// channels assembled separately.
    ///
    /// An empty candidate adopts the list and sums it once; otherwise the
    /// branches are appended one by one. The total weight is the same
    /// either way.
    pub fn append_branches<I>(&mut self, branches: I)
    where
        I: IntoIterator<Item = ProcessBranch>,
    {
        if self.branches.is_empty() {
            self.branches.replace(branches.into_iter().collect());
        } else {
            self.branches.extend(branches);
        }
    }

    /// Sum of all branch weights.
    pub fn total_weight(&self) -> f64 {
        self.branches.total_weight()
    }

    pub fn branches(&self) -> &ProcessBranchList {
        &self.branches
    }

    /// Checks every incoming snapshot against the live pool.
    ///
    /// A particle that is gone (decayed, absorbed) or whose `id_process`
    /// moved on (it took part in another interaction since this candidate
    /// was queued) invalidates the whole candidate.
    pub fn is_valid<P: ParticlePool + ?Sized>(&self, pool: &P) -> bool {
        self.incoming.iter().all(|part| {
            part.id()
                .and_then(|id| pool.live_process(id))
                .map(|live| live == part.id_process())
                .unwrap_or(false)
        })
    }

    /// Estimate of the interaction vertex: the mean incoming position.
    pub fn interaction_point(&self) -> Vector3<f64> {
        let sum: Vector3<f64> = self
            .incoming
            .iter()
            .map(|p| p.position().threevec)
            .sum();
        sum / self.incoming.len() as f64
    }

    /// Owned copy of the incoming snapshots.
    pub fn incoming_particles(&self) -> Vec<ParticleData> {
        self.incoming.clone()
    }

    pub fn incoming(&self) -> &[ParticleData] {
        &self.incoming
    }

    pub fn outgoing_particles(&self) -> &[ParticleData] {
        &self.outgoing
    }

    pub fn time_of_execution(&self) -> f64 {
        self.time_of_execution
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Sum of the incoming four-momenta.
    pub fn total_momentum(&self) -> FourVector {
        self.incoming.iter().map(|p| p.momentum()).sum()
    }

    /// Total CM energy of the incoming particles.
    pub fn sqrt_s(&self) -> f64 {
        self.total_momentum().abs()
    }

    /// Fills the outgoing slots with fresh particles of the given species,
    /// placed at the interaction point at the execution time.
    ///
    /// Momenta are left at rest; kinematics sampling sets them.
    pub fn prepare_outgoing(&mut self, species: &[Arc<ParticleType>]) {
        let vertex = FourVector::from_parts(self.time_of_execution, self.interaction_point());
        self.outgoing = species
            .iter()
            .map(|t| ParticleData::new(Arc::clone(t)).with_position(vertex))
            .collect();
    }

    /// Resolves the candidate: selects a channel and samples the final state.
    ///
    /// Two-body final states are sampled isotropically in the CM frame and
    /// boosted back to the computational frame. A one-body final state takes
    /// the full incoming four-momentum and needs `sqrt_s` at or above the
    /// species' minimum mass. Wall crossings copy the incoming
    /// particles and return `None`; otherwise the chosen branch index is
    /// returned.
    ///
    /// On error the outgoing list is left empty.
    pub fn generate_final_state<R, S>(
        &mut self,
        rng: &mut R,
        sampler: &mut S,
    ) -> Result<Option<usize>, ActionError>
    where
        R: RandomSource + ?Sized,
        S: ResonanceMassSampler + ?Sized,
    {
        if !self.outgoing.is_empty() {
            return Err(ActionError::AlreadyResolved);
        }

        if self.kind == ActionKind::WallCrossing {
            self.outgoing = self.incoming.clone();
            return Ok(None);
        }

        let index = self.choose_branch_index(rng)?;
        let species = self.branches.as_slice()[index].particle_types().to_vec();
        self.prepare_outgoing(&species);

        let result = match self.outgoing.len() {
            1 => {
                let total = self.total_momentum();
                let formed = self.outgoing[0].species().clone();
                if total.abs() < formed.minimum_mass() {
                    Err(ActionError::InsufficientEnergy {
                        sqrt_s: total.abs(),
                        min_mass_a: formed.minimum_mass(),
                        min_mass_b: 0.0,
                        pdg_a: formed.pdg,
                        pdg_b: PdgCode::INVALID,
                    })
                } else {
                    self.outgoing[0].set_4momentum(total);
                    Ok(())
                }
            }
            2 => {
                let total = self.total_momentum();
                let beta_cm = total.velocity();
                match self.sample_cms_momenta_at(total.abs(), rng, sampler) {
                    Ok(_) => {
                        let back = -beta_cm;
                        for p in &mut self.outgoing {
                            let lab = p.momentum().lorentz_boost(&back);
                            p.set_4momentum(lab);
                        }
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            n => Err(ActionError::UnsupportedFinalState(n)),
        };

        if let Err(e) = result {
            self.outgoing.clear();
            return Err(e);
        }

        debug!("{} resolved into branch {}: {}", self.kind, index, self);
        Ok(Some(index))
    }

    /// Four-momentum balance check with the default tolerance.
    pub fn check_conservation(&self, id_process: ProcessId) -> ConservationReport {
        ConservationAuditor::default().check(self, id_process)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ t={:.4} (weight {}): ", self.kind, self.time_of_execution, self.total_weight())?;
        let incoming: Vec<String> = self.incoming.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", incoming.join(", "))?;
        if !self.outgoing.is_empty() {
            let outgoing: Vec<String> = self.outgoing.iter().map(|p| p.to_string()).collect();
            write!(f, " -> [{}]", outgoing.join(", "))?;
        }
        Ok(())
    }
}

/// Display adapter for a list of candidates.
pub struct ActionList<'a>(pub &'a [Action]);

impl std::fmt::Display for ActionList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ActionList {{")?;
        for action in self.0 {
            writeln!(f, "- {}", action)?;
        }
        write!(f, "}}")
    }
}
