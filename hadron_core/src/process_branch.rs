//! Weighted outcomes of an interaction and the running-total collection
//! that holds them.

use crate::error::ActionError;
use crate::particle::ParticleData;
use hadron_env::ParticleType;
use std::sync::Arc;

/// One possible final state with its statistical weight.
///
/// The weight is a cross section (collisions) or a partial width (decays);
/// only its ratio to the candidate's total weight matters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessBranch {
    particle_types: Vec<Arc<ParticleType>>,
    weight: f64,
}

impl ProcessBranch {
    /// Creates a branch. Negative or NaN weights are rejected.
    pub fn new(particle_types: Vec<Arc<ParticleType>>, weight: f64) -> Result<Self, ActionError> {
        if !(weight >= 0.0) {
            return Err(ActionError::NegativeWeight(weight));
        }
        Ok(Self {
            particle_types,
            weight,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn particle_types(&self) -> &[Arc<ParticleType>] {
        &self.particle_types
    }

    /// False for empty final states and "no interaction" placeholders.
    pub fn is_selectable(&self) -> bool {
        self.particle_types
            .first()
            .map(|t| t.pdg.is_valid())
            .unwrap_or(false)
    }

    /// Fresh particles, one per species, at rest with their pole masses.
    pub fn particle_list(&self) -> Vec<ParticleData> {
        self.particle_types
            .iter()
            .map(|t| ParticleData::new(Arc::clone(t)))
            .collect()
    }
}

impl std::fmt::Display for ProcessBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.particle_types.iter().map(|t| t.name.as_str()).collect();
        write!(f, "[{}] w={}", names.join(" "), self.weight)
    }
}

/// Ordered branches plus their cached total weight.
///
/// The total is maintained incrementally on every insert and recomputed
/// once on [`ProcessBranchList::replace`].
#[derive(Debug, Clone, Default)]
pub struct ProcessBranchList {
    branches: Vec<ProcessBranch>,
    total_weight: f64,
}

impl ProcessBranchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one branch.
    pub fn push(&mut self, branch: ProcessBranch) {
        self.total_weight += branch.weight();
        self.branches.push(branch);
    }

    /// Replaces all branches and recomputes the total.
    pub fn replace(&mut self, branches: Vec<ProcessBranch>) {
        self.total_weight = branches.iter().map(ProcessBranch::weight).sum();
        self.branches = branches;
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessBranch> {
        self.branches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessBranch> {
        self.branches.iter()
    }

    pub fn as_slice(&self) -> &[ProcessBranch] {
        &self.branches
    }
}

impl Extend<ProcessBranch> for ProcessBranchList {
    fn extend<I: IntoIterator<Item = ProcessBranch>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.branches.reserve(iter.size_hint().0);
        for branch in iter {
            self.push(branch);
        }
    }
}

impl FromIterator<ProcessBranch> for ProcessBranchList {
    fn from_iter<I: IntoIterator<Item = ProcessBranch>>(iter: I) -> Self {
        let mut list = Self::new();
        list.replace(iter.into_iter().collect());
        list
    }
}

impl<'a> IntoIterator for &'a ProcessBranchList {
    type Item = &'a ProcessBranch;
    type IntoIter = std::slice::Iter<'a, ProcessBranch>;

    fn into_iter(self) -> Self::IntoIter {
        self.branches.iter()
    }
}
