//! Monte Carlo channel selection.
//!
//! Inverse-CDF sampling over the candidate's branches: one canonical draw
//! `r`, branches visited in insertion order, and the first branch whose
//! cumulative probability reaches `r` wins.

use crate::action::Action;
use crate::error::ActionError;
use hadron_env::{ParticleType, RandomSource};
use std::sync::Arc;
use tracing::error;

impl Action {
    /// Selects a branch index proportional to weight.
    ///
    /// Branches with an empty final state or led by the invalid placeholder
    /// are skipped, as are zero-weight branches. Their weight still counts
    /// towards the total, so a draw falling into a skipped share leaves the
    /// cumulative sum short of `r`.
    ///
    /// # Errors
    /// `ChannelSelection` if no branch reaches the draw. This means the
    /// total weight disagrees with the branches (or is zero) and is fatal
    /// for this candidate.
    pub fn choose_branch_index<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<usize, ActionError> {
        let random_interaction = rng.canonical();
        let total_weight = self.total_weight();
        let mut interaction_probability = 0.0;

        for (index, branch) in self.branches().iter().enumerate() {
            if !branch.is_selectable() || branch.weight() <= 0.0 {
                continue;
            }
            interaction_probability += branch.weight() / total_weight;
            if random_interaction <= interaction_probability {
                return Ok(index);
            }
        }

        error!(
            branches = self.branches().len(),
            cumulative = interaction_probability,
            total_weight,
            draw = random_interaction,
            "Problem in choose_channel: {}",
            self
        );
        Err(ActionError::ChannelSelection {
            branch_count: self.branches().len(),
            cumulative: interaction_probability,
            total_weight,
            draw: random_interaction,
        })
    }

    /// Selects a branch and returns its final-state species.
    pub fn choose_channel<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<Arc<ParticleType>>, ActionError> {
        let index = self.choose_branch_index(rng)?;
        Ok(self.branches().as_slice()[index].particle_types().to_vec())
    }
}
