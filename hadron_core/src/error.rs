//! Errors raised while building and resolving interaction candidates.

use hadron_env::PdgCode;
use thiserror::Error;

/// Interaction resolution errors.
///
/// Only [`ActionError::ChannelSelection`] is fatal: it means the branch
/// bookkeeping is broken. Everything else is a normal "this candidate is
/// not realized" outcome for the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("Action requires at least one incoming particle")]
    NoIncomingParticles,

    #[error("Branch weight must be non-negative, got {0}")]
    NegativeWeight(f64),

    #[error(
        "Problem in choose_channel: {branch_count} branches, cumulative probability \
         {cumulative} after draw {draw}, total weight {total_weight}"
    )]
    ChannelSelection {
        branch_count: usize,
        cumulative: f64,
        total_weight: f64,
        draw: f64,
    },

    #[error(
        "Not enough energy for final state {pdg_a} + {pdg_b}: sqrt(s) = {sqrt_s}, \
         minimum masses {min_mass_a} + {min_mass_b}"
    )]
    InsufficientEnergy {
        sqrt_s: f64,
        min_mass_a: f64,
        min_mass_b: f64,
        pdg_a: PdgCode,
        pdg_b: PdgCode,
    },

    #[error("Unsupported final state with {0} particles")]
    UnsupportedFinalState(usize),

    #[error("Action already has outgoing particles")]
    AlreadyResolved,
}

impl ActionError {
    /// True if the error signals a broken invariant rather than an
    /// unrealized candidate.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ActionError::ChannelSelection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_channel_selection_is_fatal() {
        let fatal = ActionError::ChannelSelection {
            branch_count: 2,
            cumulative: 0.9,
            total_weight: 1.0,
            draw: 0.95,
        };
        assert!(fatal.is_fatal());
        assert!(!ActionError::UnsupportedFinalState(3).is_fatal());
        assert!(!ActionError::InsufficientEnergy {
            sqrt_s: 0.9,
            min_mass_a: 0.5,
            min_mass_b: 0.5,
            pdg_a: PdgCode(1),
            pdg_b: PdgCode(2),
        }
        .is_fatal());
    }
}
