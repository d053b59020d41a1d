//! Hadron Core - Interaction candidate resolution for hadronic transport
//!
//! This library turns a queued interaction candidate into a concrete final
//! state:
//! 1. **Branches**: weighted outcome channels with an exact running total
//! 2. **Channel selection**: inverse-CDF Monte Carlo over the branches
//! 3. **Kinematics**: isotropic two-body momenta in the CM frame, boosted back
//! 4. **Auditing**: four-momentum conservation check after resolution
//!
//! Particle storage, species tables and random number generation are
//! provided by the caller through the traits in `hadron_env`.

pub mod action;
pub mod conservation;
pub mod error;
pub mod fourvector;
pub mod kinematics;
pub mod particle;
pub mod process_branch;
pub mod resolver;

#[cfg(test)]
mod testing;

// Re-export key types for convenience
pub use action::{Action, ActionKind, ActionList};
pub use conservation::{Component, ConservationAuditor, ConservationReport, Violation, REALLY_SMALL};
pub use error::ActionError;
pub use fourvector::FourVector;
pub use kinematics::CmsKinematics;
pub use particle::ParticleData;
pub use process_branch::{ProcessBranch, ProcessBranchList};
