//! Error types for the simulation harness.

use hadron_core::ActionError;
use hadron_env::EnvError;
use thiserror::Error;

/// Errors raised while running scenarios.
#[derive(Debug, Error)]
pub enum SimError {
    /// Resolution failed
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    /// Species or particle lookup failed
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Commit attempted on an action without a final state
    #[error("Cannot commit unresolved action")]
    Unresolved,

    /// A lock was poisoned by a panicking worker
    #[error("Particle store lock poisoned")]
    Poisoned,

    /// The worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Configuration does not allow the scenario to run
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A scenario assertion did not hold
    #[error("Check failed: {0}")]
    Check(String),
}

