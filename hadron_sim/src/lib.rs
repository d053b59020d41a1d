//! Hadron Deterministic Simulation Harness
//!
//! This crate drives the interaction core end to end: it owns a live
//! particle store, builds interaction candidates, resolves them with seeded
//! random streams and commits the results with optimistic validation.
//!
//! # Core Principle: One Seed
//!
//! All randomness derives from a single 64-bit master seed:
//! - **Initial conditions**: momenta, positions, execution times
//! - **Resolution**: channel draws and emission angles
//! - **Resonance masses**: Breit-Wigner sampling
//! - **Workers**: one stream per candidate index, independent of thread count
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ScenarioRunner                         │
//! │                                                              │
//! │  SimContext(seed) ──derive──► initial / kinematics / masses  │
//! │                                                              │
//! │  ┌──────────────┐  snapshot  ┌──────────┐                    │
//! │  │ ParticleStore│ ─────────► │  Action  │ ◄── SpeciesTable   │
//! │  │  (RwLock)    │            └────┬─────┘     (branches)     │
//! │  └──────▲───────┘                 │ generate_final_state     │
//! │         │ commit (write guard)    ▼                          │
//! │         └──────────── resolved Action ──► ConservationAuditor│
//! │                                │                             │
//! │                                ▼                             │
//! │                          ActionExport (JSON)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use hadron_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42)
//!     .with_events(1000)
//!     .with_workers(8)
//!     .run(ScenarioId::CompetingCandidates);
//! assert!(result.passed);
//! ```

mod breit_wigner;
mod config;
mod context;
mod error;
mod exporter;
mod runner;
mod species;
mod store;
pub mod scenarios;

pub use breit_wigner::{BreitWignerSampler, DEFAULT_MAX_ATTEMPTS};
pub use config::SimConfig;
pub use context::SimContext;
pub use error::SimError;
pub use exporter::{ActionExport, ActionRecord, ParticleRecord, RecordOutcome};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use species::{pdg, SpeciesTable};
pub use store::{CommitOutcome, ParticleStore};
