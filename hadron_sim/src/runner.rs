//! Scenario runner - builds candidates, resolves them and commits the
//! results to a live particle store.

use crate::breit_wigner::BreitWignerSampler;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::SimError;
use crate::exporter::{ActionRecord, RecordOutcome};
use crate::scenarios::ScenarioId;
use crate::species::{pdg, SpeciesTable};
use crate::store::{CommitOutcome, ParticleStore};

use hadron_core::{Action, ActionError, ActionKind, ConservationAuditor, FourVector, ParticleData, ProcessBranch};
use hadron_env::{ParticleId, ParticleType, RandomSource, ResonanceMassSampler, SpeciesRegistry};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Sub-stream ids for seed derivation.
const STREAM_INITIAL: u64 = 1;
const STREAM_KINEMATICS: u64 = 2;
const STREAM_MASSES: u64 = 3;
/// Worker candidates use `STREAM_WORKERS + 2 * index` (+1 for masses).
const STREAM_WORKERS: u64 = 1 << 32;

/// Largest velocity of the frame a colliding pair is boosted into.
const MAX_FRAME_VELOCITY: f64 = 0.6;

/// Largest thermal momentum magnitude (GeV).
const MAX_THERMAL_MOMENTUM: f64 = 0.8;

/// Side of the cubic box particles are placed in (fm).
const BOX_SIZE: f64 = 10.0;

/// Peak formation cross section (mb).
const FORMATION_PEAK: f64 = 200.0;

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// No fatal error and no conservation violation
    pub passed: bool,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// One record per candidate
    pub records: Vec<ActionRecord>,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Candidates constructed
    pub candidates_built: u64,

    /// Candidates with a final state
    pub resolved: u64,

    /// Final states written to the store
    pub committed: u64,

    /// Candidates invalidated by an earlier commit
    pub stale: u64,

    /// Channels closed at the sampled masses
    pub insufficient_energy: u64,

    /// Components outside tolerance, per action and per store total
    pub conservation_violations: u64,

    /// Two-body final states with vanishing CM momentum
    pub degenerate_kinematics: u64,
}

/// Runs resolution scenarios.
pub struct ScenarioRunner {
    config: SimConfig,
    species: SpeciesTable,
}

impl ScenarioRunner {
    /// Creates a new scenario runner with default settings.
    pub fn new(seed: u64) -> Self {
        Self::from_config(SimConfig {
            seed,
            ..SimConfig::default()
        })
    }

    pub fn from_config(config: SimConfig) -> Self {
        Self {
            config,
            species: SpeciesTable::builtin(),
        }
    }

    /// Sets the number of candidates per scenario.
    pub fn with_events(mut self, events: usize) -> Self {
        self.config.events = events;
        self
    }

    /// Sets the collision energy for the two-body scenarios.
    pub fn with_sqrt_s(mut self, sqrt_s: f64) -> Self {
        self.config.sqrt_s = sqrt_s;
        self
    }

    /// Sets the worker thread count (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.max(1);
        self
    }

    /// Sets the conservation tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.config.seed);

        let mut run = Run::new(&self.config);
        let outcome = match scenario {
            ScenarioId::ElasticPair => self.run_elastic_pair(&mut run),
            ScenarioId::ResonanceFormation => self.run_resonance_formation(&mut run),
            ScenarioId::ResonanceDecay => self.run_resonance_decay(&mut run),
            ScenarioId::CompetingCandidates => self.run_competing_candidates(&mut run),
            ScenarioId::WallCrossing => self.run_wall_crossing(&mut run),
        };

        let failure_reason = match outcome {
            Err(e) => {
                warn!("{} aborted: {}", scenario, e);
                Some(e.to_string())
            }
            Ok(()) if run.metrics.conservation_violations > 0 => Some(format!(
                "{} conservation violations",
                run.metrics.conservation_violations
            )),
            Ok(()) => None,
        };

        let m = &run.metrics;
        info!(
            "{}: built={} resolved={} committed={} stale={} insufficient_energy={} violations={} degenerate={}",
            scenario,
            m.candidates_built,
            m.resolved,
            m.committed,
            m.stale,
            m.insufficient_energy,
            m.conservation_violations,
            m.degenerate_kinematics
        );

        ScenarioResult {
            scenario,
            seed: self.config.seed,
            passed: failure_reason.is_none(),
            metrics: run.metrics,
            failure_reason,
            records: run.records,
        }
    }

    /// HS-001: ElasticPair - π⁺p elastic scattering.
    ///
    /// Each event is a fresh pair at the configured √s, boosted to a random
    /// frame. Elastic commits must keep both ids and bump their `id_process`.
    fn run_elastic_pair(&self, run: &mut Run) -> Result<(), SimError> {
        let pion = self.species.lookup(pdg::PI_PLUS)?;
        let proton = self.species.lookup(pdg::PROTON)?;

        for event in 0..self.config.events {
            let mut store = ParticleStore::new();
            let (a, b) = run.spawn_pair(&mut store, &pion, &proton, self.config.sqrt_s)?;
            let time = run.initial.uniform(0.0, 1.0);

            let mut action = Action::new(vec![a.clone(), b.clone()], time, ActionKind::Collision)?;
            let sigma = run.initial.uniform(5.0, 30.0);
            action.append_branch(ProcessBranch::new(vec![pion.clone(), proton.clone()], sigma)?);

            let before = store.total_momentum();
            if run.resolve_and_commit(event, action, &mut store)? == RecordOutcome::Committed {
                for snapshot in [&a, &b] {
                    let id = id_of(snapshot)?;
                    let live = store.get(id).map(|p| p.id_process());
                    if live.is_none() || live == Some(snapshot.id_process()) {
                        return Err(SimError::Check(format!(
                            "elastic commit did not update {}",
                            id
                        )));
                    }
                }
                run.audit_store(before, &store);
            }
        }
        Ok(())
    }

    /// HS-002: ResonanceFormation - π⁺p → Δ⁺⁺ competing with elastic
    /// scattering and N*(1440)⁺π⁺ production.
    fn run_resonance_formation(&self, run: &mut Run) -> Result<(), SimError> {
        let pion = self.species.lookup(pdg::PI_PLUS)?;
        let proton = self.species.lookup(pdg::PROTON)?;
        let delta = self.species.lookup(pdg::DELTA_PLUS_PLUS)?;
        let nstar = self.species.lookup(pdg::N1440_PLUS)?;
        let sqrt_s = self.config.sqrt_s;

        let nstar_weight = if sqrt_s > nstar.minimum_mass() + pion.mass { 2.0 } else { 0.0 };

        for event in 0..self.config.events {
            let mut store = ParticleStore::new();
            let (a, b) = run.spawn_pair(&mut store, &pion, &proton, sqrt_s)?;
            let time = run.initial.uniform(0.0, 1.0);

            let mut action = Action::new(vec![a, b], time, ActionKind::Collision)?;
            action.append_branches(vec![
                ProcessBranch::new(vec![pion.clone(), proton.clone()], 10.0)?,
                ProcessBranch::new(vec![delta.clone()], formation_weight(&delta, sqrt_s))?,
                ProcessBranch::new(vec![nstar.clone(), pion.clone()], nstar_weight)?,
            ]);

            let before = store.total_momentum();
            if run.resolve_and_commit(event, action, &mut store)? != RecordOutcome::Committed {
                continue;
            }

            let expected = match run.last_branch() {
                Some(1) => 1,
                _ => 2,
            };
            if store.len() != expected {
                return Err(SimError::Check(format!(
                    "branch {:?} left {} particles, expected {}",
                    run.last_branch(),
                    store.len(),
                    expected
                )));
            }
            if run.last_branch() == Some(1) {
                let formed = store.particles()[0].effective_mass();
                if (formed - sqrt_s).abs() > self.config.tolerance.max(1e-9) * sqrt_s.max(1.0) {
                    return Err(SimError::Check(format!(
                        "Δ⁺⁺ formed with mass {} at √s {}",
                        formed, sqrt_s
                    )));
                }
            }
            run.audit_store(before, &store);
        }
        Ok(())
    }

    /// HS-003: ResonanceDecay - moving resonances with Breit-Wigner masses.
    ///
    /// Cycles through Δ⁺⁺ → pπ⁺, ρ⁰ → π⁺π⁻ and N*(1440)⁺ → pπ⁰ / nπ⁺ / Δ⁺⁺π⁻.
    /// The last channel needs a second mass sample and is closed for light
    /// N* masses.
    fn run_resonance_decay(&self, run: &mut Run) -> Result<(), SimError> {
        let lookup = |code| self.species.lookup(code);
        let (pi_plus, pi_minus, pi_zero) = (lookup(pdg::PI_PLUS)?, lookup(pdg::PI_MINUS)?, lookup(pdg::PI_ZERO)?);
        let (proton, neutron) = (lookup(pdg::PROTON)?, lookup(pdg::NEUTRON)?);
        let delta = lookup(pdg::DELTA_PLUS_PLUS)?;
        let rho = lookup(pdg::RHO_ZERO)?;
        let nstar = lookup(pdg::N1440_PLUS)?;

        let channels: Vec<(Arc<ParticleType>, Vec<(Vec<Arc<ParticleType>>, f64)>)> = vec![
            (delta.clone(), vec![(vec![proton.clone(), pi_plus.clone()], 0.117)]),
            (rho, vec![(vec![pi_plus.clone(), pi_minus.clone()], 0.149)]),
            (
                nstar,
                vec![
                    (vec![proton, pi_zero], 0.070),
                    (vec![neutron, pi_plus], 0.140),
                    (vec![delta, pi_minus], 0.085),
                ],
            ),
        ];

        for event in 0..self.config.events {
            let (parent, branches) = &channels[event % channels.len()];
            let mut store = ParticleStore::new();

            let mass = run
                .masses
                .sample_mass(parent, 0.0, parent.mass + 4.0 * parent.width);
            let momentum = thermal_momentum(&mut run.initial, mass);
            let position = random_position(&mut run.initial, 0.0);
            let snapshot = store.spawn(parent.clone(), momentum, position);
            let time = run.initial.uniform(0.0, 1.0);

            let mut action = Action::new(vec![snapshot], time, ActionKind::Decay)?;
            for (species, width) in branches {
                action.append_branch(ProcessBranch::new(species.clone(), *width)?);
            }

            let before = store.total_momentum();
            if run.resolve_and_commit(event, action, &mut store)? == RecordOutcome::Committed {
                if store.len() != 2 {
                    return Err(SimError::Check(format!(
                        "{} decay left {} particles",
                        parent.name,
                        store.len()
                    )));
                }
                run.audit_store(before, &store);
            }
        }
        Ok(())
    }

    /// HS-004: CompetingCandidates - chain of overlapping candidates.
    ///
    /// Particle `i` takes part in candidates `i - 1` and `i`. All candidates
    /// are resolved on worker threads, each with a stream derived from its
    /// index, then committed in `time_of_execution` order under the store's
    /// write lock. Every commit makes its neighbours stale.
    fn run_competing_candidates(&self, run: &mut Run) -> Result<(), SimError> {
        let pion = self.species.lookup(pdg::PI_PLUS)?;
        let proton = self.species.lookup(pdg::PROTON)?;
        let delta = self.species.lookup(pdg::DELTA_PLUS_PLUS)?;
        let events = self.config.events;

        let mut store = ParticleStore::new();
        let particles: Vec<ParticleData> = (0..=events)
            .map(|i| {
                let species = if i % 2 == 0 { &pion } else { &proton };
                let momentum = thermal_momentum(&mut run.initial, species.mass);
                let position = random_position(&mut run.initial, 0.0);
                store.spawn(species.clone(), momentum, position)
            })
            .collect();

        let mut candidates = Vec::with_capacity(events);
        for pair in particles.windows(2) {
            let time = run.initial.uniform(0.0, 1.0);
            let mut action = Action::new(pair.to_vec(), time, ActionKind::Collision)?;
            let sqrt_s = action.sqrt_s();
            action.append_branches(vec![
                ProcessBranch::new(vec![pair[0].species().clone(), pair[1].species().clone()], 10.0)?,
                ProcessBranch::new(vec![delta.clone()], formation_weight(&delta, sqrt_s))?,
            ]);
            candidates.push(action);
        }
        run.metrics.candidates_built += candidates.len() as u64;

        let before = store.total_momentum();
        let store = RwLock::new(store);
        let resolutions = resolve_parallel(&mut candidates, &store, self.config.seed, self.config.workers)?;

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            candidates[a]
                .time_of_execution()
                .total_cmp(&candidates[b].time_of_execution())
                .then(a.cmp(&b))
        });

        let mut pool = store.write().map_err(|_| SimError::Poisoned)?;
        for index in order {
            let action = &candidates[index];
            match &resolutions[index] {
                Resolution::Skipped => run.record_stale(index, action),
                Resolution::Resolved(branch) => {
                    run.finish(index, action, *branch, &mut pool)?;
                }
                Resolution::Failed(e) => {
                    run.reject(index, action, e.clone())?;
                }
            }
        }
        run.audit_store(before, &pool);

        if events > 0 && run.metrics.committed == 0 {
            return Err(SimError::Check("no candidate committed".to_string()));
        }
        debug!(
            "{} candidates, {} committed, {} stale, {} particles left",
            events,
            run.metrics.committed,
            run.metrics.stale,
            pool.len()
        );
        Ok(())
    }

    /// HS-005: WallCrossing - pass-through candidates.
    ///
    /// No branches, no channel selection; the commit keeps the particle
    /// and bumps its `id_process`.
    fn run_wall_crossing(&self, run: &mut Run) -> Result<(), SimError> {
        let stable: Vec<Arc<ParticleType>> = self
            .species
            .all()
            .into_iter()
            .filter(|t| t.is_stable())
            .collect();
        if stable.is_empty() {
            return Err(SimError::InvalidConfig("no stable species".to_string()));
        }

        let mut store = ParticleStore::new();
        for event in 0..self.config.events {
            let species = &stable[event % stable.len()];
            let momentum = thermal_momentum(&mut run.initial, species.mass);
            let position = random_position(&mut run.initial, 0.0);
            let snapshot = store.spawn(species.clone(), momentum, position);
            let time = run.initial.uniform(0.0, 1.0);

            let action = Action::new(vec![snapshot.clone()], time, ActionKind::WallCrossing)?;
            if run.resolve_and_commit(event, action, &mut store)? != RecordOutcome::Committed {
                return Err(SimError::Check(format!("wall crossing of {} not committed", species.name)));
            }

            let id = id_of(&snapshot)?;
            let live = store.snapshot(id)?;
            if live.momentum() != snapshot.momentum() || live.id_process() == snapshot.id_process() {
                return Err(SimError::Check(format!("wall crossing altered {}", id)));
            }
        }
        Ok(())
    }
}

/// Outcome of the parallel resolution phase for one candidate.
#[derive(Debug, Clone)]
enum Resolution {
    /// Already stale when the worker picked it up
    Skipped,
    Resolved(Option<usize>),
    Failed(ActionError),
}

/// Resolves every candidate on a pool of `workers` threads.
///
/// Results are indexed like `candidates` and depend only on the seed, not
/// on the worker count or scheduling.
fn resolve_parallel(
    candidates: &mut [Action],
    store: &RwLock<ParticleStore>,
    seed: u64,
    workers: usize,
) -> Result<Vec<Resolution>, SimError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| SimError::ThreadPool(e.to_string()))?;

    pool.install(|| {
        candidates
            .par_iter_mut()
            .enumerate()
            .map(|(index, action)| {
                let valid = {
                    let live = store.read().map_err(|_| SimError::Poisoned)?;
                    action.is_valid(&*live)
                };
                if !valid {
                    return Ok(Resolution::Skipped);
                }

                let stream = STREAM_WORKERS + 2 * index as u64;
                let mut rng = SimContext::new(SimContext::derive_seed(seed, stream));
                let mut masses = BreitWignerSampler::new(SimContext::derive_seed(seed, stream + 1));
                Ok(match action.generate_final_state(&mut rng, &mut masses) {
                    Ok(branch) => Resolution::Resolved(branch),
                    Err(e) => Resolution::Failed(e),
                })
            })
            .collect()
    })
}

/// Mutable state of one scenario run.
struct Run {
    /// Initial conditions: momenta, positions, times, cross sections
    initial: SimContext,

    /// Channel selection and emission angles
    kinematics: SimContext,

    masses: BreitWignerSampler,
    auditor: ConservationAuditor,
    metrics: ScenarioMetrics,
    records: Vec<ActionRecord>,
}

impl Run {
    fn new(config: &SimConfig) -> Self {
        let master = SimContext::new(config.seed);
        Self {
            initial: master.derive(STREAM_INITIAL),
            kinematics: master.derive(STREAM_KINEMATICS),
            masses: BreitWignerSampler::new(SimContext::derive_seed(config.seed, STREAM_MASSES)),
            auditor: ConservationAuditor::with_tolerance(config.tolerance),
            metrics: ScenarioMetrics::default(),
            records: Vec::new(),
        }
    }

    /// Spawns two particles with invariant mass `sqrt_s` in a random frame.
    fn spawn_pair(
        &mut self,
        store: &mut ParticleStore,
        a: &Arc<ParticleType>,
        b: &Arc<ParticleType>,
        sqrt_s: f64,
    ) -> Result<(ParticleData, ParticleData), SimError> {
        if !(sqrt_s > a.mass + b.mass) {
            return Err(SimError::InvalidConfig(format!(
                "√s = {} GeV is below the {} + {} threshold {}",
                sqrt_s,
                a.name,
                b.name,
                a.mass + b.mass
            )));
        }

        let energy_a = (sqrt_s * sqrt_s + a.mass * a.mass - b.mass * b.mass) / (2.0 * sqrt_s);
        let p = (energy_a * energy_a - a.mass * a.mass).sqrt();
        let n = self.initial.isotropic_direction();
        let speed = self.initial.uniform(0.0, MAX_FRAME_VELOCITY);
        let beta = self.initial.isotropic_direction() * speed;

        let p_a = FourVector::from_parts(energy_a, n * p).lorentz_boost(&-beta);
        let p_b = FourVector::from_parts(sqrt_s - energy_a, -n * p).lorentz_boost(&-beta);
        let position = random_position(&mut self.initial, 0.0);

        Ok((
            store.spawn(a.clone(), p_a, position),
            store.spawn(b.clone(), p_b, position),
        ))
    }

    /// Resolves a freshly built candidate and commits it.
    fn resolve_and_commit(
        &mut self,
        event: usize,
        mut action: Action,
        store: &mut ParticleStore,
    ) -> Result<RecordOutcome, SimError> {
        self.metrics.candidates_built += 1;
        match action.generate_final_state(&mut self.kinematics, &mut self.masses) {
            Ok(branch) => self.finish(event, &action, branch, store),
            Err(e) => self.reject(event, &action, e),
        }
    }

    /// Commits a resolved candidate and audits it.
    fn finish(
        &mut self,
        event: usize,
        action: &Action,
        branch: Option<usize>,
        store: &mut ParticleStore,
    ) -> Result<RecordOutcome, SimError> {
        self.metrics.resolved += 1;
        if is_degenerate(action) {
            self.metrics.degenerate_kinematics += 1;
        }

        let record = ActionRecord::new(event, action, branch, RecordOutcome::Stale);
        match store.commit(action)? {
            CommitOutcome::Stale => {
                self.metrics.stale += 1;
                self.records.push(record);
                Ok(RecordOutcome::Stale)
            }
            CommitOutcome::Committed { id_process, .. } => {
                self.metrics.committed += 1;
                let report = self.auditor.check(action, id_process);
                let violations = report.violations.len();
                self.metrics.conservation_violations += violations as u64;
                self.records.push(record.committed(id_process, violations));
                Ok(RecordOutcome::Committed)
            }
        }
    }

    /// Books a failed resolution; fatal errors abort the scenario.
    fn reject(&mut self, event: usize, action: &Action, error: ActionError) -> Result<RecordOutcome, SimError> {
        let outcome = match error {
            ActionError::InsufficientEnergy { .. } => {
                debug!("event {}: {}", event, error);
                self.metrics.insufficient_energy += 1;
                RecordOutcome::InsufficientEnergy
            }
            e if e.is_fatal() => return Err(e.into()),
            e => {
                warn!("event {}: {}", event, e);
                RecordOutcome::Rejected
            }
        };
        self.records.push(ActionRecord::new(event, action, None, outcome));
        Ok(outcome)
    }

    /// Books a candidate that went stale before resolution.
    fn record_stale(&mut self, event: usize, action: &Action) {
        self.metrics.stale += 1;
        self.records.push(ActionRecord::new(event, action, None, RecordOutcome::Stale));
    }

    /// Checks the store's total four-momentum against `before`.
    fn audit_store(&mut self, before: FourVector, store: &ParticleStore) {
        let report = self
            .auditor
            .compare(before, store.total_momentum(), store.last_process());
        self.metrics.conservation_violations += report.violations.len() as u64;
    }

    fn last_branch(&self) -> Option<usize> {
        self.records.last().and_then(|r| r.branch)
    }
}

/// Isotropic momentum with uniform magnitude below `MAX_THERMAL_MOMENTUM`.
fn thermal_momentum<R: RandomSource>(rng: &mut R, mass: f64) -> FourVector {
    let p = MAX_THERMAL_MOMENTUM * rng.canonical();
    let n = rng.isotropic_direction();
    FourVector::from_parts((mass * mass + p * p).sqrt(), n * p)
}

fn random_position(rng: &mut SimContext, time: f64) -> FourVector {
    let x = rng.uniform(0.0, BOX_SIZE);
    let y = rng.uniform(0.0, BOX_SIZE);
    let z = rng.uniform(0.0, BOX_SIZE);
    FourVector::new(time, x, y, z)
}

/// Non-relativistic Breit-Wigner formation cross section (mb).
fn formation_weight(resonance: &ParticleType, sqrt_s: f64) -> f64 {
    let half = resonance.width / 2.0;
    FORMATION_PEAK * half * half / ((sqrt_s - resonance.mass).powi(2) + half * half)
}

/// Two-body final state whose CM momentum vanished.
fn is_degenerate(action: &Action) -> bool {
    let out = action.outgoing_particles();
    if out.len() != 2 || action.kind() == ActionKind::WallCrossing {
        return false;
    }
    let beta = action.total_momentum().velocity();
    let p_cm = out[0].momentum().lorentz_boost(&beta).threevec.norm();
    !(p_cm > 1e-9)
}

fn id_of(particle: &ParticleData) -> Result<ParticleId, SimError> {
    particle
        .id()
        .ok_or_else(|| SimError::Check(format!("particle {} has no id", particle)))
}
