//! JSON export of resolved actions.
//!
//! One record per candidate: what came in, which branch was chosen, what
//! came out and whether the commit went through.

use crate::error::SimError;
use crate::runner::{ScenarioMetrics, ScenarioResult};
use hadron_core::{Action, ActionKind, ParticleData};
use hadron_env::ProcessId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// One particle in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub pdg: i32,
    pub name: String,
    /// [E, px, py, pz] in GeV
    pub momentum: [f64; 4],
    /// [t, x, y, z] in fm
    pub position: [f64; 4],
}

impl From<&ParticleData> for ParticleRecord {
    fn from(p: &ParticleData) -> Self {
        let m = p.momentum();
        let x = p.position();
        Self {
            id: p.id().map(|id| id.0),
            pdg: p.pdgcode().0,
            name: p.species().name.clone(),
            momentum: [m.x0(), m.x1(), m.x2(), m.x3()],
            position: [x.x0(), x.x1(), x.x2(), x.x3()],
        }
    }
}

/// What happened to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Committed,
    Stale,
    InsufficientEnergy,
    /// Resolution failed with a non-fatal error other than energy
    Rejected,
}

/// One resolved (or discarded) candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub event: usize,
    pub kind: ActionKind,
    pub time: f64,
    pub sqrt_s: f64,

    /// Chosen branch; `None` for wall crossings and failed resolutions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<usize>,

    pub incoming: Vec<ParticleRecord>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outgoing: Vec<ParticleRecord>,

    pub outcome: RecordOutcome,

    /// Process id assigned on commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_process: Option<ProcessId>,

    /// Conservation violations found by the auditor
    pub violations: usize,
}

impl ActionRecord {
    /// Captures a candidate after resolution.
    pub fn new(event: usize, action: &Action, branch: Option<usize>, outcome: RecordOutcome) -> Self {
        Self {
            event,
            kind: action.kind(),
            time: action.time_of_execution(),
            sqrt_s: action.sqrt_s(),
            branch,
            incoming: action.incoming().iter().map(ParticleRecord::from).collect(),
            outgoing: action
                .outgoing_particles()
                .iter()
                .map(ParticleRecord::from)
                .collect(),
            outcome,
            id_process: None,
            violations: 0,
        }
    }

    /// Marks the record as committed under `id_process`.
    pub fn committed(mut self, id_process: ProcessId, violations: usize) -> Self {
        self.outcome = RecordOutcome::Committed;
        self.id_process = Some(id_process);
        self.violations = violations;
        self
    }
}

/// Complete scenario export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    pub metrics: ScenarioMetrics,

    pub records: Vec<ActionRecord>,
}

impl ActionExport {
    /// Creates an export from a finished run.
    pub fn from_result(result: &ScenarioResult) -> Self {
        Self {
            scenario: result.scenario.name().to_string(),
            seed: result.seed,
            passed: result.passed,
            failure_reason: result.failure_reason.clone(),
            metrics: result.metrics.clone(),
            records: result.records.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), SimError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScenarioRunner;
    use crate::scenarios::ScenarioId;

    #[test]
    fn test_export_matches_result() {
        let result = ScenarioRunner::new(5).with_events(4).run(ScenarioId::ElasticPair);
        let export = ActionExport::from_result(&result);

        assert_eq!(export.scenario, "elastic_pair");
        assert_eq!(export.seed, 5);
        assert_eq!(export.records.len(), result.records.len());
        assert_eq!(export.metrics, result.metrics);
    }

    #[test]
    fn test_json_shape() {
        let result = ScenarioRunner::new(9).with_events(2).run(ScenarioId::WallCrossing);
        let json = ActionExport::from_result(&result).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["scenario"], "wall_crossing");
        let record = &value["records"][0];
        assert_eq!(record["kind"], "WallCrossing");
        assert_eq!(record["outcome"], "committed");
        assert!(record.get("branch").is_none());
        assert_eq!(record["incoming"][0]["momentum"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_write_to_file() {
        let result = ScenarioRunner::new(1).with_events(2).run(ScenarioId::ResonanceDecay);
        let export = ActionExport::from_result(&result);
        let path = std::env::temp_dir().join("hadron_sim_export_test.json");
        let path = path.to_string_lossy().to_string();

        export.write_to_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: ActionExport = serde_json::from_str(&written).unwrap();

        assert_eq!(parsed.records.len(), export.records.len());
        for (a, b) in parsed.records.iter().zip(&export.records) {
            assert_eq!(a.outcome, b.outcome);
            assert_eq!(a.incoming[0].pdg, b.incoming[0].pdg);
            assert!((a.sqrt_s - b.sqrt_s).abs() < 1e-12);
        }
        let _ = std::fs::remove_file(&path);
    }
}
