//! Resolution scenarios.

use serde::{Deserialize, Serialize};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// HS-001: π⁺p elastic scattering in moving frames
    ElasticPair,

    /// HS-002: π⁺p → Δ⁺⁺ formation competing with elastic scattering
    ResonanceFormation,

    /// HS-003: Δ⁺⁺, ρ⁰ and N*(1440) decays with sampled masses
    ResonanceDecay,

    /// HS-004: overlapping candidates resolved on worker threads
    CompetingCandidates,

    /// HS-005: boundary crossings without channel selection
    WallCrossing,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::ElasticPair,
            ScenarioId::ResonanceFormation,
            ScenarioId::ResonanceDecay,
            ScenarioId::CompetingCandidates,
            ScenarioId::WallCrossing,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::ElasticPair => "elastic_pair",
            ScenarioId::ResonanceFormation => "resonance_formation",
            ScenarioId::ResonanceDecay => "resonance_decay",
            ScenarioId::CompetingCandidates => "competing_candidates",
            ScenarioId::WallCrossing => "wall_crossing",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::ElasticPair => "π⁺p elastic collisions at fixed √s, boosted to random lab frames",
            ScenarioId::ResonanceFormation => "π⁺p → Δ⁺⁺ / elastic competition, inelastic commit",
            ScenarioId::ResonanceDecay => "Breit-Wigner masses, two-body decays incl. N* → Δπ",
            ScenarioId::CompetingCandidates => "Chain of overlapping candidates, parallel resolve, serialized commit",
            ScenarioId::WallCrossing => "Pass-through candidates, ids kept and id_process bumped",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elastic_pair" | "elastic" | "hs-001" => Ok(ScenarioId::ElasticPair),
            "resonance_formation" | "formation" | "hs-002" => Ok(ScenarioId::ResonanceFormation),
            "resonance_decay" | "decay" | "hs-003" => Ok(ScenarioId::ResonanceDecay),
            "competing_candidates" | "competing" | "hs-004" => Ok(ScenarioId::CompetingCandidates),
            "wall_crossing" | "wall" | "hs-005" => Ok(ScenarioId::WallCrossing),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
