//! Built-in hadron species table.

use hadron_env::{EnvError, ParticleType, PdgCode, SpeciesRegistry};
use std::collections::HashMap;
use std::sync::Arc;

/// PDG codes of the built-in species.
pub mod pdg {
    use hadron_env::PdgCode;

    pub const PI_PLUS: PdgCode = PdgCode(211);
    pub const PI_MINUS: PdgCode = PdgCode(-211);
    pub const PI_ZERO: PdgCode = PdgCode(111);
    pub const K_PLUS: PdgCode = PdgCode(321);
    pub const K_MINUS: PdgCode = PdgCode(-321);
    pub const PROTON: PdgCode = PdgCode(2212);
    pub const NEUTRON: PdgCode = PdgCode(2112);
    pub const RHO_ZERO: PdgCode = PdgCode(113);
    pub const OMEGA: PdgCode = PdgCode(223);
    pub const DELTA_PLUS_PLUS: PdgCode = PdgCode(2224);
    pub const DELTA_ZERO: PdgCode = PdgCode(2114);
    pub const N1440_PLUS: PdgCode = PdgCode(12212);
}

const PION_MASS: f64 = 0.138;
const NUCLEON_MASS: f64 = 0.938;

/// Species registry keyed by PDG code.
///
/// Entries are validated on insertion so that every resonance has a
/// minimum mass at or below its pole mass.
#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    species: HashMap<PdgCode, Arc<ParticleType>>,
}

impl SpeciesTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Light hadrons: pions, kaons, nucleons, ρ, ω, Δ and N*(1440).
    ///
    /// Masses and widths in GeV. Resonance thresholds are the lightest
    /// decay channel (ρ → ππ, ω → πππ, Δ → Nπ, N* → Nπ).
    pub fn builtin() -> Self {
        let entries = [
            ParticleType::stable(pdg::PI_PLUS, "π⁺", PION_MASS),
            ParticleType::stable(pdg::PI_MINUS, "π⁻", PION_MASS),
            ParticleType::stable(pdg::PI_ZERO, "π⁰", PION_MASS),
            ParticleType::stable(pdg::K_PLUS, "K⁺", 0.494),
            ParticleType::stable(pdg::K_MINUS, "K⁻", 0.494),
            ParticleType::stable(pdg::PROTON, "p", NUCLEON_MASS),
            ParticleType::stable(pdg::NEUTRON, "n", NUCLEON_MASS),
            ParticleType::resonance(pdg::RHO_ZERO, "ρ⁰", 0.776, 0.149, 2.0 * PION_MASS),
            ParticleType::resonance(pdg::OMEGA, "ω", 0.783, 0.0085, 3.0 * PION_MASS),
            ParticleType::resonance(pdg::DELTA_PLUS_PLUS, "Δ⁺⁺", 1.232, 0.117, NUCLEON_MASS + PION_MASS),
            ParticleType::resonance(pdg::DELTA_ZERO, "Δ⁰", 1.232, 0.117, NUCLEON_MASS + PION_MASS),
            ParticleType::resonance(pdg::N1440_PLUS, "N⁺(1440)", 1.440, 0.350, NUCLEON_MASS + PION_MASS),
        ];

        let species = entries
            .into_iter()
            .map(|t| (t.pdg, Arc::new(t)))
            .collect();
        Self { species }
    }

    /// Adds or replaces a species.
    ///
    /// # Errors
    /// `InvalidSpecies` for the placeholder code, a non-positive mass, a
    /// negative width or a minimum mass above the pole mass.
    pub fn insert(&mut self, species: ParticleType) -> Result<Arc<ParticleType>, EnvError> {
        if !species.pdg.is_valid() {
            return Err(EnvError::invalid_species(species.pdg, "placeholder code"));
        }
        if !(species.mass > 0.0) {
            return Err(EnvError::invalid_species(species.pdg, "mass must be positive"));
        }
        if !(species.width >= 0.0) {
            return Err(EnvError::invalid_species(species.pdg, "width must be non-negative"));
        }
        if species.minimum_mass() > species.mass {
            return Err(EnvError::invalid_species(
                species.pdg,
                format!(
                    "minimum mass {} above pole mass {}",
                    species.minimum_mass(),
                    species.mass
                ),
            ));
        }

        let species = Arc::new(species);
        self.species.insert(species.pdg, Arc::clone(&species));
        Ok(species)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// All species, sorted by PDG code.
    pub fn all(&self) -> Vec<Arc<ParticleType>> {
        let mut all: Vec<_> = self.species.values().cloned().collect();
        all.sort_by_key(|t| t.pdg);
        all
    }
}

impl SpeciesRegistry for SpeciesTable {
    fn lookup(&self, pdg: PdgCode) -> Result<Arc<ParticleType>, EnvError> {
        self.species
            .get(&pdg)
            .cloned()
            .ok_or(EnvError::UnknownSpecies(pdg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let table = SpeciesTable::builtin();

        let proton = table.lookup(pdg::PROTON).unwrap();
        assert_eq!(proton.mass, 0.938);
        assert!(proton.is_stable());

        let delta = table.lookup(pdg::DELTA_PLUS_PLUS).unwrap();
        assert!(!delta.is_stable());
        assert!((delta.minimum_mass() - 1.076).abs() < 1e-12);
    }

    #[test]
    fn test_builtin_thresholds_below_pole() {
        for species in SpeciesTable::builtin().all() {
            assert!(species.minimum_mass() <= species.mass, "{}", species);
        }
    }

    #[test]
    fn test_unknown_species() {
        let table = SpeciesTable::builtin();
        assert!(matches!(
            table.lookup(PdgCode(999_999)),
            Err(EnvError::UnknownSpecies(PdgCode(999_999)))
        ));
    }

    #[test]
    fn test_lookup_all_preserves_order() {
        let table = SpeciesTable::builtin();
        let species = table.lookup_all(&[pdg::PI_MINUS, pdg::PROTON]).unwrap();

        assert_eq!(species[0].pdg, pdg::PI_MINUS);
        assert_eq!(species[1].pdg, pdg::PROTON);
    }

    #[test]
    fn test_insert_rejects_inconsistent_species() {
        let mut table = SpeciesTable::new();

        let heavy_threshold = ParticleType::resonance(PdgCode(9000), "X", 1.0, 0.1, 1.5);
        assert!(matches!(
            table.insert(heavy_threshold),
            Err(EnvError::InvalidSpecies { .. })
        ));
        assert!(table.insert(ParticleType::invalid()).is_err());
        assert!(table.is_empty());

        table.insert(ParticleType::stable(PdgCode(9001), "Y", 2.0)).unwrap();
        assert_eq!(table.len(), 1);
    }
}
