//! Two-body final-state kinematics in the center-of-mass frame.

use crate::action::Action;
use crate::error::ActionError;
use crate::fourvector::FourVector;
use hadron_env::{RandomSource, ResonanceMassSampler};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Sampled two-body kinematics, all in the CM frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CmsKinematics {
    pub sqrt_s: f64,
    pub mass_a: f64,
    pub mass_b: f64,
    pub energy_a: f64,
    pub energy_b: f64,
    /// Magnitude of each particle's three-momentum
    pub momentum_radial: f64,
    /// Emission direction of particle A; B flies along `-direction`
    pub direction: Vector3<f64>,
}

impl CmsKinematics {
    /// Non-positive (or NaN) momentum, or particle A at or below its mass.
    pub fn is_degenerate(&self) -> bool {
        !(self.momentum_radial > 0.0) || !(self.energy_a > self.mass_a)
    }
}

impl Action {
    /// Samples back-to-back CM momenta for a two-particle final state at
    /// the candidate's own `sqrt_s`.
    pub fn sample_cms_momenta<R, S>(
        &mut self,
        rng: &mut R,
        sampler: &mut S,
    ) -> Result<CmsKinematics, ActionError>
    where
        R: RandomSource + ?Sized,
        S: ResonanceMassSampler + ?Sized,
    {
        let sqrt_s = self.sqrt_s();
        self.sample_cms_momenta_at(sqrt_s, rng, sampler)
    }

    /// Samples back-to-back CM momenta for the two outgoing slots.
    ///
    /// If one species is unstable its mass is sampled; only the first
    /// unstable species is sampled and the other keeps its pole mass, so
    /// two resonances in one final state are not supported. Angles are
    /// isotropic regardless of the process.
    ///
    /// # Errors
    /// - `UnsupportedFinalState` unless exactly two outgoing slots are set
    /// - `InsufficientEnergy` if `sqrt_s` is below the sum of minimum masses
    pub fn sample_cms_momenta_at<R, S>(
        &mut self,
        sqrt_s: f64,
        rng: &mut R,
        sampler: &mut S,
    ) -> Result<CmsKinematics, ActionError>
    where
        R: RandomSource + ?Sized,
        S: ResonanceMassSampler + ?Sized,
    {
        if self.outgoing.len() != 2 {
            return Err(ActionError::UnsupportedFinalState(self.outgoing.len()));
        }

        let t_a = self.outgoing[0].species().clone();
        let t_b = self.outgoing[1].species().clone();

        let mut mass_a = t_a.mass;
        let mut mass_b = t_b.mass;

        if sqrt_s < t_a.minimum_mass() + t_b.minimum_mass() {
            return Err(ActionError::InsufficientEnergy {
                sqrt_s,
                min_mass_a: t_a.minimum_mass(),
                min_mass_b: t_b.minimum_mass(),
                pdg_a: t_a.pdg,
                pdg_b: t_b.pdg,
            });
        }

        if !t_a.is_stable() {
            mass_a = sampler.sample_mass(&t_a, mass_b, sqrt_s);
        } else if !t_b.is_stable() {
            mass_b = sampler.sample_mass(&t_b, mass_a, sqrt_s);
        }

        let energy_a = (sqrt_s * sqrt_s + mass_a * mass_a - mass_b * mass_b) / (2.0 * sqrt_s);
        let momentum_radial = (energy_a * energy_a - mass_a * mass_a).sqrt();
        if !(momentum_radial > 0.0) {
            warn!("radial momenta {}", momentum_radial);
        }

        let direction = rng.isotropic_direction();
        if !(energy_a > mass_a) {
            info!(
                "Particle {} radial momenta {} direction {:?}",
                t_a.pdg, momentum_radial, direction
            );
            info!(
                "Etot: {} m_a: {} m_b: {} E_a: {}",
                sqrt_s, mass_a, mass_b, energy_a
            );
        }

        let energy_b = sqrt_s - energy_a;
        self.outgoing[0].set_4momentum(FourVector::from_parts(energy_a, direction * momentum_radial));
        self.outgoing[1].set_4momentum(FourVector::from_parts(energy_b, -direction * momentum_radial));

        debug!("p_a: {}\np_b: {}", self.outgoing[0], self.outgoing[1]);

        Ok(CmsKinematics {
            sqrt_s,
            mass_a,
            mass_b,
            energy_a,
            energy_b,
            momentum_radial,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::testing::{nucleon, pion, snapshot, species, FixedDraws};
    use approx::assert_relative_eq;
    use hadron_env::{ParticleType, PdgCode, PoleMassSampler, ProcessId};
    use proptest::prelude::*;
    use std::sync::Arc;

    /// Sampler returning a fixed mass and recording what it was asked.
    struct FixedMass {
        mass: f64,
        calls: Vec<(PdgCode, f64, f64)>,
    }

    impl ResonanceMassSampler for FixedMass {
        fn sample_mass(&mut self, resonance: &ParticleType, partner_mass: f64, sqrt_s: f64) -> f64 {
            self.calls.push((resonance.pdg, partner_mass, sqrt_s));
            self.mass
        }
    }

    /// Two particles at rest-frame energies summing to `sqrt_s`.
    fn action_at(sqrt_s: f64) -> Action {
        let a = snapshot(1, pion(), FourVector::new(sqrt_s / 2.0, 0.0, 0.0, 0.1), ProcessId(0));
        let b = snapshot(2, pion(), FourVector::new(sqrt_s / 2.0, 0.0, 0.0, -0.1), ProcessId(0));
        Action::new(vec![a, b], 0.0, ActionKind::Collision).unwrap()
    }

    #[test]
    fn test_end_to_end_equal_masses() {
        let half = species(111, 0.5);
        let mut action = action_at(2.0);
        action.prepare_outgoing(&[half.clone(), half]);
        let mut rng = FixedDraws::new(&[0.3, 0.6]);

        let kin = action
            .sample_cms_momenta_at(2.0, &mut rng, &mut PoleMassSampler)
            .unwrap();

        assert_relative_eq!(kin.energy_a, 1.0, epsilon = 1e-12);
        assert_relative_eq!(kin.energy_b, 1.0, epsilon = 1e-12);
        assert_relative_eq!(kin.momentum_radial, 0.75f64.sqrt(), epsilon = 1e-12);
        assert!(!kin.is_degenerate());

        let out = action.outgoing_particles();
        assert_relative_eq!(out[0].momentum().threevec, -out[1].momentum().threevec, epsilon = 1e-12);
        assert_relative_eq!(out[0].momentum().threevec.norm(), 0.866, epsilon = 1e-3);
    }

    #[test]
    fn test_sample_uses_own_sqrt_s() {
        let mut action = action_at(2.5);
        action.prepare_outgoing(&[nucleon(), pion()]);
        let mut rng = FixedDraws::new(&[0.5, 0.5]);

        let kin = action.sample_cms_momenta(&mut rng, &mut PoleMassSampler).unwrap();

        assert_relative_eq!(kin.sqrt_s, action.sqrt_s(), epsilon = 1e-12);
    }

    #[test]
    fn test_insufficient_energy() {
        let half = species(111, 0.5);
        let mut action = action_at(0.9);
        action.prepare_outgoing(&[half.clone(), half]);
        let mut rng = FixedDraws::new(&[0.5, 0.5]);

        let err = action
            .sample_cms_momenta_at(0.9, &mut rng, &mut PoleMassSampler)
            .unwrap_err();

        match err {
            ActionError::InsufficientEnergy { sqrt_s, min_mass_a, min_mass_b, .. } => {
                assert_eq!(sqrt_s, 0.9);
                assert_eq!(min_mass_a, 0.5);
                assert_eq!(min_mass_b, 0.5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_requires_two_outgoing() {
        let mut action = action_at(2.0);
        action.prepare_outgoing(&[pion()]);
        let mut rng = FixedDraws::new(&[0.5, 0.5]);

        assert_eq!(
            action.sample_cms_momenta_at(2.0, &mut rng, &mut PoleMassSampler),
            Err(ActionError::UnsupportedFinalState(1))
        );
    }

    #[test]
    fn test_resonance_mass_sampled_for_first_unstable() {
        let delta = Arc::new(ParticleType::resonance(PdgCode(2224), "Δ⁺⁺", 1.232, 0.117, 1.076));
        let mut action = action_at(2.5);
        action.prepare_outgoing(&[pion(), delta]);
        let mut sampler = FixedMass { mass: 1.3, calls: Vec::new() };
        let mut rng = FixedDraws::new(&[0.5, 0.5]);

        let kin = action.sample_cms_momenta_at(2.5, &mut rng, &mut sampler).unwrap();

        assert_eq!(sampler.calls, vec![(PdgCode(2224), pion().mass, 2.5)]);
        assert_eq!(kin.mass_b, 1.3);
        assert_relative_eq!(action.outgoing_particles()[1].effective_mass(), 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_only_one_resonance_sampled() {
        let rho = Arc::new(ParticleType::resonance(PdgCode(113), "ρ⁰", 0.776, 0.149, 0.28));
        let mut action = action_at(3.0);
        action.prepare_outgoing(&[rho.clone(), rho]);
        let mut sampler = FixedMass { mass: 0.7, calls: Vec::new() };
        let mut rng = FixedDraws::new(&[0.5, 0.5]);

        let kin = action.sample_cms_momenta_at(3.0, &mut rng, &mut sampler).unwrap();

        assert_eq!(sampler.calls.len(), 1);
        assert_eq!(kin.mass_a, 0.7);
        assert_eq!(kin.mass_b, 0.776);
    }

    #[test]
    fn test_degenerate_at_threshold_still_propagates() {
        let half = species(111, 0.5);
        let mut action = action_at(1.0);
        action.prepare_outgoing(&[half.clone(), half]);
        let mut rng = FixedDraws::new(&[0.5, 0.5]);

        let kin = action
            .sample_cms_momenta_at(1.0, &mut rng, &mut PoleMassSampler)
            .unwrap();

        assert!(kin.is_degenerate());
        assert_relative_eq!(kin.momentum_radial, 0.0, epsilon = 1e-12);
        assert_relative_eq!(action.outgoing_particles()[0].momentum().x0(), 0.5, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_stable_pair_balances(
            mass_a in 0.1f64..1.5,
            mass_b in 0.1f64..1.5,
            excess in 0.001f64..5.0,
            u in 0.0f64..1.0,
            v in 0.0f64..1.0,
        ) {
            let sqrt_s = mass_a + mass_b + excess;
            let mut action = action_at(sqrt_s);
            action.prepare_outgoing(&[species(1, mass_a), species(2, mass_b)]);
            let mut rng = FixedDraws::new(&[u, v]);

            let kin = action.sample_cms_momenta_at(sqrt_s, &mut rng, &mut PoleMassSampler).unwrap();
            let out = action.outgoing_particles();

            prop_assert!((kin.energy_a + kin.energy_b - sqrt_s).abs() < 1e-9);
            let p_a = out[0].momentum().threevec.norm();
            let p_b = out[1].momentum().threevec.norm();
            prop_assert!((p_a - p_b).abs() < 1e-9);
            prop_assert!((out[0].effective_mass() - mass_a).abs() < 1e-6);
            prop_assert!((out[1].effective_mass() - mass_b).abs() < 1e-6);
        }
    }
}
