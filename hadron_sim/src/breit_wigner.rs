//! Resonance mass sampling from a non-relativistic Breit–Wigner shape.

use hadron_env::{ParticleType, ResonanceMassSampler};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Cauchy, Distribution};
use tracing::{debug, warn};

/// Default number of rejection rounds before falling back to the pole mass.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Samples resonance masses from a Cauchy distribution centred on the pole
/// mass with half-width Γ/2, rejected into the kinematically allowed window
/// `[minimum_mass, sqrt_s - partner_mass]`.
#[derive(Debug, Clone)]
pub struct BreitWignerSampler {
    rng: ChaCha8Rng,
    max_attempts: usize,
}

impl BreitWignerSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the number of rejection rounds.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }
}

impl ResonanceMassSampler for BreitWignerSampler {
    fn sample_mass(&mut self, resonance: &ParticleType, partner_mass: f64, sqrt_s: f64) -> f64 {
        let min_mass = resonance.minimum_mass();
        let max_mass = sqrt_s - partner_mass;

        if resonance.is_stable() {
            return resonance.mass;
        }
        if max_mass <= min_mass {
            warn!(
                "No phase space for {}: window [{}, {}]",
                resonance, min_mass, max_mass
            );
            return min_mass;
        }

        let shape = match Cauchy::new(resonance.mass, resonance.width / 2.0) {
            Ok(shape) => shape,
            Err(e) => {
                warn!("Breit-Wigner for {} rejected: {:?}", resonance, e);
                return resonance.mass.clamp(min_mass, max_mass);
            }
        };

        for attempt in 0..self.max_attempts {
            let mass = shape.sample(&mut self.rng);
            if mass >= min_mass && mass <= max_mass {
                debug!("{} mass {:.4} after {} rejections", resonance.name, mass, attempt);
                return mass;
            }
        }

        warn!(
            "Breit-Wigner rejection for {} exhausted {} attempts in [{}, {}]",
            resonance, self.max_attempts, min_mass, max_mass
        );
        resonance.mass.clamp(min_mass, max_mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hadron_env::PdgCode;
    use proptest::prelude::*;

    fn delta() -> ParticleType {
        ParticleType::resonance(PdgCode(2224), "Δ⁺⁺", 1.232, 0.117, 1.076)
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut s1 = BreitWignerSampler::new(42);
        let mut s2 = BreitWignerSampler::new(42);

        for _ in 0..20 {
            assert_eq!(s1.sample_mass(&delta(), 0.138, 2.0), s2.sample_mass(&delta(), 0.138, 2.0));
        }
    }

    #[test]
    fn test_peaks_near_pole() {
        let mut sampler = BreitWignerSampler::new(7);
        let mut masses: Vec<f64> = (0..2001)
            .map(|_| sampler.sample_mass(&delta(), 0.138, 3.0))
            .collect();
        masses.sort_by(|a, b| a.total_cmp(b));

        let median = masses[1000];
        assert!((median - 1.232).abs() < 0.02, "median {}", median);
    }

    #[test]
    fn test_stable_species_keeps_mass() {
        let proton = ParticleType::stable(PdgCode(2212), "p", 0.938);
        let mut sampler = BreitWignerSampler::new(1);

        assert_eq!(sampler.sample_mass(&proton, 0.138, 5.0), 0.938);
    }

    #[test]
    fn test_closed_window_returns_threshold() {
        let mut sampler = BreitWignerSampler::new(1);
        assert_eq!(sampler.sample_mass(&delta(), 0.938, 1.5), 1.076);
    }

    #[test]
    fn test_exhausted_rejection_clamps_pole_mass() {
        // Window far in the tail; one attempt almost never lands there
        let mut sampler = BreitWignerSampler::new(3).with_max_attempts(1);
        let mass = sampler.sample_mass(&delta(), 0.0, 1.0765);

        assert!((1.076..=1.0765).contains(&mass));
    }

    proptest! {
        #[test]
        fn prop_mass_within_window(
            seed in any::<u64>(),
            partner in 0.0f64..1.0,
            excess in 0.0f64..3.0,
        ) {
            let resonance = delta();
            let sqrt_s = resonance.minimum_mass() + partner + excess;
            let mut sampler = BreitWignerSampler::new(seed);

            let mass = sampler.sample_mass(&resonance, partner, sqrt_s);

            prop_assert!(mass >= resonance.minimum_mass());
            prop_assert!(mass <= sqrt_s - partner + 1e-12);
        }
    }
}
