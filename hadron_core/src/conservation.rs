//! Post-hoc four-momentum conservation check.
//!
//! Purely observational: violations are logged and reported, the action is
//! never altered or rejected.

use crate::action::Action;
use crate::fourvector::FourVector;
use hadron_env::ProcessId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default absolute tolerance per component (GeV).
pub const REALLY_SMALL: f64 = 1e-6;

/// Four-momentum component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    Energy,
    Px,
    Py,
    Pz,
}

impl Component {
    pub const ALL: [Component; 4] = [Component::Energy, Component::Px, Component::Py, Component::Pz];

    /// Reads this component out of a four-vector.
    pub fn of(&self, v: &FourVector) -> f64 {
        match self {
            Component::Energy => v.x0(),
            Component::Px => v.x1(),
            Component::Py => v.x2(),
            Component::Pz => v.x3(),
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Component::Energy => "E",
            Component::Px => "px",
            Component::Py => "py",
            Component::Pz => "pz",
        };
        write!(f, "{}", name)
    }
}

/// One component outside tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub component: Component,
    /// Incoming minus outgoing
    pub difference: f64,
}

/// Result of one conservation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationReport {
    pub id_process: ProcessId,
    /// Incoming minus outgoing four-momentum
    pub momentum_difference: FourVector,
    pub violations: Vec<Violation>,
}

impl ConservationReport {
    pub fn is_conserved(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Compares summed incoming and outgoing four-momenta.
#[derive(Debug, Clone, Copy)]
pub struct ConservationAuditor {
    tolerance: f64,
}

impl Default for ConservationAuditor {
    fn default() -> Self {
        Self {
            tolerance: REALLY_SMALL,
        }
    }
}

impl ConservationAuditor {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Checks the action's incoming against its outgoing particles.
    pub fn check(&self, action: &Action, id_process: ProcessId) -> ConservationReport {
        let incoming: FourVector = action.incoming().iter().map(|p| p.momentum()).sum();
        let outgoing: FourVector = action.outgoing_particles().iter().map(|p| p.momentum()).sum();
        self.compare(incoming, outgoing, id_process)
    }

    /// Checks two momentum totals directly.
    pub fn compare(
        &self,
        incoming: FourVector,
        outgoing: FourVector,
        id_process: ProcessId,
    ) -> ConservationReport {
        let momentum_difference = incoming - outgoing;

        let violations: Vec<Violation> = Component::ALL
            .iter()
            .filter_map(|component| {
                let difference = component.of(&momentum_difference);
                (difference.abs() > self.tolerance).then_some(Violation {
                    component: *component,
                    difference,
                })
            })
            .collect();

        for violation in &violations {
            warn!(
                id_process = id_process.0,
                "Process {}: {} conservation violation {}",
                id_process,
                violation.component,
                violation.difference
            );
        }

        ConservationReport {
            id_process,
            momentum_difference,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::testing::{pion, snapshot};

    #[test]
    fn test_component_reads_each_axis() {
        let v = FourVector::new(4.0, 1.0, -2.0, 3.0);
        let read: Vec<f64> = Component::ALL.iter().map(|c| c.of(&v)).collect();
        assert_eq!(read, vec![4.0, 1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_flags_energy_imbalance() {
        let auditor = ConservationAuditor::with_tolerance(1e-6);
        let incoming = FourVector::new(2.0, 0.1, 0.0, 0.0);
        let outgoing = FourVector::new(1.99, 0.1, 0.0, 0.0);

        let report = auditor.compare(incoming, outgoing, ProcessId(12));

        assert!(!report.is_conserved());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].component, Component::Energy);
        assert!((report.violations[0].difference - 0.01).abs() < 1e-12);
        assert_eq!(report.id_process, ProcessId(12));
    }

    #[test]
    fn test_silent_within_tolerance() {
        let auditor = ConservationAuditor::default();
        let incoming = FourVector::new(2.0, 0.3, -0.2, 0.1);
        let outgoing = FourVector::new(2.0 + 1e-9, 0.3, -0.2, 0.1 - 1e-9);

        assert!(auditor.compare(incoming, outgoing, ProcessId(1)).is_conserved());
    }

    #[test]
    fn test_names_each_momentum_component() {
        let report = ConservationAuditor::default().compare(
            FourVector::new(1.0, 1.0, 1.0, 1.0),
            FourVector::zeros(),
            ProcessId(3),
        );
        let components: Vec<Component> = report.violations.iter().map(|v| v.component).collect();

        assert_eq!(components, Component::ALL.to_vec());
        assert_eq!(Component::Py.to_string(), "py");
    }

    #[test]
    fn test_unresolved_action_reports_full_momentum() {
        let p = snapshot(1, pion(), FourVector::new(0.5, 0.0, 0.0, 0.0), ProcessId(0));
        let action = Action::new(vec![p], 0.0, ActionKind::Decay).unwrap();

        let report = ConservationAuditor::default().check(&action, ProcessId(0));

        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.momentum_difference.x0(), 0.5);
    }
}
