//! Coexistence curve types.

use fh_model::{FloryHuggins, PhasePair};
use fh_solver::Termination;
use std::fmt;

/// One retained point of a coexistence curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoexistencePoint {
    /// Temperature in Kelvin
    pub temperature: f64,
    pub chi: f64,
    pub phases: PhasePair,
}

impl CoexistencePoint {
    pub fn phi1(&self) -> f64 {
        self.phases.phi1
    }

    pub fn phi2(&self) -> f64 {
        self.phases.phi2
    }
}

/// Why a grid point was dropped from the curve.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The solver rejected the input outright
    Solver(String),
    /// The solver ran but did not reach tolerance
    NotConverged {
        termination: Termination,
        residual: f64,
    },
    /// The solver reported NaN or infinite fractions
    NonFinite,
    /// Converged, but the two phases are closer than the threshold
    NearCritical { gap: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Solver(msg) => write!(f, "solver error: {msg}"),
            SkipReason::NotConverged {
                termination,
                residual,
            } => write!(f, "not converged ({termination}, residual {residual:.3e})"),
            SkipReason::NonFinite => write!(f, "non-finite result"),
            SkipReason::NearCritical { gap } => write!(f, "near critical (gap {gap:.3e})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    /// Position in the input sequence
    pub index: usize,
    pub temperature: f64,
    pub chi: f64,
    pub reason: SkipReason,
}

/// Filtered coexistence curve, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoexistenceCurve {
    pub points: Vec<CoexistencePoint>,
    pub skipped: Vec<SkippedPoint>,
}

impl CoexistenceCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn phi1s(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.phi1()).collect()
    }

    pub fn phi2s(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.phi2()).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.temperature).collect()
    }

    pub fn chi_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.chi).collect()
    }

    /// `(phi1s, phi2s, temperatures, chi_values)`, all of the same length.
    pub fn into_arrays(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.points.len();
        let mut phi1s = Vec::with_capacity(n);
        let mut phi2s = Vec::with_capacity(n);
        let mut temps = Vec::with_capacity(n);
        let mut chis = Vec::with_capacity(n);
        for p in self.points {
            phi1s.push(p.phases.phi1);
            phi2s.push(p.phases.phi2);
            temps.push(p.temperature);
            chis.push(p.chi);
        }
        (phi1s, phi2s, temps, chis)
    }

    /// Outline for a closed phase diagram: the phi1 branch in input order
    /// followed by the phi2 branch reversed.
    pub fn closed_loop(&self) -> (Vec<f64>, Vec<f64>) {
        let mut phis = self.phi1s();
        let mut temps = self.temperatures();
        phis.extend(self.points.iter().rev().map(|p| p.phi2()));
        temps.extend(self.points.iter().rev().map(|p| p.temperature));
        (phis, temps)
    }

    /// Both branches converted to mass concentrations with `model`'s density.
    pub fn to_concentrations(&self, model: &FloryHuggins) -> (Vec<f64>, Vec<f64>) {
        let c1 = self
            .points
            .iter()
            .map(|p| model.volume_fraction_to_concentration(p.phi1()))
            .collect();
        let c2 = self
            .points
            .iter()
            .map(|p| model.volume_fraction_to_concentration(p.phi2()))
            .collect();
        (c1, c2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> CoexistenceCurve {
        CoexistenceCurve {
            points: vec![
                CoexistencePoint {
                    temperature: 280.0,
                    chi: 2.2,
                    phases: PhasePair::new(0.1, 0.9),
                },
                CoexistencePoint {
                    temperature: 290.0,
                    chi: 2.1,
                    phases: PhasePair::new(0.2, 0.8),
                },
            ],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn closed_loop_walks_out_and_back() {
        let (phis, temps) = curve().closed_loop();
        assert_eq!(phis, vec![0.1, 0.2, 0.8, 0.9]);
        assert_eq!(temps, vec![280.0, 290.0, 290.0, 280.0]);
    }

    #[test]
    fn arrays_stay_aligned() {
        let (p1, p2, t, c) = curve().into_arrays();
        assert_eq!(p1, vec![0.1, 0.2]);
        assert_eq!(p2, vec![0.9, 0.8]);
        assert_eq!(t, vec![280.0, 290.0]);
        assert_eq!(c, vec![2.2, 2.1]);
    }

    #[test]
    fn concentrations_use_density() {
        let model = FloryHuggins::new(1.0, 1.0, 1000.0).unwrap();
        let (c1, c2) = curve().to_concentrations(&model);
        assert!((c1[0] - 100.0).abs() < 1e-9);
        assert!((c2[1] - 800.0).abs() < 1e-9);
    }

    #[test]
    fn empty_curve() {
        let c = CoexistenceCurve::default();
        assert!(c.is_empty());
        assert_eq!(c.closed_loop(), (vec![], vec![]));
    }
}
