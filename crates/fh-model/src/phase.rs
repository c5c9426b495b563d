//! Pairs of coexisting volume fractions.

use fh_core::Real;
use std::fmt;

/// Ordered pair of volume fractions `(phi1, phi2)`.
///
/// Used both as a solver guess and as a solver result. By convention `phi1`
/// is the dilute phase and `phi2` the condensed phase, but nothing enforces
/// the ordering: the solver reports whatever order it converged to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasePair {
    pub phi1: Real,
    pub phi2: Real,
}

impl PhasePair {
    pub fn new(phi1: Real, phi2: Real) -> Self {
        Self { phi1, phi2 }
    }

    /// Smaller of the two fractions.
    pub fn dilute(&self) -> Real {
        self.phi1.min(self.phi2)
    }

    /// Larger of the two fractions.
    pub fn dense(&self) -> Real {
        self.phi1.max(self.phi2)
    }

    /// Composition gap `|phi1 - phi2|`; zero at the critical point.
    pub fn gap(&self) -> Real {
        (self.phi1 - self.phi2).abs()
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.phi2, self.phi1)
    }

    pub fn as_array(&self) -> [Real; 2] {
        [self.phi1, self.phi2]
    }
}

impl From<[Real; 2]> for PhasePair {
    fn from(p: [Real; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl fmt::Display for PhasePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(phi1={:.6}, phi2={:.6})", self.phi1, self.phi2)
    }
}
