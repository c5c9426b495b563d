//! Linear dependence of the interaction parameter on inverse temperature.

use crate::error::{CurveError, CurveResult};
use fh_core::units::Temperature;
use std::fmt;

/// `chi(T) = dH / T + dS`, with `T` in Kelvin.
///
/// `dH` is enthalpy-like (in Kelvin) and `dS` entropy-like (dimensionless).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiRelation {
    pub dh: f64,
    pub ds: f64,
}

impl ChiRelation {
    pub fn new(dh: f64, ds: f64) -> Self {
        Self { dh, ds }
    }

    /// Interaction parameter at `temperature_k`.
    pub fn chi(&self, temperature_k: f64) -> f64 {
        self.dh / temperature_k + self.ds
    }

    pub fn chi_at(&self, temperature: Temperature) -> f64 {
        self.chi(temperature.value)
    }

    /// Temperature at which the relation yields `chi` (inverse of [`Self::chi`]).
    pub fn temperature_for(&self, chi: f64) -> CurveResult<f64> {
        let t = self.dh / (chi - self.ds);
        if t.is_finite() && t > 0.0 {
            Ok(t)
        } else {
            Err(CurveError::Fit {
                what: format!("no positive temperature gives chi={chi} for {self}"),
            })
        }
    }

    /// Evaluate the relation on a temperature grid.
    pub fn evaluate(&self, temperatures_k: &[f64]) -> Vec<f64> {
        temperatures_k.iter().map(|&t| self.chi(t)).collect()
    }
}

impl fmt::Display for ChiRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chi(T) = {:.3}/T + {:.3}", self.dh, self.ds)
    }
}
