//! Flory-Huggins lattice model of a polymer (protein) / solvent mixture.

use crate::error::{ModelError, ModelResult};
use crate::model::{FreeEnergyModel, validation};
use fh_core::units::Density;
use fh_core::{Real, Tolerances, nearly_equal};
use std::fmt;

/// Default protein density in mg/mL (== kg/m³).
pub const DEFAULT_DENSITY: Real = 1400.0;

/// Flory-Huggins free energy of mixing for a two-component lattice.
///
/// - `n1`: lattice sites occupied by one solute (protein) molecule, i.e. the
///   number of residues
/// - `n2`: lattice sites occupied by one solvent molecule
/// - `rho`: solute density used to turn a mass concentration into a volume
///   fraction (mg/mL, numerically equal to kg/m³)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloryHuggins {
    n1: Real,
    n2: Real,
    rho: Real,
}

/// Critical point of the model: the top (or bottom) of the coexistence curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    pub phi: Real,
    pub chi: Real,
}

impl Default for FloryHuggins {
    fn default() -> Self {
        Self {
            n1: 1.0,
            n2: 1.0,
            rho: DEFAULT_DENSITY,
        }
    }
}

impl FloryHuggins {
    pub fn new(n1: Real, n2: Real, rho: Real) -> ModelResult<Self> {
        Ok(Self {
            n1: validation::validate_positive(n1, "n1")?,
            n2: validation::validate_positive(n2, "n2")?,
            rho: validation::validate_positive(rho, "rho")?,
        })
    }

    /// Create a model from a typed density.
    pub fn with_density(n1: Real, n2: Real, rho: Density) -> ModelResult<Self> {
        Self::new(n1, n2, rho.value)
    }

    pub fn n1(&self) -> Real {
        self.n1
    }

    pub fn n2(&self) -> Real {
        self.n2
    }

    pub fn rho(&self) -> Real {
        self.rho
    }

    /// Interaction parameter consistent with two coexisting volume fractions.
    ///
    /// Closed-form rearrangement of `f'(phi1) = f'(phi2)` for chi, where
    /// `phi1` and `phi2` are the dilute and condensed fractions. Symmetric
    /// under swapping the two phases.
    pub fn interaction_parameter(&self, phi1: Real, phi2: Real) -> ModelResult<Real> {
        let phi1 = validation::validate_fraction(phi1, "phi1")?;
        let phi2 = validation::validate_fraction(phi2, "phi2")?;
        if nearly_equal(phi1, phi2, Tolerances::default()) {
            return Err(ModelError::Degenerate {
                what: "interaction parameter needs phi1 != phi2",
            });
        }

        let chi = self.log_ratio_term(phi1, phi2) / (2.0 * phi2 - 2.0 * phi1);
        validation::validate_output(chi, "interaction parameter")
    }

    /// First-order error of [`Self::interaction_parameter`], partials combined
    /// in quadrature.
    ///
    /// The partial derivative with respect to `phi2` carries `+2 L` in its
    /// numerator, the same sign as the `phi1` partial. This has not been
    /// checked against the analytic derivative and is kept as published.
    pub fn interaction_parameter_error(
        &self,
        phi1: Real,
        dphi1: Real,
        phi2: Real,
        dphi2: Real,
    ) -> ModelResult<Real> {
        let phi1 = validation::validate_fraction(phi1, "phi1")?;
        let phi2 = validation::validate_fraction(phi2, "phi2")?;
        let dphi1 = validation::validate_output(dphi1, "dphi1")?;
        let dphi2 = validation::validate_output(dphi2, "dphi2")?;
        if nearly_equal(phi1, phi2, Tolerances::default()) {
            return Err(ModelError::Degenerate {
                what: "interaction parameter error needs phi1 != phi2",
            });
        }

        let (n1, n2) = (self.n1, self.n2);
        let denom = 2.0 * phi2 - 2.0 * phi1;
        let log_term = self.log_ratio_term(phi1, phi2);

        let d_phi1 = ((-1.0 / (phi1 * n1) - 1.0 / ((1.0 - phi1) * n2)) * denom
            + 2.0 * log_term)
            / denom.powi(2);
        let d_phi2 = ((1.0 / (phi2 * n1) + 1.0 / ((1.0 - phi2) * n2)) * denom
            + 2.0 * log_term)
            / denom.powi(2);

        let err = (d_phi1.powi(2) * dphi1.powi(2) + d_phi2.powi(2) * dphi2.powi(2)).sqrt();
        validation::validate_output(err, "interaction parameter error")
    }

    /// Convert a mass concentration (mg/mL) to a volume fraction.
    pub fn concentration_to_volume_fraction(&self, c: Real) -> Real {
        c / self.rho
    }

    /// Convert a volume fraction to a mass concentration (mg/mL).
    pub fn volume_fraction_to_concentration(&self, phi: Real) -> Real {
        phi * self.rho
    }

    /// Critical point where the two coexisting phases merge.
    pub fn critical_point(&self) -> CriticalPoint {
        let (s1, s2) = (self.n1.sqrt(), self.n2.sqrt());
        CriticalPoint {
            phi: s2 / (s1 + s2),
            chi: 0.5 * (1.0 / s1 + 1.0 / s2).powi(2),
        }
    }

    /// Interaction parameter at which `phi` lies on the spinodal.
    pub fn spinodal_chi(&self, phi: Real) -> ModelResult<Real> {
        let phi = validation::validate_fraction(phi, "phi")?;
        Ok(0.5 * (1.0 / (self.n1 * phi) + 1.0 / (self.n2 * (1.0 - phi))))
    }

    fn log_ratio_term(&self, phi1: Real, phi2: Real) -> Real {
        (phi2 / phi1).ln() / self.n1 + ((1.0 - phi1) / (1.0 - phi2)).ln() / self.n2
    }
}

impl FreeEnergyModel for FloryHuggins {
    fn name(&self) -> &str {
        "Flory-Huggins"
    }

    fn free_energy(&self, phi: Real, chi: Real) -> ModelResult<Real> {
        let phi = validation::validate_fraction(phi, "phi")?;
        let solvent = 1.0 - phi;
        let f = phi / self.n1 * phi.ln() + solvent / self.n2 * solvent.ln() + chi * phi * solvent;
        validation::validate_output(f, "free energy")
    }

    fn free_energy_derivative(&self, phi: Real, chi: Real) -> ModelResult<Real> {
        let phi = validation::validate_fraction(phi, "phi")?;
        let solvent = 1.0 - phi;
        let df = (1.0 + phi.ln()) / self.n1 - (1.0 + solvent.ln()) / self.n2
            + chi * (1.0 - 2.0 * phi);
        validation::validate_output(df, "free energy derivative")
    }

    fn free_energy_second_derivative(&self, phi: Real, chi: Real) -> ModelResult<Real> {
        let phi = validation::validate_fraction(phi, "phi")?;
        let d2f = 1.0 / (self.n1 * phi) + 1.0 / (self.n2 * (1.0 - phi)) - 2.0 * chi;
        validation::validate_output(d2f, "free energy second derivative")
    }

    fn critical_chi(&self) -> Option<Real> {
        Some(self.critical_point().chi)
    }
}

impl fmt::Display for FloryHuggins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flory Huggins model")?;
        writeln!(f, " N1={}", self.n1)?;
        writeln!(f, " N2={}", self.n2)?;
        writeln!(f, " rho={:.1}", self.rho)
    }
}
