//! Free-energy model trait and validation helpers.

use crate::error::ModelResult;
use fh_core::Real;

/// Trait for binary free-energy-of-mixing models.
///
/// Implementations must be thread-safe (Send + Sync) so that independent
/// temperature points can be solved in parallel against one shared model.
/// Every method validates that `phi` lies in (0, 1) and returns
/// [`crate::ModelError::OutOfDomain`] otherwise; no method ever returns NaN.
pub trait FreeEnergyModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Free energy of mixing per lattice site at volume fraction `phi`.
    fn free_energy(&self, phi: Real, chi: Real) -> ModelResult<Real>;

    /// First derivative of the free energy with respect to `phi`.
    fn free_energy_derivative(&self, phi: Real, chi: Real) -> ModelResult<Real>;

    /// Second derivative of the free energy with respect to `phi`.
    ///
    /// The spinodal is where this vanishes.
    fn free_energy_second_derivative(&self, phi: Real, chi: Real) -> ModelResult<Real>;

    /// True when the homogeneous mixture at `phi` is locally unstable.
    fn is_unstable(&self, phi: Real, chi: Real) -> ModelResult<bool> {
        Ok(self.free_energy_second_derivative(phi, chi)? < 0.0)
    }

    /// Interaction parameter at the upper critical point, if known in closed form.
    ///
    /// At or below it the mixture is homogeneous at every composition.
    fn critical_chi(&self) -> Option<Real> {
        None
    }
}

/// Validation helpers for model inputs and outputs.
pub mod validation {
    use crate::error::{ModelError, ModelResult};
    use fh_core::{Real, ensure_finite, ensure_open_unit_interval};

    pub fn validate_fraction(phi: Real, what: &'static str) -> ModelResult<Real> {
        Ok(ensure_open_unit_interval(phi, what)?)
    }

    pub fn validate_positive(value: Real, what: &'static str) -> ModelResult<Real> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(ModelError::InvalidParameter { what, value })
        }
    }

    pub fn validate_output(value: Real, what: &'static str) -> ModelResult<Real> {
        Ok(ensure_finite(value, what)?)
    }
}
