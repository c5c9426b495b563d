//! Free-energy model errors.

use fh_core::FhError;
use thiserror::Error;

/// Result type for model evaluations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while evaluating the Flory-Huggins model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Lattice sizes and density must be positive and finite.
    #[error("Invalid model parameter {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    /// Volume fraction outside the open interval (0, 1).
    #[error("Volume fraction {what} = {value} is outside (0, 1)")]
    OutOfDomain { what: &'static str, value: f64 },

    /// Coinciding phases (division by zero in a closed-form rearrangement).
    #[error("Degenerate input: {what}")]
    Degenerate { what: &'static str },

    /// Evaluation produced NaN or infinity.
    #[error("Non-finite result for {what}")]
    NonFinite { what: &'static str },
}

impl From<FhError> for ModelError {
    fn from(err: FhError) -> Self {
        match err {
            FhError::OutOfDomain { what, value } => ModelError::OutOfDomain { what, value },
            FhError::NonFinite { what, .. } => ModelError::NonFinite { what },
            FhError::InvalidArg { what } | FhError::Invariant { what } => {
                ModelError::Degenerate { what }
            }
        }
    }
}

impl From<ModelError> for FhError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidParameter { what, .. } => FhError::InvalidArg { what },
            ModelError::OutOfDomain { what, value } => FhError::OutOfDomain { what, value },
            ModelError::Degenerate { what } => FhError::Invariant { what },
            ModelError::NonFinite { what } => FhError::NonFinite {
                what,
                value: f64::NAN,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::OutOfDomain {
            what: "phi1",
            value: 1.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("phi1"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn error_to_fh_error() {
        let model_err = ModelError::Degenerate {
            what: "phi1 == phi2",
        };
        let fh_err: FhError = model_err.into();
        assert!(matches!(fh_err, FhError::Invariant { .. }));
    }

    #[test]
    fn domain_error_survives_round_trip() {
        let fh_err = FhError::OutOfDomain {
            what: "phi",
            value: -0.1,
        };
        let model_err: ModelError = fh_err.into();
        assert_eq!(
            model_err,
            ModelError::OutOfDomain {
                what: "phi",
                value: -0.1
            }
        );
    }
}
