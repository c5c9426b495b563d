//! Error types for solver operations.

use fh_core::error::FhError;
use fh_model::ModelError;
use thiserror::Error;

/// Errors that can occur while setting up or running a root solve.
///
/// Running out of iterations is not an error: it is reported through
/// [`crate::RootResult::converged`] so callers can decide to retry or skip.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid initial guess: {what}")]
    InvalidGuess { what: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for FhError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidGuess { what: _ } => FhError::InvalidArg {
                what: "initial guess",
            },
            SolverError::DimensionMismatch { .. } => FhError::InvalidArg { what: "dimension" },
            SolverError::ConvergenceFailed { what: _ } => FhError::Invariant {
                what: "convergence",
            },
            SolverError::Model(err) => err.into(),
            SolverError::Numeric { what: _ } => FhError::Invariant { what: "numeric" },
        }
    }
}
