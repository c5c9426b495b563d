//! Errors raised while building coexistence curves.

use fh_model::ModelError;
use fh_solver::SolverError;
use thiserror::Error;

pub type CurveResult<T> = Result<T, CurveError>;

#[derive(Error, Debug)]
pub enum CurveError {
    #[error("Length mismatch: {temperatures} temperatures vs {chis} chi values")]
    LengthMismatch { temperatures: usize, chis: usize },

    #[error("Invalid threshold {value}: must be finite and non-negative")]
    InvalidThreshold { value: f64 },

    #[error("Invalid temperature grid: {what}")]
    InvalidGrid { what: String },

    #[error("Fit failed: {what}")]
    Fit { what: String },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}
