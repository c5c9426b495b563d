//! Error types for the fh-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// behind one interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read data file: {path}")]
    DataFileRead {
        path: PathBuf,
        source: fh_results::ResultsError,
    },

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Curve error: {0}")]
    Curve(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fh-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<fh_project::ProjectError> for AppError {
    fn from(err: fh_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<fh_model::ModelError> for AppError {
    fn from(err: fh_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<fh_solver::SolverError> for AppError {
    fn from(err: fh_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<fh_curve::CurveError> for AppError {
    fn from(err: fh_curve::CurveError) -> Self {
        AppError::Curve(err.to_string())
    }
}

impl From<fh_results::ResultsError> for AppError {
    fn from(err: fh_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
