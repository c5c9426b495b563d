//! Application service layer for Flory-Huggins coexistence fitting.
//!
//! Shared by the CLI: project loading and validation, the per-file
//! fit-sweep-persist pipeline, and single-curve generation.

pub mod error;
pub mod project_service;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use project_service::{
    DatasetSummary, build_model, get_dataset, list_datasets, load_project, validate_project,
};
pub use run_service::{
    CurveRequest, DatasetRunResponse, FileRunResponse, FitOutcome, curve_table, fit_experiment,
    fit_header, generate_curve, guess_strategy, run_dataset, run_project, solver_method,
};
