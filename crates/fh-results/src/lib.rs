//! fh-results: experimental input tables and persisted fit/curve outputs.

pub mod experiment;
pub mod store;
pub mod table;
pub mod types;

pub use experiment::{ExperimentRow, parse_experiment, read_experiment};
pub use store::ResultStore;
pub use table::{ChiPointRow, CurveRow, CurveTable, FitHeader};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {what}")]
    Parse { line: usize, what: String },

    #[error("Result not found: {path}")]
    NotFound { path: String },
}
