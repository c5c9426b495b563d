//! Result data types.

use serde::{Deserialize, Serialize};

/// JSON summary written next to each coexistence table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub dataset_id: String,
    /// Experimental file the fit came from
    pub source: String,
    pub timestamp: String,
    pub model: ModelSummary,
    pub fit: FitSummary,
    pub curve: CurveSummary,
    pub solver: String,
    pub guess_strategy: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelSummary {
    pub n1: f64,
    pub n2: f64,
    pub rho: f64,
    pub critical_phi: f64,
    pub critical_chi: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FitSummary {
    pub dh: f64,
    pub dh_stderr: Option<f64>,
    pub ds: f64,
    pub ds_stderr: Option<f64>,
    pub r_squared: f64,
    pub n_points: usize,
    pub weighted: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveSummary {
    pub grid_points: usize,
    pub retained: usize,
    pub skipped: usize,
    pub threshold: f64,
}
