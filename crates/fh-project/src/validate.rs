//! Project validation logic.

use crate::schema::{DatasetDef, Project};
use fh_core::numeric::in_open_unit_interval;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing data: {what}")]
    MissingData { what: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut dataset_ids = HashSet::new();
    for dataset in &project.datasets {
        if dataset.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "datasets.id".to_string(),
                value: format!("{:?}", dataset.id),
                reason: format!("dataset '{}' needs an id", dataset.name),
            });
        }
        if !dataset_ids.insert(&dataset.id) {
            return Err(ValidationError::DuplicateId {
                id: dataset.id.clone(),
                context: "datasets".to_string(),
            });
        }
        validate_dataset(dataset)?;
    }
    Ok(())
}

fn validate_dataset(dataset: &DatasetDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("{}.{}", dataset.id, name);

    positive(&field("model.n1"), dataset.model.n1)?;
    positive(&field("model.n2"), dataset.model.n2)?;
    positive(&field("model.rho"), dataset.model.rho)?;

    let [g1, g2] = dataset.initial_guess;
    if !in_open_unit_interval(g1) || !in_open_unit_interval(g2) || g1 == g2 {
        return Err(ValidationError::InvalidValue {
            field: field("initial_guess"),
            value: format!("[{g1}, {g2}]"),
            reason: "must be two distinct fractions in (0, 1)".to_string(),
        });
    }

    let [lower, upper] = dataset.temp_range_c;
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(ValidationError::InvalidValue {
            field: field("temp_range_c"),
            value: format!("[{lower}, {upper}]"),
            reason: "lower bound must be below upper bound".to_string(),
        });
    }
    if lower <= -fh_core::units::CELSIUS_OFFSET_K {
        return Err(ValidationError::InvalidValue {
            field: field("temp_range_c"),
            value: format!("[{lower}, {upper}]"),
            reason: "must stay above absolute zero".to_string(),
        });
    }

    positive(&field("temp_step_c"), dataset.temp_step_c)?;

    if !(dataset.threshold.is_finite() && dataset.threshold >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: field("threshold"),
            value: dataset.threshold.to_string(),
            reason: "must be non-negative".to_string(),
        });
    }

    if dataset.data.is_empty() {
        return Err(ValidationError::MissingData {
            what: format!("dataset {} lists no data files", dataset.id),
        });
    }

    if let Some(solver) = &dataset.solver {
        if solver.max_iterations == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: field("solver.max_iterations"),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(tol) = solver.abs_tol {
            positive(&field("solver.abs_tol"), tol)?;
        }
    }

    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive".to_string(),
        })
    }
}
