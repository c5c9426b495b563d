//! Project loading, validation, and introspection.

use std::path::Path;

use fh_model::FloryHuggins;
use fh_project::schema::{DatasetDef, Project};

use crate::error::{AppError, AppResult};

/// Summary of a dataset for listing.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    pub n1: f64,
    pub n2: f64,
    pub file_count: usize,
    pub temp_range_c: [f64; 2],
}

/// Load, migrate and validate a project file (YAML, or JSON by extension).
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(fh_project::load(path)?)
}

/// Check the project and that every dataset describes a usable model.
pub fn validate_project(project: &Project) -> AppResult<()> {
    fh_project::validate_project(project).map_err(fh_project::ProjectError::from)?;
    for dataset in &project.datasets {
        build_model(dataset)?;
    }
    Ok(())
}

pub fn list_datasets(project: &Project) -> Vec<DatasetSummary> {
    project
        .datasets
        .iter()
        .map(|d| DatasetSummary {
            id: d.id.clone(),
            name: d.name.clone(),
            n1: d.model.n1,
            n2: d.model.n2,
            file_count: d.data.len(),
            temp_range_c: d.temp_range_c,
        })
        .collect()
}

pub fn get_dataset<'a>(project: &'a Project, dataset_id: &str) -> AppResult<&'a DatasetDef> {
    project
        .dataset(dataset_id)
        .ok_or_else(|| AppError::DatasetNotFound(dataset_id.to_string()))
}

pub fn build_model(dataset: &DatasetDef) -> AppResult<FloryHuggins> {
    Ok(FloryHuggins::new(
        dataset.model.n1,
        dataset.model.n2,
        dataset.model.rho,
    )?)
}
