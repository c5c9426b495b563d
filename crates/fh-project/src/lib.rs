//! fh-project: YAML project files describing coexistence fitting jobs.
//!
//! A project lists datasets; each names a Flory-Huggins model, the
//! experimental binodal tables to fit and the temperature window to sweep.
//! Files are migrated to [`LATEST_VERSION`] and validated on load.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Yaml,
    Json,
}

impl ProjectFormat {
    /// `.json` is JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ProjectFormat::Json,
            _ => ProjectFormat::Yaml,
        }
    }
}

/// Parse, migrate and validate project text.
pub fn parse_project(content: &str, format: ProjectFormat) -> ProjectResult<Project> {
    let project: Project = match format {
        ProjectFormat::Yaml => serde_yaml::from_str(content)?,
        ProjectFormat::Json => serde_json::from_str(content)?,
    };
    let project = migrate_to_latest(project)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn render_project(project: &Project, format: ProjectFormat) -> ProjectResult<String> {
    validate_project(project)?;
    Ok(match format {
        ProjectFormat::Yaml => serde_yaml::to_string(project)?,
        ProjectFormat::Json => serde_json::to_string_pretty(project)?,
    })
}

/// Load a project, choosing the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<Project> {
    parse_project(&std::fs::read_to_string(path)?, ProjectFormat::from_path(path))
}

pub fn load_yaml(path: &Path) -> ProjectResult<Project> {
    parse_project(&std::fs::read_to_string(path)?, ProjectFormat::Yaml)
}

pub fn save_yaml(path: &Path, project: &Project) -> ProjectResult<()> {
    std::fs::write(path, render_project(project, ProjectFormat::Yaml)?)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Project> {
    parse_project(&std::fs::read_to_string(path)?, ProjectFormat::Json)
}

pub fn save_json(path: &Path, project: &Project) -> ProjectResult<()> {
    std::fs::write(path, render_project(project, ProjectFormat::Json)?)?;
    Ok(())
}

/// Directory that relative dataset paths are resolved against.
pub fn project_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
