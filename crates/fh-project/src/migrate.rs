//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files predate per-dataset ids; derive them from the names.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    for (idx, dataset) in project.datasets.iter_mut().enumerate() {
        if dataset.id.trim().is_empty() {
            let slug: String = dataset
                .name
                .to_ascii_lowercase()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            dataset.id = if slug.is_empty() {
                format!("dataset_{idx}")
            } else {
                slug
            };
        }
    }
    project.version = 1;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v0_gets_ids_from_names() {
        let yaml = r#"
version: 0
name: old
datasets:
  - name: Lysozyme pH 4.5
    model: { n1: 10, n2: 1 }
    initial_guess: [0.01, 0.6]
    temp_range_c: [0.0, 30.0]
    data: [a.txt]
    outpath: out
"#;
        let project: Project = serde_yaml::from_str(yaml).unwrap();
        let migrated = migrate_to_latest(project).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.datasets[0].id, "lysozyme_ph_4_5");
    }
}
