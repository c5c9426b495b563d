//! Project schema definitions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub datasets: Vec<DatasetDef>,
}

/// One fitting job: a model, the experimental files and the sweep window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetDef {
    /// Missing in version 0 files; filled in by migration
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub model: ModelDef,
    /// Starting pair `[phi1, phi2]` for the common-tangent solves
    pub initial_guess: [f64; 2],
    /// Sweep window `[lower, upper)` in degrees Celsius
    pub temp_range_c: [f64; 2],
    #[serde(default = "default_temp_step_c")]
    pub temp_step_c: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Experimental tables, relative to the project file
    pub data: Vec<String>,
    /// Output directory, relative to the project file
    pub outpath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
    #[serde(default)]
    pub guess_strategy: GuessStrategyDef,
    #[serde(default)]
    pub weighted_fit: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    pub n1: f64,
    pub n2: f64,
    /// Density in kg/m³ (numerically mg/mL)
    #[serde(default = "default_rho")]
    pub rho: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SolverDef {
    #[serde(default)]
    pub method: SolverMethodDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_tol: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethodDef {
    #[default]
    LevenbergMarquardt,
    Newton,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GuessStrategyDef {
    #[default]
    Fixed,
    Continuation,
}

fn default_temp_step_c() -> f64 {
    0.2
}

fn default_threshold() -> f64 {
    1e-5
}

fn default_rho() -> f64 {
    1400.0
}

impl Project {
    pub fn dataset(&self, id: &str) -> Option<&DatasetDef> {
        self.datasets.iter().find(|d| d.id == id)
    }
}

impl DatasetDef {
    /// Data files resolved against `base` (the project file's directory).
    pub fn data_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.data.iter().map(|p| base.join(p)).collect()
    }

    pub fn output_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.outpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_keys() {
        let yaml = r#"
version: 1
name: demo
datasets:
  - id: lys
    name: Lysozyme
    model: { n1: 10, n2: 1 }
    initial_guess: [0.01, 0.6]
    temp_range_c: [0.0, 30.0]
    data: [data/lys.txt]
    outpath: out
"#;
        let project: Project = serde_yaml::from_str(yaml).unwrap();
        let d = &project.datasets[0];
        assert_eq!(d.temp_step_c, 0.2);
        assert_eq!(d.threshold, 1e-5);
        assert_eq!(d.model.rho, 1400.0);
        assert_eq!(d.solver, None);
        assert_eq!(d.guess_strategy, GuessStrategyDef::Fixed);
        assert!(!d.weighted_fit);
        assert!(project.dataset("lys").is_some());
        assert!(project.dataset("nope").is_none());
        assert_eq!(
            d.data_paths(Path::new("/proj")),
            vec![PathBuf::from("/proj/data/lys.txt")]
        );
        assert_eq!(d.output_dir(Path::new("/proj")), PathBuf::from("/proj/out"));
    }

    #[test]
    fn solver_section_parses_snake_case() {
        let yaml = "method: newton\nmax_iterations: 50\n";
        let solver: SolverDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(solver.method, SolverMethodDef::Newton);
        assert_eq!(solver.max_iterations, Some(50));
        assert_eq!(solver.abs_tol, None);
    }
}
