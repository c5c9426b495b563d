//! Output directory for one dataset.

use crate::table::{ChiPointRow, CurveTable, chi_points_to_text, parse_chi_points};
use crate::types::RunSummary;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Files are keyed by the stem of the experimental file they came from.
#[derive(Clone)]
pub struct ResultStore {
    root_dir: PathBuf,
}

impl ResultStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn curve_path(&self, stem: &str) -> PathBuf {
        self.root_dir.join(format!("coexistence_curves_{stem}.txt"))
    }

    pub fn chi_points_path(&self, stem: &str) -> PathBuf {
        self.root_dir.join(format!("chi_points_{stem}.txt"))
    }

    pub fn summary_path(&self, stem: &str) -> PathBuf {
        self.root_dir.join(format!("summary_{stem}.json"))
    }

    pub fn save_curve(&self, stem: &str, table: &CurveTable) -> ResultsResult<PathBuf> {
        let path = self.curve_path(stem);
        fs::write(&path, table.to_text())?;
        Ok(path)
    }

    pub fn save_chi_points(&self, stem: &str, rows: &[ChiPointRow]) -> ResultsResult<PathBuf> {
        let path = self.chi_points_path(stem);
        fs::write(&path, chi_points_to_text(rows))?;
        Ok(path)
    }

    pub fn save_summary(&self, stem: &str, summary: &RunSummary) -> ResultsResult<PathBuf> {
        let path = self.summary_path(stem);
        fs::write(&path, serde_json::to_string_pretty(summary)?)?;
        Ok(path)
    }

    pub fn load_curve(&self, stem: &str) -> ResultsResult<CurveTable> {
        CurveTable::parse(&read_existing(&self.curve_path(stem))?)
    }

    pub fn load_chi_points(&self, stem: &str) -> ResultsResult<Vec<ChiPointRow>> {
        parse_chi_points(&read_existing(&self.chi_points_path(stem))?)
    }

    pub fn load_summary(&self, stem: &str) -> ResultsResult<RunSummary> {
        let content = read_existing(&self.summary_path(stem))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Stems of every summary in the directory, sorted.
    pub fn list_runs(&self) -> ResultsResult<Vec<String>> {
        let mut stems = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if let Some(stem) = name
                .strip_prefix("summary_")
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                stems.push(stem.to_string());
            }
        }
        stems.sort();
        Ok(stems)
    }
}

fn read_existing(path: &Path) -> ResultsResult<String> {
    if !path.exists() {
        return Err(ResultsError::NotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}
