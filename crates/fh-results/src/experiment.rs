//! Experimental binodal tables.
//!
//! Whitespace-separated columns, `#` starts a comment (whole-line or
//! trailing). Each row holds at least five numbers:
//! temperature (°C), dilute concentration and its error, dense
//! concentration and its error. Extra columns are ignored.

use crate::{ResultsError, ResultsResult};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentRow {
    pub temperature_c: f64,
    pub c1: f64,
    pub c1_err: f64,
    pub c2: f64,
    pub c2_err: f64,
}

pub fn read_experiment(path: &Path) -> ResultsResult<Vec<ExperimentRow>> {
    let content = std::fs::read_to_string(path)?;
    parse_experiment(&content)
}

pub fn parse_experiment(content: &str) -> ResultsResult<Vec<ExperimentRow>> {
    let mut rows = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        if line.trim().is_empty() {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| ResultsError::Parse {
                    line: line_no,
                    what: format!("not a number: {tok:?}"),
                })
            })
            .collect::<ResultsResult<Vec<f64>>>()?;

        if values.len() < 5 {
            return Err(ResultsError::Parse {
                line: line_no,
                what: format!("expected 5 columns, found {}", values.len()),
            });
        }
        rows.push(ExperimentRow {
            temperature_c: values[0],
            c1: values[1],
            c1_err: values[2],
            c2: values[3],
            c2_err: values[4],
        });
    }
    Ok(rows)
}
