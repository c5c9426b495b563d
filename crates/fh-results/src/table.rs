//! Tab-delimited output tables.
//!
//! The coexistence table carries a three-line `# ` header (column names,
//! fit parameters, source file) followed by rows of
//! `T  chi  phi1  phi2  c1  c2` at one decimal for T and three elsewhere.

use crate::{ResultsError, ResultsResult};

const CURVE_COLUMNS: &str = "T\tChi\tphi1\tphi2\tphi1_mgml\tphi2_mgml";
const CHI_COLUMNS: &str = "inv_T\tChi\tChi_err";

/// Fit parameters quoted in the table header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitHeader {
    pub dh: f64,
    pub dh_stderr: Option<f64>,
    pub ds: f64,
    pub ds_stderr: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveRow {
    /// Kelvin
    pub temperature: f64,
    pub chi: f64,
    pub phi1: f64,
    pub phi2: f64,
    /// mg/mL
    pub c1: f64,
    /// mg/mL
    pub c2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurveTable {
    pub fit: FitHeader,
    pub source: String,
    pub rows: Vec<CurveRow>,
}

/// One experimental point on the chi-vs-1/T plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiPointRow {
    pub inv_temperature: f64,
    pub chi: f64,
    pub chi_err: f64,
}

fn stderr_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "nan".to_string(),
    }
}

impl CurveTable {
    pub fn to_text(&self) -> String {
        let mut out = format!("# {CURVE_COLUMNS}\n");
        out.push_str(&format!(
            "# dH = {:.3} +/- {}, dS = {:.3} +/- {}\n",
            self.fit.dh,
            stderr_text(self.fit.dh_stderr),
            self.fit.ds,
            stderr_text(self.fit.ds_stderr)
        ));
        out.push_str(&format!("# fitted from {}\n", self.source));
        for r in &self.rows {
            out.push_str(&format!(
                "{:.1}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\n",
                r.temperature, r.chi, r.phi1, r.phi2, r.c1, r.c2
            ));
        }
        out
    }

    /// Read back a table written by [`Self::to_text`] (values at printed precision).
    pub fn parse(content: &str) -> ResultsResult<Self> {
        let mut fit = None;
        let mut source = None;
        let mut rows = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            if let Some(comment) = raw.strip_prefix('#') {
                let comment = comment.trim();
                if let Some(rest) = comment.strip_prefix("fitted from ") {
                    source = Some(rest.to_string());
                } else if comment.starts_with("dH") {
                    fit = Some(parse_fit_header(comment, line_no)?);
                }
                continue;
            }
            if raw.trim().is_empty() {
                continue;
            }
            let v = parse_numbers(raw, 6, line_no)?;
            rows.push(CurveRow {
                temperature: v[0],
                chi: v[1],
                phi1: v[2],
                phi2: v[3],
                c1: v[4],
                c2: v[5],
            });
        }

        Ok(Self {
            fit: fit.ok_or_else(|| ResultsError::Parse {
                line: 0,
                what: "missing dH/dS header".to_string(),
            })?,
            source: source.unwrap_or_default(),
            rows,
        })
    }
}

pub fn chi_points_to_text(rows: &[ChiPointRow]) -> String {
    let mut out = format!("# {CHI_COLUMNS}\n");
    for r in rows {
        out.push_str(&format!(
            "{:.6e}\t{:.6}\t{:.6}\n",
            r.inv_temperature, r.chi, r.chi_err
        ));
    }
    out
}

pub fn parse_chi_points(content: &str) -> ResultsResult<Vec<ChiPointRow>> {
    let mut rows = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        if raw.starts_with('#') || raw.trim().is_empty() {
            continue;
        }
        let v = parse_numbers(raw, 3, idx + 1)?;
        rows.push(ChiPointRow {
            inv_temperature: v[0],
            chi: v[1],
            chi_err: v[2],
        });
    }
    Ok(rows)
}

fn parse_numbers(line: &str, expected: usize, line_no: usize) -> ResultsResult<Vec<f64>> {
    let values = line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| ResultsError::Parse {
                line: line_no,
                what: format!("not a number: {tok:?}"),
            })
        })
        .collect::<ResultsResult<Vec<f64>>>()?;
    if values.len() != expected {
        return Err(ResultsError::Parse {
            line: line_no,
            what: format!("expected {expected} columns, found {}", values.len()),
        });
    }
    Ok(values)
}

/// `dH = a +/- b, dS = c +/- d`
fn parse_fit_header(text: &str, line_no: usize) -> ResultsResult<FitHeader> {
    let bad = || ResultsError::Parse {
        line: line_no,
        what: format!("malformed fit header: {text:?}"),
    };
    let num = |s: &str| s.trim().parse::<f64>().map_err(|_| bad());
    let stderr = |s: &str| -> ResultsResult<Option<f64>> {
        let v = num(s)?;
        Ok(if v.is_nan() { None } else { Some(v) })
    };

    let (dh_part, ds_part) = text.split_once(',').ok_or_else(bad)?;
    let dh_part = dh_part.trim().strip_prefix("dH =").ok_or_else(bad)?;
    let ds_part = ds_part.trim().strip_prefix("dS =").ok_or_else(bad)?;
    let (dh, dh_err) = dh_part.split_once("+/-").ok_or_else(bad)?;
    let (ds, ds_err) = ds_part.split_once("+/-").ok_or_else(bad)?;

    Ok(FitHeader {
        dh: num(dh)?,
        dh_stderr: stderr(dh_err)?,
        ds: num(ds)?,
        ds_stderr: stderr(ds_err)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CurveTable {
        CurveTable {
            fit: FitHeader {
                dh: 612.3456,
                dh_stderr: Some(12.5),
                ds: -0.0412,
                ds_stderr: None,
            },
            source: "data/lys.txt".to_string(),
            rows: vec![CurveRow {
                temperature: 273.15,
                chi: 2.2,
                phi1: 0.0123,
                phi2: 0.6,
                c1: 17.22,
                c2: 840.0,
            }],
        }
    }

    #[test]
    fn header_and_row_layout() {
        let text = table().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# T\tChi\tphi1\tphi2\tphi1_mgml\tphi2_mgml");
        assert_eq!(lines[1], "# dH = 612.346 +/- 12.500, dS = -0.041 +/- nan");
        assert_eq!(lines[2], "# fitted from data/lys.txt");
        assert_eq!(lines[3], "273.1\t2.200\t0.012\t0.600\t17.220\t840.000");
    }

    #[test]
    fn parse_reads_printed_values() {
        let parsed = CurveTable::parse(&table().to_text()).unwrap();
        assert_eq!(parsed.source, "data/lys.txt");
        assert_eq!(parsed.fit.dh, 612.346);
        assert_eq!(parsed.fit.dh_stderr, Some(12.5));
        assert_eq!(parsed.fit.ds_stderr, None);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].phi2, 0.6);
    }

    #[test]
    fn every_line_is_terminated() {
        let rows = [ChiPointRow {
            inv_temperature: 1.0 / 300.0,
            chi: 2.0,
            chi_err: 0.05,
        }];
        let chi_text = chi_points_to_text(&rows);
        assert_eq!(chi_text, "# inv_T\tChi\tChi_err\n3.333333e-3\t2.000000\t0.050000\n");

        let curve_text = table().to_text();
        assert!(curve_text.ends_with("840.000\n"));
        assert_eq!(curve_text.matches('\n').count(), 4);
    }

    #[test]
    fn parse_without_fit_header_fails() {
        assert!(CurveTable::parse("273.1\t2.2\t0.1\t0.9\t1\t2\n").is_err());
    }

    #[test]
    fn chi_points_survive_a_write() {
        let rows = vec![ChiPointRow {
            inv_temperature: 1.0 / 300.0,
            chi: 2.0,
            chi_err: 0.05,
        }];
        let parsed = parse_chi_points(&chi_points_to_text(&rows)).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!((parsed[0].inv_temperature - 1.0 / 300.0).abs() < 1e-8);
        assert_eq!(parsed[0].chi_err, 0.05);
    }
}
