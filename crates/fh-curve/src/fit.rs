//! Least-squares fit of chi against inverse temperature.
//!
//! Fits `chi = dH * (1/T) + dS`. With weights (typically `1/sigma²` from the
//! propagated chi errors) the fit is weighted; in both cases the parameter
//! covariance is scaled by the reduced chi-square, so the standard errors
//! reflect the observed scatter.

use crate::error::{CurveError, CurveResult};
use crate::relation::ChiRelation;
use tracing::info;

/// Fitted relation with parameter uncertainties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiFit {
    pub relation: ChiRelation,
    /// Standard error of dH; `None` with only two points
    pub dh_stderr: Option<f64>,
    /// Standard error of dS; `None` with only two points
    pub ds_stderr: Option<f64>,
    /// Coefficient of determination (weighted when weights are given)
    pub r_squared: f64,
    pub n_points: usize,
}

/// Fit `chi` against `1/T`.
///
/// `weights`, when given, must be positive and aligned with the data.
pub fn fit_chi_relation(
    temperatures_k: &[f64],
    chis: &[f64],
    weights: Option<&[f64]>,
) -> CurveResult<ChiFit> {
    let n = temperatures_k.len();
    if chis.len() != n {
        return Err(CurveError::LengthMismatch {
            temperatures: n,
            chis: chis.len(),
        });
    }
    if n < 2 {
        return Err(CurveError::Fit {
            what: format!("need at least 2 points, got {n}"),
        });
    }
    if let Some(w) = weights {
        if w.len() != n {
            return Err(CurveError::Fit {
                what: format!("{} weights for {n} points", w.len()),
            });
        }
        if w.iter().any(|&wi| !(wi.is_finite() && wi > 0.0)) {
            return Err(CurveError::Fit {
                what: "weights must be positive and finite".to_string(),
            });
        }
    }
    if temperatures_k.iter().any(|&t| !(t.is_finite() && t > 0.0)) {
        return Err(CurveError::Fit {
            what: "temperatures must be positive and finite".to_string(),
        });
    }
    if chis.iter().any(|c| !c.is_finite()) {
        return Err(CurveError::Fit {
            what: "chi values must be finite".to_string(),
        });
    }

    let weight = |i: usize| weights.map_or(1.0, |w| w[i]);
    let xs: Vec<f64> = temperatures_k.iter().map(|t| 1.0 / t).collect();

    let (mut s, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for i in 0..n {
        let (w, x, y) = (weight(i), xs[i], chis[i]);
        s += w;
        sx += w * x;
        sy += w * y;
        sxx += w * x * x;
        sxy += w * x * y;
    }

    let delta = s * sxx - sx * sx;
    if !(delta.abs() > f64::EPSILON * s * sxx) {
        return Err(CurveError::Fit {
            what: "all points share one temperature".to_string(),
        });
    }

    let dh = (s * sxy - sx * sy) / delta;
    let ds = (sxx * sy - sx * sxy) / delta;

    let y_mean = sy / s;
    let (mut ss_res, mut ss_tot) = (0.0, 0.0);
    for i in 0..n {
        let w = weight(i);
        let r = chis[i] - (dh * xs[i] + ds);
        ss_res += w * r * r;
        ss_tot += w * (chis[i] - y_mean).powi(2);
    }

    let (dh_stderr, ds_stderr) = if n > 2 {
        let reduced = ss_res / (n - 2) as f64;
        (
            Some((reduced * s / delta).sqrt()),
            Some((reduced * sxx / delta).sqrt()),
        )
    } else {
        (None, None)
    };

    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    let fit = ChiFit {
        relation: ChiRelation::new(dh, ds),
        dh_stderr,
        ds_stderr,
        r_squared,
        n_points: n,
    };
    info!(
        dh,
        ds,
        dh_stderr = ?fit.dh_stderr,
        ds_stderr = ?fit.ds_stderr,
        r_squared,
        n_points = n,
        "fitted chi against 1/T"
    );
    Ok(fit)
}
