//! Temperature grids for coexistence sweeps.
//!
//! All grids are produced in Kelvin. `from_celsius_range` mirrors the usual
//! "arange over a Celsius window, then shift to Kelvin" construction: the
//! upper bound is exclusive.

use crate::error::{CurveError, CurveResult};
use fh_core::units::celsius_to_kelvin;
use std::fmt;

const STEP_COUNT_SLACK: f64 = 1e-9;

/// How points are placed between the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridSpacing {
    /// Fixed increment from the start, end excluded
    Step(f64),
    /// Uniformly spaced points, both ends included
    Linear(usize),
    /// Uniform in 1/T, both ends included (uniform in chi for a linear fit)
    InverseTemperature(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureGrid {
    /// Start temperature in Kelvin
    pub start_k: f64,
    /// End temperature in Kelvin
    pub end_k: f64,
    pub spacing: GridSpacing,
}

impl TemperatureGrid {
    /// `arange(lower_c, upper_c, step_c) + 273.15`.
    pub fn from_celsius_range(lower_c: f64, upper_c: f64, step_c: f64) -> CurveResult<Self> {
        if !(step_c.is_finite() && step_c > 0.0) {
            return Err(CurveError::InvalidGrid {
                what: format!("step must be positive, got {step_c}"),
            });
        }
        let grid = Self {
            start_k: celsius_to_kelvin(lower_c),
            end_k: celsius_to_kelvin(upper_c),
            spacing: GridSpacing::Step(step_c),
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn linear(start_k: f64, end_k: f64, num_points: usize) -> CurveResult<Self> {
        let grid = Self {
            start_k,
            end_k,
            spacing: GridSpacing::Linear(num_points),
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn uniform_in_inverse_temperature(
        start_k: f64,
        end_k: f64,
        num_points: usize,
    ) -> CurveResult<Self> {
        let grid = Self {
            start_k,
            end_k,
            spacing: GridSpacing::InverseTemperature(num_points),
        };
        grid.validate()?;
        Ok(grid)
    }

    fn validate(&self) -> CurveResult<()> {
        if !(self.start_k.is_finite() && self.end_k.is_finite()) {
            return Err(CurveError::InvalidGrid {
                what: "bounds must be finite".to_string(),
            });
        }
        if self.start_k <= 0.0 || self.end_k <= 0.0 {
            return Err(CurveError::InvalidGrid {
                what: format!(
                    "absolute temperatures must be positive ({} K to {} K)",
                    self.start_k, self.end_k
                ),
            });
        }
        match self.spacing {
            GridSpacing::Step(_) if self.end_k <= self.start_k => Err(CurveError::InvalidGrid {
                what: "upper bound must exceed lower bound".to_string(),
            }),
            GridSpacing::Linear(n) | GridSpacing::InverseTemperature(n) if n < 2 => {
                Err(CurveError::InvalidGrid {
                    what: "grid must have at least 2 points".to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Generate all points of the grid, in Kelvin.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.spacing {
            GridSpacing::Step(step) => self.generate_stepped(step),
            GridSpacing::Linear(n) => self.generate_linear(n),
            GridSpacing::InverseTemperature(n) => self.generate_inverse(n),
        }
    }

    fn generate_stepped(&self, step: f64) -> Vec<f64> {
        // Shifting both bounds to Kelvin perturbs the span in the last bits;
        // without the slack an exact multiple of the step gains an extra point.
        let span = (self.end_k - self.start_k) / step;
        let count = (span - STEP_COUNT_SLACK).ceil().max(0.0) as usize;
        (0..count).map(|i| self.start_k + i as f64 * step).collect()
    }

    fn generate_linear(&self, num_points: usize) -> Vec<f64> {
        let mut points = Vec::with_capacity(num_points);
        let delta = (self.end_k - self.start_k) / (num_points - 1) as f64;

        for i in 0..num_points {
            points.push(self.start_k + i as f64 * delta);
        }

        // Ensure exact endpoint
        points[num_points - 1] = self.end_k;
        points
    }

    fn generate_inverse(&self, num_points: usize) -> Vec<f64> {
        let inv_start = 1.0 / self.start_k;
        let inv_end = 1.0 / self.end_k;
        let delta = (inv_end - inv_start) / (num_points - 1) as f64;

        let mut points: Vec<f64> = (0..num_points)
            .map(|i| 1.0 / (inv_start + i as f64 * delta))
            .collect();

        points[0] = self.start_k;
        points[num_points - 1] = self.end_k;
        points
    }
}

impl fmt::Display for GridSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "step {step} K"),
            Self::Linear(n) => write!(f, "{n} linear points"),
            Self::InverseTemperature(n) => write!(f, "{n} points uniform in 1/T"),
        }
    }
}

impl fmt::Display for TemperatureGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature grid from {:.2} K to {:.2} K ({})",
            self.start_k, self.end_k, self.spacing
        )
    }
}
