//! Runtime choice of root finder.

use crate::error::SolverResult;
use crate::levenberg_marquardt::{LevenbergMarquardt, LmConfig};
use crate::newton::{Newton, NewtonConfig};
use crate::system::{NonlinearSystem, RootFinder, RootResult};
use nalgebra::DVector;

/// Root finder selected from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverMethod {
    LevenbergMarquardt(LmConfig),
    Newton(NewtonConfig),
}

impl Default for SolverMethod {
    fn default() -> Self {
        SolverMethod::LevenbergMarquardt(LmConfig::default())
    }
}

impl SolverMethod {
    /// Override the iteration budget and residual tolerance of either method.
    pub fn with_limits(self, max_iterations: usize, abs_tol: f64) -> Self {
        match self {
            SolverMethod::LevenbergMarquardt(cfg) => SolverMethod::LevenbergMarquardt(LmConfig {
                max_iterations,
                abs_tol,
                ..cfg
            }),
            SolverMethod::Newton(cfg) => SolverMethod::Newton(NewtonConfig {
                max_iterations,
                abs_tol,
                ..cfg
            }),
        }
    }
}

impl RootFinder for SolverMethod {
    fn name(&self) -> &'static str {
        match self {
            SolverMethod::LevenbergMarquardt(_) => "levenberg-marquardt",
            SolverMethod::Newton(_) => "newton",
        }
    }

    fn find_root<S>(&self, system: &S, x0: DVector<f64>) -> SolverResult<RootResult>
    where
        S: NonlinearSystem + ?Sized,
    {
        match self {
            SolverMethod::LevenbergMarquardt(cfg) => {
                LevenbergMarquardt::new(*cfg).find_root(system, x0)
            }
            SolverMethod::Newton(cfg) => Newton::new(*cfg).find_root(system, x0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_override_both_methods() {
        let lm = SolverMethod::default().with_limits(17, 1e-8);
        match lm {
            SolverMethod::LevenbergMarquardt(cfg) => {
                assert_eq!(cfg.max_iterations, 17);
                assert_eq!(cfg.abs_tol, 1e-8);
                assert_eq!(cfg.initial_damping, LmConfig::default().initial_damping);
            }
            SolverMethod::Newton(_) => panic!("method changed"),
        }

        let newton = SolverMethod::Newton(NewtonConfig::default()).with_limits(5, 1e-6);
        assert_eq!(newton.name(), "newton");
    }
}
