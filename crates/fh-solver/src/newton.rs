//! Newton solver with backtracking line search and domain constraints.

use crate::error::SolverResult;
use crate::system::{NonlinearSystem, RootFinder, RootResult, Termination, check_start};
use nalgebra::DVector;
use tracing::debug;

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (against the starting residual)
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-10,
            rel_tol: 0.0,
            line_search_beta: 0.5,
            max_line_search_iters: 40,
        }
    }
}

/// Damped Newton root finder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Newton {
    pub config: NewtonConfig,
}

impl Newton {
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }
}

impl RootFinder for Newton {
    fn name(&self) -> &'static str {
        "newton"
    }

    fn find_root<S>(&self, system: &S, x0: DVector<f64>) -> SolverResult<RootResult>
    where
        S: NonlinearSystem + ?Sized,
    {
        check_start(system, &x0)?;
        newton_solve(system, x0, &self.config)
    }
}

/// Newton iteration with line search.
///
/// Trial points outside the system domain, or with a non-finite or
/// non-decreasing residual, are backtracked.
pub fn newton_solve<S>(
    system: &S,
    x0: DVector<f64>,
    config: &NewtonConfig,
) -> SolverResult<RootResult>
where
    S: NonlinearSystem + ?Sized,
{
    let mut x = x0;
    let mut r = system.residuals(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(RootResult::finish(x, r_norm, iter, Termination::Converged));
        }

        // Compute Jacobian
        let jac = system.jacobian(&x)?;

        // Solve J * dx = -r; a singular Jacobian ends the iteration
        let Some(dx) = jac.lu().solve(&(-r.clone())) else {
            debug!(iteration = iter, residual = r_norm, "newton jacobian is singular");
            return Ok(RootResult::finish(x, r_norm, iter, Termination::Stagnated));
        };

        // Line search with domain constraints
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if system.in_domain(&x_new) {
                if let Ok(r_new) = system.residuals(&x_new) {
                    let r_new_norm = r_new.norm();
                    if r_new_norm.is_finite() && r_new_norm < r_norm {
                        accepted = Some((x_new, r_new, r_new_norm));
                        break;
                    }
                }
            }

            // Backtrack
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            debug!(iteration = iter, residual = r_norm, "newton line search stagnated");
            return Ok(RootResult::finish(x, r_norm, iter, Termination::Stagnated));
        };

        // Update solution
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if r_norm < config.abs_tol {
        return Ok(RootResult::finish(
            x,
            r_norm,
            config.max_iterations,
            Termination::Converged,
        ));
    }

    debug!(
        iterations = config.max_iterations,
        residual = r_norm,
        "newton reached maximum iterations"
    );
    Ok(RootResult::finish(
        x,
        r_norm,
        config.max_iterations,
        Termination::MaxIterations,
    ))
}
