//! Levenberg-Marquardt root finder.
//!
//! Minimises `|F(x)|²` with Marquardt-scaled damping:
//! `(JᵀJ + λ diag(JᵀJ)) dx = -Jᵀ F`. The damping grows when a trial step is
//! rejected (outside the domain, non-finite, or no residual reduction) and
//! shrinks after each accepted step, so the method moves between
//! Gauss-Newton and scaled gradient descent.

use crate::error::SolverResult;
use crate::system::{NonlinearSystem, RootFinder, RootResult, Termination, check_start};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

/// Floor for the diagonal scaling so flat directions still get damped.
const MIN_DIAGONAL_SCALE: f64 = 1e-12;

/// Levenberg-Marquardt configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmConfig {
    /// Maximum accepted iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative step size below which the iteration stops
    pub step_tol: f64,
    /// Starting damping factor λ
    pub initial_damping: f64,
    /// Factor applied to λ after a rejected trial step
    pub damping_increase: f64,
    /// Factor applied to λ after an accepted step
    pub damping_decrease: f64,
    pub min_damping: f64,
    /// Once λ exceeds this no further trial steps are attempted
    pub max_damping: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            abs_tol: 1e-10,
            step_tol: 1e-14,
            initial_damping: 1e-3,
            damping_increase: 10.0,
            damping_decrease: 0.1,
            min_damping: 1e-12,
            max_damping: 1e12,
        }
    }
}

/// Levenberg-Marquardt root finder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenbergMarquardt {
    pub config: LmConfig,
}

impl LevenbergMarquardt {
    pub fn new(config: LmConfig) -> Self {
        Self { config }
    }
}

impl RootFinder for LevenbergMarquardt {
    fn name(&self) -> &'static str {
        "levenberg-marquardt"
    }

    fn find_root<S>(&self, system: &S, x0: DVector<f64>) -> SolverResult<RootResult>
    where
        S: NonlinearSystem + ?Sized,
    {
        check_start(system, &x0)?;
        lm_solve(system, x0, &self.config)
    }
}

/// Run Levenberg-Marquardt from `x0`.
pub fn lm_solve<S>(system: &S, x0: DVector<f64>, config: &LmConfig) -> SolverResult<RootResult>
where
    S: NonlinearSystem + ?Sized,
{
    let mut x = x0;
    let mut r = system.residuals(&x)?;
    let mut r_norm = r.norm();
    let mut lambda = config.initial_damping;

    for iter in 0..config.max_iterations {
        if r_norm <= config.abs_tol {
            return Ok(RootResult::finish(x, r_norm, iter, Termination::Converged));
        }

        let jac = system.jacobian(&x)?;
        let gradient = jac.transpose() * &r;
        let normal = jac.transpose() * &jac;

        let Some((x_new, r_new, r_new_norm, dx)) =
            damped_step(system, &x, &normal, &gradient, r_norm, &mut lambda, config)
        else {
            debug!(
                iteration = iter,
                residual = r_norm,
                damping = lambda,
                "levenberg-marquardt found no admissible descent step"
            );
            return Ok(RootResult::finish(x, r_norm, iter, Termination::Stagnated));
        };

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
        lambda = (lambda * config.damping_decrease).max(config.min_damping);
        trace!(iteration = iter, residual = r_norm, damping = lambda, "accepted step");

        if dx.norm() <= config.step_tol * (x.norm() + config.step_tol) {
            let termination = if r_norm <= config.abs_tol {
                Termination::Converged
            } else {
                Termination::StepTooSmall
            };
            return Ok(RootResult::finish(x, r_norm, iter + 1, termination));
        }
    }

    let termination = if r_norm <= config.abs_tol {
        Termination::Converged
    } else {
        debug!(
            iterations = config.max_iterations,
            residual = r_norm,
            "levenberg-marquardt reached maximum iterations"
        );
        Termination::MaxIterations
    };
    Ok(RootResult::finish(x, r_norm, config.max_iterations, termination))
}

/// Increase the damping until a trial step is admissible and reduces the
/// residual. Returns `None` when λ runs past `max_damping`.
fn damped_step<S>(
    system: &S,
    x: &DVector<f64>,
    normal: &DMatrix<f64>,
    gradient: &DVector<f64>,
    r_norm: f64,
    lambda: &mut f64,
    config: &LmConfig,
) -> Option<(DVector<f64>, DVector<f64>, f64, DVector<f64>)>
where
    S: NonlinearSystem + ?Sized,
{
    let rhs = -gradient.clone();

    while *lambda <= config.max_damping {
        let mut damped = normal.clone();
        for i in 0..damped.nrows() {
            damped[(i, i)] += *lambda * normal[(i, i)].max(MIN_DIAGONAL_SCALE);
        }

        let Some(dx) = damped.lu().solve(&rhs) else {
            *lambda *= config.damping_increase;
            continue;
        };

        let x_new = x + &dx;
        if !system.in_domain(&x_new) {
            *lambda *= config.damping_increase;
            continue;
        }

        match system.residuals(&x_new) {
            Ok(r_new) => {
                let r_new_norm = r_new.norm();
                if r_new_norm.is_finite() && r_new_norm < r_norm {
                    return Some((x_new, r_new, r_new_norm, dx));
                }
            }
            Err(err) => trace!(%err, "trial step rejected"),
        }
        *lambda *= config.damping_increase;
    }

    None
}
