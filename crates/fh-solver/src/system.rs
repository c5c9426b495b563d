//! Root-finding abstractions.
//!
//! A [`NonlinearSystem`] supplies residuals (and optionally a Jacobian and a
//! domain predicate); a [`RootFinder`] drives it from an initial guess to a
//! [`RootResult`]. Any context the residuals need (model, chi, ...) is captured
//! by the system itself.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::{DEFAULT_FD_EPSILON, central_difference_jacobian};
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// Square system of nonlinear equations `F(x) = 0`.
pub trait NonlinearSystem {
    /// Number of unknowns (and equations).
    fn dimension(&self) -> usize;

    /// Evaluate the residual vector at `x`.
    fn residuals(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>>;

    /// Jacobian of the residuals at `x`. Defaults to central differences.
    fn jacobian(&self, x: &DVector<f64>) -> SolverResult<DMatrix<f64>> {
        central_difference_jacobian(x, |x| self.residuals(x), DEFAULT_FD_EPSILON)
    }

    /// Whether `x` is an admissible iterate. Trial steps outside the domain are
    /// rejected without evaluating the residuals.
    fn in_domain(&self, _x: &DVector<f64>) -> bool {
        true
    }
}

/// Closure-backed system, mostly for tests and one-off problems.
pub struct FnSystem<F> {
    dimension: usize,
    residual_fn: F,
}

impl<F> FnSystem<F>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    pub fn new(dimension: usize, residual_fn: F) -> Self {
        Self {
            dimension,
            residual_fn,
        }
    }
}

impl<F> NonlinearSystem for FnSystem<F>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn residuals(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        (self.residual_fn)(x)
    }
}

/// Why an iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Residual norm fell below the absolute tolerance.
    Converged,
    /// Iteration budget exhausted.
    MaxIterations,
    /// No admissible step reduced the residual.
    Stagnated,
    /// Steps became negligible before the residual reached tolerance.
    StepTooSmall,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Converged => "converged",
            Termination::MaxIterations => "max iterations",
            Termination::Stagnated => "stagnated",
            Termination::StepTooSmall => "step too small",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a root solve.
#[derive(Debug, Clone)]
pub struct RootResult {
    /// Final iterate (the best admissible point found)
    pub x: DVector<f64>,
    /// Euclidean norm of the residuals at `x`
    pub residual_norm: f64,
    /// Number of accepted iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
    pub termination: Termination,
}

impl RootResult {
    pub(crate) fn finish(
        x: DVector<f64>,
        residual_norm: f64,
        iterations: usize,
        termination: Termination,
    ) -> Self {
        Self {
            x,
            residual_norm,
            iterations,
            converged: termination == Termination::Converged,
            termination,
        }
    }
}

/// Local root-finding capability.
pub trait RootFinder: Send + Sync {
    /// Solver name (for logging).
    fn name(&self) -> &'static str;

    /// Solve `system` starting from `x0`.
    ///
    /// Returns an error only when the problem cannot be started (bad guess,
    /// wrong dimension, singular setup). Failing to converge is reported in
    /// the returned [`RootResult`].
    fn find_root<S>(&self, system: &S, x0: DVector<f64>) -> SolverResult<RootResult>
    where
        S: NonlinearSystem + ?Sized;
}

/// Shared start-up checks for root finders.
pub(crate) fn check_start<S>(system: &S, x0: &DVector<f64>) -> SolverResult<()>
where
    S: NonlinearSystem + ?Sized,
{
    if x0.len() != system.dimension() {
        return Err(SolverError::DimensionMismatch {
            expected: system.dimension(),
            actual: x0.len(),
        });
    }
    if x0.iter().any(|v| !v.is_finite()) || !system.in_domain(x0) {
        return Err(SolverError::InvalidGuess {
            what: format!("starting point {:?} is outside the solver domain", x0.as_slice()),
        });
    }
    Ok(())
}
