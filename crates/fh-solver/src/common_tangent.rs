//! Common-tangent construction for two coexisting phases.
//!
//! At coexistence the free-energy curve has one line tangent to it at both
//! compositions:
//!
//! 1. `f'(phi1) - f'(phi2) = 0` (equal slopes, i.e. equal exchange chemical
//!    potential)
//! 2. `(f(phi1) - f(phi2)) / (phi1 - phi2) - f'(phi1) = 0` (the secant is the
//!    tangent)
//!
//! The trivial solution `phi1 = phi2` satisfies both equations in the limit,
//! so it is excluded from the domain and callers must filter results whose
//! composition gap collapses.

use crate::error::{SolverError, SolverResult};
use crate::levenberg_marquardt::LevenbergMarquardt;
use crate::system::{NonlinearSystem, RootFinder, Termination};
use fh_core::{Real, in_open_unit_interval};
use fh_model::{FreeEnergyModel, ModelError, PhasePair};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Residual system of the common-tangent condition at fixed chi.
pub struct CommonTangentSystem<'a, M: FreeEnergyModel + ?Sized> {
    model: &'a M,
    chi: Real,
}

impl<'a, M: FreeEnergyModel + ?Sized> CommonTangentSystem<'a, M> {
    pub fn new(model: &'a M, chi: Real) -> Self {
        Self { model, chi }
    }

    fn unpack(x: &DVector<f64>) -> SolverResult<(Real, Real)> {
        let (phi1, phi2) = (x[0], x[1]);
        if phi1 == phi2 {
            return Err(ModelError::Degenerate {
                what: "common tangent needs two distinct phases",
            }
            .into());
        }
        Ok((phi1, phi2))
    }
}

impl<M: FreeEnergyModel + ?Sized> NonlinearSystem for CommonTangentSystem<'_, M> {
    fn dimension(&self) -> usize {
        2
    }

    fn residuals(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let (phi1, phi2) = Self::unpack(x)?;
        let f1 = self.model.free_energy(phi1, self.chi)?;
        let f2 = self.model.free_energy(phi2, self.chi)?;
        let d1 = self.model.free_energy_derivative(phi1, self.chi)?;
        let d2 = self.model.free_energy_derivative(phi2, self.chi)?;

        let equal_derivs = d1 - d2;
        let common_slope = (f1 - f2) / (phi1 - phi2) - d1;
        Ok(DVector::from_vec(vec![equal_derivs, common_slope]))
    }

    fn jacobian(&self, x: &DVector<f64>) -> SolverResult<DMatrix<f64>> {
        let (phi1, phi2) = Self::unpack(x)?;
        let f1 = self.model.free_energy(phi1, self.chi)?;
        let f2 = self.model.free_energy(phi2, self.chi)?;
        let d1 = self.model.free_energy_derivative(phi1, self.chi)?;
        let d2 = self.model.free_energy_derivative(phi2, self.chi)?;
        let dd1 = self.model.free_energy_second_derivative(phi1, self.chi)?;
        let dd2 = self.model.free_energy_second_derivative(phi2, self.chi)?;

        let h = phi1 - phi2;
        let secant = (f1 - f2) / h;
        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[dd1, -dd2, (d1 - secant) / h - dd1, (secant - d2) / h],
        ))
    }

    fn in_domain(&self, x: &DVector<f64>) -> bool {
        in_open_unit_interval(x[0]) && in_open_unit_interval(x[1]) && x[0] != x[1]
    }
}

/// Result of one common-tangent solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentSolution {
    pub phases: PhasePair,
    pub chi: Real,
    pub residual_norm: Real,
    pub iterations: usize,
    pub converged: bool,
    pub termination: Termination,
}

impl TangentSolution {
    pub fn phi1(&self) -> Real {
        self.phases.phi1
    }

    pub fn phi2(&self) -> Real {
        self.phases.phi2
    }

    /// Composition gap `|phi1 - phi2|`.
    pub fn gap(&self) -> Real {
        self.phases.gap()
    }

    pub fn is_finite(&self) -> bool {
        self.phases.phi1.is_finite()
            && self.phases.phi2.is_finite()
            && self.residual_norm.is_finite()
    }

    /// The converged pair, or an error describing why there is none.
    pub fn require_converged(&self) -> SolverResult<PhasePair> {
        if self.converged {
            Ok(self.phases)
        } else {
            Err(SolverError::ConvergenceFailed {
                what: format!(
                    "common tangent at chi={} ({} after {} iterations, residual {:.3e})",
                    self.chi, self.termination, self.iterations, self.residual_norm
                ),
            })
        }
    }
}

/// Anything that can solve the common-tangent condition at a given chi.
///
/// This is the seam the coexistence sweep is written against.
pub trait TangentSolve: Sync {
    fn solve_tangent(&self, chi: Real, guess: PhasePair) -> SolverResult<TangentSolution>;

    /// Chi at or below which no two-phase solution exists.
    fn critical_chi(&self) -> Option<Real> {
        None
    }
}

/// Common-tangent solver over a free-energy model and a root finder.
pub struct CommonTangentSolver<'a, M: FreeEnergyModel + ?Sized, R: RootFinder = LevenbergMarquardt>
{
    model: &'a M,
    finder: R,
}

impl<'a, M: FreeEnergyModel + ?Sized> CommonTangentSolver<'a, M, LevenbergMarquardt> {
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            finder: LevenbergMarquardt::default(),
        }
    }
}

impl<'a, M: FreeEnergyModel + ?Sized, R: RootFinder> CommonTangentSolver<'a, M, R> {
    pub fn with_finder(model: &'a M, finder: R) -> Self {
        Self { model, finder }
    }

    pub fn model(&self) -> &M {
        self.model
    }

    pub fn finder(&self) -> &R {
        &self.finder
    }

    /// Solve for the coexisting pair at `chi`, starting from `guess`.
    ///
    /// The guess must hold two distinct fractions in (0, 1). A result that
    /// fails to converge is returned with `converged == false`.
    pub fn solve(&self, chi: Real, guess: PhasePair) -> SolverResult<TangentSolution> {
        if !chi.is_finite() {
            return Err(SolverError::InvalidGuess {
                what: format!("interaction parameter must be finite, got {chi}"),
            });
        }
        if !in_open_unit_interval(guess.phi1) || !in_open_unit_interval(guess.phi2) {
            return Err(SolverError::InvalidGuess {
                what: format!("guess {guess} must lie inside (0, 1)"),
            });
        }
        if guess.phi1 == guess.phi2 {
            return Err(SolverError::InvalidGuess {
                what: format!("guess {guess} must hold two distinct fractions"),
            });
        }

        let system = CommonTangentSystem::new(self.model, chi);
        let x0 = DVector::from_vec(vec![guess.phi1, guess.phi2]);
        let result = self.finder.find_root(&system, x0)?;

        let solution = TangentSolution {
            phases: PhasePair::new(result.x[0], result.x[1]),
            chi,
            residual_norm: result.residual_norm,
            iterations: result.iterations,
            converged: result.converged,
            termination: result.termination,
        };

        if !solution.converged {
            debug!(
                chi,
                solver = self.finder.name(),
                termination = %solution.termination,
                residual = solution.residual_norm,
                "common tangent did not converge"
            );
        }
        Ok(solution)
    }
}

impl<M: FreeEnergyModel + ?Sized, R: RootFinder> TangentSolve for CommonTangentSolver<'_, M, R> {
    fn solve_tangent(&self, chi: Real, guess: PhasePair) -> SolverResult<TangentSolution> {
        self.solve(chi, guess)
    }

    fn critical_chi(&self) -> Option<Real> {
        self.model.critical_chi()
    }
}
