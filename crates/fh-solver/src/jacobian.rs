//! Finite difference Jacobian.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Relative perturbation used by [`crate::NonlinearSystem::jacobian`].
pub const DEFAULT_FD_EPSILON: f64 = 1e-7;

/// Central-difference Jacobian of `f` at `x`.
///
/// The step for column `j` is `epsilon * max(|x[j]|, epsilon)`: it scales
/// with the unknown instead of being floored at one, because volume
/// fractions can sit within a few `1e-3` of zero.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(SolverError::Numeric {
            what: format!("finite-difference step must be positive, got {epsilon}"),
        });
    }

    let n = x.len();
    let mut jac: Option<DMatrix<f64>> = None;
    let mut probe = x.clone();

    for j in 0..n {
        let h = epsilon * x[j].abs().max(epsilon);

        probe[j] = x[j] + h;
        let f_plus = f(&probe)?;
        probe[j] = x[j] - h;
        let f_minus = f(&probe)?;
        probe[j] = x[j];

        let column = (f_plus - f_minus) / (2.0 * h);
        let jac = jac.get_or_insert_with(|| DMatrix::zeros(column.len(), n));
        jac.set_column(j, &column);
    }

    match jac {
        Some(jac) => Ok(jac),
        None => Ok(DMatrix::zeros(f(x)?.len(), 0)),
    }
}
