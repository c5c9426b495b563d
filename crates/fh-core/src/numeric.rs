use crate::{FhError, FhResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> FhResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FhError::NonFinite { what, value: v })
    }
}

/// True when `v` lies strictly inside (0, 1).
#[inline]
pub fn in_open_unit_interval(v: Real) -> bool {
    v > 0.0 && v < 1.0
}

/// Volume fractions and other mole-like quantities live in the open unit interval.
pub fn ensure_open_unit_interval(v: Real, what: &'static str) -> FhResult<Real> {
    if in_open_unit_interval(v) {
        Ok(v)
    } else {
        Err(FhError::OutOfDomain { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn unit_interval_is_open() {
        assert!(ensure_open_unit_interval(0.5, "phi").is_ok());
        assert!(ensure_open_unit_interval(0.0, "phi").is_err());
        assert!(ensure_open_unit_interval(1.0, "phi").is_err());
        assert!(ensure_open_unit_interval(Real::NAN, "phi").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
