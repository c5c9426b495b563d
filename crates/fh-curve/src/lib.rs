//! Coexistence curves for the Flory-Huggins model.
//!
//! - [`grid`]: temperature grids in Kelvin
//! - [`relation`] and [`fit`]: `chi(T) = dH/T + dS` and its least-squares fit
//! - [`builder`]: the sweep of common-tangent solves, with fixed or
//!   continuation guesses and an optional rayon-parallel path
//! - [`curve`]: the filtered result

pub mod builder;
pub mod curve;
pub mod error;
pub mod fit;
pub mod grid;
pub mod relation;

pub use builder::{CoexistenceCurveBuilder, DEFAULT_THRESHOLD, GuessStrategy};
pub use curve::{CoexistenceCurve, CoexistencePoint, SkipReason, SkippedPoint};
pub use error::{CurveError, CurveResult};
pub use fit::{ChiFit, fit_chi_relation};
pub use grid::{GridSpacing, TemperatureGrid};
pub use relation::ChiRelation;
