//! fh-core: shared foundation for the Flory-Huggins workspace.
//!
//! Contains:
//! - units (uom SI types + constructors, Celsius/Kelvin helpers)
//! - numeric (Real + tolerances + float and domain guards)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FhError, FhResult};
pub use numeric::*;
pub use units::*;
