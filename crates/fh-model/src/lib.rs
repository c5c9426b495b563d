//! fh-model: Flory-Huggins free energy of mixing.
//!
//! Provides:
//! - `FreeEnergyModel` trait (free energy and its first two derivatives)
//! - `FloryHuggins` lattice model with chi rearrangement and error propagation
//! - concentration <-> volume fraction conversion via the solute density
//! - critical point and spinodal helpers
//!
//! Everything here is a pure function of the model parameters; there is no I/O.
//!
//! # Example
//!
//! ```
//! use fh_model::{FloryHuggins, FreeEnergyModel};
//!
//! let fh = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
//! let f = fh.free_energy(0.5, 2.5).unwrap();
//! assert!((f - (0.5_f64.ln() + 2.5 * 0.25)).abs() < 1e-12);
//! ```

pub mod error;
pub mod flory_huggins;
pub mod model;
pub mod phase;

// Re-exports for ergonomics
pub use error::{ModelError, ModelResult};
pub use flory_huggins::{CriticalPoint, DEFAULT_DENSITY, FloryHuggins};
pub use model::FreeEnergyModel;
pub use phase::PhasePair;
