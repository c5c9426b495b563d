//! Common-tangent solver for two-phase Flory-Huggins coexistence.
//!
//! This crate provides a small root-finding toolkit built on nalgebra
//! (Levenberg-Marquardt and damped Newton behind the [`RootFinder`] trait)
//! and the common-tangent system that locates the two coexisting volume
//! fractions for a given interaction parameter.

pub mod common_tangent;
pub mod error;
pub mod jacobian;
pub mod levenberg_marquardt;
pub mod method;
pub mod newton;
pub mod system;

pub use common_tangent::{CommonTangentSolver, CommonTangentSystem, TangentSolution, TangentSolve};
pub use error::{SolverError, SolverResult};
pub use levenberg_marquardt::{LevenbergMarquardt, LmConfig};
pub use method::SolverMethod;
pub use newton::{Newton, NewtonConfig};
pub use system::{FnSystem, NonlinearSystem, RootFinder, RootResult, Termination};
