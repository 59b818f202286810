//! HiGHS backend for chromip models.
//!
//! Converts a `chromip_core::Model` into a HiGHS row problem, applies the
//! pass-through [`SolverConfig`](chromip_core::SolverConfig), and maps the
//! result back onto the shared [`Solver`](chromip_core::Solver) contract.

pub mod ffi;
pub mod solver;
mod status;

pub use ffi::{HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense, highs_version};
pub use solver::HighsSolver;
