//! Model store and solver contract for chromip integer programs.
//!
//! A [`Model`] is assembled through `&mut` builder calls and then handed by
//! shared reference to a [`Solver`] backend.

pub mod model;
pub mod solver;
pub mod types;

pub use model::{ConstraintViolation, Model, ModelError, PrettyPrintOptions};
pub use solver::{Solution, Solver, SolverConfig, SolverError, SolverStatus};
pub use types::{Bounds, Constraint, Objective, Sense, Variable};
