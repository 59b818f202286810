//! Solver contract shared by every backend.
//!
//! - [`SolverConfig`]: pass-through configuration for solver behavior
//! - [`SolverStatus`]: common status values across solvers
//! - [`SolverError`]: error types for solver operations
//! - [`Solver`]: trait implemented by backends such as `chromip-highs`
//! - [`Solution`]: primal values and objective of a successful solve

mod config;
mod error;
mod status;

pub use config::SolverConfig;
pub use error::SolverError;
pub use status::SolverStatus;

use std::collections::BTreeMap;

use chromip_expr::ids::VariableId;

use crate::model::Model;

/// Result of a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Primal values indexed by variable id.
    pub primal_values: Vec<f64>,
    /// Objective value, including the model's objective constant.
    pub objective_value: f64,
    pub status: SolverStatus,
    pub solve_time_seconds: f64,
    /// Backend-specific details (version, option values, ...).
    pub metadata: BTreeMap<String, String>,
}

impl Solution {
    /// Solution of a model that has no variables: the objective is its constant.
    pub fn trivial(model: &Model) -> Self {
        Self {
            primal_values: Vec::new(),
            objective_value: model.objective().constant,
            status: SolverStatus::Optimal,
            solve_time_seconds: 0.0,
            metadata: BTreeMap::new(),
        }
    }

    /// Get the primal value of a variable.
    pub fn value(&self, var_id: VariableId) -> Option<f64> {
        self.primal_values.get(var_id.index()).copied()
    }

    /// Whether a binary variable is set, rounding at 0.5.
    pub fn is_set(&self, var_id: VariableId) -> bool {
        self.value(var_id).is_some_and(|value| value > 0.5)
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn is_feasible(&self) -> bool {
        self.status.is_feasible()
    }
}

/// Trait for solver implementations.
///
/// A backend receives the model by shared reference and never mutates it.
pub trait Solver {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Solve the model.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` if:
    /// - The model has no objective
    /// - The backend rejects the model
    /// - The solver ends without a solution (infeasible, unbounded, ...)
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError>;
}
