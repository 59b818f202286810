//! Solver error types.

use super::SolverStatus;
use crate::model::ModelError;

/// Error type for solver operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// No objective function set.
    NoObjective,
    /// The model could not be read or checked.
    Model(ModelError),
    /// An option value was rejected by the backend.
    InvalidOption { name: String, value: String },
    /// Internal solver error.
    InternalError(String),
    /// Solver ended without a usable solution.
    SolveFailure {
        /// The solver status that caused the failure.
        status: SolverStatus,
    },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::NoObjective => "OBJECTIVE_MISSING",
            SolverError::Model(inner) => inner.code(),
            SolverError::InvalidOption { .. } => "SOLVER_INVALID_OPTION",
            SolverError::InternalError(_) => "SOLVER_INTERNAL",
            SolverError::SolveFailure { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                SolverStatus::ReachedTimeLimit => "SOLVER_TIME_LIMIT",
                SolverStatus::ReachedIterationLimit => "SOLVER_ITERATION_LIMIT",
                _ => "SOLVER_INTERNAL",
            },
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NoObjective => write!(f, "[{}] Model has no objective", self.code()),
            SolverError::Model(inner) => write!(f, "{inner}"),
            SolverError::InvalidOption { name, value } => write!(
                f,
                "[{}] Solver rejected option {name}={value}",
                self.code()
            ),
            SolverError::InternalError(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] {}", self.code(), status_message(*status))
            }
        }
    }
}

fn status_message(status: SolverStatus) -> &'static str {
    match status {
        SolverStatus::Infeasible => "Problem is infeasible",
        SolverStatus::Unbounded => "Problem is unbounded",
        SolverStatus::ReachedTimeLimit => "Solver reached time limit without a solution",
        SolverStatus::ReachedIterationLimit => {
            "Solver reached iteration limit without a solution"
        }
        SolverStatus::Unknown => "Solver status unknown",
        SolverStatus::Optimal => "Solver returned optimal",
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Model(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        SolverError::Model(err)
    }
}
