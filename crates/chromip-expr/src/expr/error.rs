//! Expression construction errors.

use crate::ids::VariableId;

#[derive(Debug, Clone, PartialEq)]
pub enum LinearExprError {
    /// A coefficient or constant is NaN or infinite.
    NonFiniteCoefficient { variable: Option<VariableId>, value: f64 },
    /// Variables and coefficients were supplied with different lengths.
    MismatchedLengths { variables: usize, coefficients: usize },
}

impl LinearExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LinearExprError::NonFiniteCoefficient { .. } => "EXPR_NON_FINITE",
            LinearExprError::MismatchedLengths { .. } => "EXPR_MISMATCHED_LENGTHS",
        }
    }
}

impl std::fmt::Display for LinearExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearExprError::NonFiniteCoefficient {
                variable: Some(var),
                value,
            } => write!(
                f,
                "[{}] coefficient of {} must be finite (got {})",
                self.code(),
                var,
                value
            ),
            LinearExprError::NonFiniteCoefficient {
                variable: None,
                value,
            } => write!(
                f,
                "[{}] constant term must be finite (got {})",
                self.code(),
                value
            ),
            LinearExprError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] {} variables but {} coefficients",
                self.code(),
                variables,
                coefficients
            ),
        }
    }
}

impl std::error::Error for LinearExprError {}
