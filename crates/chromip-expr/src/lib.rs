//! Linear expressions and typed identifiers shared by chromip models.

pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr, LinearExprError, linear_sum};
pub use ids::{ConstraintId, VariableId};
