//! Expression types for binary integer programs.
//!
//! - `core`       — Expr: linear terms + constant
//! - `constraint` — ConstraintExpr: expression with comparison sense and RHS
//! - `error`      — Expression construction errors

pub mod constraint;
pub mod core;
pub mod error;

pub use constraint::{ComparisonSense, ConstraintExpr};
pub use core::{Expr, linear_sum};
pub use error::LinearExprError;
