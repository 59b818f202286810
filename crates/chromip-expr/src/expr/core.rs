//! Core expression type: linear terms plus a constant.
//!
//! Terms are kept in insertion order and duplicates are allowed until
//! [`Expr::normalized_terms`] merges them. Every model in this workspace is
//! linear, so there is no higher-degree storage.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::expr::error::LinearExprError;
use crate::ids::VariableId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    constant: f64,
    linear: Vec<(VariableId, f64)>,
}

impl Expr {
    // ── Constructors ────────────────────────────────────────

    /// Expression from linear terms and constant.
    pub fn new(linear: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self { constant, linear }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            linear: vec![(var_id, coeff)],
            ..Default::default()
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VariableId) -> Self {
        Self::term(var_id, 1.0)
    }

    /// From raw linear terms, no constant.
    pub fn from_linear(linear: Vec<(VariableId, f64)>) -> Self {
        Self {
            linear,
            ..Default::default()
        }
    }

    /// Unit-coefficient sum of the given variables.
    pub fn sum<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = VariableId>,
    {
        Self::from_linear(vars.into_iter().map(|var| (var, 1.0)).collect())
    }

    /// Zip variables with coefficients, dropping zero coefficients.
    pub fn weighted(vars: &[VariableId], coeffs: &[f64]) -> Result<Self, LinearExprError> {
        if vars.len() != coeffs.len() {
            return Err(LinearExprError::MismatchedLengths {
                variables: vars.len(),
                coefficients: coeffs.len(),
            });
        }
        let linear = vars
            .iter()
            .copied()
            .zip(coeffs.iter().copied())
            .filter(|(_, c)| *c != 0.0)
            .collect();
        let expr = Self::from_linear(linear);
        expr.validate()?;
        Ok(expr)
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.linear
    }

    pub fn is_constant(&self) -> bool {
        self.linear.is_empty()
    }

    /// Consume and return linear terms.
    pub fn into_linear_terms(self) -> Vec<(VariableId, f64)> {
        self.linear
    }

    /// Consume and return (linear_terms, constant).
    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.linear, self.constant)
    }

    /// Check that every coefficient and the constant are finite.
    pub fn validate(&self) -> Result<(), LinearExprError> {
        if !self.constant.is_finite() {
            return Err(LinearExprError::NonFiniteCoefficient {
                variable: None,
                value: self.constant,
            });
        }
        match self.linear.iter().find(|(_, c)| !c.is_finite()) {
            Some((var, value)) => Err(LinearExprError::NonFiniteCoefficient {
                variable: Some(*var),
                value: *value,
            }),
            None => Ok(()),
        }
    }

    // ── Operations ──────────────────────────────────────────

    /// Scale all terms and constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            linear: self
                .linear
                .iter()
                .map(|(v, c)| (*v, *c * by))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
        }
    }

    /// Add another expression (concatenates terms, adds constants).
    pub fn add(&self, other: &Expr) -> Self {
        let mut linear = Vec::with_capacity(self.linear.len() + other.linear.len());
        linear.extend_from_slice(&self.linear);
        linear.extend_from_slice(&other.linear);
        Self {
            constant: self.constant + other.constant,
            linear,
        }
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            linear: self.linear.clone(),
        }
    }

    /// Copy with constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            linear: self.linear.clone(),
        }
    }

    /// Merged linear terms with duplicates combined and zeros removed.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in &self.linear {
            if *coeff == 0.0 {
                continue;
            }
            *merged.entry(*var_id).or_insert(0.0) += *coeff;
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    /// Value of the expression for primal values indexed by variable id.
    ///
    /// Variables missing from `values` contribute zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.linear.iter().fold(self.constant, |acc, (var, coeff)| {
            acc + coeff * values.get(var.index()).copied().unwrap_or(0.0)
        })
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.constant)
    }

    pub fn compare_expr(&self, other: &Expr, sense: ComparisonSense) -> ConstraintExpr {
        let combined = self.add(&other.scale(-1.0));
        ConstraintExpr::new(combined.without_constant(), sense, -combined.constant)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

/// Concatenate the terms and constants of several expressions.
///
/// Duplicate variable terms are NOT merged; use `normalized_terms()` on the
/// result when consolidation is needed.
pub fn linear_sum<I>(exprs: I) -> Expr
where
    I: IntoIterator<Item = Expr>,
{
    exprs
        .into_iter()
        .fold(Expr::default(), |acc, expr| acc.add(&expr))
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs)
    }
}

impl std::ops::Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Self::Output {
        self.add_constant(rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs.scale(-1.0))
    }
}

impl std::ops::Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}
