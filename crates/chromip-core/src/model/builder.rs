//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Bounds, Constraint, Objective, Sense, Variable};
use chromip_expr::ids::{ConstraintId, VariableId};
use chromip_expr::{ConstraintExpr, Expr};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if !variable.bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            });
        }

        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);
        Ok(id)
    }

    /// Add a named binary variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> Result<VariableId, ModelError> {
        let id = self.add_variable(Variable::binary())?;
        self.set_variable_name(id, name.into())?;
        Ok(id)
    }

    /// Add a constraint to the model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ModelError> {
        if !constraint.bounds.is_valid() {
            return Err(ModelError::InvalidConstraintBounds {
                lower: constraint.bounds.lower,
                upper: constraint.bounds.upper,
            });
        }

        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(constraint);
        Ok(id)
    }

    /// Set the objective function, replacing any previous one.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let sense = objective.sense.ok_or(ModelError::NoObjective)?;
        if !objective.constant.is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: objective.constant,
            });
        }
        for (var_id, coeff) in &objective.terms {
            self.ensure_variable_exists(*var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coeff,
                });
            }
        }

        let normalized = self.normalize_terms(objective.terms);
        self.objective = Objective {
            sense: Some(sense),
            terms: normalized,
            constant: objective.constant,
        };
        self.objective_name = None;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.terms.len(),
            constant = self.objective.constant,
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize a linear expression; its constant becomes the objective offset.
    ///
    /// Returns an error if the model already has an objective.
    pub fn minimize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_new_objective(Sense::Minimize, expr)
    }

    /// Maximize a linear expression; its constant becomes the objective offset.
    ///
    /// Returns an error if the model already has an objective.
    pub fn maximize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_new_objective(Sense::Maximize, expr)
    }

    fn set_new_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        if self.objective.sense.is_some() {
            return Err(ModelError::MultipleObjectives);
        }
        expr.validate()?;
        let (terms, constant) = expr.into_parts();
        self.set_objective(Objective {
            sense: Some(sense),
            terms,
            constant,
        })
    }

    /// Add a constraint from an expression and explicit bounds.
    ///
    /// The expression's constant is moved into the bounds. Nothing is added
    /// when any term references an unknown variable.
    pub fn add_expr_constraint(
        &mut self,
        expr: Expr,
        bounds: Bounds,
    ) -> Result<ConstraintId, ModelError> {
        expr.validate()?;
        let shift = expr.constant();
        let terms = self.normalize_terms(expr.into_linear_terms());
        for (var_id, _) in &terms {
            self.ensure_variable_exists(*var_id)?;
        }

        let constraint_id = self.add_constraint(Constraint {
            bounds: Bounds::new(bounds.lower - shift, bounds.upper - shift),
        })?;
        for (var_id, coeff) in terms {
            self.set_coefficient(var_id, constraint_id, coeff)?;
        }
        Ok(constraint_id)
    }

    /// Add a constraint from a comparison expression (e.g., `x + y <= 1`).
    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        self.add_expr_constraint(expr, Bounds::from_sense(sense, rhs))
    }

    /// Add a comparison constraint and attach a name to it.
    pub fn add_named_constraint(
        &mut self,
        constraint: ConstraintExpr,
        name: impl Into<String>,
    ) -> Result<ConstraintId, ModelError> {
        let id = self.add_constraint_expr(constraint)?;
        self.set_constraint_name(id, name.into())?;
        Ok(id)
    }

    /// Set a coefficient in the constraint matrix.
    ///
    /// An existing entry for the same (variable, constraint) pair is replaced.
    /// Returns an error if the variable or constraint IDs are invalid.
    pub fn set_coefficient(
        &mut self,
        var_id: VariableId,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.ensure_variable_exists(var_id)?;
        self.ensure_constraint_exists(constraint_id)?;

        let column = self.columns.entry(var_id).or_default();
        match column.iter_mut().find(|(id, _)| *id == constraint_id) {
            Some(entry) => entry.1 = coefficient,
            None => column.push((constraint_id, coefficient)),
        }

        Ok(())
    }
}
