//! Checking a primal vector against the model's rows, bounds and objective.

use chromip_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::Bounds;

/// A row whose activity falls outside its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    pub constraint: ConstraintId,
    pub name: Option<String>,
    pub activity: f64,
    pub bounds: Bounds,
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = self
            .name
            .clone()
            .unwrap_or_else(|| self.constraint.to_string());
        write!(
            f,
            "{label}: activity {} outside [{}, {}]",
            self.activity, self.bounds.lower, self.bounds.upper
        )
    }
}

impl Model {
    fn ensure_solution_length(&self, values: &[f64]) -> Result<(), ModelError> {
        if values.len() == self.num_variables() {
            Ok(())
        } else {
            Err(ModelError::SolutionLengthMismatch {
                expected: self.num_variables(),
                got: values.len(),
            })
        }
    }

    /// Activity of every row for primal values indexed by variable id.
    pub fn row_activities(&self, values: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.ensure_solution_length(values)?;
        let mut activities = vec![0.0; self.num_constraints()];
        for (var_id, column) in &self.columns {
            let value = values[var_id.index()];
            for (constraint_id, coeff) in column {
                activities[constraint_id.index()] += coeff * value;
            }
        }
        Ok(activities)
    }

    /// Objective value (including its constant) for the given primal values.
    pub fn objective_value(&self, values: &[f64]) -> Result<f64, ModelError> {
        self.ensure_solution_length(values)?;
        Ok(self
            .objective
            .terms
            .iter()
            .fold(self.objective.constant, |acc, (var_id, coeff)| {
                acc + coeff * values[var_id.index()]
            }))
    }

    /// Rows whose activity leaves their bounds by more than `tolerance`.
    pub fn violations(
        &self,
        values: &[f64],
        tolerance: f64,
    ) -> Result<Vec<ConstraintViolation>, ModelError> {
        let activities = self.row_activities(values)?;
        let violated = self
            .constraints()
            .zip(activities)
            .filter(|((_, constraint), activity)| !constraint.is_satisfied_by(*activity, tolerance))
            .map(|((id, constraint), activity)| ConstraintViolation {
                constraint: id,
                name: self.get_constraint_name(id).map(ToString::to_string),
                activity,
                bounds: constraint.bounds,
            })
            .collect();
        Ok(violated)
    }

    /// Variables whose value breaks their bounds or integrality.
    pub fn domain_violations(
        &self,
        values: &[f64],
        tolerance: f64,
    ) -> Result<Vec<VariableId>, ModelError> {
        self.ensure_solution_length(values)?;
        let broken = self
            .variables()
            .filter(|(id, var)| {
                let value = values[id.index()];
                let in_bounds = value >= var.bounds.lower - tolerance
                    && value <= var.bounds.upper + tolerance;
                let integral = !var.is_integer || (value - value.round()).abs() <= tolerance;
                !(in_bounds && integral)
            })
            .map(|(id, _)| id)
            .collect();
        Ok(broken)
    }

    /// Whether `values` satisfies every row, bound and integrality requirement.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> Result<bool, ModelError> {
        Ok(self.domain_violations(values, tolerance)?.is_empty()
            && self.violations(values, tolerance)?.is_empty())
    }
}
