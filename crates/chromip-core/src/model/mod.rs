//! Model module for building binary integer programs.
//!
//! This module provides the core [`Model`] type and related structures.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives
//! - [`storage`]: Column-first sparse storage access
//! - [`metadata`]: Variable and constraint naming
//! - [`evaluate`]: Checking a primal vector against the model
//! - [`pretty`]: Human-readable ASCII rendering

mod builder;
mod error;
mod evaluate;
mod metadata;
mod pretty;
mod storage;

use crate::types::{Constraint, Objective, Variable};
use chromip_expr::ids::{ConstraintId, VariableId};
use std::collections::BTreeMap;
use std::time::Instant;

pub use error::ModelError;
pub use evaluate::ConstraintViolation;
pub use pretty::{PrettyPrintOptions, format_ascii_number};

/// A model builder for binary and mixed-integer linear programs.
///
/// Variables and constraints are stored densely by id; coefficients use
/// column-first sparse storage (CSC layout).
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Objective,
    pub(crate) objective_name: Option<String>,
    // Column-first sparse storage: variable_id -> vec of (constraint_id, coefficient)
    pub(crate) columns: BTreeMap<VariableId, Vec<(ConstraintId, f64)>>,
    // Lazy-allocated name storage
    pub(crate) variable_names: Option<BTreeMap<VariableId, String>>,
    pub(crate) constraint_names: Option<BTreeMap<ConstraintId, String>>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty model with preallocated variable and constraint storage.
    pub fn with_capacities(variables: usize, constraints: usize) -> Self {
        Self {
            variables: Vec::with_capacity(variables),
            constraints: Vec::with_capacity(constraints),
            ..Self::default()
        }
    }

    /// Get the objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if id.index() < self.constraints.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let started = Instant::now();
        let terms_in = terms.len();

        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in terms {
            if coeff == 0.0 {
                continue;
            }
            *merged.entry(var_id).or_insert(0.0) += coeff;
        }

        let normalized: Vec<(VariableId, f64)> = merged
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect();

        tracing::trace!(
            component = "model",
            operation = "lower_expr",
            status = "success",
            expr_terms_in = terms_in,
            expr_terms_out = normalized.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Lowered linear expression"
        );

        normalized
    }
}
