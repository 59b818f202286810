//! `Solver` implementation backed by HiGHS.

use crate::ffi::{HighsModel, HighsModelError, HighsOption, ObjectiveSense, highs_version};
use crate::status::{highs_has_solution, highs_to_core_status};
use chromip_core::{Model, Sense, Solution, Solver, SolverConfig, SolverError};
use chromip_tools::memory::MemorySnapshot;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, trace, warn};

fn highs_model_error_to_solver_error(err: HighsModelError) -> SolverError {
    SolverError::InternalError(err.to_string())
}

/// HiGHS backend. Holds only configuration; every solve builds a fresh
/// HiGHS problem from the model it is handed.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
        solve_model(model, &self.config)
    }
}

fn invalid_option(name: &str, value: impl ToString) -> SolverError {
    SolverError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn validate_config(config: &SolverConfig) -> Result<(), SolverError> {
    if let Some(limit) = config.time_limit.filter(|limit| !(limit.is_finite() && *limit > 0.0)) {
        return Err(invalid_option("time_limit", limit));
    }
    if let Some(gap) = config.mip_gap.filter(|gap| !(gap.is_finite() && *gap >= 0.0)) {
        return Err(invalid_option("mip_rel_gap", gap));
    }
    if let Some(threads) = config.threads.filter(|count| i32::try_from(*count).is_err()) {
        return Err(invalid_option("threads", threads));
    }
    Ok(())
}

fn apply_solver_config(highs_model: &mut HighsModel, config: &SolverConfig) {
    highs_model.set_log_to_console(config.log_to_console.unwrap_or(false));

    if let Some(limit) = config.time_limit {
        highs_model.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        highs_model.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(level) = config.verbosity {
        highs_model.set_verbosity(level);
    }
    if let Some(presolve) = config.presolve {
        let presolve_str = if presolve { "on" } else { "off" };
        highs_model.set_option("presolve", HighsOption::Str(presolve_str.to_string()));
    }
    if let Some(threads) = config.threads.and_then(|count| i32::try_from(count).ok()) {
        highs_model.set_option("threads", HighsOption::Int(threads));
    }
}

/// Columns follow variable ids one to one.
fn add_variables_to_highs(model: &Model, highs_model: &mut HighsModel) {
    let mut objective_coeffs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in &model.objective().terms {
        objective_coeffs[var_id.index()] += *coeff;
    }

    for (var_id, var) in model.variables() {
        let obj_coeff = objective_coeffs[var_id.index()];
        let col_idx = if var.is_integer {
            highs_model.add_integer_col(var.bounds.lower, var.bounds.upper, obj_coeff)
        } else {
            highs_model.add_col(var.bounds.lower, var.bounds.upper, obj_coeff)
        };
        trace!(
            component = "solver",
            operation = "add_variable",
            status = "success",
            var_id = var_id.inner(),
            col_idx,
            obj_coeff,
            is_integer = var.is_integer,
            "Added variable to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_vars = model.num_variables(),
        "Added all variables to HiGHS"
    );
}

fn add_constraints_to_highs(model: &Model, highs_model: &mut HighsModel) -> Result<(), SolverError> {
    let started = Instant::now();
    for ((constraint_id, constraint), row) in model.constraints().zip(model.rows()) {
        let (col_indices, coefficients): (Vec<usize>, Vec<f64>) =
            row.into_iter().map(|(var_id, coeff)| (var_id.index(), coeff)).unzip();
        highs_model
            .add_row(
                constraint.bounds.lower,
                constraint.bounds.upper,
                &col_indices,
                &coefficients,
            )
            .map_err(highs_model_error_to_solver_error)?;
        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            num_coeffs = col_indices.len(),
            "Added constraint to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = model.num_constraints(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Added all constraints to HiGHS"
    );
    Ok(())
}

fn solve_model(model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
    let sense = model.objective().sense.ok_or(SolverError::NoObjective)?;
    validate_config(config)?;

    // HiGHS is not called for an empty column set; the objective is its constant.
    if model.num_variables() == 0 {
        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            solver = "highs",
            objective_value = model.objective().constant,
            "Model has no variables; returning trivial solution"
        );
        return Ok(Solution::trivial(model));
    }

    let solver_version = highs_version().unwrap_or_else(|| "unknown".to_string());
    let rss_before = capture_rss("solve_start");
    let solve_started = Instant::now();

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_version = %solver_version,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        presolve = ?config.presolve,
        rss_bytes = ?rss_before,
        "Starting solve process"
    );

    let mut highs_model = HighsModel::new();
    apply_solver_config(&mut highs_model, config);
    highs_model.set_objective_sense(match sense {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    });

    add_variables_to_highs(model, &mut highs_model);
    add_constraints_to_highs(model, &mut highs_model)?;

    let status = highs_model.solve();
    let solve_ms = solve_started.elapsed().as_secs_f64() * 1000.0;
    let rss_after = capture_rss("solve_end");
    let rss_delta = match (rss_before, rss_after) {
        (Some(before), Some(after)) => Some(after as i64 - before as i64),
        _ => None,
    };
    let raw_objective = highs_model.objective_value().unwrap_or(f64::NAN);
    let mip_gap = highs_model.mip_gap();

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_version = %solver_version,
        solver_status = ?status,
        objective_value = raw_objective,
        optimality_gap = mip_gap,
        duration_ms = solve_ms,
        rss_bytes = ?rss_after,
        rss_delta_bytes = ?rss_delta,
        "HiGHS solve completed"
    );

    if !highs_has_solution(status, raw_objective) {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = ?status,
            duration_ms = solve_ms,
            "Solver did not find a solution"
        );
        return Err(SolverError::SolveFailure {
            status: highs_to_core_status(status),
        });
    }

    let core_status = highs_to_core_status(status);
    if !core_status.is_optimal() {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = ?status,
            objective_value = raw_objective,
            optimality_gap = mip_gap,
            "Solver hit limit but returning best solution found"
        );
    }

    let primal_values = highs_model
        .col_values()
        .map_err(highs_model_error_to_solver_error)?;
    if primal_values.len() != model.num_variables() {
        return Err(SolverError::InternalError(format!(
            "HiGHS returned {} column values for {} variables",
            primal_values.len(),
            model.num_variables()
        )));
    }

    let mut metadata = BTreeMap::new();
    metadata.insert("solver_version".to_string(), solver_version);
    metadata.insert("mip_gap".to_string(), mip_gap.to_string());
    metadata.insert(
        "presolve".to_string(),
        config
            .presolve
            .map_or_else(|| "default".to_string(), |on| on.to_string()),
    );
    if let Some(rows) = highs_model.presolved_num_rows() {
        metadata.insert("presolved_rows".to_string(), rows.to_string());
    }
    if let Some(cols) = highs_model.presolved_num_cols() {
        metadata.insert("presolved_cols".to_string(), cols.to_string());
    }

    let objective_value = raw_objective + model.objective().constant;
    debug!(
        component = "solver",
        operation = "extract_solution",
        status = "success",
        objective_value,
        num_primal_values = primal_values.len(),
        "Solution extracted"
    );

    Ok(Solution {
        primal_values,
        objective_value,
        status: core_status,
        solve_time_seconds: solve_started.elapsed().as_secs_f64(),
        metadata,
    })
}

fn capture_rss(stage: &str) -> Option<u64> {
    MemorySnapshot::capture(stage)
        .ok()
        .map(|snapshot| snapshot.rss_bytes)
}
