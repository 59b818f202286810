//! Solve driver: hand a built formulation to a [`Solver`] and read back a
//! checked coloring.

use std::collections::BTreeMap;
use std::time::Duration;

use chromip_core::{Solution, Solver, SolverError, SolverStatus};
use tracing::{debug, warn};

use crate::coloring::Coloring;
use crate::error::ColoringError;
use crate::formulation::{ColoringModel, Formulation};

/// Row activities may drift this far from their bounds.
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// A solved formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoringOutcome {
    pub formulation: Formulation,
    pub solver: &'static str,
    pub status: SolverStatus,
    /// Objective value reported by the solver, constant included.
    pub objective: f64,
    pub coloring: Coloring,
    /// Solver values indexed by variable id.
    pub primal_values: Vec<f64>,
    pub solve_time: Duration,
    pub metadata: BTreeMap<String, String>,
}

impl ColoringOutcome {
    /// The chromatic number, when the solver proved optimality.
    pub fn chromatic_number(&self) -> Option<u32> {
        if self.status.is_optimal() {
            Some(self.objective.round() as u32)
        } else {
            None
        }
    }

    /// Number of distinct colors in the decoded coloring.
    pub fn colors_used(&self) -> usize {
        self.coloring.num_colors()
    }
}

/// Solve `built` and decode a proper coloring from the solution.
///
/// # Errors
///
/// - [`ColoringError::InfeasibleFormulation`] when the solver proves the
///   model infeasible
/// - [`ColoringError::Solver`] for any other solver failure
/// - [`ColoringError::InvalidColoring`] when the solution violates the model,
///   does not decode to a proper coloring, or (POST) disagrees with itself
pub fn solve<S: Solver + ?Sized>(
    built: &ColoringModel,
    solver: &mut S,
) -> Result<ColoringOutcome, ColoringError> {
    let formulation = built.formulation();
    let model = built.model();

    let solution = if model.num_variables() == 0 {
        Solution::trivial(model)
    } else {
        solver
            .solve(model)
            .map_err(|source| match source {
                SolverError::SolveFailure {
                    status: SolverStatus::Infeasible,
                } => ColoringError::InfeasibleFormulation { formulation },
                source => ColoringError::Solver {
                    formulation,
                    source,
                },
            })?
    };

    let coloring = check_solution(built, &solution)?;
    let outcome = ColoringOutcome {
        formulation,
        solver: solver.name(),
        status: solution.status,
        objective: solution.objective_value,
        coloring,
        primal_values: solution.primal_values,
        solve_time: Duration::from_secs_f64(solution.solve_time_seconds.max(0.0)),
        metadata: solution.metadata,
    };

    if outcome.status.is_optimal()
        && (outcome.objective - outcome.colors_used() as f64).abs() > FEASIBILITY_TOLERANCE
    {
        warn!(
            component = "coloring",
            operation = "solve",
            status = "mismatch",
            formulation = formulation.as_str(),
            objective = outcome.objective,
            colors_used = outcome.colors_used(),
            "Optimal objective differs from the number of colors used"
        );
    }

    debug!(
        component = "coloring",
        operation = "solve",
        status = outcome.status.as_str(),
        formulation = formulation.as_str(),
        solver = outcome.solver,
        objective = outcome.objective,
        colors_used = outcome.colors_used(),
        duration_ms = outcome.solve_time.as_secs_f64() * 1000.0,
        "Solved coloring formulation"
    );
    Ok(outcome)
}

/// Reject solutions that break the model or decode to an improper coloring.
fn check_solution(built: &ColoringModel, solution: &Solution) -> Result<Coloring, ColoringError> {
    let formulation = built.formulation();
    let invalid = |reason: String| ColoringError::InvalidColoring {
        formulation,
        reason,
    };
    let values = &solution.primal_values;

    let violations = built.model().violations(values, FEASIBILITY_TOLERANCE)?;
    if let Some(first) = violations.first() {
        return Err(invalid(format!(
            "{} violated rows, first {first}",
            violations.len()
        )));
    }

    let coloring = built.decode(values)?;
    if let Some((u, v)) = coloring.conflicts(built.graph()).first() {
        return Err(invalid(format!("edge ({u}, {v}) joins equal colors")));
    }

    if formulation == Formulation::Post {
        recovery_check(built, values, &coloring).map_err(invalid)?;
    }
    Ok(coloring)
}

/// In POST, `x[v,i] = 1` exactly where neither `g[v,i]` nor `l[v,i]` is set.
fn recovery_check(built: &ColoringModel, values: &[f64], coloring: &Coloring) -> Result<(), String> {
    let (Some(g), Some(l)) = (built.g(), built.l()) else {
        return Ok(());
    };
    let is_set = |index: usize| values.get(index).is_some_and(|value| *value > 0.5);
    for (vertex, color) in coloring.iter() {
        for i in built.colors().iter() {
            let between = match (g.get(vertex, i), l.get(vertex, i)) {
                (Ok(above), Ok(below)) => !is_set(above.index()) && !is_set(below.index()),
                _ => return Err(format!("order indicators missing for vertex {vertex}")),
            };
            if between != (i == color) {
                return Err(format!(
                    "vertex {vertex} has x at color {color} but order indicators at {i}"
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::formulation::build;
    use crate::graph::Graph;
    use chromip_core::Model;

    /// Returns a fixed vector, or a fixed failure.
    struct ScriptedSolver {
        answer: Result<Vec<f64>, SolverError>,
    }

    impl Solver for ScriptedSolver {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
            let values = self.answer.clone()?;
            Ok(Solution {
                objective_value: model.objective_value(&values)?,
                primal_values: values,
                status: SolverStatus::Optimal,
                solve_time_seconds: 0.25,
                metadata: BTreeMap::from([("solver_version".to_string(), "test".to_string())]),
            })
        }
    }

    fn path3() -> Graph {
        Graph::with_vertex_count(3, vec![(1, 2), (2, 3)]).unwrap()
    }

    fn two_coloring() -> Coloring {
        [(1, 2), (2, 1), (3, 2)].into_iter().collect()
    }

    #[test]
    fn test_decodes_optimal_solution() {
        for formulation in Formulation::ALL {
            let built = build(formulation, &path3()).unwrap();
            let mut solver = ScriptedSolver {
                answer: Ok(built.encode(&two_coloring()).unwrap()),
            };
            let outcome = solve(&built, &mut solver).unwrap();
            assert_eq!(outcome.chromatic_number(), Some(2), "{formulation}");
            assert_eq!(outcome.colors_used(), 2);
            assert_eq!(outcome.coloring, two_coloring());
            assert_eq!(outcome.solver, "scripted");
            assert_eq!(outcome.solve_time, Duration::from_millis(250));
            assert_eq!(outcome.metadata["solver_version"], "test");
        }
    }

    #[test]
    fn test_infeasible_status_maps_to_formulation_error() {
        let built = build(Formulation::Assb, &path3()).unwrap();
        let mut solver = ScriptedSolver {
            answer: Err(SolverError::SolveFailure {
                status: SolverStatus::Infeasible,
            }),
        };
        assert_eq!(
            solve(&built, &mut solver).unwrap_err(),
            ColoringError::InfeasibleFormulation {
                formulation: Formulation::Assb
            }
        );
    }

    #[test]
    fn test_other_failures_keep_solver_error() {
        let built = build(Formulation::Po, &path3()).unwrap();
        let mut solver = ScriptedSolver {
            answer: Err(SolverError::SolveFailure {
                status: SolverStatus::ReachedTimeLimit,
            }),
        };
        let err = solve(&built, &mut solver).unwrap_err();
        assert_eq!(err.code(), "SOLVER_TIME_LIMIT");
        assert!(matches!(
            err,
            ColoringError::Solver {
                formulation: Formulation::Po,
                ..
            }
        ));
    }

    #[test]
    fn test_violating_solution_is_rejected() {
        let built = build(Formulation::As, &path3()).unwrap();
        let clash: Coloring = [(1, 1), (2, 1), (3, 1)].into_iter().collect();
        let mut solver = ScriptedSolver {
            answer: Ok(built.encode(&clash).unwrap()),
        };
        let err = solve(&built, &mut solver).unwrap_err();
        assert_eq!(err.code(), "COLORING_INVALID");
        assert!(err.to_string().contains("violated rows"));
    }

    #[test]
    fn test_empty_graph_skips_solver() {
        let graph = Graph::new(Vec::new(), Vec::new()).unwrap();
        let built = build(Formulation::Post, &graph).unwrap();
        let mut solver = ScriptedSolver {
            answer: Err(SolverError::InternalError("must not be called".to_string())),
        };
        let outcome = solve(&built, &mut solver).unwrap();
        assert_eq!(outcome.chromatic_number(), Some(0));
        assert!(outcome.coloring.is_empty());
    }

    #[test]
    fn test_recovery_check_catches_inconsistent_order() {
        let built = build(Formulation::Post, &path3()).unwrap();
        let values = built.encode(&two_coloring()).unwrap();
        let mut shifted = two_coloring();
        shifted.assign(2, 3);
        let err = recovery_check(&built, &values, &shifted).unwrap_err();
        assert!(err.contains("vertex 2"));
        assert!(recovery_check(&built, &values, &two_coloring()).is_ok());
    }
}
