#![allow(clippy::float_cmp)]

use chromip_core::{Bounds, Constraint, Model, Objective, Sense, Solver, SolverConfig, SolverError, SolverStatus, Variable};
use chromip_expr::Expr;
use chromip_highs::{HighsModel, HighsSolver, HighsStatus, ObjectiveSense};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// minimize 2x + 3y subject to x + y >= 5, x,y >= 0
#[test]
fn test_simple_lp() {
    init_tracing();
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous(Bounds::new(0.0, f64::INFINITY)))
        .unwrap();
    let y = model
        .add_variable(Variable::continuous(Bounds::new(0.0, f64::INFINITY)))
        .unwrap();
    let constraint = model
        .add_constraint(Constraint {
            bounds: Bounds::new(5.0, f64::INFINITY),
        })
        .unwrap();
    model.set_coefficient(x, constraint, 1.0).unwrap();
    model.set_coefficient(y, constraint, 1.0).unwrap();
    model
        .set_objective(Objective {
            sense: Some(Sense::Minimize),
            terms: vec![(x, 2.0), (y, 3.0)],
            constant: 0.0,
        })
        .unwrap();

    let solution = HighsSolver::default().solve(&model).expect("solve failed");
    assert!(solution.is_optimal());
    assert!((solution.objective_value - 10.0).abs() < 1e-6);
    assert!((solution.value(x).unwrap() - 5.0).abs() < 1e-6);
}

/// Two binaries that cannot both be set; maximize their sum plus one.
#[test]
fn test_binary_packing_with_constant() {
    init_tracing();
    let mut model = Model::new();
    let a = model.add_binary("a").unwrap();
    let b = model.add_binary("b").unwrap();
    model
        .add_named_constraint((Expr::var(a) + Expr::var(b)).le_scalar(1.0), "pack")
        .unwrap();
    model.maximize(Expr::var(a) + Expr::var(b) + 1.0).unwrap();

    let mut solver = HighsSolver::new(SolverConfig::new().with_presolve(false));
    let solution = solver.solve(&model).expect("solve failed");
    assert!((solution.objective_value - 2.0).abs() < 1e-6);
    assert!(solution.is_set(a) ^ solution.is_set(b));
    assert_eq!(solution.metadata.get("presolve").map(String::as_str), Some("false"));
    assert!(model.violations(&solution.primal_values, 1e-6).unwrap().is_empty());
}

#[test]
fn test_infeasible_model_is_an_error() {
    init_tracing();
    let mut model = Model::new();
    let x = model.add_binary("x").unwrap();
    model.add_constraint_expr(Expr::var(x).ge_scalar(2.0)).unwrap();
    model.minimize(Expr::var(x)).unwrap();

    let err = HighsSolver::new(SolverConfig::new().with_presolve(true))
        .solve(&model)
        .unwrap_err();
    assert!(matches!(
        err,
        SolverError::SolveFailure {
            status: SolverStatus::Infeasible | SolverStatus::Unknown
        }
    ));
}

#[test]
fn test_empty_model_returns_constant() {
    let mut model = Model::new();
    model.minimize(Expr::from_constant(0.0)).unwrap();
    let solution = HighsSolver::default().solve(&model).unwrap();
    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_eq!(solution.objective_value, 0.0);
    assert!(solution.primal_values.is_empty());
}

#[test]
fn test_wrapper_minimize_simple() {
    init_tracing();
    let mut model = HighsModel::new();
    let x = model.add_col(1.0, f64::INFINITY, 1.0);
    model.set_objective_sense(ObjectiveSense::Minimize);
    assert_eq!(model.columns(), 1);

    let status = model.solve();
    assert_eq!(status, HighsStatus::Optimal);
    assert_eq!(model.columns(), 0);

    let obj_value = model.objective_value().expect("missing objective value");
    let values = model.col_values().expect("missing solution");
    assert!((obj_value - 1.0).abs() < 1e-6);
    assert!((values[x] - 1.0).abs() < 1e-6);
}

#[test]
fn test_version_is_reported() {
    assert!(chromip_highs::highs_version().is_some_and(|version| !version.is_empty()));
}
