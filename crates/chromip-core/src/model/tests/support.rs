use crate::model::Model;
use crate::types::{Bounds, Constraint};
use chromip_expr::Expr;
use chromip_expr::ids::VariableId;

pub(super) fn bounded_constraint(lower: f64, upper: f64) -> Constraint {
    Constraint {
        bounds: Bounds::new(lower, upper),
    }
}

/// `a + b <= 1` over two binaries, returned with their ids.
pub(super) fn packing_pair() -> (Model, VariableId, VariableId) {
    let mut model = Model::new();
    let a = model.add_binary("a").unwrap();
    let b = model.add_binary("b").unwrap();
    model
        .add_named_constraint((Expr::var(a) + Expr::var(b)).le_scalar(1.0), "pack")
        .unwrap();
    (model, a, b)
}
