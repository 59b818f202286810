//! Partial-order block: `g[v,i]` (color above `i`) and `l[v,i]` (color
//! below `i`), plus the rows tying them to `x` in the hybrid encoding.

use chromip_expr::Expr;

use super::{Builder, ConstraintFamily};
use crate::error::ColoringError;
use crate::family::VertexColorFamily;

impl Builder<'_> {
    pub(crate) fn declare_order(
        &mut self,
    ) -> Result<(VertexColorFamily, VertexColorFamily), ColoringError> {
        let g = VertexColorFamily::declare(&mut self.model, "g", self.graph, self.colors)?;
        let l = VertexColorFamily::declare(&mut self.model, "l", self.graph, self.colors)?;
        Ok((g, l))
    }

    /// `min 1 + sum_i g[ref,i]`, the reference vertex's color.
    ///
    /// Without vertices the objective is the constant 0.
    pub(crate) fn order_objective(&mut self, g: &VertexColorFamily) -> Result<(), ColoringError> {
        let objective = match self.graph.reference_vertex() {
            Some(reference) => {
                let above = self
                    .colors
                    .iter()
                    .map(|i| g.get(reference, i))
                    .collect::<Result<Vec<_>, _>>()?;
                Expr::sum(above) + 1.0
            }
            None => Expr::from_constant(0.0),
        };
        self.model.minimize(objective)?;
        self.model
            .set_objective_name(Some("reference_color".to_string()));
        Ok(())
    }

    /// No color lies below 1 or above the last color.
    pub(crate) fn boundary_rows(
        &mut self,
        g: &VertexColorFamily,
        l: &VertexColorFamily,
    ) -> Result<(), ColoringError> {
        let graph = self.graph;
        let last = self.colors.max_color();
        for &v in graph.vertices() {
            self.add_row(
                ConstraintFamily::FirstColor,
                format_args!("{v}"),
                Expr::var(l.get(v, 1)?).eq_scalar(0.0),
            )?;
            self.add_row(
                ConstraintFamily::LastColor,
                format_args!("{v}"),
                Expr::var(g.get(v, last)?).eq_scalar(0.0),
            )?;
        }
        Ok(())
    }

    /// Monotonicity, complementarity and dominance over consecutive colors.
    ///
    /// The dominance row at the last color is omitted: both sides are fixed
    /// to 0 by the boundary rows.
    pub(crate) fn successor_rows(
        &mut self,
        g: &VertexColorFamily,
        l: &VertexColorFamily,
    ) -> Result<(), ColoringError> {
        let graph = self.graph;
        let Some(reference) = graph.reference_vertex() else {
            return Ok(());
        };
        for &v in graph.vertices() {
            for i in self.colors.with_successor() {
                let above = Expr::var(g.get(v, i)?);
                self.add_row(
                    ConstraintFamily::Monotonicity,
                    format_args!("{v},c{i}"),
                    (above.clone() - Expr::var(g.get(v, i + 1)?)).ge_scalar(0.0),
                )?;
                self.add_row(
                    ConstraintFamily::Complementarity,
                    format_args!("{v},c{i}"),
                    (above.clone() + Expr::var(l.get(v, i + 1)?)).eq_scalar(1.0),
                )?;
                self.add_row(
                    ConstraintFamily::Dominance,
                    format_args!("{v},c{i}"),
                    (Expr::var(g.get(reference, i)?) - above).ge_scalar(0.0),
                )?;
            }
        }
        Ok(())
    }

    /// Adjacent vertices differ: at every color one endpoint lies off it.
    pub(crate) fn order_conflict_rows(
        &mut self,
        g: &VertexColorFamily,
        l: &VertexColorFamily,
    ) -> Result<(), ColoringError> {
        let graph = self.graph;
        for &(u, v) in graph.edges() {
            for i in self.colors.iter() {
                let off = Expr::sum([g.get(u, i)?, l.get(u, i)?, g.get(v, i)?, l.get(v, i)?]);
                self.add_row(
                    ConstraintFamily::OrderConflict,
                    format_args!("{u},{v},c{i}"),
                    off.ge_scalar(1.0),
                )?;
            }
        }
        Ok(())
    }

    /// `x[v,i] = 1 - (g[v,i] + l[v,i])`
    pub(crate) fn recovery_rows(
        &mut self,
        x: &VertexColorFamily,
        g: &VertexColorFamily,
        l: &VertexColorFamily,
    ) -> Result<(), ColoringError> {
        let graph = self.graph;
        for i in self.colors.iter() {
            for &v in graph.vertices() {
                self.add_row(
                    ConstraintFamily::Recovery,
                    format_args!("{v},c{i}"),
                    Expr::sum([x.get(v, i)?, g.get(v, i)?, l.get(v, i)?]).eq_scalar(1.0),
                )?;
            }
        }
        Ok(())
    }
}
