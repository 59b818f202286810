//! Assignment block: `x[v,i]`, `w[i]` and the rows over them.

use chromip_expr::Expr;

use super::{Builder, ConstraintFamily};
use crate::error::ColoringError;
use crate::family::{ColorFamily, VertexColorFamily};

impl Builder<'_> {
    pub(crate) fn declare_assignment(&mut self) -> Result<VertexColorFamily, ColoringError> {
        Ok(VertexColorFamily::declare(
            &mut self.model,
            "x",
            self.graph,
            self.colors,
        )?)
    }

    pub(crate) fn declare_usage(&mut self) -> Result<ColorFamily, ColoringError> {
        Ok(ColorFamily::declare(&mut self.model, "w", self.colors)?)
    }

    /// `min sum_i w[i]`
    pub(crate) fn usage_objective(&mut self, w: &ColorFamily) -> Result<(), ColoringError> {
        self.model.minimize(Expr::sum(w.iter().map(|(_, var)| var)))?;
        self.model.set_objective_name(Some("colors_used".to_string()));
        Ok(())
    }

    /// Exactly one color per vertex.
    pub(crate) fn assignment_rows(&mut self, x: &VertexColorFamily) -> Result<(), ColoringError> {
        let graph = self.graph;
        for &v in graph.vertices() {
            let vars = self
                .colors
                .iter()
                .map(|i| x.get(v, i))
                .collect::<Result<Vec<_>, _>>()?;
            self.add_row(
                ConstraintFamily::Assignment,
                format_args!("{v}"),
                Expr::sum(vars).eq_scalar(1.0),
            )?;
        }
        Ok(())
    }

    /// Adjacent vertices never share a color, and a color held by either
    /// endpoint counts as used.
    pub(crate) fn link_conflict_rows(
        &mut self,
        x: &VertexColorFamily,
        w: &ColorFamily,
    ) -> Result<(), ColoringError> {
        let graph = self.graph;
        for &(u, v) in graph.edges() {
            for i in self.colors.iter() {
                let pair = Expr::var(x.get(u, i)?) + Expr::var(x.get(v, i)?);
                self.add_row(
                    ConstraintFamily::LinkConflict,
                    format_args!("{u},{v},c{i}"),
                    pair.le_expr(&Expr::var(w.get(i)?)),
                )?;
            }
        }
        Ok(())
    }

    /// A color counted as used is held by some vertex.
    pub(crate) fn usage_link_rows(
        &mut self,
        x: &VertexColorFamily,
        w: &ColorFamily,
    ) -> Result<(), ColoringError> {
        for i in self.colors.iter() {
            let holders = self
                .graph
                .vertices()
                .iter()
                .map(|&v| x.get(v, i))
                .collect::<Result<Vec<_>, _>>()?;
            self.add_row(
                ConstraintFamily::UsageLink,
                format_args!("{i}"),
                Expr::var(w.get(i)?).le_expr(&Expr::sum(holders)),
            )?;
        }
        Ok(())
    }

    /// Used colors form a prefix of `1..=max`.
    pub(crate) fn color_ordering_rows(&mut self, w: &ColorFamily) -> Result<(), ColoringError> {
        for i in self.colors.iter().skip(1) {
            self.add_row(
                ConstraintFamily::ColorOrdering,
                format_args!("{i}"),
                Expr::var(w.get(i)?).le_expr(&Expr::var(w.get(i - 1)?)),
            )?;
        }
        Ok(())
    }

    /// Adjacent vertices never share a color, without a usage variable.
    pub(crate) fn direct_conflict_rows(&mut self, x: &VertexColorFamily) -> Result<(), ColoringError> {
        let graph = self.graph;
        for i in self.colors.iter() {
            for &(u, v) in graph.edges() {
                let pair = Expr::var(x.get(u, i)?) + Expr::var(x.get(v, i)?);
                self.add_row(
                    ConstraintFamily::DirectConflict,
                    format_args!("{u},{v},c{i}"),
                    pair.le_scalar(1.0),
                )?;
            }
        }
        Ok(())
    }
}
