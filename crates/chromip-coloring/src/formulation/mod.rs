//! The four integer-programming encodings of graph coloring.
//!
//! - AS: assignment variables `x`, color-usage variables `w`
//! - ASSB: AS with usage-link and color-ordering rows
//! - PO: order indicators `g` (color above `i`) and `l` (color below `i`)
//! - POST: PO plus assignment variables recovered from `g` and `l`
//!
//! Every builder is a pure function of the graph; the returned
//! [`ColoringModel`] owns its model and only lends it out by shared reference.

mod assignment;
mod partial_order;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chromip_core::Model;
use chromip_expr::ConstraintExpr;
use tracing::debug;

use crate::coloring::Coloring;
use crate::colors::ColorDomain;
use crate::error::ColoringError;
use crate::family::{ColorFamily, VertexColorFamily};
use crate::graph::{Graph, Vertex};

/// Which encoding to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Formulation {
    /// Assignment based.
    As,
    /// Assignment based with symmetry breaking.
    Assb,
    /// Partial-order based.
    Po,
    /// Partial-order/assignment hybrid.
    Post,
}

impl Formulation {
    pub const ALL: [Formulation; 4] = [
        Formulation::As,
        Formulation::Assb,
        Formulation::Po,
        Formulation::Post,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Formulation::As => "AS",
            Formulation::Assb => "ASSB",
            Formulation::Po => "PO",
            Formulation::Post => "POST",
        }
    }

    /// Constraint families of this encoding, in build order.
    pub fn families(self) -> &'static [ConstraintFamily] {
        use ConstraintFamily::*;
        match self {
            Formulation::As => &[Assignment, LinkConflict],
            Formulation::Assb => &[Assignment, LinkConflict, UsageLink, ColorOrdering],
            Formulation::Po => &[
                FirstColor,
                LastColor,
                Monotonicity,
                Complementarity,
                Dominance,
                OrderConflict,
            ],
            Formulation::Post => &[
                FirstColor,
                LastColor,
                Monotonicity,
                Complementarity,
                Dominance,
                OrderConflict,
                Recovery,
                DirectConflict,
            ],
        }
    }

    /// Whether the encoding carries assignment variables `x`.
    pub fn has_assignment(self) -> bool {
        !matches!(self, Formulation::Po)
    }

    /// Whether the encoding carries order indicators `g` and `l`.
    pub fn has_order(self) -> bool {
        matches!(self, Formulation::Po | Formulation::Post)
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A formulation name that is none of AS, ASSB, PO, POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormulation(pub String);

impl fmt::Display for UnknownFormulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[FORMULATION_UNKNOWN] '{}' is not one of AS, ASSB, PO, POST",
            self.0
        )
    }
}

impl std::error::Error for UnknownFormulation {}

impl FromStr for Formulation {
    type Err = UnknownFormulation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formulation::ALL
            .into_iter()
            .find(|formulation| formulation.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFormulation(s.to_string()))
    }
}

/// A named group of rows; each row is named `<prefix>(<indices>)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// `sum_i x[v,i] == 1`
    Assignment,
    /// `x[u,i] + x[v,i] <= w[i]`
    LinkConflict,
    /// `w[i] <= sum_v x[v,i]`
    UsageLink,
    /// `w[i] <= w[i-1]`
    ColorOrdering,
    /// `l[v,1] == 0`
    FirstColor,
    /// `g[v,max] == 0`
    LastColor,
    /// `g[v,i] - g[v,i+1] >= 0`
    Monotonicity,
    /// `g[v,i] + l[v,i+1] == 1`
    Complementarity,
    /// `g[ref,i] - g[v,i] >= 0`
    Dominance,
    /// `g[u,i] + l[u,i] + g[v,i] + l[v,i] >= 1`
    OrderConflict,
    /// `x[v,i] + g[v,i] + l[v,i] == 1`
    Recovery,
    /// `x[u,i] + x[v,i] <= 1`
    DirectConflict,
}

impl ConstraintFamily {
    pub fn prefix(self) -> &'static str {
        match self {
            ConstraintFamily::Assignment => "assign",
            ConstraintFamily::LinkConflict => "conflict",
            ConstraintFamily::UsageLink => "usage",
            ConstraintFamily::ColorOrdering => "order",
            ConstraintFamily::FirstColor => "first_color",
            ConstraintFamily::LastColor => "last_color",
            ConstraintFamily::Monotonicity => "monotone",
            ConstraintFamily::Complementarity => "complement",
            ConstraintFamily::Dominance => "dominance",
            ConstraintFamily::OrderConflict => "order_conflict",
            ConstraintFamily::Recovery => "recover",
            ConstraintFamily::DirectConflict => "direct_conflict",
        }
    }

    /// Rows of this family for `n` vertices, `m` edge occurrences and `k`
    /// colors. Successor families skip the last color.
    pub fn expected_rows(self, n: usize, m: usize, k: usize) -> usize {
        let successors = k.saturating_sub(1);
        match self {
            ConstraintFamily::Assignment
            | ConstraintFamily::FirstColor
            | ConstraintFamily::LastColor => n,
            ConstraintFamily::LinkConflict
            | ConstraintFamily::OrderConflict
            | ConstraintFamily::DirectConflict => m * k,
            ConstraintFamily::UsageLink => k,
            ConstraintFamily::ColorOrdering => successors,
            ConstraintFamily::Monotonicity
            | ConstraintFamily::Complementarity
            | ConstraintFamily::Dominance => n * successors,
            ConstraintFamily::Recovery => n * k,
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Accumulates one formulation's variables and rows.
pub(crate) struct Builder<'g> {
    model: Model,
    graph: &'g Graph,
    colors: ColorDomain,
}

impl<'g> Builder<'g> {
    /// Start an empty model sized for `formulation` on `graph`.
    fn new(formulation: Formulation, graph: &'g Graph) -> Self {
        let colors = ColorDomain::from_max_degree(graph.max_degree());
        let (n, m, k) = (graph.num_vertices(), graph.num_edges(), colors.len());
        let assignment = if formulation.has_assignment() { n * k } else { 0 };
        let order_or_usage = if formulation.has_order() { 2 * n * k } else { k };
        let rows = formulation
            .families()
            .iter()
            .map(|family| family.expected_rows(n, m, k))
            .sum();
        Self {
            model: Model::with_capacities(assignment + order_or_usage, rows),
            graph,
            colors,
        }
    }

    /// Add a named row of `family`.
    pub(crate) fn add_row(
        &mut self,
        family: ConstraintFamily,
        indices: fmt::Arguments<'_>,
        row: ConstraintExpr,
    ) -> Result<(), ColoringError> {
        let name = format!("{}({})", family.prefix(), indices);
        tracing::trace!(
            component = "coloring",
            operation = "add_row",
            status = "success",
            family = family.prefix(),
            name = %name,
            "Adding constraint row"
        );
        self.model.add_named_constraint(row, name)?;
        Ok(())
    }
}

/// Variable families present in a built formulation.
#[derive(Debug, Clone, Default)]
struct Families {
    x: Option<VertexColorFamily>,
    w: Option<ColorFamily>,
    g: Option<VertexColorFamily>,
    l: Option<VertexColorFamily>,
}

/// A built formulation: the model plus the families needed to read it.
#[derive(Debug, Clone)]
pub struct ColoringModel {
    formulation: Formulation,
    model: Model,
    colors: ColorDomain,
    graph: Graph,
    families: Families,
    build_time: Duration,
}

impl ColoringModel {
    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn colors(&self) -> ColorDomain {
        self.colors
    }

    /// The graph this formulation was built from.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Vertex whose color is the objective of PO and POST.
    pub fn reference_vertex(&self) -> Option<Vertex> {
        self.graph.reference_vertex()
    }

    pub fn x(&self) -> Option<&VertexColorFamily> {
        self.families.x.as_ref()
    }

    pub fn w(&self) -> Option<&ColorFamily> {
        self.families.w.as_ref()
    }

    pub fn g(&self) -> Option<&VertexColorFamily> {
        self.families.g.as_ref()
    }

    pub fn l(&self) -> Option<&VertexColorFamily> {
        self.families.l.as_ref()
    }

    pub fn build_time(&self) -> Duration {
        self.build_time
    }

    /// Row count per constraint family, in build order.
    pub fn family_counts(&self) -> Vec<(ConstraintFamily, usize)> {
        self.formulation
            .families()
            .iter()
            .map(|family| {
                let prefix = format!("{}(", family.prefix());
                (*family, self.model.count_constraints_with_prefix(&prefix))
            })
            .collect()
    }

    /// Canonical primal vector for a coloring of every vertex.
    ///
    /// `x[v,c(v)] = 1`, `w[i] = 1` for used colors, `g[v,i] = [c(v) > i]` and
    /// `l[v,i] = [c(v) < i]`. The vector satisfies the model whenever the
    /// coloring is proper, uses colors `1..=k` and (for PO and POST) gives the
    /// reference vertex color `k`; see [`Coloring::canonical`].
    pub fn encode(&self, coloring: &Coloring) -> Result<Vec<f64>, ColoringError> {
        let mut values = vec![0.0; self.model.num_variables()];
        for &vertex in self.graph.vertices() {
            let color = coloring
                .color_of(vertex)
                .ok_or_else(|| ColoringError::InvalidColoring {
                    formulation: self.formulation,
                    reason: format!("vertex {vertex} has no color"),
                })?;
            if let Some(x) = self.x() {
                values[x.get(vertex, color)?.index()] = 1.0;
            }
            if let Some(w) = self.w() {
                values[w.get(color)?.index()] = 1.0;
            }
            if let (Some(g), Some(l)) = (self.g(), self.l()) {
                if !self.colors.contains(color) {
                    return Err(ColoringError::IndexOutOfRange {
                        family: g.name(),
                        vertex: Some(vertex),
                        color,
                    });
                }
                for i in self.colors.iter() {
                    values[g.get(vertex, i)?.index()] = f64::from(u8::from(color > i));
                    values[l.get(vertex, i)?.index()] = f64::from(u8::from(color < i));
                }
            }
        }
        Ok(values)
    }

    /// Read the coloring out of a primal vector.
    ///
    /// Assignment encodings use the unique set `x[v,i]`; PO uses the unique
    /// color with neither `g[v,i]` nor `l[v,i]` set.
    pub fn decode(&self, values: &[f64]) -> Result<Coloring, ColoringError> {
        let is_set = |var: chromip_expr::VariableId| {
            values.get(var.index()).is_some_and(|value| *value > 0.5)
        };
        let mut coloring = Coloring::new();
        for &vertex in self.graph.vertices() {
            let mut chosen = Vec::new();
            for color in self.colors.iter() {
                let picked = match (self.x(), self.g(), self.l()) {
                    (Some(x), _, _) => is_set(x.get(vertex, color)?),
                    (None, Some(g), Some(l)) => {
                        !is_set(g.get(vertex, color)?) && !is_set(l.get(vertex, color)?)
                    }
                    _ => false,
                };
                if picked {
                    chosen.push(color);
                }
            }
            match chosen.as_slice() {
                [color] => coloring.assign(vertex, *color),
                _ => {
                    return Err(ColoringError::InvalidColoring {
                        formulation: self.formulation,
                        reason: format!("vertex {vertex} decodes to colors {chosen:?}"),
                    });
                }
            }
        }
        Ok(coloring)
    }
}

/// Build one formulation for `graph`.
pub fn build(formulation: Formulation, graph: &Graph) -> Result<ColoringModel, ColoringError> {
    let started = Instant::now();
    let mut builder = Builder::new(formulation, graph);
    let mut families = Families::default();

    let x = if formulation.has_assignment() {
        Some(builder.declare_assignment()?)
    } else {
        None
    };
    if formulation.has_order() {
        let (g, l) = builder.declare_order()?;
        builder.order_objective(&g)?;
        builder.boundary_rows(&g, &l)?;
        builder.successor_rows(&g, &l)?;
        builder.order_conflict_rows(&g, &l)?;
        if let Some(x) = &x {
            builder.recovery_rows(x, &g, &l)?;
            builder.direct_conflict_rows(x)?;
        }
        families.g = Some(g);
        families.l = Some(l);
    } else if let Some(x) = &x {
        let w = builder.declare_usage()?;
        builder.usage_objective(&w)?;
        builder.assignment_rows(x)?;
        builder.link_conflict_rows(x, &w)?;
        if formulation == Formulation::Assb {
            builder.usage_link_rows(x, &w)?;
            builder.color_ordering_rows(&w)?;
        }
        families.w = Some(w);
    }
    families.x = x;

    let Builder { model, colors, .. } = builder;
    let build_time = started.elapsed();
    debug!(
        component = "coloring",
        operation = "build",
        status = "success",
        formulation = formulation.as_str(),
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        colors = colors.len(),
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        duration_ms = build_time.as_secs_f64() * 1000.0,
        "Built coloring formulation"
    );

    Ok(ColoringModel {
        formulation,
        model,
        colors,
        graph: graph.clone(),
        families,
        build_time,
    })
}

/// Build several formulations of the same graph, concurrently when the
/// `parallel` feature is on. Results keep the order of `formulations`.
pub fn build_all(
    formulations: &[Formulation],
    graph: &Graph,
) -> Vec<Result<ColoringModel, ColoringError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        formulations
            .par_iter()
            .map(|formulation| build(*formulation, graph))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        formulations
            .iter()
            .map(|formulation| build(*formulation, graph))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests;
