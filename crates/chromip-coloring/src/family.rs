//! Dense, bounds-checked variable families.

use chromip_core::{Model, ModelError};
use chromip_expr::VariableId;

use crate::colors::ColorDomain;
use crate::error::ColoringError;
use crate::graph::{Graph, Vertex};

/// Binary variables indexed by `(vertex, color)`, e.g. `x`, `g`, `l`.
///
/// Stored row-major by vertex position, then `color - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexColorFamily {
    name: &'static str,
    vertices: Vec<Vertex>,
    num_colors: usize,
    vars: Vec<VariableId>,
}

impl VertexColorFamily {
    /// Declare one binary `name(v,i)` per vertex and color.
    pub(crate) fn declare(
        model: &mut Model,
        name: &'static str,
        graph: &Graph,
        colors: ColorDomain,
    ) -> Result<Self, ModelError> {
        let mut vars = Vec::with_capacity(graph.num_vertices() * colors.len());
        for &vertex in graph.vertices() {
            for color in colors.iter() {
                vars.push(model.add_binary(format!("{name}({vertex},{color})"))?);
            }
        }
        Ok(Self {
            name,
            vertices: graph.vertices().to_vec(),
            num_colors: colors.len(),
            vars,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable for `(vertex, color)`.
    pub fn get(&self, vertex: Vertex, color: u32) -> Result<VariableId, ColoringError> {
        let out_of_range = || ColoringError::IndexOutOfRange {
            family: self.name,
            vertex: Some(vertex),
            color,
        };
        let position = self
            .vertices
            .binary_search(&vertex)
            .map_err(|_| out_of_range())?;
        if color == 0 || color as usize > self.num_colors {
            return Err(out_of_range());
        }
        self.vars
            .get(position * self.num_colors + (color as usize - 1))
            .copied()
            .ok_or_else(out_of_range)
    }

    /// All `(vertex, color, variable)` triples in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Vertex, u32, VariableId)> + '_ {
        self.vars.iter().enumerate().map(|(idx, var)| {
            let vertex = self.vertices[idx / self.num_colors];
            let color = (idx % self.num_colors) as u32 + 1;
            (vertex, color, *var)
        })
    }
}

/// Binary variables indexed by color, e.g. `w`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorFamily {
    name: &'static str,
    vars: Vec<VariableId>,
}

impl ColorFamily {
    /// Declare one binary `name(i)` per color.
    pub(crate) fn declare(
        model: &mut Model,
        name: &'static str,
        colors: ColorDomain,
    ) -> Result<Self, ModelError> {
        let vars = colors
            .iter()
            .map(|color| model.add_binary(format!("{name}({color})")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, vars })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn get(&self, color: u32) -> Result<VariableId, ColoringError> {
        color
            .checked_sub(1)
            .and_then(|idx| self.vars.get(idx as usize))
            .copied()
            .ok_or(ColoringError::IndexOutOfRange {
                family: self.name,
                vertex: None,
                color,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, VariableId)> + '_ {
        self.vars
            .iter()
            .enumerate()
            .map(|(idx, var)| (idx as u32 + 1, *var))
    }
}
