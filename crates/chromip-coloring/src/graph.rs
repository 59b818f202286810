//! Immutable graph input: vertex set, edge list and maximum degree.

use std::collections::BTreeMap;

use crate::error::ColoringError;

/// Vertex identifier (1-based in DIMACS input).
pub type Vertex = u32;

/// An undirected graph as handed to the formulation builders.
///
/// Vertices are kept sorted and unique. The edge list is kept as given,
/// duplicates included, so every occurrence produces its own conflict rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<(Vertex, Vertex)>,
    max_degree: u32,
}

impl Graph {
    /// Build a graph and compute its maximum degree.
    ///
    /// Each edge occurrence adds one to the degree of both endpoints, so a
    /// repeated edge counts twice.
    pub fn new(
        vertices: impl IntoIterator<Item = Vertex>,
        edges: Vec<(Vertex, Vertex)>,
    ) -> Result<Self, ColoringError> {
        let vertices = sorted_unique(vertices);
        validate_edges(&vertices, &edges)?;

        let mut degrees: BTreeMap<Vertex, u32> = BTreeMap::new();
        for &(u, v) in &edges {
            *degrees.entry(u).or_insert(0) += 1;
            *degrees.entry(v).or_insert(0) += 1;
        }
        let max_degree = degrees.values().copied().max().unwrap_or(0);

        Ok(Self {
            vertices,
            edges,
            max_degree,
        })
    }

    /// Graph on vertices `1..=num_vertices`.
    pub fn with_vertex_count(
        num_vertices: u32,
        edges: Vec<(Vertex, Vertex)>,
    ) -> Result<Self, ColoringError> {
        Self::new(1..=num_vertices, edges)
    }

    /// Build a graph with a caller-supplied maximum degree, which is trusted.
    pub fn from_parts(
        vertices: impl IntoIterator<Item = Vertex>,
        edges: Vec<(Vertex, Vertex)>,
        max_degree: u32,
    ) -> Result<Self, ColoringError> {
        let vertices = sorted_unique(vertices);
        validate_edges(&vertices, &edges)?;
        Ok(Self {
            vertices,
            edges,
            max_degree,
        })
    }

    /// Vertices in increasing order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(Vertex, Vertex)] {
        &self.edges
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn max_degree(&self) -> u32 {
        self.max_degree
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Position of `vertex` in [`Graph::vertices`].
    pub fn position(&self, vertex: Vertex) -> Option<usize> {
        self.vertices.binary_search(&vertex).ok()
    }

    /// Degree of a vertex, counting repeated edges.
    pub fn degree(&self, vertex: Vertex) -> usize {
        self.edges
            .iter()
            .map(|&(u, v)| usize::from(u == vertex) + usize::from(v == vertex))
            .sum()
    }

    /// The vertex whose color stands for the number of colors in the
    /// partial-order formulations: the smallest identifier.
    pub fn reference_vertex(&self) -> Option<Vertex> {
        self.vertices.first().copied()
    }
}

fn sorted_unique(vertices: impl IntoIterator<Item = Vertex>) -> Vec<Vertex> {
    let mut vertices: Vec<Vertex> = vertices.into_iter().collect();
    vertices.sort_unstable();
    vertices.dedup();
    vertices
}

fn validate_edges(vertices: &[Vertex], edges: &[(Vertex, Vertex)]) -> Result<(), ColoringError> {
    for &(u, v) in edges {
        if u == v {
            return Err(ColoringError::InvalidGraph {
                reason: format!("self-loop on vertex {u}"),
            });
        }
        for endpoint in [u, v] {
            if vertices.binary_search(&endpoint).is_err() {
                return Err(ColoringError::InvalidGraph {
                    reason: format!("edge ({u}, {v}) uses unknown vertex {endpoint}"),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_degree_of_path() {
        let graph = Graph::with_vertex_count(4, vec![(1, 2), (2, 3), (3, 4)]).unwrap();
        assert_eq!(graph.max_degree(), 2);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.reference_vertex(), Some(1));
    }

    #[test]
    fn test_repeated_edges_count_toward_degree() {
        let graph = Graph::with_vertex_count(2, vec![(1, 2), (2, 1)]).unwrap();
        assert_eq!(graph.max_degree(), 2);
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_isolated_vertices_have_degree_zero() {
        let graph = Graph::with_vertex_count(5, Vec::new()).unwrap();
        assert_eq!(graph.max_degree(), 0);
        assert_eq!(graph.num_vertices(), 5);
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new(Vec::new(), Vec::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.max_degree(), 0);
        assert_eq!(graph.reference_vertex(), None);
    }

    #[test]
    fn test_vertices_are_sorted_and_positioned() {
        let graph = Graph::new([7, 3, 5, 3], vec![(7, 3)]).unwrap();
        assert_eq!(graph.vertices(), &[3, 5, 7]);
        assert_eq!(graph.position(7), Some(2));
        assert_eq!(graph.position(4), None);
        assert_eq!(graph.reference_vertex(), Some(3));
    }

    #[test]
    fn test_invalid_edges_are_rejected() {
        let err = Graph::with_vertex_count(2, vec![(1, 1)]).unwrap_err();
        assert_eq!(err.code(), "GRAPH_INVALID");
        let err = Graph::with_vertex_count(2, vec![(1, 3)]).unwrap_err();
        assert!(err.to_string().contains("unknown vertex 3"));
    }

    #[test]
    fn test_from_parts_trusts_max_degree() {
        let graph = Graph::from_parts([1, 2], vec![(1, 2)], 4).unwrap();
        assert_eq!(graph.max_degree(), 4);
    }
}
