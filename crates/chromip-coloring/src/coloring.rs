//! Vertex-to-color assignments decoded from (or encoded into) solutions.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::{Graph, Vertex};

/// A color per vertex. Colors are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coloring {
    colors: BTreeMap<Vertex, u32>,
}

impl Coloring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, vertex: Vertex, color: u32) {
        self.colors.insert(vertex, color);
    }

    pub fn color_of(&self, vertex: Vertex) -> Option<u32> {
        self.colors.get(&vertex).copied()
    }

    /// Number of colored vertices.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of distinct colors in use.
    pub fn num_colors(&self) -> usize {
        self.colors.values().collect::<BTreeSet<_>>().len()
    }

    /// Largest color in use, 0 when nothing is colored.
    pub fn max_color(&self) -> u32 {
        self.colors.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vertex, u32)> + '_ {
        self.colors.iter().map(|(vertex, color)| (*vertex, *color))
    }

    /// Edges whose endpoints share a color.
    pub fn conflicts(&self, graph: &Graph) -> Vec<(Vertex, Vertex)> {
        graph
            .edges()
            .iter()
            .copied()
            .filter(|&(u, v)| {
                matches!((self.color_of(u), self.color_of(v)), (Some(a), Some(b)) if a == b)
            })
            .collect()
    }

    /// Vertices of `graph` without a color.
    pub fn uncolored(&self, graph: &Graph) -> Vec<Vertex> {
        graph
            .vertices()
            .iter()
            .copied()
            .filter(|vertex| !self.colors.contains_key(vertex))
            .collect()
    }

    /// Every vertex colored and no edge monochromatic.
    pub fn is_proper(&self, graph: &Graph) -> bool {
        self.uncolored(graph).is_empty() && self.conflicts(graph).is_empty()
    }

    /// Relabel so the colors in use are exactly `1..=k`, in order of their
    /// current values, and `reference` (when colored) carries color `k`.
    ///
    /// Relabeling is a bijection on colors, so properness is preserved.
    pub fn canonical(&self, reference: Option<Vertex>) -> Coloring {
        let used: BTreeSet<u32> = self.colors.values().copied().collect();
        let mut relabel: BTreeMap<u32, u32> = used
            .iter()
            .enumerate()
            .map(|(rank, color)| (*color, rank as u32 + 1))
            .collect();
        let top = used.len() as u32;

        if let Some(old) = reference.and_then(|vertex| self.color_of(vertex)) {
            let reference_label = relabel.get(&old).copied().unwrap_or(top);
            for label in relabel.values_mut() {
                if *label == top {
                    *label = reference_label;
                } else if *label == reference_label {
                    *label = top;
                }
            }
        }

        Coloring {
            colors: self
                .colors
                .iter()
                .map(|(vertex, color)| (*vertex, relabel.get(color).copied().unwrap_or(*color)))
                .collect(),
        }
    }
}

impl FromIterator<(Vertex, u32)> for Coloring {
    fn from_iter<I: IntoIterator<Item = (Vertex, u32)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::with_vertex_count(3, vec![(1, 2), (2, 3), (1, 3)]).unwrap()
    }

    #[test]
    fn test_proper_coloring_of_triangle() {
        let graph = triangle();
        let coloring: Coloring = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        assert!(coloring.is_proper(&graph));
        assert_eq!(coloring.num_colors(), 3);

        let clash: Coloring = [(1, 1), (2, 2), (3, 1)].into_iter().collect();
        assert_eq!(clash.conflicts(&graph), vec![(1, 3)]);
        assert!(!clash.is_proper(&graph));

        let partial: Coloring = [(1, 1), (2, 2)].into_iter().collect();
        assert_eq!(partial.uncolored(&graph), vec![3]);
    }

    #[test]
    fn test_canonical_compacts_and_lifts_reference() {
        let coloring: Coloring = [(1, 2), (2, 5), (3, 2), (4, 9)].into_iter().collect();
        let canonical = coloring.canonical(Some(1));
        // 2 -> 1, 5 -> 2, 9 -> 3, then vertex 1's label swaps with the top one
        assert_eq!(canonical.color_of(1), Some(3));
        assert_eq!(canonical.color_of(3), Some(3));
        assert_eq!(canonical.color_of(2), Some(2));
        assert_eq!(canonical.color_of(4), Some(1));
        assert_eq!(canonical.max_color(), 3);
        assert_eq!(canonical.num_colors(), 3);
    }

    #[test]
    fn test_canonical_keeps_properness() {
        let graph = triangle();
        let coloring: Coloring = [(1, 1), (2, 3), (3, 4)].into_iter().collect();
        let canonical = coloring.canonical(graph.reference_vertex());
        assert!(canonical.is_proper(&graph));
        assert_eq!(canonical.color_of(1), Some(3));
    }

    #[test]
    fn test_empty_coloring() {
        let coloring = Coloring::new();
        assert_eq!(coloring.max_color(), 0);
        assert_eq!(coloring.canonical(None), coloring);
    }
}
