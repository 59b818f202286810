//! Candidate colors `{1 ..= max_degree + 1}`.

use std::ops::{Range, RangeInclusive};

/// The color set shared by every formulation of one graph.
///
/// A greedy coloring never needs more than `max_degree + 1` colors, so every
/// formulation over this domain is feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDomain {
    max_color: u32,
}

impl ColorDomain {
    pub fn from_max_degree(max_degree: u32) -> Self {
        Self {
            max_color: max_degree.saturating_add(1),
        }
    }

    /// Largest color, `max_degree + 1`.
    pub fn max_color(&self) -> u32 {
        self.max_color
    }

    pub fn len(&self) -> usize {
        self.max_color as usize
    }

    /// Never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, color: u32) -> bool {
        (1..=self.max_color).contains(&color)
    }

    pub fn iter(&self) -> RangeInclusive<u32> {
        1..=self.max_color
    }

    /// Colors `i` with `i < max_color`, the ones that have a successor.
    pub fn with_successor(&self) -> Range<u32> {
        1..self.max_color
    }
}
