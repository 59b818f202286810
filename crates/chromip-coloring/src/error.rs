//! Error type for graph input, model generation and the solve driver.

use chromip_core::{ModelError, SolverError};

use crate::formulation::Formulation;
use crate::graph::Vertex;

/// Errors produced while reading graphs, building formulations or solving them.
#[derive(Debug, Clone, PartialEq)]
pub enum ColoringError {
    /// Malformed DIMACS input; `line` is 1-based.
    Parse { line: usize, reason: String },
    /// The graph file could not be read.
    Io { path: String, message: String },
    /// Edge endpoints that are not vertices, or self-loops.
    InvalidGraph { reason: String },
    /// A family lookup outside its vertex or color range. Per-color families
    /// have no vertex index.
    IndexOutOfRange {
        family: &'static str,
        vertex: Option<Vertex>,
        color: u32,
    },
    /// The model store rejected a variable, row or objective.
    Model(ModelError),
    /// The solver proved the formulation infeasible.
    InfeasibleFormulation { formulation: Formulation },
    /// The solver ended without a usable solution.
    Solver {
        formulation: Formulation,
        source: SolverError,
    },
    /// A solution does not decode to a proper coloring.
    InvalidColoring {
        formulation: Formulation,
        reason: String,
    },
}

impl ColoringError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ColoringError::Parse { .. } => "GRAPH_PARSE",
            ColoringError::Io { .. } => "GRAPH_IO",
            ColoringError::InvalidGraph { .. } => "GRAPH_INVALID",
            ColoringError::IndexOutOfRange { .. } => "FAMILY_INDEX_OUT_OF_RANGE",
            ColoringError::Model(inner) => inner.code(),
            ColoringError::InfeasibleFormulation { .. } => "FORMULATION_INFEASIBLE",
            ColoringError::Solver { source, .. } => source.code(),
            ColoringError::InvalidColoring { .. } => "COLORING_INVALID",
        }
    }
}

impl std::fmt::Display for ColoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColoringError::Parse { line, reason } => {
                write!(f, "[{}] line {}: {}", self.code(), line, reason)
            }
            ColoringError::Io { path, message } => {
                write!(f, "[{}] cannot read '{}': {}", self.code(), path, message)
            }
            ColoringError::InvalidGraph { reason } => write!(f, "[{}] {}", self.code(), reason),
            ColoringError::IndexOutOfRange {
                family,
                vertex: Some(vertex),
                color,
            } => write!(
                f,
                "[{}] {}({}, {}) is not part of the family",
                self.code(),
                family,
                vertex,
                color
            ),
            ColoringError::IndexOutOfRange {
                family,
                vertex: None,
                color,
            } => write!(
                f,
                "[{}] {}({}) is not part of the family",
                self.code(),
                family,
                color
            ),
            ColoringError::Model(inner) => write!(f, "{inner}"),
            ColoringError::InfeasibleFormulation { formulation } => write!(
                f,
                "[{}] {} formulation reported infeasible; max degree + 1 colors always suffice",
                self.code(),
                formulation
            ),
            ColoringError::Solver {
                formulation,
                source,
            } => write!(f, "{source} ({formulation})"),
            ColoringError::InvalidColoring {
                formulation,
                reason,
            } => write!(f, "[{}] {}: {}", self.code(), formulation, reason),
        }
    }
}

impl std::error::Error for ColoringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ColoringError::Model(inner) => Some(inner),
            ColoringError::Solver { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ModelError> for ColoringError {
    fn from(err: ModelError) -> Self {
        ColoringError::Model(err)
    }
}
