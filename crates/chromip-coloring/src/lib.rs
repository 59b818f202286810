//! Chromatic number through four integer-programming formulations.
//!
//! A [`Graph`] (usually read with [`dimacs::read_dimacs_file`]) is turned into
//! a [`ColoringModel`] by [`build`], for one of the [`Formulation`]s AS, ASSB,
//! PO or POST. [`solve`] hands the model to any
//! [`Solver`](chromip_core::Solver) and decodes a checked [`Coloring`].
//!
//! ```no_run
//! use chromip_coloring::{Formulation, build, dimacs, solve};
//! # fn run(solver: &mut dyn chromip_core::Solver) -> Result<(), chromip_coloring::ColoringError> {
//! let graph = dimacs::read_dimacs_file("myciel3.col")?;
//! let built = build(Formulation::Po, &graph)?;
//! let outcome = solve(&built, solver)?;
//! println!("chromatic number: {:?}", outcome.chromatic_number());
//! # Ok(())
//! # }
//! ```

pub mod coloring;
pub mod colors;
pub mod dimacs;
pub mod error;
pub mod family;
pub mod formulation;
pub mod graph;
pub mod solve;

pub use coloring::Coloring;
pub use colors::ColorDomain;
pub use error::ColoringError;
pub use family::{ColorFamily, VertexColorFamily};
pub use formulation::{
    ColoringModel, ConstraintFamily, Formulation, UnknownFormulation, build, build_all,
};
pub use graph::{Graph, Vertex};
pub use solve::{ColoringOutcome, solve};
