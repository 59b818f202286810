//! Instrumentation for chromip runs.
//!
//! Resident-memory snapshots and per-stage wall-clock measurements, used by
//! the solver adapter's logs and the `compare` report.

pub mod memory;
pub mod stage;

pub use memory::{MemoryError, MemoryProbe, MemorySnapshot};
pub use stage::{StageMeasurement, StageTimer};
