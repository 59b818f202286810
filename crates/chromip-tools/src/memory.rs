//! Resident memory snapshots of the current process.

use std::time::Instant;
use sysinfo::System;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A snapshot of memory state at a specific point in time.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    /// Resident set size in bytes
    pub rss_bytes: u64,
    /// Timestamp when this snapshot was captured
    pub timestamp: Instant,
    /// Name of the stage (e.g., "build", "solve")
    pub stage: String,
}

/// Errors produced by memory instrumentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl MemoryError {
    pub fn code(&self) -> &'static str {
        match self {
            MemoryError::ProcessNotFound { .. } => "MEMORY_PROCESS_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "[{}] failed to locate process {}", self.code(), pid)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

impl MemorySnapshot {
    /// Capture current memory state for a given stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the current process cannot be located.
    pub fn capture(stage: &str) -> Result<Self, MemoryError> {
        let pid = sysinfo::Pid::from(std::process::id() as usize);

        // Refresh only this process's memory
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::Some(&[pid]),
            true,
            sysinfo::ProcessRefreshKind::nothing().with_memory(),
        );

        let process = sys.process(pid).ok_or(MemoryError::ProcessNotFound {
            pid: std::process::id(),
        })?;

        Ok(MemorySnapshot {
            rss_bytes: process.memory(),
            timestamp: Instant::now(),
            stage: stage.to_string(),
        })
    }

    /// Resident set size in MiB.
    pub fn rss_mib(&self) -> f64 {
        self.rss_bytes as f64 / BYTES_PER_MIB
    }

    /// Difference in RSS bytes against an earlier snapshot (positive means growth).
    pub fn diff(&self, other: &Self) -> i64 {
        self.rss_bytes as i64 - other.rss_bytes as i64
    }
}

/// Current RSS in MiB, or `None` when the process cannot be inspected.
pub fn current_rss_mib() -> Option<f64> {
    MemorySnapshot::capture("probe")
        .ok()
        .map(|snapshot| snapshot.rss_mib())
}

/// A probe for tracking memory usage across multiple stages.
#[derive(Debug, Default)]
pub struct MemoryProbe {
    snapshots: Vec<MemorySnapshot>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a memory snapshot for a stage.
    pub fn record(&mut self, stage: &str) -> Result<(), MemoryError> {
        let snapshot = MemorySnapshot::capture(stage)?;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn snapshots(&self) -> &[MemorySnapshot] {
        &self.snapshots
    }

    /// Get the difference between the last two snapshots.
    pub fn last_diff(&self) -> Option<i64> {
        match self.snapshots.as_slice() {
            [.., prev, last] => Some(last.diff(prev)),
            _ => None,
        }
    }

    /// Highest RSS seen across all recorded stages.
    pub fn peak_bytes(&self) -> Option<u64> {
        self.snapshots.iter().map(|snapshot| snapshot.rss_bytes).max()
    }
}
