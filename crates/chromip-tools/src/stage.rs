//! Wall-clock timing of named stages.

use std::time::{Duration, Instant};

use crate::memory::current_rss_mib;

/// Time and memory recorded for one finished stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageMeasurement {
    pub stage: String,
    pub elapsed: Duration,
    /// RSS at the end of the stage, when it could be read.
    pub rss_mib: Option<f64>,
}

impl StageMeasurement {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Running timer for a named stage.
#[derive(Debug)]
pub struct StageTimer {
    stage: String,
    started: Instant,
}

impl StageTimer {
    pub fn start(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            started: Instant::now(),
        }
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop the timer, sampling resident memory.
    pub fn finish(self) -> StageMeasurement {
        let elapsed = self.started.elapsed();
        StageMeasurement {
            stage: self.stage,
            elapsed,
            rss_mib: current_rss_mib(),
        }
    }

    /// Run `work` as a stage and return its output with the measurement.
    pub fn measure<T>(stage: impl Into<String>, work: impl FnOnce() -> T) -> (T, StageMeasurement) {
        let timer = Self::start(stage);
        let output = work();
        (output, timer.finish())
    }
}
