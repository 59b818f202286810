//! Solver configuration types.

/// Configuration options for solver behavior.
///
/// Every option is handed through to the backend untouched; `None` keeps the
/// backend's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance.
    pub mip_gap: Option<f64>,
    /// Verbosity level.
    pub verbosity: Option<u32>,
    /// Enable/disable presolve.
    pub presolve: Option<bool>,
    /// Number of threads to use.
    pub threads: Option<u32>,
    /// Log solver output to console.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Set the verbosity level.
    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    /// Enable or disable presolve.
    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Enable or disable console logging.
    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_is_empty() {
        assert!(SolverConfig::new().is_empty());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_mip_gap(0.01)
            .with_verbosity(1)
            .with_presolve(false)
            .with_threads(4)
            .with_log_to_console(false);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.mip_gap, Some(0.01));
        assert_eq!(config.verbosity, Some(1));
        assert_eq!(config.presolve, Some(false));
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.log_to_console, Some(false));
    }

    #[test]
    fn test_config_partial_is_not_empty() {
        let config = SolverConfig::new().with_time_limit(30.0);
        assert!(!config.is_empty());
        assert_eq!(config.mip_gap, None);
    }
}
