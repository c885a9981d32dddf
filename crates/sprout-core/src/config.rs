//! Scheduler Configuration

use std::time::Duration;

/// Scheduler configuration options
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Yield back to the host once the deadline reports less than this
    pub yield_threshold: Duration,

    /// Maximum number of turns `Renderer::flush` runs before giving up
    pub flush_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            flush_limit: 1_000,
        }
    }
}
