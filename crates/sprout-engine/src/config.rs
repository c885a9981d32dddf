//! Engine Configuration

use sprout_core::SchedulerConfig;

use crate::FrameBudget;

/// Engine configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Tag of the container element mounted under the document
    pub container_tag: String,

    /// Idle budget handed to the render loop each tick
    pub frame_budget: FrameBudget,

    /// Renderer scheduling knobs
    pub scheduler: SchedulerConfig,

    /// Ticks `Engine::run_until_idle` runs before reporting a stall
    pub max_idle_turns: usize,

    /// Keep a log of DOM mutations
    pub record_mutations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_tag: "sprout-root".to_string(),
            frame_budget: FrameBudget::default(),
            scheduler: SchedulerConfig::default(),
            max_idle_turns: 10_000,
            record_mutations: false,
        }
    }
}
