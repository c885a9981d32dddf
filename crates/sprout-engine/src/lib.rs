//! Sprout Engine
//!
//! An incremental UI renderer driving an in-memory DOM.
//!
//! The engine owns one [`Renderer`] bound to a container element and gives
//! its work loop a slice of every idle period. Element trees go in through
//! [`Engine::render`]; state updates from components schedule themselves.
//!
//! # Example
//! ```rust,ignore
//! use sprout_engine::{Config, Element, Engine};
//!
//! let mut engine = Engine::new(Config::default())?;
//! engine.render(Element::new("div").prop("id", "foo").child("hello"));
//! engine.run_until_idle()?;
//! assert_eq!(engine.markup(), "<div id=\"foo\">hello</div>");
//! ```

mod config;
mod engine;
pub mod frame_scheduler;

pub use config::Config;
pub use engine::{Engine, EngineError};
pub use frame_scheduler::{FrameBudget, IdleDeadline, IdleScheduler, IdleStats};

pub use sprout_core::{
    create_element, Component, Deadline, EffectTag, Element, ElementKind, Event, EventHandler,
    FiberId, HostBinding, HostError, PropValue, Props, RenderError, RenderScope, RenderStats,
    Renderer, SchedulerConfig, SetState, Unbounded, UnitBudget, WorkStatus,
};
pub use sprout_dom as dom;
pub use sprout_dom::{DomTree, MutationRecord, NodeId};

use tracing_subscriber::EnvFilter;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a `tracing` fmt subscriber filtered by `RUST_LOG` (default `info`).
/// Does nothing if a global subscriber is already set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
