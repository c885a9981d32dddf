//! Sprout Core
//!
//! Fiber-based reconciliation engine.
//!
//! An [`Element`] tree describes what the UI should look like. A [`Renderer`]
//! turns it into host nodes through a [`HostBinding`], one fiber per unit of
//! work, yielding to the host whenever its [`Deadline`] runs out. Finished
//! render passes are committed in one uninterrupted step.
//!
//! # Example
//! ```rust,ignore
//! use sprout_core::{Element, Renderer, Unbounded};
//!
//! let mut renderer = Renderer::new(host);
//! renderer.render(Element::new("div").child("hello"), container);
//! renderer.work_loop(&Unbounded)?;
//! ```

mod arena;
mod commit;
mod config;
mod element;
mod error;
mod fiber;
mod hooks;
mod host;
mod reconcile;
mod scheduler;

#[cfg(test)]
mod testing;

pub use arena::{GenArena, GenIndex};
pub use config::SchedulerConfig;
pub use element::{
    create_element, Component, Element, ElementKind, Event, EventHandler, PropValue, Props,
    CHILDREN, NODE_VALUE,
};
pub use error::{HostError, RenderError, RenderResult};
pub use fiber::{EffectTag, Fiber, FiberId, FiberKind};
pub use hooks::{RenderScope, SetState};
pub use host::{event_type, is_event, is_property, HostBinding, EVENT_PREFIX};
pub use reconcile::{MatchStrategy, Matching, Positional};
pub use scheduler::{Deadline, RenderStats, Renderer, Unbounded, UnitBudget, WorkStatus};
