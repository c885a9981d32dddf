//! Engine - Main entry point

use sprout_core::{Element, Event, RenderError, Renderer, WorkStatus};
use sprout_dom::{DomTree, NodeId};

use crate::{Config, IdleScheduler};

/// One renderer bound to a container in an in-memory DOM
pub struct Engine {
    config: Config,
    renderer: Renderer<DomTree>,
    container: NodeId,
    idle: IdleScheduler,
    work_loop: Option<u64>,
}

impl Engine {
    /// Create the DOM, mount the container and arm the render loop
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let mut dom = if config.record_mutations {
            DomTree::with_mutation_log()
        } else {
            DomTree::new()
        };
        let container = dom.create_element(&config.container_tag);
        let root = dom.root();
        dom.append_child(root, container)
            .map_err(|err| RenderError::Host(err.into()))?;
        dom.take_mutations();

        let renderer = Renderer::with_config(dom, config.scheduler.clone());
        let mut idle = IdleScheduler::new(config.frame_budget);
        let work_loop = Some(idle.request_idle_callback(true));

        tracing::info!("Sprout Engine {} initialized", crate::VERSION);
        Ok(Self {
            config,
            renderer,
            container,
            idle,
            work_loop,
        })
    }

    /// Schedule `element` to be rendered into the container
    pub fn render(&mut self, element: Element) {
        self.renderer.render(element, self.container);
    }

    /// Run one idle period
    pub fn tick(&mut self) -> Result<WorkStatus, EngineError> {
        let renderer = &mut self.renderer;
        let work_loop = self.work_loop;
        let mut status = Ok(WorkStatus::Idle);
        self.idle.run_idle_callbacks(|id, deadline| {
            if Some(id) == work_loop {
                status = renderer.work_loop(deadline);
            }
        });
        Ok(status?)
    }

    /// Tick until the renderer has nothing left to do
    pub fn run_until_idle(&mut self) -> Result<(), EngineError> {
        if self.work_loop.is_none() {
            return Ok(());
        }
        for _ in 0..self.config.max_idle_turns {
            if self.tick()? == WorkStatus::Idle {
                return Ok(());
            }
        }
        tracing::warn!("Render loop still busy after {} idle turns", self.config.max_idle_turns);
        Err(EngineError::Stalled {
            turns: self.config.max_idle_turns,
        })
    }

    /// Stop giving the render loop idle time
    pub fn pause(&mut self) {
        if let Some(id) = self.work_loop.take() {
            self.idle.cancel_idle_callback(id);
            tracing::debug!("Render loop paused");
        }
    }

    pub fn resume(&mut self) {
        if self.work_loop.is_none() {
            self.work_loop = Some(self.idle.request_idle_callback(true));
            tracing::debug!("Render loop resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.work_loop.is_none()
    }

    /// Dispatch `event` at `target`, bubbling to the document.
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, target: NodeId, event: &Event) -> usize {
        self.dom().dispatch_event(target, event)
    }

    /// Dispatch at the first element with `tag` below the container
    pub fn dispatch_to_tag(&self, tag: &str, event: &Event) -> Option<usize> {
        let target = self.dom().find_by_tag(self.container, tag)?;
        Some(self.dispatch(target, event))
    }

    pub fn dom(&self) -> &DomTree {
        self.renderer.host()
    }

    pub fn dom_mut(&mut self) -> &mut DomTree {
        self.renderer.host_mut()
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Markup of everything rendered into the container
    pub fn markup(&self) -> String {
        self.dom().inner_markup(self.container)
    }

    pub fn renderer(&self) -> &Renderer<DomTree> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<DomTree> {
        &mut self.renderer
    }

    pub fn idle_scheduler(&self) -> &IdleScheduler {
        &self.idle
    }

    /// Get engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("container", &self.container)
            .field("paused", &self.is_paused())
            .field("stats", &self.renderer.stats())
            .finish()
    }
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Render loop did not settle within {turns} idle turns")]
    Stalled { turns: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_mounted() {
        let engine = Engine::new(Config::default()).unwrap();
        let container = engine.container();
        assert_eq!(engine.dom().parent(container), Some(engine.dom().root()));
        assert_eq!(engine.dom().tag_name(container), Some("sprout-root"));
        assert_eq!(engine.markup(), "");
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = Engine::new(Config::default()).unwrap();
        engine.render(Element::new("p").child("hi"));

        assert_eq!(engine.idle_scheduler().pending(), 1);
        engine.pause();
        assert!(engine.is_paused());
        assert_eq!(engine.idle_scheduler().pending(), 0);
        assert_eq!(engine.tick().unwrap(), WorkStatus::Idle);
        engine.run_until_idle().unwrap();
        assert_eq!(engine.markup(), "");

        engine.resume();
        engine.run_until_idle().unwrap();
        assert_eq!(engine.markup(), "<p>hi</p>");
    }

    #[test]
    fn test_stall_reported() {
        let eager = sprout_core::Component::new("Eager", |cx, _| {
            let (n, set) = cx.use_state(0u64);
            set.set(n + 1);
            Element::new("i").child(n as i64)
        });
        let config = Config {
            max_idle_turns: 20,
            ..Config::default()
        };
        let mut engine = Engine::new(config).unwrap();
        engine.render(Element::new(&eager));

        assert!(matches!(engine.run_until_idle(), Err(EngineError::Stalled { turns: 20 })));
    }
}
