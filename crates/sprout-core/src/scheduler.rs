//! Work loop
//!
//! Cooperative scheduler. The host calls [`Renderer::work_loop`] whenever it
//! has spare time; the loop processes one fiber at a time and returns as soon
//! as the [`Deadline`] runs low. `next_unit` is the resumption point, so the
//! next call picks up exactly where the last one stopped.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::fiber::FiberTree;
use crate::hooks::{RenderScope, RerenderSignal};
use crate::host::update_properties;
use crate::reconcile::reconcile_children;
use crate::{
    Component, Element, Fiber, FiberId, FiberKind, HostBinding, MatchStrategy, Positional, Props,
    RenderError, RenderResult, SchedulerConfig,
};

/// Time budget for one scheduling turn
pub trait Deadline {
    fn time_remaining(&self) -> Duration;
}

/// Never asks to yield
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

impl Deadline for Instant {
    fn time_remaining(&self) -> Duration {
        self.saturating_duration_since(Instant::now())
    }
}

/// Deadline that expires after a fixed number of units of work
#[derive(Debug)]
pub struct UnitBudget {
    remaining: Cell<usize>,
}

impl UnitBudget {
    pub fn new(units: usize) -> Self {
        Self {
            remaining: Cell::new(units),
        }
    }
}

impl Deadline for UnitBudget {
    /// Consulted once after every unit
    fn time_remaining(&self) -> Duration {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left == 0 { Duration::ZERO } else { Duration::MAX }
    }
}

/// Outcome of one scheduling turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// Nothing to do
    Idle,
    /// Yielded with work left
    Pending,
    /// Finished a render pass and committed it
    Committed,
}

/// Counters over the renderer's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub cycles_started: u64,
    pub cycles_discarded: u64,
    pub commits: u64,
    pub units: u64,
}

/// One render root: fiber trees, scheduler state and the host it drives
pub struct Renderer<H: HostBinding> {
    pub(crate) host: H,
    pub(crate) config: SchedulerConfig,
    pub(crate) fibers: FiberTree<H::Node>,
    pub(crate) strategy: Box<dyn MatchStrategy>,
    pub(crate) current_root: Option<FiberId>,
    pub(crate) wip_root: Option<FiberId>,
    pub(crate) next_unit: Option<FiberId>,
    pub(crate) deletions: Vec<FiberId>,
    pub(crate) signal: RerenderSignal,
    pub(crate) stats: RenderStats,
}

impl<H: HostBinding> Renderer<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, SchedulerConfig::default())
    }

    pub fn with_config(host: H, config: SchedulerConfig) -> Self {
        Self {
            host,
            config,
            fibers: FiberTree::new(),
            strategy: Box::new(Positional),
            current_root: None,
            wip_root: None,
            next_unit: None,
            deletions: Vec::new(),
            signal: RerenderSignal::default(),
            stats: RenderStats::default(),
        }
    }

    /// Replace the child matching strategy
    pub fn with_strategy(mut self, strategy: Box<dyn MatchStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Start a render cycle for `element` inside `container`.
    ///
    /// Chains off the committed tree when it was rendered into the same
    /// container; an unfinished work-in-progress tree is discarded.
    pub fn render(&mut self, element: Element, container: H::Node) {
        let alternate = self.current_root.filter(|id| {
            self.fibers
                .try_get(*id)
                .is_some_and(|root| root.host_node.as_ref() == Some(&container))
        });
        // This cycle reads every queued hook action anyway.
        self.signal.take();
        self.begin_cycle(root_element(vec![element]), container, alternate);
    }

    /// Run one scheduling turn
    pub fn work_loop(&mut self, deadline: &dyn Deadline) -> RenderResult<WorkStatus> {
        self.take_rerender_request()?;
        if self.wip_root.is_none() {
            return Ok(WorkStatus::Idle);
        }
        if !self.perform_work(deadline)? {
            return Ok(WorkStatus::Pending);
        }
        self.commit()?;
        Ok(WorkStatus::Committed)
    }

    /// Render phase only: process units until the deadline asks to yield.
    /// Returns `true` once the work-in-progress tree is complete.
    pub fn perform_work(&mut self, deadline: &dyn Deadline) -> RenderResult<bool> {
        while let Some(unit) = self.next_unit {
            match self.perform_unit_of_work(unit) {
                Ok(next) => self.next_unit = next,
                Err(err) => {
                    tracing::error!("Render aborted at fiber {}: {}", unit, err);
                    self.discard_work_in_progress();
                    return Err(err);
                }
            }
            if deadline.time_remaining() < self.config.yield_threshold {
                break;
            }
        }
        Ok(self.next_unit.is_none() && self.wip_root.is_some())
    }

    /// Drive the loop without a deadline until nothing is left to do
    pub fn flush(&mut self) -> RenderResult<()> {
        for _ in 0..self.config.flush_limit {
            if self.work_loop(&Unbounded)? == WorkStatus::Idle {
                return Ok(());
            }
        }
        Err(RenderError::FlushLimit {
            turns: self.config.flush_limit,
        })
    }

    /// Process one fiber and return the next one in depth-first order
    pub(crate) fn perform_unit_of_work(&mut self, id: FiberId) -> RenderResult<Option<FiberId>> {
        let kind = self.fibers.get(id)?.kind.clone();
        match kind {
            FiberKind::Root => self.update_root(id)?,
            FiberKind::Text | FiberKind::Host(_) => self.update_host_component(id)?,
            FiberKind::Component(component) => self.update_function_component(id, &component)?,
        }
        self.stats.units += 1;
        self.fibers.next_unit(id)
    }

    fn update_root(&mut self, id: FiberId) -> RenderResult<()> {
        let element = self.fibers.get(id)?.element.clone();
        self.reconcile(id, element.child_elements())
    }

    fn update_host_component(&mut self, id: FiberId) -> RenderResult<()> {
        let fiber = self.fibers.get(id)?;
        let element = fiber.element.clone();
        if fiber.host_node.is_none() {
            let node = match &fiber.kind {
                FiberKind::Text => self.host.create_text_node()?,
                FiberKind::Host(tag) => self.host.create_node(tag)?,
                _ => return Err(RenderError::Invariant("host update on a non-host fiber")),
            };
            update_properties(&mut self.host, &node, &Props::new(), element.props())?;
            tracing::trace!("Created host node {:?} for {}", node, id);
            self.fibers.get_mut(id)?.host_node = Some(node);
        }
        self.reconcile(id, element.child_elements())
    }

    fn update_function_component(
        &mut self,
        id: FiberId,
        component: &Component,
    ) -> RenderResult<()> {
        let fiber = self.fibers.get(id)?;
        let element = fiber.element.clone();
        let previous = fiber
            .alternate
            .and_then(|alt| self.fibers.try_get(alt))
            .map(|alt| alt.hooks.clone())
            .unwrap_or_default();

        let mut scope = RenderScope::new(
            component.name(),
            &previous,
            &self.signal,
            element.child_elements(),
        );
        let child = component.render(&mut scope, element.props());
        let hooks = scope.finish();
        tracing::trace!("Rendered <{}> with {} hooks", component.name(), hooks.len());

        self.fibers.get_mut(id)?.hooks = hooks;
        self.reconcile(id, std::slice::from_ref(&child))
    }

    fn reconcile(&mut self, id: FiberId, elements: &[Element]) -> RenderResult<()> {
        reconcile_children(
            &mut self.fibers,
            self.strategy.as_ref(),
            id,
            elements,
            &mut self.deletions,
        )
    }

    /// Re-render from the committed tree if a setter asked for it.
    ///
    /// Before the first commit there is nothing to re-render from, so the
    /// request stays pending until the mount in flight has committed.
    fn take_rerender_request(&mut self) -> RenderResult<()> {
        if !self.signal.pending() {
            return Ok(());
        }
        let Some(current) = self.current_root else {
            tracing::trace!("Holding re-render request until the first commit");
            return Ok(());
        };
        let requests = self.signal.take();
        let root = self.fibers.get(current)?;
        let container = root
            .host_node
            .clone()
            .ok_or(RenderError::Invariant("committed root has no container"))?;
        let element = root.element.clone();
        tracing::debug!("Re-rendering for {} state update(s)", requests);
        self.begin_cycle(element, container, Some(current));
        Ok(())
    }

    fn begin_cycle(&mut self, element: Element, container: H::Node, alternate: Option<FiberId>) {
        if self.wip_root.is_some() {
            tracing::debug!("Superseding unfinished render cycle");
            self.discard_work_in_progress();
        }
        let mut root = Fiber::new(FiberKind::Root, element);
        root.host_node = Some(container);
        root.alternate = alternate;
        let id = self.fibers.insert(root);

        self.wip_root = Some(id);
        self.next_unit = Some(id);
        self.deletions.clear();
        self.stats.cycles_started += 1;
        tracing::debug!("Render cycle {} started at {}", self.stats.cycles_started, id);
    }

    /// Drop the work-in-progress tree and its pending deletions
    pub(crate) fn discard_work_in_progress(&mut self) {
        for id in self.deletions.drain(..) {
            if let Ok(fiber) = self.fibers.get_mut(id) {
                fiber.effect_tag = None;
            }
        }
        if let Some(root) = self.wip_root.take() {
            let released = self.fibers.release(root);
            self.stats.cycles_discarded += 1;
            tracing::debug!("Discarded work-in-progress tree ({} fibers)", released);
        }
        self.next_unit = None;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn current_root(&self) -> Option<FiberId> {
        self.current_root
    }

    pub fn wip_root(&self) -> Option<FiberId> {
        self.wip_root
    }

    pub fn next_unit(&self) -> Option<FiberId> {
        self.next_unit
    }

    pub fn pending_deletions(&self) -> &[FiberId] {
        &self.deletions
    }

    pub fn fiber(&self, id: FiberId) -> Option<&Fiber<H::Node>> {
        self.fibers.try_get(id)
    }

    /// Children of `id` in sibling order
    pub fn fiber_children(&self, id: FiberId) -> Vec<FiberId> {
        self.fibers.children(id)
    }

    /// Number of live fibers across both trees
    pub fn fiber_count(&self) -> usize {
        self.fibers.len()
    }

    /// Render work in flight or a state update waiting for the next turn
    pub fn has_pending_work(&self) -> bool {
        self.wip_root.is_some() || (self.signal.pending() && self.current_root.is_some())
    }
}

impl<H: HostBinding + std::fmt::Debug> std::fmt::Debug for Renderer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("host", &self.host)
            .field("current_root", &self.current_root)
            .field("wip_root", &self.wip_root)
            .field("next_unit", &self.next_unit)
            .field("stats", &self.stats)
            .finish()
    }
}

fn root_element(children: Vec<Element>) -> Element {
    Element::new("#root").children(children)
}
