//! Fiber tree
//!
//! One fiber per rendered element. Fibers are stored in a [`GenArena`] and
//! linked by index: `child` points at the first child, `sibling` at the next
//! one, `parent` back up. `alternate` links a work-in-progress fiber to the
//! fiber it replaces in the committed tree.

use crate::arena::{GenArena, GenIndex};
use crate::hooks::HookCell;
use crate::{Component, Element, ElementKind, Props, RenderError};

/// Fiber handle
pub type FiberId = GenIndex;

/// Side effect recorded during reconciliation, consumed by commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTag {
    Placement,
    Update,
    Deletion,
}

/// Fiber variant
#[derive(Debug, Clone)]
pub enum FiberKind {
    /// Owns the container node passed to `render`
    Root,
    Text,
    Host(String),
    Component(Component),
}

impl FiberKind {
    pub fn from_element(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Text => FiberKind::Text,
            ElementKind::Tagged(tag) => FiberKind::Host(tag.clone()),
            ElementKind::Component(c) => FiberKind::Component(c.clone()),
        }
    }

    /// Whether an element of `kind` can update this fiber in place
    pub fn matches(&self, kind: &ElementKind) -> bool {
        match (self, kind) {
            (FiberKind::Text, ElementKind::Text) => true,
            (FiberKind::Host(a), ElementKind::Tagged(b)) => a == b,
            (FiberKind::Component(a), ElementKind::Component(b)) => a.same(b),
            _ => false,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, FiberKind::Component(_))
    }
}

/// Unit of work
#[derive(Debug)]
pub struct Fiber<N> {
    pub(crate) kind: FiberKind,
    pub(crate) element: Element,
    pub(crate) host_node: Option<N>,
    pub(crate) parent: Option<FiberId>,
    pub(crate) child: Option<FiberId>,
    pub(crate) sibling: Option<FiberId>,
    pub(crate) alternate: Option<FiberId>,
    pub(crate) effect_tag: Option<EffectTag>,
    pub(crate) hooks: Vec<HookCell>,
}

impl<N> Fiber<N> {
    pub(crate) fn new(kind: FiberKind, element: Element) -> Self {
        Self {
            kind,
            element,
            host_node: None,
            parent: None,
            child: None,
            sibling: None,
            alternate: None,
            effect_tag: None,
            hooks: Vec::new(),
        }
    }

    pub fn kind(&self) -> &FiberKind {
        &self.kind
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn props(&self) -> &Props {
        self.element.props()
    }

    pub fn host_node(&self) -> Option<&N> {
        self.host_node.as_ref()
    }

    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    pub fn effect_tag(&self) -> Option<EffectTag> {
        self.effect_tag
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Tag name for host fibers, `#text` for text, component name otherwise
    pub fn label(&self) -> &str {
        match &self.kind {
            FiberKind::Root => "#root",
            FiberKind::Text => "#text",
            FiberKind::Host(tag) => tag,
            FiberKind::Component(c) => c.name(),
        }
    }
}

/// Arena of fibers with the tree walks the scheduler and committer need
#[derive(Debug)]
pub(crate) struct FiberTree<N> {
    arena: GenArena<Fiber<N>>,
}

impl<N: Clone> FiberTree<N> {
    pub fn new() -> Self {
        Self { arena: GenArena::new() }
    }

    pub fn insert(&mut self, fiber: Fiber<N>) -> FiberId {
        self.arena.insert(fiber)
    }

    pub fn get(&self, id: FiberId) -> Result<&Fiber<N>, RenderError> {
        self.arena.get(id).ok_or(RenderError::MissingFiber(id))
    }

    pub fn get_mut(&mut self, id: FiberId) -> Result<&mut Fiber<N>, RenderError> {
        self.arena.get_mut(id).ok_or(RenderError::MissingFiber(id))
    }

    pub fn try_get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.arena.get(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// `id`'s children in sibling order
    pub fn children(&self, id: FiberId) -> Vec<FiberId> {
        let mut out = Vec::new();
        let mut cursor = self.arena.get(id).and_then(|f| f.child);
        while let Some(child) = cursor {
            out.push(child);
            cursor = self.arena.get(child).and_then(|f| f.sibling);
        }
        out
    }

    /// Next fiber in depth-first order: first child, else the nearest
    /// sibling of `id` or of one of its ancestors.
    pub fn next_unit(&self, id: FiberId) -> Result<Option<FiberId>, RenderError> {
        let fiber = self.get(id)?;
        if fiber.child.is_some() {
            return Ok(fiber.child);
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if fiber.sibling.is_some() {
                return Ok(fiber.sibling);
            }
            cursor = fiber.parent;
        }
        Ok(None)
    }

    /// Host node of the closest ancestor that owns one
    pub fn host_parent(&self, id: FiberId) -> Result<N, RenderError> {
        let mut cursor = self.get(id)?.parent;
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if let Some(node) = &fiber.host_node {
                return Ok(node.clone());
            }
            cursor = fiber.parent;
        }
        tracing::error!("Fiber {} has no host-owning ancestor", id);
        Err(RenderError::Invariant("fiber has no host-owning ancestor"))
    }

    /// Pre-order listing of `root` and everything below it (not its siblings)
    pub fn subtree(&self, root: FiberId) -> Vec<FiberId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut kids = self.children(id);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Free `root` and its descendants; returns how many fibers were released
    pub fn release(&mut self, root: FiberId) -> usize {
        let ids = self.subtree(root);
        ids.into_iter().filter(|id| self.arena.remove(*id).is_some()).count()
    }
}
