//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: a removed node is only unlinked, so a handle held by
//! the renderer stays valid for the tree's lifetime.

use sprout_core::{Event, EventHandler, PropValue};

use crate::{DomError, DomResult, MutationRecord, Node, NodeData, NodeId};

/// Arena-based DOM tree
///
/// Slots are never reclaimed. The arena grows with every node ever created,
/// including detached nodes and nodes built by renders that were discarded
/// before commit, so a long-lived tree under heavy churn keeps growing.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    mutations: Option<Vec<MutationRecord>>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            mutations: None,
        }
    }

    /// Create a tree that records every mutation
    pub fn with_mutation_log() -> Self {
        let mut tree = Self::new();
        tree.mutations = Some(Vec::new());
        tree
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes ever created, including the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn record(&mut self, record: MutationRecord) {
        if let Some(log) = &mut self.mutations {
            log.push(record);
        }
    }

    /// Drain the mutation log
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        self.mutations.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.node(parent)?.is_text() || matches!(self.node(child)?.data, NodeData::Document) {
            return Err(DomError::InvalidNodeType);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        let old_parent = self.node(child)?.parent;
        if old_parent.is_valid() {
            self.unlink(old_parent, child)?;
        }

        let last = self.node(parent)?.last_child;
        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.node_mut(last)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        self.node_mut(parent)?.last_child = child;
        self.record(MutationRecord::NodeInserted { parent, child });
        Ok(())
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.unlink(parent, child)?;
        self.record(MutationRecord::NodeRemoved { parent, child });
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let (prev, next) = {
            let node = self.node(child)?;
            if node.parent != parent {
                return Err(DomError::NotAChild { parent, child });
            }
            (node.prev_sibling, node.next_sibling)
        };
        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }
        let node = self.node_mut(child)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while node.is_valid() {
            if node == ancestor {
                return true;
            }
            node = self.get(node).map_or(NodeId::NONE, |n| n.parent);
        }
        false
    }

    /// Whether `id` is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Iterate over the children of `id`
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        self.get(id)?.as_element()?.get_property(name)
    }

    pub fn listener_count(&self, id: NodeId) -> usize {
        self.get(id)
            .and_then(Node::as_element)
            .map_or(0, |e| e.listeners.len())
    }

    /// Concatenated text of `id` and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
        }
        for (child, _) in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// First element with `tag` in document order below `start`
    pub fn find_by_tag(&self, start: NodeId, tag: &str) -> Option<NodeId> {
        for (child, node) in self.children(start) {
            if node.as_element().is_some_and(|e| e.tag == tag) {
                return Some(child);
            }
            if let Some(found) = self.find_by_tag(child, tag) {
                return Some(found);
            }
        }
        None
    }

    /// Deliver `event` to `target` and then to each ancestor.
    /// Returns the number of handlers invoked.
    pub fn dispatch_event(&self, target: NodeId, event: &Event) -> usize {
        let mut handlers: Vec<EventHandler> = Vec::new();
        let mut cursor = target;
        while cursor.is_valid() {
            let Some(node) = self.get(cursor) else { break };
            if let Some(element) = node.as_element() {
                handlers.extend(element.listeners_for(&event.event_type).cloned());
            }
            cursor = node.parent;
        }
        tracing::trace!(
            "Dispatching {} to {} ({} handlers)",
            event.event_type,
            target,
            handlers.len()
        );
        for handler in &handlers {
            handler.call(event);
        }
        handlers.len()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
