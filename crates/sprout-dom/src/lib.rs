//! Sprout DOM - in-memory host tree
//!
//! Arena-backed DOM that the renderer drives through
//! [`sprout_core::HostBinding`]. Besides the binding it offers the queries a
//! test or embedder needs: traversal, text content, markup serialization,
//! event dispatch and an optional mutation log.

mod host;
mod markup;
mod mutations;
mod node;
mod operations;
mod tree;

pub use mutations::MutationRecord;
pub use node::{ElementData, Listener, Node, NodeData, TextData};
pub use operations::{DomError, DomResult};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}
