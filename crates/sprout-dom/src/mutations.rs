//! Mutation records
//!
//! When recording is enabled, every change the host binding makes to the
//! tree is appended to a log that callers drain with
//! [`DomTree::take_mutations`](crate::DomTree::take_mutations).

use crate::NodeId;

/// One host mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    NodeInserted { parent: NodeId, child: NodeId },
    NodeRemoved { parent: NodeId, child: NodeId },
    PropertySet { node: NodeId, name: String },
    PropertyCleared { node: NodeId, name: String },
    TextChanged { node: NodeId },
    ListenerAdded { node: NodeId, event: String },
    ListenerRemoved { node: NodeId, event: String },
}

impl MutationRecord {
    pub fn target(&self) -> NodeId {
        match self {
            Self::NodeInserted { child, .. } | Self::NodeRemoved { child, .. } => *child,
            Self::PropertySet { node, .. }
            | Self::PropertyCleared { node, .. }
            | Self::TextChanged { node }
            | Self::ListenerAdded { node, .. }
            | Self::ListenerRemoved { node, .. } => *node,
        }
    }

    /// Property or text content change
    pub fn is_property_change(&self) -> bool {
        matches!(
            self,
            Self::PropertySet { .. } | Self::PropertyCleared { .. } | Self::TextChanged { .. }
        )
    }

    pub fn is_listener_change(&self) -> bool {
        matches!(self, Self::ListenerAdded { .. } | Self::ListenerRemoved { .. })
    }

    /// Insertion or removal
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::NodeInserted { .. } | Self::NodeRemoved { .. })
    }
}
