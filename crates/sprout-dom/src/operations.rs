//! DOM operation errors

use sprout_core::HostError;

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// Inserting a node into itself or its own descendant
    #[error("Hierarchy request error")]
    HierarchyRequest,

    #[error("Invalid node type for this operation")]
    InvalidNodeType,

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),
}

impl From<DomError> for HostError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::InvalidTagName(tag) => HostError::Create {
                reason: "invalid tag name".to_string(),
                tag,
            },
            other => HostError::Operation {
                op: "dom",
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_conversion() {
        let err: HostError = DomError::InvalidTagName("a b".into()).into();
        assert!(matches!(err, HostError::Create { ref tag, .. } if tag == "a b"));

        let err: HostError = DomError::HierarchyRequest.into();
        assert_eq!(
            err,
            HostError::Operation {
                op: "dom",
                reason: "Hierarchy request error".into()
            }
        );
    }
}
