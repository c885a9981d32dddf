//! Render errors

use crate::FiberId;

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Failure reported by a host binding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Cannot create host node <{tag}>: {reason}")]
    Create { tag: String, reason: String },

    #[error("Host operation `{op}` failed: {reason}")]
    Operation { op: &'static str, reason: String },
}

/// Render cycle error
///
/// Any of these aborts the render cycle in flight. The committed tree stays
/// the current one.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Fiber {0} is not in the arena")]
    MissingFiber(FiberId),

    #[error("Fiber tree invariant violated: {0}")]
    Invariant(&'static str),

    #[error("Render did not settle after {turns} turns")]
    FlushLimit { turns: usize },
}
