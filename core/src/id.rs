//! Identity handles for graph nodes.
//!
//! Node identifiers are 64-bit values that are:
//! - Unique within their owning graph
//! - Immutable once assigned
//! - Opaque to external users

use std::fmt;

/// Unique identifier for a node within its owning graph.
///
/// Nodes live in an arena owned by the graph; all edges (parent, child,
/// super) are stored as `NodeId` handles rather than references, so the
/// node structure can never form ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Allocator for node identifiers. Monotonic, never reuses an id.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next node id.
    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId::new(self.next);
        self.next += 1;
        id
    }
}
