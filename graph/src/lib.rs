//! The metadata graph: arena-owned typed nodes with parent/child/super
//! edges, thread-safe indexed child storage, and inheritance-aware
//! attribute resolution.

pub mod collection;
pub mod graph;
pub mod node;

pub use collection::{ChildEntry, CollectionStats, IndexedCollection};
pub use graph::MetaGraph;
pub use node::Node;
