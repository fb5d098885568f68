//! A single graph node.

use metagraph_core::{NodeFacts, NodeId, NodeKind, TypeKey, Value};
use metagraph_registry::NodeSeed;

use crate::collection::IndexedCollection;

/// A typed metadata node.
///
/// Nodes are owned by the graph's arena; parent, super, and wrap edges
/// are id handles. Only attr-kind nodes carry a value.
#[derive(Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) key: TypeKey,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) super_node: Option<NodeId>,
    /// Set while a wrap of this node exists; cleared when the wrap is
    /// detached from its parent.
    pub(crate) wrapped_by: Option<NodeId>,
    pub(crate) value: Option<Value>,
    pub(crate) children: IndexedCollection,
}

impl Node {
    pub(crate) fn from_seed(id: NodeId, seed: NodeSeed) -> Self {
        Self {
            id,
            key: seed.key,
            name: seed.name,
            kind: seed.kind,
            parent: None,
            super_node: None,
            wrapped_by: None,
            value: seed.value,
            children: IndexedCollection::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn super_node(&self) -> Option<NodeId> {
        self.super_node
    }

    pub fn is_attached(&self) -> bool {
        self.parent.is_some()
    }

    /// The directly held value; attr-kind nodes only.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &IndexedCollection {
        &self.children
    }

    pub fn facts(&self) -> NodeFacts {
        NodeFacts::new(self.key.clone(), self.name.clone(), self.kind)
    }

    /// The `type:subtype:name` path segment for this node.
    pub fn segment(&self) -> String {
        format!("{}:{}:{}", self.key.ty(), self.key.subtype(), self.name)
    }
}
