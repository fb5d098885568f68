//! Lightweight node identity facts, used by constraint predicates and
//! error reporting without borrowing the node itself.

use std::fmt;

use crate::key::{NodeKind, TypeKey};

/// The identity facts of a node: its type key, name, and concrete kind.
///
/// Predicates and child patterns match against facts rather than full
/// nodes, so the same matching code serves registration-time checks
/// (before any node exists) and mutation-time checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFacts {
    pub key: TypeKey,
    pub name: String,
    pub kind: NodeKind,
}

impl NodeFacts {
    pub fn new(key: TypeKey, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            key,
            name: name.into(),
            kind,
        }
    }

    /// The `type:subtype:name` segment used in paths and messages.
    pub fn segment(&self) -> String {
        format!("{}:{}:{}", self.key.ty(), self.key.subtype(), self.name)
    }
}

impl fmt::Display for NodeFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.key.ty(), self.key.subtype(), self.name)
    }
}

/// A node's full path from the root: `type:subtype:name` segments joined
/// by ` > `. Carried by every error so messages locate the offender.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-segment path.
    pub fn single(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Append a segment, returning the extended path.
    pub fn child(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<detached>");
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(seg)?;
        }
        Ok(())
    }
}

impl From<&NodeFacts> for NodePath {
    fn from(facts: &NodeFacts) -> Self {
        NodePath::single(facts.segment())
    }
}
