//! Wildcard patterns over node identity facts.

use std::fmt;

use metagraph_core::NodeFacts;

/// A single-segment pattern: an exact name or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Any,
    Exact(String),
}

impl Pattern {
    /// Parse a pattern string; `"*"` is the wildcard.
    pub fn parse(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        if s == "*" {
            Pattern::Any
        } else {
            Pattern::Exact(s.to_string())
        }
    }

    pub fn matches(&self, s: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Exact(expected) => expected == s,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Pattern::Any)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => f.write_str("*"),
            Pattern::Exact(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::parse(s)
    }
}

/// A predicate over a node's `(type, subtype, name)` facts, each segment
/// independently exact or wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePredicate {
    pub ty: Pattern,
    pub subtype: Pattern,
    pub name: Pattern,
}

impl NodePredicate {
    pub fn new(
        ty: impl Into<Pattern>,
        subtype: impl Into<Pattern>,
        name: impl Into<Pattern>,
    ) -> Self {
        Self {
            ty: ty.into(),
            subtype: subtype.into(),
            name: name.into(),
        }
    }

    /// Matches any node of the given type, any subtype, any name.
    pub fn of_type(ty: impl Into<String>) -> Self {
        Self {
            ty: Pattern::Exact(ty.into()),
            subtype: Pattern::Any,
            name: Pattern::Any,
        }
    }

    /// Matches every node.
    pub fn any() -> Self {
        Self {
            ty: Pattern::Any,
            subtype: Pattern::Any,
            name: Pattern::Any,
        }
    }

    pub fn matches(&self, facts: &NodeFacts) -> bool {
        self.ty.matches(facts.key.ty())
            && self.subtype.matches(facts.key.subtype())
            && self.name.matches(&facts.name)
    }
}

impl fmt::Display for NodePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.ty, self.subtype, self.name)
    }
}
