//! Two-level type tags and concrete node kinds.

use std::fmt;

/// A `(type, subtype)` pair identifying a registered node type.
///
/// `type` is the coarse category (`"field"`, `"object"`, `"attr"`, ...);
/// `subtype` refines it (`"string"`, `"int"`, `"base"`, ...). The pair is
/// the key into the type registry and the first two segments of a node's
/// display path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    ty: String,
    subtype: String,
}

impl TypeKey {
    pub fn new(ty: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            subtype: subtype.into(),
        }
    }

    /// The coarse type name.
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The subtype name.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ty, self.subtype)
    }
}

/// Concrete kind of a graph node.
///
/// The kind replaces class-based dispatch: every TypeDef declares which
/// kind its instances are, and indexes and predicates can select on it
/// without inspecting the type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Field,
    Object,
    Attr,
    Validator,
    View,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Field => "field",
            NodeKind::Object => "object",
            NodeKind::Attr => "attr",
            NodeKind::Validator => "validator",
            NodeKind::View => "view",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
