//! Type definitions: the registry's stored contracts.

use std::collections::BTreeMap;
use std::fmt;

use metagraph_constraint::Pattern;
use metagraph_core::{NodeFacts, NodeKind, TypeKey, Value, ValueType};

/// A declared attribute: name, value type, required flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: String,
    pub value_type: ValueType,
    pub required: bool,
}

impl AttrSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType, required: bool) -> Self {
        Self {
            name: name.into(),
            value_type,
            required,
        }
    }
}

/// An allowed-child pattern: which `(type, subtype, name)` triples a
/// parent of this type accepts. Each segment is exact or `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildPattern {
    pub ty: Pattern,
    pub subtype: Pattern,
    pub name: Pattern,
}

impl ChildPattern {
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

    pub fn matches(&self, ty: &str, subtype: &str, name: &str) -> bool {
        self.ty.matches(ty) && self.subtype.matches(subtype) && self.name.matches(name)
    }
}

impl fmt::Display for ChildPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.ty, self.subtype, self.name)
    }
}

/// The raw material for a new graph node, produced by a type's factory.
#[derive(Debug, Clone)]
pub struct NodeSeed {
    pub key: TypeKey,
    pub kind: NodeKind,
    pub name: String,
    pub value: Option<Value>,
}

impl NodeSeed {
    pub fn facts(&self) -> NodeFacts {
        NodeFacts::new(self.key.clone(), self.name.clone(), self.kind)
    }
}

/// Factory producing a node seed for a type. Registered per TypeDef so
/// instantiation needs no reflection; the default factory copies the
/// definition's key and kind.
pub type NodeFactory = fn(&TypeDef, &str) -> NodeSeed;

/// The default factory: key and kind from the definition, no value.
pub fn default_factory(def: &TypeDef, name: &str) -> NodeSeed {
    NodeSeed {
        key: def.key().clone(),
        kind: def.kind(),
        name: name.to_string(),
        value: None,
    }
}

/// A registered type definition.
///
/// Immutable once stored. Inherited attribute declarations and child
/// patterns are resolved when the definition is registered, so lookups
/// never walk the parent chain.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub(crate) key: TypeKey,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<TypeKey>,
    pub(crate) is_abstract: bool,
    pub(crate) description: String,
    pub(crate) attrs: BTreeMap<String, AttrSpec>,
    pub(crate) child_patterns: Vec<ChildPattern>,
    pub(crate) inherited_attrs: BTreeMap<String, AttrSpec>,
    pub(crate) inherited_patterns: Vec<ChildPattern>,
    pub(crate) factory: NodeFactory,
}

impl TypeDef {
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&TypeKey> {
        self.parent.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Look up an attribute declaration, directly declared first, then
    /// inherited.
    pub fn attr_spec(&self, name: &str) -> Option<&AttrSpec> {
        self.attrs.get(name).or_else(|| self.inherited_attrs.get(name))
    }

    /// Effective attribute declarations: direct declarations shadow
    /// inherited ones with the same name.
    pub fn attr_specs(&self) -> impl Iterator<Item = &AttrSpec> {
        self.attrs.values().chain(
            self.inherited_attrs
                .values()
                .filter(|spec| !self.attrs.contains_key(&spec.name)),
        )
    }

    /// Effective required attribute names.
    pub fn required_attrs(&self) -> impl Iterator<Item = &AttrSpec> {
        self.attr_specs().filter(|spec| spec.required)
    }

    /// Whether this type accepts a child with the given identity, per
    /// its direct and inherited child patterns.
    pub fn accepts_child(&self, ty: &str, subtype: &str, name: &str) -> bool {
        self.child_patterns
            .iter()
            .chain(self.inherited_patterns.iter())
            .any(|p| p.matches(ty, subtype, name))
    }

    /// Identity facts a node of this type would have.
    pub fn facts(&self, name: impl Into<String>) -> NodeFacts {
        NodeFacts::new(self.key.clone(), name, self.kind)
    }

    /// Whether another definition carries the same declarative contract.
    ///
    /// The factory fn is deliberately excluded: fn-pointer identity is
    /// not part of the contract, only the declared shape is.
    pub fn same_contract(&self, other: &TypeDef) -> bool {
        self.key == other.key
            && self.kind == other.kind
            && self.parent == other.parent
            && self.is_abstract == other.is_abstract
            && self.description == other.description
            && self.attrs == other.attrs
            && self.child_patterns == other.child_patterns
    }
}
