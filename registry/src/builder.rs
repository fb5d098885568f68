//! Fluent builder for type definitions.

use std::collections::BTreeMap;

use metagraph_core::{NodeKind, TypeKey, ValueType};

use crate::types::{default_factory, AttrSpec, ChildPattern, NodeFactory, TypeDef};

/// Builder passed to `TypeRegistry::register_type`'s configure closure.
///
/// ```ignore
/// registry.register_type("field", "string", NodeKind::Field, |t| {
///     t.inherits("field", "base")
///         .attr("maxLength", ValueType::Int)
///         .child("validator", "*", "*")
/// })?;
/// ```
#[derive(Debug)]
pub struct TypeDefBuilder {
    parent: Option<TypeKey>,
    is_abstract: bool,
    description: String,
    attrs: BTreeMap<String, AttrSpec>,
    child_patterns: Vec<ChildPattern>,
    factory: NodeFactory,
}

impl TypeDefBuilder {
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            is_abstract: false,
            description: String::new(),
            attrs: BTreeMap::new(),
            child_patterns: Vec::new(),
            factory: default_factory,
        }
    }

    /// Declare the inheritance parent. It must already be registered.
    pub fn inherits(mut self, ty: impl Into<String>, subtype: impl Into<String>) -> Self {
        self.parent = Some(TypeKey::new(ty, subtype));
        self
    }

    /// Declare an optional attribute.
    pub fn attr(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        let spec = AttrSpec::new(name, value_type, false);
        self.attrs.insert(spec.name.clone(), spec);
        self
    }

    /// Declare a required attribute.
    pub fn required_attr(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        let spec = AttrSpec::new(name, value_type, true);
        self.attrs.insert(spec.name.clone(), spec);
        self
    }

    /// Declare an allowed-child pattern; `"*"` wildcards any segment.
    pub fn child(
        mut self,
        ty: impl AsRef<str>,
        subtype: impl AsRef<str>,
        name: impl AsRef<str>,
    ) -> Self {
        self.child_patterns.push(ChildPattern::new(
            ty.as_ref(),
            subtype.as_ref(),
            name.as_ref(),
        ));
        self
    }

    /// Mark the type abstract: it cannot be instantiated, only inherited.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Replace the default node factory.
    pub fn factory(mut self, factory: NodeFactory) -> Self {
        self.factory = factory;
        self
    }

    pub(crate) fn parent_key(&self) -> Option<&TypeKey> {
        self.parent.as_ref()
    }

    /// Finalize into a TypeDef with inheritance already resolved.
    ///
    /// Declaring an attribute implies accepting an `attr` child with
    /// that name, so the implied patterns are appended here.
    pub(crate) fn build(
        self,
        key: TypeKey,
        kind: NodeKind,
        inherited_attrs: BTreeMap<String, AttrSpec>,
        inherited_patterns: Vec<ChildPattern>,
    ) -> TypeDef {
        let mut child_patterns = self.child_patterns;
        for name in self.attrs.keys() {
            child_patterns.push(ChildPattern::new("attr", "*", name.as_str()));
        }
        TypeDef {
            key,
            kind,
            parent: self.parent,
            is_abstract: self.is_abstract,
            description: self.description,
            attrs: self.attrs,
            child_patterns,
            inherited_attrs,
            inherited_patterns,
            factory: self.factory,
        }
    }
}
