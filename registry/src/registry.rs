//! The registry proper: storage, lookup, instantiation.

use std::collections::HashMap;

use metagraph_core::{MetaError, MetaResult, NodeKind, NodePath, TypeKey};
use tracing::{debug, trace};

use crate::builder::TypeDefBuilder;
use crate::types::{NodeSeed, TypeDef};

/// Registry lifecycle. Registration stays open after `Ready`; there is
/// no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Uninitialized,
    Loading,
    Ready,
}

/// Catalog of type definitions keyed by `(type, subtype)`.
///
/// Definitions are immutable once stored: re-registering an identical
/// contract is a no-op, redefining a key with a different contract is a
/// configuration error. Inheritance is resolved at registration time,
/// so a parent must already be registered when a child names it; this
/// also makes inheritance cycles structurally impossible.
#[derive(Debug)]
pub struct TypeRegistry {
    types: HashMap<TypeKey, TypeDef>,
    by_type: HashMap<String, Vec<TypeKey>>,
    state: RegistryState,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            by_type: HashMap::new(),
            state: RegistryState::Uninitialized,
        }
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub(crate) fn begin_loading(&mut self) {
        if self.state == RegistryState::Uninitialized {
            self.state = RegistryState::Loading;
        }
    }

    pub(crate) fn mark_ready(&mut self) {
        self.state = RegistryState::Ready;
    }

    /// Register a type definition built by the configure closure.
    ///
    /// Returns the key on success. Registering the same key twice with
    /// an identical contract is a no-op; a materially different contract
    /// is rejected.
    pub fn register_type<F>(
        &mut self,
        ty: impl Into<String>,
        subtype: impl Into<String>,
        kind: NodeKind,
        configure: F,
    ) -> MetaResult<TypeKey>
    where
        F: FnOnce(TypeDefBuilder) -> TypeDefBuilder,
    {
        let key = TypeKey::new(ty, subtype);
        let builder = configure(TypeDefBuilder::new());

        let (inherited_attrs, inherited_patterns) = match builder.parent_key() {
            Some(parent_key) => {
                let parent = self.types.get(parent_key).ok_or_else(|| {
                    MetaError::configuration(
                        NodePath::new(),
                        format!(
                            "unknown parent type '{}' for '{}' (parents must be registered first)",
                            parent_key, key
                        ),
                    )
                })?;
                let attrs = parent
                    .attr_specs()
                    .map(|spec| (spec.name.clone(), spec.clone()))
                    .collect();
                let patterns = parent
                    .child_patterns
                    .iter()
                    .chain(parent.inherited_patterns.iter())
                    .cloned()
                    .collect();
                (attrs, patterns)
            }
            None => (Default::default(), Vec::new()),
        };

        let def = builder.build(key.clone(), kind, inherited_attrs, inherited_patterns);

        if let Some(existing) = self.types.get(&key) {
            if existing.same_contract(&def) {
                trace!(%key, "identical re-registration, no-op");
                return Ok(key);
            }
            return Err(MetaError::configuration(
                NodePath::new(),
                format!("type '{}' is already registered with a different contract", key),
            ));
        }

        debug!(%key, kind = %def.kind(), "registering type");
        self.by_type
            .entry(key.ty().to_string())
            .or_default()
            .push(key.clone());
        self.types.insert(key.clone(), def);
        Ok(key)
    }

    /// Look up a definition, `NotFound` when missing.
    pub fn find_type(&self, ty: &str, subtype: &str) -> MetaResult<&TypeDef> {
        self.types
            .get(&TypeKey::new(ty, subtype))
            .ok_or_else(|| {
                MetaError::not_found(NodePath::new(), format!("type '{}.{}'", ty, subtype))
            })
    }

    /// Branch-friendly lookup.
    pub fn get_type(&self, ty: &str, subtype: &str) -> Option<&TypeDef> {
        self.types.get(&TypeKey::new(ty, subtype))
    }

    pub fn get_type_by_key(&self, key: &TypeKey) -> Option<&TypeDef> {
        self.types.get(key)
    }

    /// Whether any subtype of `ty` is registered.
    pub fn has_type(&self, ty: &str) -> bool {
        self.by_type.contains_key(ty)
    }

    /// All registered subtypes of `ty`, in registration order.
    pub fn subtypes_of(&self, ty: &str) -> Vec<&TypeDef> {
        self.by_type
            .get(ty)
            .map(|keys| keys.iter().filter_map(|k| self.types.get(k)).collect())
            .unwrap_or_default()
    }

    /// Invoke the registered factory for a type.
    pub fn create_instance(&self, ty: &str, subtype: &str, name: &str) -> MetaResult<NodeSeed> {
        let def = self.find_type(ty, subtype)?;
        if def.is_abstract() {
            return Err(MetaError::configuration(
                NodePath::single(format!("{}:{}:{}", ty, subtype, name)),
                format!("cannot instantiate abstract type '{}'", def.key()),
            ));
        }
        trace!(key = %def.key(), name, "creating instance");
        Ok((def.factory)(def, name))
    }

    /// Whether a parent type accepts the given child identity, per its
    /// direct and inherited child patterns. Unknown parent types accept
    /// nothing.
    pub fn accepts_child(
        &self,
        parent_ty: &str,
        parent_subtype: &str,
        child_ty: &str,
        child_subtype: &str,
        child_name: &str,
    ) -> bool {
        self.get_type(parent_ty, parent_subtype)
            .map(|def| def.accepts_child(child_ty, child_subtype, child_name))
            .unwrap_or(false)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
