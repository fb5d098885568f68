//! The graph arena and its mutation pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use metagraph_cache::{CacheStats, HybridCache};
use metagraph_constraint::ConstraintEngine;
use metagraph_core::{
    id::IdAllocator, MetaError, MetaResult, NodeFacts, NodeId, NodeKind, NodePath, TypeKey, Value,
};
use metagraph_registry::TypeRegistry;
use tracing::trace;

use crate::collection::ChildEntry;
use crate::node::Node;

/// A resolved lookup held in the cache.
#[derive(Debug, Clone)]
enum CachedLookup {
    Value(Value),
    Names(Vec<String>),
}

/// Arena-owned graph of typed metadata nodes.
///
/// Every structural mutation runs the same pipeline: constraint engine
/// placement rules, then the registry's `accepts_child`, then the
/// namespace collision check; a failure at any step leaves no partial
/// state. Attribute resolution walks own children first, then the super
/// chain, with results cached until the next mutation.
pub struct MetaGraph {
    registry: Arc<TypeRegistry>,
    constraints: Arc<ConstraintEngine>,
    nodes: HashMap<NodeId, Node>,
    ids: IdAllocator,
    cache: HybridCache<CachedLookup>,
}

impl MetaGraph {
    pub fn new(registry: Arc<TypeRegistry>, constraints: Arc<ConstraintEngine>) -> Self {
        Self {
            registry,
            constraints,
            nodes: HashMap::new(),
            ids: IdAllocator::new(),
            cache: HybridCache::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn constraints(&self) -> &ConstraintEngine {
        &self.constraints
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Borrow a node, `NotFound` when the id is stale.
    pub fn node(&self, id: NodeId) -> MetaResult<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| MetaError::not_found(NodePath::new(), format!("node {}", id)))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> MetaResult<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| MetaError::not_found(NodePath::new(), format!("node {}", id)))
    }

    /// The node's full path from its root, for error reporting.
    pub fn path(&self, id: NodeId) -> NodePath {
        let mut segments = Vec::new();
        let mut cur = Some(id);
        while let Some(node) = cur.and_then(|c| self.nodes.get(&c)) {
            segments.push(node.segment());
            cur = node.parent;
        }
        segments.reverse();
        NodePath::from_segments(segments)
    }

    /// Instantiate a registered type as a new detached node.
    pub fn create_node(&mut self, ty: &str, subtype: &str, name: &str) -> MetaResult<NodeId> {
        let seed = self.registry.create_instance(ty, subtype, name)?;
        let id = self.ids.alloc();
        trace!(%id, key = %seed.key, name = %seed.name, "creating node");
        self.nodes.insert(id, Node::from_seed(id, seed));
        Ok(id)
    }

    /// Attach a detached node under a parent.
    ///
    /// Pipeline: placement constraints, registry `accepts_child`,
    /// namespace collision, then (for attr children) value checks.
    /// Failure at any step leaves the graph untouched.
    pub fn add_child(&mut self, parent_id: NodeId, child_id: NodeId) -> MetaResult<()> {
        self.check_attach(parent_id, child_id, false)?;

        let (child_ty, child_name, child_kind) = {
            let child = self.node(child_id)?;
            (child.key.ty().to_string(), child.name.clone(), child.kind)
        };
        let entry = ChildEntry::new(child_id, child_ty, child_name, child_kind);
        let added = self.node(parent_id)?.children.add(entry);
        debug_assert!(added);
        self.node_mut(child_id)?.parent = Some(parent_id);
        self.cache.clear();
        Ok(())
    }

    /// Put `child_id` in the place of the current occupant of its
    /// type-namespaced name, detaching the prior occupant. Returns the
    /// prior occupant's id. This is how a wrap takes its original's
    /// position.
    pub fn replace_child(
        &mut self,
        parent_id: NodeId,
        child_id: NodeId,
    ) -> MetaResult<Option<NodeId>> {
        self.check_attach(parent_id, child_id, true)?;

        let (child_ty, child_name, child_kind) = {
            let child = self.node(child_id)?;
            (child.key.ty().to_string(), child.name.clone(), child.kind)
        };
        let entry = ChildEntry::new(child_id, child_ty, child_name, child_kind);
        let prior = self.node(parent_id)?.children.replace(entry);
        if let Some(prior_entry) = &prior {
            self.detach(prior_entry.id);
        }
        self.node_mut(child_id)?.parent = Some(parent_id);
        self.cache.clear();
        Ok(prior.map(|e| e.id))
    }

    /// Detach a child by type-namespaced name, returning its id.
    pub fn remove_child(&mut self, parent_id: NodeId, ty: &str, name: &str) -> MetaResult<NodeId> {
        let entry = self.node(parent_id)?.children.remove(ty, name).ok_or_else(|| {
            MetaError::not_found(self.path(parent_id), format!("child {}:{}", ty, name))
        })?;
        self.detach(entry.id);
        self.cache.clear();
        Ok(entry.id)
    }

    /// Shared admission checks for `add_child` and `replace_child`.
    fn check_attach(
        &self,
        parent_id: NodeId,
        child_id: NodeId,
        allow_occupied: bool,
    ) -> MetaResult<()> {
        let parent = self.node(parent_id)?;
        let child = self.node(child_id)?;
        let parent_path = self.path(parent_id);

        if child.parent.is_some() {
            return Err(MetaError::invalid_operation(
                self.path(child_id),
                "node is already attached; detach it first",
            ));
        }
        // Attaching an ancestor under its own descendant would cycle.
        let mut cur = Some(parent_id);
        while let Some(id) = cur {
            if id == child_id {
                return Err(MetaError::invalid_operation(
                    parent_path,
                    "attach would create a parent cycle",
                ));
            }
            cur = self.nodes.get(&id).and_then(|n| n.parent);
        }

        let parent_facts = parent.facts();
        let child_facts = child.facts();
        self.constraints
            .check_placement(&parent_facts, &child_facts, &parent_path)?;

        if !self.registry.accepts_child(
            parent.key.ty(),
            parent.key.subtype(),
            child.key.ty(),
            child.key.subtype(),
            &child.name,
        ) {
            return Err(MetaError::placement(
                parent_path.clone().child(child.segment()),
                format!(
                    "type '{}' does not accept child '{}'",
                    parent.key,
                    child_facts
                ),
            ));
        }

        if !allow_occupied && parent.children.contains(child.key.ty(), &child.name) {
            return Err(MetaError::duplicate_child(
                parent_path,
                child.key.ty(),
                child.name.clone(),
            ));
        }

        if child.kind == NodeKind::Attr {
            let value = child.value.clone().unwrap_or(Value::Null);
            let child_path = self.path(parent_id).child(child.segment());
            self.check_attr(&parent_facts.key, &child_facts, &child_path, &value)?;
        }
        Ok(())
    }

    /// Check an attribute value against the owner's declaration and the
    /// validation constraints.
    fn check_attr(
        &self,
        owner_key: &TypeKey,
        attr_facts: &NodeFacts,
        path: &NodePath,
        value: &Value,
    ) -> MetaResult<()> {
        let spec = self
            .registry
            .get_type_by_key(owner_key)
            .and_then(|def| def.attr_spec(&attr_facts.name));
        let required = spec.map(|s| s.required).unwrap_or(false);
        if let Some(spec) = spec {
            if !spec.value_type.accepts(value) {
                return Err(MetaError::validation(
                    path.clone(),
                    attr_facts.name.clone(),
                    value.clone(),
                    format!("expected value of type {}", spec.value_type),
                ));
            }
        }
        self.constraints.check_value(attr_facts, path, value, required)
    }

    /// Clear a detached node's parent edge and, when the node was a
    /// wrap, release its original for re-wrapping.
    fn detach(&mut self, id: NodeId) {
        let sup = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.parent = None;
                node.super_node
            }
            None => return,
        };
        if let Some(orig) = sup {
            if let Some(orig_node) = self.nodes.get_mut(&orig) {
                if orig_node.wrapped_by == Some(id) {
                    orig_node.wrapped_by = None;
                }
            }
        }
    }

    // ----- lookups -----

    /// O(1) child lookup by type-namespaced name. Never walks the super
    /// chain.
    pub fn child(&self, parent_id: NodeId, ty: &str, name: &str) -> Option<NodeId> {
        self.nodes
            .get(&parent_id)
            .and_then(|p| p.children.find_by_name_and_type(ty, name))
    }

    /// Like [`child`](Self::child) but `NotFound` when missing.
    pub fn get_child(&self, parent_id: NodeId, ty: &str, name: &str) -> MetaResult<NodeId> {
        self.child(parent_id, ty, name).ok_or_else(|| {
            MetaError::not_found(self.path(parent_id), format!("child {}:{}", ty, name))
        })
    }

    pub fn children(&self, parent_id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&parent_id)
            .map(|p| p.children.ids())
            .unwrap_or_default()
    }

    pub fn children_of_type(&self, parent_id: NodeId, ty: &str) -> Vec<NodeId> {
        self.nodes
            .get(&parent_id)
            .map(|p| p.children.find_by_type(ty))
            .unwrap_or_default()
    }

    pub fn children_of_kind(&self, parent_id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .get(&parent_id)
            .map(|p| p.children.find_by_kind(kind))
            .unwrap_or_default()
    }

    // ----- attributes -----

    /// Create an attr node holding `value` and attach it under the
    /// parent. The attr subtype comes from the owner's declaration when
    /// present, otherwise from the value itself.
    pub fn add_attr(&mut self, parent_id: NodeId, name: &str, value: Value) -> MetaResult<NodeId> {
        let subtype = {
            let parent = self.node(parent_id)?;
            let declared = self
                .registry
                .get_type_by_key(&parent.key)
                .and_then(|def| def.attr_spec(name))
                .map(|spec| spec.value_type);
            match declared.or_else(|| value.value_type()) {
                Some(vt) => vt.attr_subtype(),
                None => "string",
            }
        };
        let seed = self.registry.create_instance("attr", subtype, name)?;
        let id = self.ids.alloc();
        let mut node = Node::from_seed(id, seed);
        node.value = Some(value);
        self.nodes.insert(id, node);

        match self.add_child(parent_id, id) {
            Ok(()) => Ok(id),
            Err(e) => {
                // no partial state: the orphan seed goes away with the failure
                self.nodes.remove(&id);
                Err(e)
            }
        }
    }

    /// Assign an attr node's value, checking the owner's declared type
    /// and the validation constraints.
    pub fn set_attr_value(&mut self, attr_id: NodeId, value: Value) -> MetaResult<()> {
        let (facts, path, owner_key) = {
            let attr = self.node(attr_id)?;
            if attr.kind != NodeKind::Attr {
                return Err(MetaError::invalid_operation(
                    self.path(attr_id),
                    "not an attribute node",
                ));
            }
            let owner_key = attr
                .parent
                .and_then(|p| self.nodes.get(&p))
                .map(|owner| owner.key.clone());
            (attr.facts(), self.path(attr_id), owner_key)
        };
        match owner_key {
            Some(key) => self.check_attr(&key, &facts, &path, &value)?,
            // detached attr: only the engine's rules apply
            None => self.constraints.check_value(&facts, &path, &value, false)?,
        }
        self.node_mut(attr_id)?.value = Some(value);
        self.cache.clear();
        Ok(())
    }

    /// Resolve an attribute value: own attr children first, then the
    /// super chain, then `NotFound`.
    pub fn attr_value(&self, id: NodeId, name: &str) -> MetaResult<Value> {
        let key = format!("attr:{}:{}", id, name);
        if let Some(CachedLookup::Value(v)) = self.cache.get(key.as_str()) {
            return Ok(v);
        }
        let value = self.resolve_attr(id, name)?;
        self.cache.put(key, CachedLookup::Value(value.clone()));
        Ok(value)
    }

    fn resolve_attr(&self, id: NodeId, name: &str) -> MetaResult<Value> {
        let node = self.node(id)?;
        if let Some(attr_id) = node.children.find_by_name_and_type("attr", name) {
            let attr = self.node(attr_id)?;
            return Ok(attr.value.clone().unwrap_or(Value::Null));
        }
        if let Some(sup) = node.super_node {
            return self.resolve_attr(sup, name);
        }
        Err(MetaError::not_found(
            self.path(id),
            format!("attr '{}'", name),
        ))
    }

    /// The effective attribute name set: own attr children plus the
    /// super chain's, own names shadowing inherited ones. Cached in the
    /// identity table; attribute values go through the string table.
    pub fn effective_attr_names(&self, id: NodeId) -> MetaResult<Vec<String>> {
        if let Some(CachedLookup::Names(names)) = self.cache.get(id) {
            return Ok(names);
        }
        let names = self.collect_attr_names(id)?;
        self.cache.put(id, CachedLookup::Names(names.clone()));
        Ok(names)
    }

    fn collect_attr_names(&self, id: NodeId) -> MetaResult<Vec<String>> {
        let node = self.node(id)?;
        let mut names: Vec<String> = node
            .children
            .all()
            .into_iter()
            .filter(|e| e.ty == "attr")
            .map(|e| e.name)
            .collect();
        if let Some(sup) = node.super_node {
            for inherited in self.collect_attr_names(sup)? {
                if !names.contains(&inherited) {
                    names.push(inherited);
                }
            }
        }
        Ok(names)
    }

    // ----- overlay + inheritance edges -----

    /// Create a wrap: a detached node with the original's identity and
    /// `super` pointing at it. Attach it with [`replace_child`]
    /// (Self::replace_child) to overlay the original in place.
    ///
    /// While a wrap is attached the original may not be wrapped again.
    pub fn wrap(&mut self, id: NodeId) -> MetaResult<NodeId> {
        let (key, name, kind, prior_wrap) = {
            let node = self.node(id)?;
            (node.key.clone(), node.name.clone(), node.kind, node.wrapped_by)
        };
        if let Some(w) = prior_wrap {
            if self.nodes.get(&w).map(|n| n.is_attached()).unwrap_or(false) {
                return Err(MetaError::invalid_operation(
                    self.path(id),
                    "node is already wrapped; detach the existing wrap first",
                ));
            }
        }
        let wrap_id = self.ids.alloc();
        trace!(original = %id, wrap = %wrap_id, "wrapping node");
        self.nodes.insert(
            wrap_id,
            Node {
                id: wrap_id,
                key,
                name,
                kind,
                parent: None,
                super_node: Some(id),
                wrapped_by: None,
                value: None,
                children: Default::default(),
            },
        );
        self.node_mut(id)?.wrapped_by = Some(wrap_id);
        Ok(wrap_id)
    }

    /// Set the inheritance edge. The other node must share the coarse
    /// type, and the assignment may not close a super cycle.
    pub fn set_super(&mut self, id: NodeId, sup: NodeId) -> MetaResult<()> {
        {
            let node = self.node(id)?;
            let sup_node = self.node(sup)?;
            if node.key.ty() != sup_node.key.ty() {
                return Err(MetaError::configuration(
                    self.path(id),
                    format!(
                        "super type '{}' is incompatible with '{}'",
                        sup_node.key, node.key
                    ),
                ));
            }
        }
        let mut cur = Some(sup);
        while let Some(c) = cur {
            if c == id {
                return Err(MetaError::configuration(
                    self.path(id),
                    "super assignment would create an inheritance cycle",
                ));
            }
            cur = self.nodes.get(&c).and_then(|n| n.super_node);
        }
        self.node_mut(id)?.super_node = Some(sup);
        self.cache.clear();
        Ok(())
    }

    // ----- validation -----

    /// Deep validation: required attributes resolve non-null, every own
    /// attribute passes its declared type and the validation
    /// constraints, recursing through children.
    pub fn validate(&self, id: NodeId) -> MetaResult<()> {
        let node = self.node(id)?;
        let path = self.path(id);
        if let Some(def) = self.registry.get_type_by_key(&node.key) {
            for spec in def.required_attrs() {
                match self.attr_value(id, &spec.name) {
                    Ok(v) if !v.is_null() => {}
                    Ok(_) => {
                        return Err(MetaError::validation(
                            path,
                            spec.name.clone(),
                            Value::Null,
                            "required attribute is null",
                        ))
                    }
                    Err(e) if e.is_not_found() => {
                        return Err(MetaError::validation(
                            path,
                            spec.name.clone(),
                            Value::Null,
                            "required attribute is missing",
                        ))
                    }
                    Err(e) => return Err(e),
                }
            }
            for attr_id in node.children.find_by_type("attr") {
                let attr = self.node(attr_id)?;
                let value = attr.value.clone().unwrap_or(Value::Null);
                let attr_path = path.clone().child(attr.segment());
                self.check_attr(&node.key, &attr.facts(), &attr_path, &value)?;
            }
        }
        for child_id in node.children.ids() {
            self.validate(child_id)?;
        }
        Ok(())
    }
}
