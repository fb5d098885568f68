//! Ordered, multiply-indexed storage for a node's children.

use std::collections::HashMap;

use metagraph_core::{NodeId, NodeKind};
use parking_lot::RwLock;

/// One child's entry in the collection: the id plus the identity facts
/// the indexes are built over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub id: NodeId,
    pub ty: String,
    pub name: String,
    pub kind: NodeKind,
}

impl ChildEntry {
    pub fn new(
        id: NodeId,
        ty: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            id,
            ty: ty.into(),
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Insertion-ordered child list; the source of truth.
    entries: Vec<ChildEntry>,
    /// type -> name -> id. Names are unique per type-namespace.
    namespaces: HashMap<String, HashMap<String, NodeId>>,
    /// type -> ids in insertion order.
    by_type: HashMap<String, Vec<NodeId>>,
    /// kind -> ids in insertion order.
    by_kind: HashMap<NodeKind, Vec<NodeId>>,
}

impl Inner {
    fn index(&mut self, entry: &ChildEntry) {
        self.namespaces
            .entry(entry.ty.clone())
            .or_default()
            .insert(entry.name.clone(), entry.id);
        self.by_type
            .entry(entry.ty.clone())
            .or_default()
            .push(entry.id);
        self.by_kind.entry(entry.kind).or_default().push(entry.id);
    }

    fn unindex(&mut self, entry: &ChildEntry) {
        if let Some(ns) = self.namespaces.get_mut(&entry.ty) {
            ns.remove(&entry.name);
            if ns.is_empty() {
                self.namespaces.remove(&entry.ty);
            }
        }
        if let Some(ids) = self.by_type.get_mut(&entry.ty) {
            ids.retain(|&id| id != entry.id);
            if ids.is_empty() {
                self.by_type.remove(&entry.ty);
            }
        }
        if let Some(ids) = self.by_kind.get_mut(&entry.kind) {
            ids.retain(|&id| id != entry.id);
            if ids.is_empty() {
                self.by_kind.remove(&entry.kind);
            }
        }
    }

    /// Swap one id for another without disturbing index positions. The
    /// two entries share a type-namespaced name; only the kind may
    /// differ.
    fn reindex_replaced(&mut self, prior: &ChildEntry, entry: &ChildEntry) {
        if let Some(ns) = self.namespaces.get_mut(&entry.ty) {
            ns.insert(entry.name.clone(), entry.id);
        }
        if let Some(ids) = self.by_type.get_mut(&entry.ty) {
            if let Some(i) = ids.iter().position(|&id| id == prior.id) {
                ids[i] = entry.id;
            }
        }
        if prior.kind == entry.kind {
            if let Some(ids) = self.by_kind.get_mut(&prior.kind) {
                if let Some(i) = ids.iter().position(|&id| id == prior.id) {
                    ids[i] = entry.id;
                }
            }
        } else {
            if let Some(ids) = self.by_kind.get_mut(&prior.kind) {
                ids.retain(|&id| id != prior.id);
                if ids.is_empty() {
                    self.by_kind.remove(&prior.kind);
                }
            }
            self.by_kind.entry(entry.kind).or_default().push(entry.id);
        }
    }

    fn rebuild(&mut self) {
        self.namespaces.clear();
        self.by_type.clear();
        self.by_kind.clear();
        let entries = std::mem::take(&mut self.entries);
        for entry in &entries {
            self.index(entry);
        }
        self.entries = entries;
    }
}

/// Statistics snapshot with an index consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    pub children: usize,
    pub namespace_entries: usize,
    pub type_entries: usize,
    pub kind_entries: usize,
}

impl CollectionStats {
    /// Every index must cover exactly the child list.
    pub fn is_consistent(&self) -> bool {
        self.namespace_entries == self.children
            && self.type_entries == self.children
            && self.kind_entries == self.children
    }
}

/// Thread-safe, ordered child storage with three derived indexes:
/// type-namespaced name, type, and concrete kind.
///
/// Every mutation updates the list and all three indexes inside one
/// write-lock critical section, so readers never observe a list/index
/// mismatch.
#[derive(Debug, Default)]
pub struct IndexedCollection {
    inner: RwLock<Inner>,
}

impl IndexedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child. Returns false (and changes nothing) when the
    /// type-namespace already holds the name.
    pub fn add(&self, entry: ChildEntry) -> bool {
        let mut inner = self.inner.write();
        if let Some(ns) = inner.namespaces.get(&entry.ty) {
            if ns.contains_key(&entry.name) {
                return false;
            }
        }
        inner.index(&entry);
        inner.entries.push(entry);
        true
    }

    /// Remove the child with the given type-namespaced name.
    pub fn remove(&self, ty: &str, name: &str) -> Option<ChildEntry> {
        let mut inner = self.inner.write();
        let pos = inner
            .entries
            .iter()
            .position(|e| e.ty == ty && e.name == name)?;
        let entry = inner.entries.remove(pos);
        inner.unindex(&entry);
        Some(entry)
    }

    /// Replace the occupant of the entry's type-namespaced name,
    /// keeping its position in the list and in every index; appends
    /// when the name is free. Returns the prior occupant.
    pub fn replace(&self, entry: ChildEntry) -> Option<ChildEntry> {
        let mut inner = self.inner.write();
        match inner
            .entries
            .iter()
            .position(|e| e.ty == entry.ty && e.name == entry.name)
        {
            Some(pos) => {
                let prior = inner.entries[pos].clone();
                inner.reindex_replaced(&prior, &entry);
                inner.entries[pos] = entry;
                Some(prior)
            }
            None => {
                inner.index(&entry);
                inner.entries.push(entry);
                None
            }
        }
    }

    /// O(1) name lookup within a type-namespace.
    pub fn find_by_name_and_type(&self, ty: &str, name: &str) -> Option<NodeId> {
        self.inner
            .read()
            .namespaces
            .get(ty)
            .and_then(|ns| ns.get(name))
            .copied()
    }

    pub fn contains(&self, ty: &str, name: &str) -> bool {
        self.find_by_name_and_type(ty, name).is_some()
    }

    /// All children of a type, in insertion order.
    pub fn find_by_type(&self, ty: &str) -> Vec<NodeId> {
        self.inner
            .read()
            .by_type
            .get(ty)
            .cloned()
            .unwrap_or_default()
    }

    /// All children of a concrete kind, in insertion order.
    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.inner
            .read()
            .by_kind
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Name lookup across all type-namespaces; O(#types).
    pub fn find_by_name(&self, name: &str) -> Vec<NodeId> {
        let inner = self.inner.read();
        inner
            .entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.id)
            .collect()
    }

    /// Linear scan with an arbitrary predicate, in insertion order.
    pub fn find_matching(&self, pred: impl Fn(&ChildEntry) -> bool) -> Vec<NodeId> {
        self.inner
            .read()
            .entries
            .iter()
            .filter(|e| pred(e))
            .map(|e| e.id)
            .collect()
    }

    /// All entries in insertion order.
    pub fn all(&self) -> Vec<ChildEntry> {
        self.inner.read().entries.clone()
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.inner.read().entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        *inner = Inner::default();
    }

    /// Rebuild every index from the child list. Full O(n) recovery
    /// path; normal mutations keep the indexes current incrementally.
    pub fn rebuild_indices(&self) {
        self.inner.write().rebuild();
    }

    pub fn stats(&self) -> CollectionStats {
        let inner = self.inner.read();
        CollectionStats {
            children: inner.entries.len(),
            namespace_entries: inner.namespaces.values().map(|ns| ns.len()).sum(),
            type_entries: inner.by_type.values().map(|ids| ids.len()).sum(),
            kind_entries: inner.by_kind.values().map(|ids| ids.len()).sum(),
        }
    }
}
