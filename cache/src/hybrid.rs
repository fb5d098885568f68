//! The hybrid cache: an identity table and a string table behind one
//! surface.
//!
//! Graph nodes are permanent for the life of their graph, so the cache
//! never evicts: entries leave only through `remove` or `clear`. The
//! identity table is keyed by [`NodeId`]; the string table holds derived
//! lookups under normalized keys, with short keys interned so the many
//! repeated attribute-lookup keys share one allocation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metagraph_core::NodeId;
use tracing::debug;

/// Keys longer than this skip the intern table.
const INTERN_MAX_LEN: usize = 32;

/// A key into either cache table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Node(NodeId),
    Str(String),
}

impl From<NodeId> for CacheKey {
    fn from(id: NodeId) -> Self {
        CacheKey::Node(id)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        CacheKey::Str(s.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        CacheKey::Str(s)
    }
}

/// Counter snapshot. `loads` counts supplier executions by
/// `compute_if_absent`; every `get`/`compute_if_absent` counts one hit
/// or one miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Unbounded, eviction-free cache over two concurrent tables.
///
/// Writers during the build phase call `clear` after structural
/// mutations; `clear`/teardown is a single-owner convention, not
/// lock-enforced.
#[derive(Debug)]
pub struct HybridCache<V> {
    identity: DashMap<NodeId, V>,
    strings: DashMap<Arc<str>, V>,
    intern: DashMap<String, Arc<str>>,
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
}

impl<V: Clone> HybridCache<V> {
    pub fn new() -> Self {
        Self {
            identity: DashMap::new(),
            strings: DashMap::new(),
            intern: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            loads: AtomicU64::new(0),
        }
    }

    fn intern_key(&self, s: &str) -> Arc<str> {
        if s.len() >= INTERN_MAX_LEN {
            return Arc::from(s);
        }
        if let Some(existing) = self.intern.get(s) {
            return existing.clone();
        }
        let arc: Arc<str> = Arc::from(s);
        self.intern.insert(s.to_string(), arc.clone());
        arc
    }

    pub fn get(&self, key: impl Into<CacheKey>) -> Option<V> {
        let found = match key.into() {
            CacheKey::Node(id) => self.identity.get(&id).map(|v| v.clone()),
            CacheKey::Str(s) => self.strings.get(s.as_str()).map(|v| v.clone()),
        };
        match found {
            Some(v) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(v)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, key: impl Into<CacheKey>, value: V) {
        match key.into() {
            CacheKey::Node(id) => {
                self.identity.insert(id, value);
            }
            CacheKey::Str(s) => {
                let k = self.intern_key(&s);
                self.strings.insert(k, value);
            }
        }
    }

    /// Return the cached value, or run the supplier and cache its
    /// result. The supplier runs at most once per key under concurrency:
    /// the entry's shard stays locked while it executes.
    pub fn compute_if_absent(&self, key: impl Into<CacheKey>, supplier: impl FnOnce() -> V) -> V {
        match key.into() {
            CacheKey::Node(id) => match self.identity.entry(id) {
                Entry::Occupied(e) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    e.get().clone()
                }
                Entry::Vacant(e) => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    self.loads.fetch_add(1, Ordering::Relaxed);
                    e.insert(supplier()).value().clone()
                }
            },
            CacheKey::Str(s) => {
                let k = self.intern_key(&s);
                match self.strings.entry(k) {
                    Entry::Occupied(e) => {
                        self.hits.fetch_add(1, Ordering::Relaxed);
                        e.get().clone()
                    }
                    Entry::Vacant(e) => {
                        self.misses.fetch_add(1, Ordering::Relaxed);
                        self.loads.fetch_add(1, Ordering::Relaxed);
                        e.insert(supplier()).value().clone()
                    }
                }
            }
        }
    }

    pub fn remove(&self, key: impl Into<CacheKey>) -> Option<V> {
        match key.into() {
            CacheKey::Node(id) => self.identity.remove(&id).map(|(_, v)| v),
            CacheKey::Str(s) => self.strings.remove(s.as_str()).map(|(_, v)| v),
        }
    }

    /// Empty both tables and the intern table, and reset the counters.
    pub fn clear(&self) {
        debug!(
            entries = self.len(),
            "clearing cache"
        );
        self.identity.clear();
        self.strings.clear();
        self.intern.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.loads.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.identity.len() + self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identity.is_empty() && self.strings.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for HybridCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
