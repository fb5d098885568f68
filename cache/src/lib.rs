//! Read-path caching for permanent graph nodes and derived lookups.

pub mod hybrid;

pub use hybrid::{CacheKey, CacheStats, HybridCache};
