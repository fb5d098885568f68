//! The type registry: catalog of node type definitions.
//!
//! Providers register [`TypeDef`]s through the fluent builder; the
//! registry resolves inheritance at registration time, answers lookups
//! and `accepts_child` questions, and acts as the factory for new node
//! instances. Provider execution order is resolved topologically from
//! declared dependencies before any graph is built.

pub mod builder;
pub mod provider;
pub mod registry;
pub mod types;

pub use builder::TypeDefBuilder;
pub use provider::{execute_providers, CoreTypeProvider, TypeProvider};
pub use registry::{RegistryState, TypeRegistry};
pub use types::{AttrSpec, ChildPattern, NodeFactory, NodeSeed, TypeDef};
