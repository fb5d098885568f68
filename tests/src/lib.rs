//! Shared fixtures for the integration scenarios.

pub mod fixtures;

pub mod prelude {
    pub use crate::fixtures::{standard_components, standard_graph, StandardSchemaProvider};
    pub use metagraph_constraint::{
        Constraint, ConstraintEngine, NodePredicate, Pattern, ValuePredicate,
    };
    pub use metagraph_core::{
        MetaError, MetaResult, NodeFacts, NodeId, NodeKind, NodePath, TypeKey, Value, ValueType,
    };
    pub use metagraph_graph::MetaGraph;
    pub use metagraph_registry::{
        execute_providers, CoreTypeProvider, TypeProvider, TypeRegistry,
    };
}
