//! The standard schema used across the integration scenarios: a small
//! set of concrete field/object/validator/view types on top of the core
//! baseline, plus a stock constraint set.

use std::sync::Arc;

use metagraph_constraint::{Constraint, ConstraintEngine, NodePredicate, ValuePredicate};
use metagraph_core::{MetaResult, NodeKind, ValueType};
use metagraph_graph::MetaGraph;
use metagraph_registry::{execute_providers, CoreTypeProvider, TypeProvider, TypeRegistry};

/// Concrete types and stock constraints layered over the core baseline.
///
/// Constraints:
/// - `collection-on-fields` (placement, 800): the `collection` attribute
///   may only live on field nodes.
/// - `maxlength-bounds` (validation, 900): `maxLength` in [0, 100000].
/// - `maxlength-positive` (validation, 750): `maxLength` at least 1.
pub struct StandardSchemaProvider;

impl StandardSchemaProvider {
    pub const ID: &'static str = "standard-schema";
}

impl TypeProvider for StandardSchemaProvider {
    fn provider_id(&self) -> &str {
        Self::ID
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![CoreTypeProvider::ID]
    }

    fn register(
        &self,
        registry: &mut TypeRegistry,
        constraints: &mut ConstraintEngine,
    ) -> MetaResult<()> {
        registry.register_type("field", "string", NodeKind::Field, |t| {
            t.inherits("field", "base")
                .attr("maxLength", ValueType::Int)
                .attr("label", ValueType::String)
                .attr("collection", ValueType::String)
        })?;
        registry.register_type("field", "int", NodeKind::Field, |t| {
            t.inherits("field", "base")
                .attr("minValue", ValueType::Int)
                .attr("maxValue", ValueType::Int)
        })?;
        registry.register_type("object", "pojo", NodeKind::Object, |t| {
            t.inherits("object", "base").attr("description", ValueType::String)
        })?;
        registry.register_type("validator", "required", NodeKind::Validator, |t| {
            t.inherits("validator", "base").attr("message", ValueType::String)
        })?;
        registry.register_type("view", "basic", NodeKind::View, |t| {
            t.inherits("view", "base")
        })?;

        constraints.add(Constraint::placement(
            "collection-on-fields",
            "the 'collection' attribute only applies to fields",
            800,
            NodePredicate::new("attr", "*", "collection"),
            NodePredicate::of_type("field"),
        ));
        constraints.add(Constraint::validation(
            "maxlength-bounds",
            "maxLength must be within sane bounds",
            900,
            NodePredicate::new("attr", "*", "maxLength"),
            ValuePredicate::int_range(Some(0), Some(100_000)),
        ));
        constraints.add(Constraint::validation(
            "maxlength-positive",
            "maxLength must be positive",
            750,
            NodePredicate::new("attr", "*", "maxLength"),
            ValuePredicate::int_range(Some(1), None),
        ));
        Ok(())
    }
}

/// Registry and engine loaded with the core and standard providers.
pub fn standard_components() -> (Arc<TypeRegistry>, Arc<ConstraintEngine>) {
    let mut registry = TypeRegistry::new();
    let mut constraints = ConstraintEngine::new();
    execute_providers(
        &[&CoreTypeProvider, &StandardSchemaProvider],
        &mut registry,
        &mut constraints,
    )
    .expect("standard schema must load");
    (Arc::new(registry), Arc::new(constraints))
}

/// A fresh graph over the standard schema.
pub fn standard_graph() -> MetaGraph {
    let (registry, constraints) = standard_components();
    MetaGraph::new(registry, constraints)
}
