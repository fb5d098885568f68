//! Type providers and their dependency-ordered execution.

use std::collections::HashMap;

use metagraph_constraint::ConstraintEngine;
use metagraph_core::{MetaError, MetaResult, NodeKind, NodePath};
use tracing::debug;

use crate::registry::TypeRegistry;

/// An independently-authored source of type and constraint
/// registrations.
///
/// Providers declare the ids of providers they depend on; execution is
/// topologically sorted so a provider always runs after everything it
/// depends on. An unknown dependency or a dependency cycle is fatal
/// before any provider runs.
pub trait TypeProvider {
    /// Stable identifier, unique across the provider set.
    fn provider_id(&self) -> &str;

    /// Ids of providers that must run before this one.
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Register types and constraints.
    fn register(
        &self,
        registry: &mut TypeRegistry,
        constraints: &mut ConstraintEngine,
    ) -> MetaResult<()>;
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Execute providers in dependency order, driving the registry through
/// `Loading` to `Ready`. Returns the execution order (provider ids).
pub fn execute_providers(
    providers: &[&dyn TypeProvider],
    registry: &mut TypeRegistry,
    constraints: &mut ConstraintEngine,
) -> MetaResult<Vec<String>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, provider) in providers.iter().enumerate() {
        if index.insert(provider.provider_id(), i).is_some() {
            return Err(MetaError::configuration(
                NodePath::new(),
                format!("duplicate provider id '{}'", provider.provider_id()),
            ));
        }
    }

    let mut marks = vec![Mark::Unvisited; providers.len()];
    let mut order = Vec::with_capacity(providers.len());
    for i in 0..providers.len() {
        visit(i, providers, &index, &mut marks, &mut order)?;
    }

    registry.begin_loading();
    let mut executed = Vec::with_capacity(order.len());
    for &i in &order {
        let provider = providers[i];
        debug!(provider = provider.provider_id(), "executing provider");
        provider.register(registry, constraints)?;
        executed.push(provider.provider_id().to_string());
    }
    registry.mark_ready();
    Ok(executed)
}

fn visit(
    i: usize,
    providers: &[&dyn TypeProvider],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) -> MetaResult<()> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            return Err(MetaError::configuration(
                NodePath::new(),
                format!(
                    "provider dependency cycle involving '{}'",
                    providers[i].provider_id()
                ),
            ));
        }
        Mark::Unvisited => {}
    }
    marks[i] = Mark::Visiting;
    for dep in providers[i].dependencies() {
        let &j = index.get(dep).ok_or_else(|| {
            MetaError::configuration(
                NodePath::new(),
                format!(
                    "provider '{}' depends on unknown provider '{}'",
                    providers[i].provider_id(),
                    dep
                ),
            )
        })?;
        visit(j, providers, index, marks, order)?;
    }
    marks[i] = Mark::Done;
    order.push(i);
    Ok(())
}

/// The built-in provider: base `attr` subtypes and abstract roots for
/// the other kinds, so downstream providers start from a usable
/// baseline instead of each redeclaring the primitives.
pub struct CoreTypeProvider;

impl CoreTypeProvider {
    pub const ID: &'static str = "core-types";
}

impl TypeProvider for CoreTypeProvider {
    fn provider_id(&self) -> &str {
        Self::ID
    }

    fn register(
        &self,
        registry: &mut TypeRegistry,
        _constraints: &mut ConstraintEngine,
    ) -> MetaResult<()> {
        for subtype in ["string", "int", "bool", "float", "list"] {
            registry.register_type("attr", subtype, NodeKind::Attr, |t| {
                t.description(format!("{} attribute", subtype))
            })?;
        }

        registry.register_type("field", "base", NodeKind::Field, |t| {
            t.abstract_type()
                .description("abstract field root")
                .child("attr", "*", "*")
                .child("validator", "*", "*")
                .child("view", "*", "*")
        })?;

        registry.register_type("object", "base", NodeKind::Object, |t| {
            t.abstract_type()
                .description("abstract object root")
                .child("field", "*", "*")
                .child("object", "*", "*")
                .child("attr", "*", "*")
                .child("validator", "*", "*")
                .child("view", "*", "*")
        })?;

        registry.register_type("validator", "base", NodeKind::Validator, |t| {
            t.abstract_type()
                .description("abstract validator root")
                .child("attr", "*", "*")
        })?;

        registry.register_type("view", "base", NodeKind::View, |t| {
            t.abstract_type()
                .description("abstract view root")
                .child("attr", "*", "*")
        })?;

        Ok(())
    }
}
