//! Provider discovery: dependency-ordered execution over a shared
//! registry.

use metagraph_tests::prelude::*;

/// A provider whose types extend another provider's types.
struct AddressProvider;

impl TypeProvider for AddressProvider {
    fn provider_id(&self) -> &str {
        "address-schema"
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![StandardSchemaProvider::ID]
    }

    fn register(
        &self,
        registry: &mut TypeRegistry,
        _constraints: &mut ConstraintEngine,
    ) -> MetaResult<()> {
        // extends a type owned by the provider we depend on
        registry.register_type("field", "zipcode", NodeKind::Field, |t| {
            t.inherits("field", "string")
        })?;
        Ok(())
    }
}

struct CyclicA;
struct CyclicB;

impl TypeProvider for CyclicA {
    fn provider_id(&self) -> &str {
        "cyclic-a"
    }
    fn dependencies(&self) -> Vec<&str> {
        vec!["cyclic-b"]
    }
    fn register(&self, _r: &mut TypeRegistry, _c: &mut ConstraintEngine) -> MetaResult<()> {
        Ok(())
    }
}

impl TypeProvider for CyclicB {
    fn provider_id(&self) -> &str {
        "cyclic-b"
    }
    fn dependencies(&self) -> Vec<&str> {
        vec!["cyclic-a"]
    }
    fn register(&self, _r: &mut TypeRegistry, _c: &mut ConstraintEngine) -> MetaResult<()> {
        Ok(())
    }
}

// ========== TEST: dependency resolution ==========

#[test]
fn test_providers_run_in_dependency_order() {
    // GIVEN providers listed in the wrong order
    let mut registry = TypeRegistry::new();
    let mut constraints = ConstraintEngine::new();

    let order = execute_providers(
        &[&AddressProvider, &StandardSchemaProvider, &CoreTypeProvider],
        &mut registry,
        &mut constraints,
    )
    .unwrap();

    // THEN dependencies ran first
    assert_eq!(order, vec!["core-types", "standard-schema", "address-schema"]);

    // AND the dependent type resolved its cross-provider parent,
    // inheriting its attribute declarations
    let zip = registry.find_type("field", "zipcode").unwrap();
    assert_eq!(zip.parent(), Some(&TypeKey::new("field", "string")));
    assert!(zip.attr_spec("maxLength").is_some());
}

#[test]
fn test_dependency_cycle_is_fatal_before_any_registration() {
    let mut registry = TypeRegistry::new();
    let mut constraints = ConstraintEngine::new();

    let err = execute_providers(
        &[&CoreTypeProvider, &CyclicA, &CyclicB],
        &mut registry,
        &mut constraints,
    )
    .unwrap_err();

    assert!(matches!(err, MetaError::Configuration { .. }));
    // nothing ran, not even the well-formed provider
    assert_eq!(registry.type_count(), 0);
}

#[test]
fn test_missing_dependency_is_fatal() {
    let mut registry = TypeRegistry::new();
    let mut constraints = ConstraintEngine::new();

    // AddressProvider without its dependency chain
    let err = execute_providers(&[&AddressProvider], &mut registry, &mut constraints).unwrap_err();
    assert!(matches!(err, MetaError::Configuration { .. }));
    assert!(err.to_string().contains("standard-schema"));
}

#[test]
fn test_reexecution_with_identical_contracts_is_noop() {
    // GIVEN a loaded registry
    let mut registry = TypeRegistry::new();
    let mut constraints = ConstraintEngine::new();
    execute_providers(
        &[&CoreTypeProvider, &StandardSchemaProvider],
        &mut registry,
        &mut constraints,
    )
    .unwrap();
    let count = registry.type_count();

    // WHEN the same providers run again (registration stays open)
    execute_providers(
        &[&CoreTypeProvider, &StandardSchemaProvider],
        &mut registry,
        &mut constraints,
    )
    .unwrap();

    // THEN identical re-registrations changed nothing
    assert_eq!(registry.type_count(), count);
}
