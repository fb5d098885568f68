//! Overlay (wrap) and super-chain inheritance scenarios.

use metagraph_tests::prelude::*;

mod overlay {
    use super::*;

    // ========== TEST: wrap + override ==========

    #[test]
    fn test_wrap_overrides_attribute_without_touching_base() {
        // GIVEN a field with maxLength 10 attached to a base object
        let mut graph = standard_graph();
        let base_obj = graph.create_node("object", "pojo", "Contact").unwrap();
        let name = graph.create_node("field", "string", "name").unwrap();
        graph.add_attr(name, "maxLength", Value::Int(10)).unwrap();
        graph.add_child(base_obj, name).unwrap();
        assert_eq!(graph.attr_value(name, "maxLength").unwrap(), Value::Int(10));

        // WHEN wrapping the field into a derived object and overriding
        let derived_obj = graph.create_node("object", "pojo", "DetailedContact").unwrap();
        let wrap = graph.wrap(name).unwrap();
        // the wrap shares the original's identity and supers it
        assert_eq!(graph.node(wrap).unwrap().key(), graph.node(name).unwrap().key());
        assert_eq!(graph.node(wrap).unwrap().super_node(), Some(name));

        graph.add_child(derived_obj, wrap).unwrap();
        graph.add_attr(wrap, "maxLength", Value::Int(20)).unwrap();

        // THEN the wrap resolves the override, the base keeps its value
        assert_eq!(graph.attr_value(wrap, "maxLength").unwrap(), Value::Int(20));
        assert_eq!(graph.attr_value(name, "maxLength").unwrap(), Value::Int(10));

        // AND an attribute only present on the base is inherited by the wrap
        graph.add_attr(name, "label", Value::from("Name")).unwrap();
        assert_eq!(graph.attr_value(wrap, "label").unwrap(), Value::from("Name"));
    }

    #[test]
    fn test_double_wrap_requires_detach() {
        let mut graph = standard_graph();
        let obj = graph.create_node("object", "pojo", "Contact").unwrap();
        let name = graph.create_node("field", "string", "name").unwrap();
        graph.add_child(obj, name).unwrap();

        // first wrap replaces the original in place
        let wrap = graph.wrap(name).unwrap();
        let prior = graph.replace_child(obj, wrap).unwrap();
        assert_eq!(prior, Some(name));
        assert_eq!(graph.child(obj, "field", "name"), Some(wrap));

        // WHEN wrapping again while the first wrap is attached
        let err = graph.wrap(name).unwrap_err();
        assert!(matches!(err, MetaError::InvalidOperation { .. }));

        // THEN detaching the wrap releases the original
        graph.remove_child(obj, "field", "name").unwrap();
        let second = graph.wrap(name).unwrap();
        assert_ne!(second, wrap);
    }

    #[test]
    fn test_wrap_of_middle_field_keeps_child_order() {
        // GIVEN three fields under an object
        let mut graph = standard_graph();
        let obj = graph.create_node("object", "pojo", "Contact").unwrap();
        let first = graph.create_node("field", "string", "first").unwrap();
        let middle = graph.create_node("field", "string", "middle").unwrap();
        let last = graph.create_node("field", "string", "last").unwrap();
        graph.add_child(obj, first).unwrap();
        graph.add_child(obj, middle).unwrap();
        graph.add_child(obj, last).unwrap();

        // WHEN overlaying the middle field in place
        let wrap = graph.wrap(middle).unwrap();
        graph.replace_child(obj, wrap).unwrap();

        // THEN every read path agrees on the order
        let expected = vec![first, wrap, last];
        assert_eq!(graph.children(obj), expected);
        assert_eq!(graph.children_of_type(obj, "field"), expected);
        assert_eq!(graph.children_of_kind(obj, NodeKind::Field), expected);
    }

    #[test]
    fn test_replace_detaches_prior_occupant() {
        let mut graph = standard_graph();
        let obj = graph.create_node("object", "pojo", "Contact").unwrap();
        let old = graph.create_node("field", "string", "name").unwrap();
        let new = graph.create_node("field", "string", "name").unwrap();
        graph.add_child(obj, old).unwrap();

        let prior = graph.replace_child(obj, new).unwrap();

        assert_eq!(prior, Some(old));
        assert_eq!(graph.node(old).unwrap().parent(), None);
        assert_eq!(graph.node(new).unwrap().parent(), Some(obj));
        let stats = graph.node(obj).unwrap().children().stats();
        assert_eq!(stats.children, 1);
        assert!(stats.is_consistent());
    }
}

mod super_chain {
    use super::*;

    #[test]
    fn test_effective_attrs_union_minus_overrides() {
        // GIVEN a two-level super chain with one override
        let mut graph = standard_graph();
        let base = graph.create_node("field", "string", "name").unwrap();
        let mid = graph.create_node("field", "string", "name").unwrap();
        let leaf = graph.create_node("field", "string", "name").unwrap();
        graph.add_attr(base, "maxLength", Value::Int(10)).unwrap();
        graph.add_attr(base, "label", Value::from("Name")).unwrap();
        graph.add_attr(mid, "maxLength", Value::Int(20)).unwrap();
        graph.set_super(mid, base).unwrap();
        graph.set_super(leaf, mid).unwrap();

        // THEN the leaf sees the nearest override and the union of names
        assert_eq!(graph.attr_value(leaf, "maxLength").unwrap(), Value::Int(20));
        assert_eq!(graph.attr_value(leaf, "label").unwrap(), Value::from("Name"));

        let names = graph.effective_attr_names(leaf).unwrap();
        assert_eq!(names.iter().filter(|n| *n == "maxLength").count(), 1);
        assert!(names.contains(&"label".to_string()));
    }

    #[test]
    fn test_super_cycle_rejected_at_assignment() {
        let mut graph = standard_graph();
        let a = graph.create_node("field", "string", "a").unwrap();
        let b = graph.create_node("field", "string", "b").unwrap();
        graph.set_super(a, b).unwrap();

        // closing the loop is a configuration error, synchronously
        let err = graph.set_super(b, a).unwrap_err();
        assert!(matches!(err, MetaError::Configuration { .. }));
        // the failed assignment left no edge behind
        assert_eq!(graph.node(b).unwrap().super_node(), None);
    }

    #[test]
    fn test_lookup_never_walks_super_implicitly() {
        // GIVEN a super with a validator child
        let mut graph = standard_graph();
        let base = graph.create_node("field", "string", "name").unwrap();
        let derived = graph.create_node("field", "string", "name").unwrap();
        let validator = graph.create_node("validator", "required", "req").unwrap();
        graph.add_child(base, validator).unwrap();
        graph.set_super(derived, base).unwrap();

        // child lookup on the derived node does not see the super's child
        assert_eq!(graph.child(derived, "validator", "req"), None);
        assert_eq!(graph.child(base, "validator", "req"), Some(validator));
        // attribute resolution is the one inheritance-aware read path
        assert!(graph.attr_value(derived, "anything").is_err());
    }
}

mod cache_coherence {
    use super::*;

    #[test]
    fn test_resolution_cache_invalidated_by_mutation() {
        let mut graph = standard_graph();
        let field = graph.create_node("field", "string", "name").unwrap();
        let attr = graph.add_attr(field, "maxLength", Value::Int(10)).unwrap();

        // prime the cache, then hit it
        assert_eq!(graph.attr_value(field, "maxLength").unwrap(), Value::Int(10));
        assert_eq!(graph.attr_value(field, "maxLength").unwrap(), Value::Int(10));
        assert!(graph.cache_stats().hits >= 1);

        // WHEN mutating the value
        graph.set_attr_value(attr, Value::Int(42)).unwrap();

        // THEN the stale resolution is gone (clear also resets counters)
        assert_eq!(graph.cache_stats().hits, 0);
        assert_eq!(graph.attr_value(field, "maxLength").unwrap(), Value::Int(42));
    }
}
