//! Building a small object schema and querying it back.

use metagraph_tests::prelude::*;

mod user_schema {
    use super::*;

    // ========== TEST: build + lookup ==========

    #[test]
    fn test_build_user_object() {
        // GIVEN the standard schema
        let mut graph = standard_graph();

        // WHEN assembling a User object with two fields
        let user = graph.create_node("object", "pojo", "User").unwrap();
        let name = graph.create_node("field", "string", "name").unwrap();
        let age = graph.create_node("field", "int", "age").unwrap();
        graph.add_attr(name, "maxLength", Value::Int(64)).unwrap();
        graph.add_attr(age, "minValue", Value::Int(0)).unwrap();
        graph.add_child(user, name).unwrap();
        graph.add_child(user, age).unwrap();

        // THEN children come back in insertion order, by identity
        assert_eq!(graph.children(user), vec![name, age]);
        assert_eq!(graph.child(user, "field", "name"), Some(name));
        assert_eq!(graph.get_child(user, "field", "age").unwrap(), age);
        assert_eq!(graph.children_of_kind(user, NodeKind::Field), vec![name, age]);

        // AND attribute resolution sees the attached values
        assert_eq!(graph.attr_value(name, "maxLength").unwrap(), Value::Int(64));
        assert_eq!(graph.attr_value(age, "minValue").unwrap(), Value::Int(0));

        // AND the whole subtree validates
        graph.validate(user).unwrap();
    }

    #[test]
    fn test_type_registry_answers() {
        let (registry, _constraints) = standard_components();

        // every registered key is visible and instantiable iff concrete
        assert!(registry.has_type("field"));
        assert!(registry.has_type("object"));
        assert!(registry.find_type("field", "string").unwrap().parent().is_some());
        assert!(registry.create_instance("field", "string", "x").is_ok());
        assert!(registry.create_instance("field", "base", "x").is_err());

        // inherited child patterns: field.string takes validators from field.base
        assert!(registry.accepts_child("field", "string", "validator", "required", "v"));
        // objects accept fields but fields do not accept objects
        assert!(registry.accepts_child("object", "pojo", "field", "int", "f"));
        assert!(!registry.accepts_child("field", "string", "object", "pojo", "o"));
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let mut graph = standard_graph();
        let user = graph.create_node("object", "pojo", "User").unwrap();
        let f1 = graph.create_node("field", "string", "name").unwrap();
        let f2 = graph.create_node("field", "int", "name").unwrap();
        graph.add_child(user, f1).unwrap();

        // same name, same type-namespace ('field'): rejected
        let err = graph.add_child(user, f2).unwrap_err();
        assert!(matches!(err, MetaError::DuplicateChild { .. }));

        // index state is exactly the pre-call state
        let stats = graph.node(user).unwrap().children().stats();
        assert_eq!(stats.children, 1);
        assert!(stats.is_consistent());

        // an attr with the same name lives in a different namespace
        graph.add_attr(user, "description", Value::from("a user")).unwrap();
        assert_eq!(graph.children(user).len(), 2);
    }

    #[test]
    fn test_error_path_names_the_offender() {
        let mut graph = standard_graph();
        let user = graph.create_node("object", "pojo", "User").unwrap();
        let f1 = graph.create_node("field", "string", "name").unwrap();
        let f2 = graph.create_node("field", "string", "name").unwrap();
        graph.add_child(user, f1).unwrap();

        let err = graph.add_child(user, f2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("object:pojo:User"));
        assert!(msg.contains("name"));
    }
}

mod removal {
    use super::*;

    #[test]
    fn test_remove_and_reattach() {
        let mut graph = standard_graph();
        let user = graph.create_node("object", "pojo", "User").unwrap();
        let name = graph.create_node("field", "string", "name").unwrap();
        graph.add_child(user, name).unwrap();

        // WHEN removing by type-namespaced name
        let removed = graph.remove_child(user, "field", "name").unwrap();
        assert_eq!(removed, name);
        assert!(graph.children(user).is_empty());
        assert_eq!(graph.node(name).unwrap().parent(), None);

        // THEN the detached node can be attached again
        graph.add_child(user, name).unwrap();
        assert_eq!(graph.child(user, "field", "name"), Some(name));
    }

    #[test]
    fn test_remove_missing_child_is_not_found() {
        let mut graph = standard_graph();
        let user = graph.create_node("object", "pojo", "User").unwrap();

        let err = graph.remove_child(user, "field", "ghost").unwrap_err();
        assert!(err.is_not_found());
    }
}
