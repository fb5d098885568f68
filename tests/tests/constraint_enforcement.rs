//! Constraint engine enforcement at mutation time.

use metagraph_tests::prelude::*;

mod placement {
    use super::*;

    // ========== TEST: placement gate ==========

    #[test]
    fn test_collection_attr_only_on_fields() {
        // GIVEN the standard rule: 'collection' attrs only on fields
        let mut graph = standard_graph();
        let field = graph.create_node("field", "string", "tags").unwrap();
        let validator = graph.create_node("validator", "required", "req").unwrap();

        // WHEN attaching to a field: accepted
        graph.add_attr(field, "collection", Value::from("list")).unwrap();
        assert_eq!(
            graph.attr_value(field, "collection").unwrap(),
            Value::from("list")
        );

        // WHEN attaching the same attr to a validator: rejected
        let err = graph
            .add_attr(validator, "collection", Value::from("list"))
            .unwrap_err();
        assert!(matches!(err, MetaError::PlacementViolation { .. }));
        assert!(err.to_string().contains("collection-on-fields"));

        // THEN the validator's child collection is unchanged
        assert!(graph.children(validator).is_empty());
        assert!(graph.node(validator).unwrap().children().stats().is_consistent());
    }

    #[test]
    fn test_placement_failure_reports_full_path() {
        let mut graph = standard_graph();
        let obj = graph.create_node("object", "pojo", "User").unwrap();
        let validator = graph.create_node("validator", "required", "req").unwrap();
        graph.add_child(obj, validator).unwrap();

        let err = graph
            .add_attr(validator, "collection", Value::from("x"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("object:pojo:User"));
        assert!(msg.contains("validator:required:req"));
    }
}

mod priority {
    use super::*;

    // ========== TEST: evaluation order ==========

    #[test]
    fn test_higher_priority_constraint_reports_first() {
        // GIVEN maxLength rules at priority 900 (bounds) and 750 (positive)
        let mut graph = standard_graph();
        let field = graph.create_node("field", "string", "name").unwrap();

        // WHEN a value violates both rules
        let err = graph.add_attr(field, "maxLength", Value::Int(-5)).unwrap_err();

        // THEN the priority-900 rule is the one reported
        assert!(matches!(err, MetaError::ValidationViolation { .. }));
        assert!(err.to_string().contains("maxlength-bounds"));

        // AND a value violating only the 750 rule reports that one
        let err = graph.add_attr(field, "maxLength", Value::Int(0)).unwrap_err();
        assert!(err.to_string().contains("maxlength-positive"));

        // failed adds left nothing behind
        assert!(graph.children(field).is_empty());
    }

    #[test]
    fn test_evaluation_order_is_exposed() {
        let (_registry, constraints) = standard_components();

        let order = constraints.evaluation_order();
        let bounds = order.iter().position(|id| *id == "maxlength-bounds").unwrap();
        let positive = order.iter().position(|id| *id == "maxlength-positive").unwrap();
        let placement = order.iter().position(|id| *id == "collection-on-fields").unwrap();

        // 900 before 800 before 750
        assert!(bounds < placement);
        assert!(placement < positive);
    }
}

mod value_gate {
    use super::*;

    #[test]
    fn test_declared_type_checked_before_constraints() {
        let mut graph = standard_graph();
        let field = graph.create_node("field", "string", "name").unwrap();

        // maxLength is declared Int; a string value never reaches the rules
        let err = graph
            .add_attr(field, "maxLength", Value::from("long"))
            .unwrap_err();
        assert!(matches!(err, MetaError::ValidationViolation { .. }));
        assert!(err.to_string().contains("expected value of type int"));
    }

    #[test]
    fn test_accepted_value_passes_all_gates() {
        let mut graph = standard_graph();
        let field = graph.create_node("field", "string", "name").unwrap();

        graph.add_attr(field, "maxLength", Value::Int(255)).unwrap();
        graph.validate(field).unwrap();
    }
}
