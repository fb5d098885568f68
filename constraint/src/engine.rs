//! The constraint engine: ordered, append-only rule evaluation.

use std::cmp::Reverse;

use metagraph_core::{MetaError, MetaResult, NodeFacts, NodePath, Value};
use tracing::{debug, trace};

use crate::pattern::NodePredicate;
use crate::predicate::ValuePredicate;

/// What a constraint governs.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// Gates `add_child`: when `child` matches the node being attached,
    /// the attach target must satisfy `allowed_parent`.
    Placement {
        child: NodePredicate,
        allowed_parent: NodePredicate,
    },
    /// Gates attribute assignment: when `target` matches the attribute
    /// node, its value must satisfy `value`.
    Validation {
        target: NodePredicate,
        value: ValuePredicate,
    },
}

/// A single placement or validation rule.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: String,
    pub description: String,
    pub priority: i32,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn placement(
        id: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        child: NodePredicate,
        allowed_parent: NodePredicate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            kind: ConstraintKind::Placement {
                child,
                allowed_parent,
            },
        }
    }

    pub fn validation(
        id: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        target: NodePredicate,
        value: ValuePredicate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            kind: ConstraintKind::Validation { target, value },
        }
    }
}

/// Append-only set of constraints, evaluated highest numeric priority
/// first, ties broken by registration order.
///
/// Constraints are registered during provider execution (single writer)
/// and read-only afterwards; enforcement is synchronous and never
/// deferred.
#[derive(Debug, Default)]
pub struct ConstraintEngine {
    constraints: Vec<Constraint>,
    /// Indexes into `constraints`, sorted by (priority desc, insertion).
    order: Vec<usize>,
}

impl ConstraintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constraint. Constraints are never removed.
    pub fn add(&mut self, constraint: Constraint) {
        debug!(
            id = %constraint.id,
            priority = constraint.priority,
            "registering constraint"
        );
        self.constraints.push(constraint);
        self.order = (0..self.constraints.len()).collect();
        // Stable sort keeps registration order within a priority tier.
        self.order
            .sort_by_key(|&i| Reverse(self.constraints[i].priority));
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraint ids in the order they are evaluated. Exposed so tests
    /// can assert the priority/registration ordering.
    pub fn evaluation_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&i| self.constraints[i].id.as_str())
            .collect()
    }

    fn ordered(&self) -> impl Iterator<Item = &Constraint> {
        self.order.iter().map(move |&i| &self.constraints[i])
    }

    /// Check every placement constraint against an attach of `child`
    /// under `parent`. The first failing constraint (in evaluation
    /// order) rejects the mutation.
    pub fn check_placement(
        &self,
        parent: &NodeFacts,
        child: &NodeFacts,
        parent_path: &NodePath,
    ) -> MetaResult<()> {
        for constraint in self.ordered() {
            if let ConstraintKind::Placement {
                child: child_pred,
                allowed_parent,
            } = &constraint.kind
            {
                if child_pred.matches(child) && !allowed_parent.matches(parent) {
                    debug!(
                        constraint = %constraint.id,
                        parent = %parent,
                        child = %child,
                        "placement rejected"
                    );
                    return Err(MetaError::placement(
                        parent_path.clone().child(child.segment()),
                        format!(
                            "constraint '{}' forbids {} under {}: {}",
                            constraint.id, child, parent, constraint.description
                        ),
                    ));
                }
            }
        }
        trace!(parent = %parent, child = %child, "placement accepted");
        Ok(())
    }

    /// Check every validation constraint against an attribute value.
    ///
    /// A null value is skipped unless the attribute is declared required;
    /// a required null is rejected before any predicate runs.
    pub fn check_value(
        &self,
        attr: &NodeFacts,
        path: &NodePath,
        value: &Value,
        required: bool,
    ) -> MetaResult<()> {
        if value.is_null() {
            if required {
                return Err(MetaError::validation(
                    path.clone(),
                    attr.name.clone(),
                    Value::Null,
                    "required attribute may not be null",
                ));
            }
            return Ok(());
        }
        for constraint in self.ordered() {
            if let ConstraintKind::Validation {
                target,
                value: value_pred,
            } = &constraint.kind
            {
                if target.matches(attr) && !value_pred.check(value) {
                    debug!(
                        constraint = %constraint.id,
                        attr = %attr,
                        %value,
                        "validation rejected"
                    );
                    return Err(MetaError::validation(
                        path.clone(),
                        attr.name.clone(),
                        value.clone(),
                        format!(
                            "constraint '{}' requires value {}: {}",
                            constraint.id, value_pred, constraint.description
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}
