//! Placement and validation constraints.
//!
//! Constraints are registered by providers alongside types and consulted
//! synchronously on every graph mutation:
//! - **Placement** constraints gate `add_child`: if the child predicate
//!   matches the node being attached and the target parent fails the
//!   allowed-parent predicate, the attach is rejected.
//! - **Validation** constraints gate attribute value assignment: if the
//!   target predicate matches the attribute and the value predicate fails,
//!   the assignment is rejected.
//!
//! The engine is append-only for the process lifetime and evaluates
//! constraints highest priority first, ties in registration order.

pub mod engine;
pub mod pattern;
pub mod predicate;

pub use engine::{Constraint, ConstraintEngine, ConstraintKind};
pub use pattern::{NodePredicate, Pattern};
pub use predicate::ValuePredicate;
