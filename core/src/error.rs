//! Error taxonomy shared by every metagraph crate.

use thiserror::Error;

use crate::facts::NodePath;
use crate::value::Value;

/// Result type for metagraph operations.
pub type MetaResult<T> = Result<T, MetaError>;

/// Errors raised by the registry, the constraint engine, and the graph.
///
/// All errors are raised synchronously at the mutation or lookup that
/// caused them; nothing is retried or deferred. `NotFound` is the one
/// recoverable variant: lookups return it as a normal branch condition,
/// everything else is fatal to the build that triggered it.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("Configuration error at {path}: {message}")]
    Configuration { path: NodePath, message: String },

    #[error("Placement violation at {path}: {message}")]
    PlacementViolation { path: NodePath, message: String },

    #[error("Validation violation at {path}: attribute '{attr}' value {value}: {message}")]
    ValidationViolation {
        path: NodePath,
        attr: String,
        value: Value,
        message: String,
    },

    #[error("Not found at {path}: {what}")]
    NotFound { path: NodePath, what: String },

    #[error("Duplicate child '{name}' (type {child_type}) under {path}")]
    DuplicateChild {
        path: NodePath,
        child_type: String,
        name: String,
    },

    #[error("Invalid operation at {path}: {message}")]
    InvalidOperation { path: NodePath, message: String },
}

impl MetaError {
    pub fn configuration(path: NodePath, message: impl Into<String>) -> Self {
        Self::Configuration {
            path,
            message: message.into(),
        }
    }

    pub fn placement(path: NodePath, message: impl Into<String>) -> Self {
        Self::PlacementViolation {
            path,
            message: message.into(),
        }
    }

    pub fn validation(
        path: NodePath,
        attr: impl Into<String>,
        value: Value,
        message: impl Into<String>,
    ) -> Self {
        Self::ValidationViolation {
            path,
            attr: attr.into(),
            value,
            message: message.into(),
        }
    }

    pub fn not_found(path: NodePath, what: impl Into<String>) -> Self {
        Self::NotFound {
            path,
            what: what.into(),
        }
    }

    pub fn duplicate_child(
        path: NodePath,
        child_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::DuplicateChild {
            path,
            child_type: child_type.into(),
            name: name.into(),
        }
    }

    pub fn invalid_operation(path: NodePath, message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            path,
            message: message.into(),
        }
    }

    /// Whether this error is the recoverable lookup-miss variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
