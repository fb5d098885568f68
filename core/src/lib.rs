//! Core types shared by every metagraph crate.
//!
//! This crate defines:
//! - Identity types ([`NodeId`], [`TypeKey`], [`NodeKind`])
//! - The value model ([`Value`], [`ValueType`])
//! - Node identity facts used by predicates ([`NodeFacts`], [`NodePath`])
//! - The error taxonomy ([`MetaError`], [`MetaResult`])

pub mod error;
pub mod facts;
pub mod id;
pub mod key;
pub mod value;

pub use error::{MetaError, MetaResult};
pub use facts::{NodeFacts, NodePath};
pub use id::NodeId;
pub use key::{NodeKind, TypeKey};
pub use value::{Value, ValueType};
