//! # trellis_schema - Schema Document Model
//!
//! The schema document is the single source of truth for a Trellis UI:
//! a versioned JSON tree of typed nodes. Interpreters hold one mutable
//! document, patch engines mutate it in place, and builders read typed
//! views over it.
//!
//! ## Key Concepts
//!
//! - **SchemaDocument**: owns the mutable JSON value, validates structure
//! - **NodeRef**: a typed, borrowed view over one node in the tree
//! - Nodes have no object identity; a node *is* its position in the tree

pub mod document;
pub mod node;

pub use document::{SchemaDocument, SchemaError, SchemaResult, SUPPORTED_VERSION};
pub use node::NodeRef;
