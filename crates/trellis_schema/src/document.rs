//! Schema documents - validated, versioned UI descriptions
//!
//! A document arrives once from the remote source and is then mutated in
//! place by the patch engine. Validation runs up front and again after
//! every delta batch is applied; structural failures are fatal for the
//! document in question, a version mismatch only degrades.

use crate::node::NodeRef;
use serde_json::Value;
use thiserror::Error;

/// The schema version this interpreter fully supports
pub const SUPPORTED_VERSION: &str = "1.0";

/// Result type for document operations
pub type SchemaResult<T = ()> = Result<T, SchemaError>;

/// Errors from document validation and parsing
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Document is empty")]
    Empty,

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Document is missing the 'version' field")]
    MissingVersion,

    #[error("Document 'version' must be a string, got {0}")]
    InvalidVersion(String),

    #[error("Document is missing the 'root' node")]
    MissingRoot,

    #[error("Document 'root' must be an object, got {0}")]
    InvalidRoot(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A validated schema document
///
/// Owns the mutable JSON value that the patch engine addresses through
/// JSON-Pointer paths. There is always exactly one `root` node.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    value: Value,
}

impl SchemaDocument {
    /// Validate and wrap a raw JSON value
    pub fn new(value: Value) -> SchemaResult<Self> {
        Self::validate(&value)?;
        Ok(Self { value })
    }

    /// Parse and validate a JSON string
    pub fn from_str(json: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::new(value)
    }

    /// Validate the structural invariants of a raw document value
    pub fn validate(value: &Value) -> SchemaResult {
        let obj = match value {
            Value::Null => return Err(SchemaError::Empty),
            Value::Object(obj) if obj.is_empty() => return Err(SchemaError::Empty),
            Value::Object(obj) => obj,
            _ => return Err(SchemaError::NotAnObject),
        };

        match obj.get("version") {
            None => return Err(SchemaError::MissingVersion),
            Some(Value::String(_)) => {}
            Some(other) => return Err(SchemaError::InvalidVersion(type_name(other).into())),
        }

        match obj.get("root") {
            None => return Err(SchemaError::MissingRoot),
            Some(Value::Object(_)) => {}
            Some(other) => return Err(SchemaError::InvalidRoot(type_name(other).into())),
        }

        Ok(())
    }

    /// Get the document version string
    pub fn version(&self) -> &str {
        // Guaranteed by validation
        self.value
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Check whether the document version matches the supported version
    ///
    /// A mismatch is not an error: interpretation proceeds in best-effort
    /// mode and the caller surfaces a warning to the user.
    pub fn version_matches(&self, supported: &str) -> bool {
        self.version() == supported
    }

    /// Get the root node
    pub fn root(&self) -> NodeRef<'_> {
        // Guaranteed by validation
        NodeRef::new(self.value.get("root").unwrap_or(&Value::Null))
    }

    /// Borrow the underlying JSON value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutably borrow the underlying JSON value (for the patch engine)
    ///
    /// Mutation may leave the document structurally invalid; callers
    /// re-run [`SchemaDocument::validate`] before re-interpreting.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Consume the document, yielding the raw value
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Human-readable name of a JSON value's type, for error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
