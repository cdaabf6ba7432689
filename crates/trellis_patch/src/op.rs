//! Delta wire types and the validity gate
//!
//! A delta is either an RFC6902 operation batch (`{ "operations": [..] }`)
//! or an RFC7396 merge-patch object (any JSON object without an
//! `operations` array). The two formats are mutually exclusive and
//! detected by the presence of the array.
//!
//! Validation runs before any mutation: an invalid batch is rejected
//! wholesale and the document is left untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for patch operations
pub type PatchResult<T = ()> = Result<T, PatchError>;

/// Errors from delta validation and application
#[derive(Debug, Clone, Error)]
pub enum PatchError {
    #[error("Delta batch is empty")]
    EmptyBatch,

    #[error("Operation {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Operation {index} has unrecognized op '{op}'")]
    UnknownOp { index: usize, op: String },

    #[error("Delta is neither an operation batch nor a merge object")]
    UnrecognizedFormat,

    #[error("'test' failed at '{path}' after {applied} operations were applied")]
    AssertionFailed { path: String, applied: usize },

    #[error("Operation {index} ({op}) could not address '{path}'")]
    PathUnaddressable {
        index: usize,
        op: Op,
        path: String,
    },
}

/// An RFC6902 operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl Op {
    /// Operations that carry a `value` field
    pub fn requires_value(&self) -> bool {
        matches!(self, Self::Add | Self::Replace | Self::Test)
    }

    /// Operations that carry a `from` pointer
    pub fn requires_from(&self) -> bool {
        matches!(self, Self::Move | Self::Copy)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Test => "test",
        };
        f.write_str(s)
    }
}

/// A single RFC6902 patch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: Op,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOperation {
    /// Shorthand for an `add` operation
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self { op: Op::Add, path: path.into(), value: Some(value), from: None }
    }

    /// Shorthand for a `remove` operation
    pub fn remove(path: impl Into<String>) -> Self {
        Self { op: Op::Remove, path: path.into(), value: None, from: None }
    }

    /// Shorthand for a `replace` operation
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self { op: Op::Replace, path: path.into(), value: Some(value), from: None }
    }

    /// Shorthand for a `move` operation
    pub fn mov(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self { op: Op::Move, path: path.into(), value: None, from: Some(from.into()) }
    }

    /// Shorthand for a `copy` operation
    pub fn copy(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self { op: Op::Copy, path: path.into(), value: None, from: Some(from.into()) }
    }

    /// Shorthand for a `test` operation
    pub fn test(path: impl Into<String>, value: Value) -> Self {
        Self { op: Op::Test, path: path.into(), value: Some(value), from: None }
    }
}

/// An incremental update to the schema document
#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    /// An RFC6902 operation batch
    Operations(Vec<PatchOperation>),
    /// An RFC7396 merge-patch object
    Merge(Value),
}

impl Delta {
    /// Detect and parse a delta from its wire form
    ///
    /// `{ "operations": [...] }` is an operation batch; any other object
    /// is a merge patch. Non-object values are unrecognized.
    pub fn from_value(value: Value) -> PatchResult<Self> {
        let Value::Object(mut obj) = value else {
            return Err(PatchError::UnrecognizedFormat);
        };

        match obj.remove("operations") {
            Some(Value::Array(raw_ops)) => {
                let mut operations = Vec::with_capacity(raw_ops.len());
                for (index, raw) in raw_ops.into_iter().enumerate() {
                    operations.push(parse_operation(index, raw)?);
                }
                Ok(Self::Operations(operations))
            }
            Some(_) => Err(PatchError::UnrecognizedFormat),
            None => Ok(Self::Merge(Value::Object(obj))),
        }
    }

    /// Validate this delta before application
    pub fn validate(&self) -> PatchResult {
        match self {
            Self::Operations(ops) => validate_operations(ops),
            Self::Merge(value) => {
                if value.as_object().map_or(true, |o| o.is_empty()) {
                    Err(PatchError::EmptyBatch)
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn parse_operation(index: usize, raw: Value) -> PatchResult<PatchOperation> {
    let Value::Object(obj) = raw else {
        return Err(PatchError::MissingField { index, field: "op" });
    };

    let op = match obj.get("op") {
        None => return Err(PatchError::MissingField { index, field: "op" }),
        Some(Value::String(s)) => match s.as_str() {
            "add" => Op::Add,
            "remove" => Op::Remove,
            "replace" => Op::Replace,
            "move" => Op::Move,
            "copy" => Op::Copy,
            "test" => Op::Test,
            other => {
                return Err(PatchError::UnknownOp { index, op: other.to_string() })
            }
        },
        Some(other) => {
            return Err(PatchError::UnknownOp { index, op: other.to_string() })
        }
    };

    let path = match obj.get("path") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(PatchError::MissingField { index, field: "path" }),
    };

    let value = obj.get("value").cloned();
    let from = obj.get("from").and_then(Value::as_str).map(String::from);

    Ok(PatchOperation { op, path, value, from })
}

/// The validity gate: reject a malformed batch before any mutation
pub fn validate_operations(ops: &[PatchOperation]) -> PatchResult {
    if ops.is_empty() {
        return Err(PatchError::EmptyBatch);
    }

    for (index, op) in ops.iter().enumerate() {
        if op.op.requires_value() && op.value.is_none() {
            return Err(PatchError::MissingField { index, field: "value" });
        }
        if op.op.requires_from() && op.from.is_none() {
            return Err(PatchError::MissingField { index, field: "from" });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_operation_batch() {
        let delta = Delta::from_value(json!({
            "operations": [
                { "op": "add", "path": "/a", "value": 1 },
                { "op": "move", "path": "/b", "from": "/a" }
            ]
        }))
        .unwrap();

        let Delta::Operations(ops) = delta else {
            panic!("expected operation batch");
        };
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].op, Op::Add);
        assert_eq!(ops[1].from.as_deref(), Some("/a"));
    }

    #[test]
    fn test_detect_merge_patch() {
        let delta = Delta::from_value(json!({ "root": { "props": null } })).unwrap();
        assert!(matches!(delta, Delta::Merge(_)));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let err = Delta::from_value(json!({
            "operations": [ { "op": "merge", "path": "/a" } ]
        }))
        .unwrap_err();
        assert!(matches!(err, PatchError::UnknownOp { index: 0, .. }));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = Delta::from_value(json!({
            "operations": [ { "op": "add" } ]
        }))
        .unwrap_err();
        assert!(matches!(err, PatchError::MissingField { field: "path", .. }));

        let ops = vec![PatchOperation {
            op: Op::Add,
            path: "/a".into(),
            value: None,
            from: None,
        }];
        assert!(matches!(
            validate_operations(&ops),
            Err(PatchError::MissingField { field: "value", .. })
        ));

        let ops = vec![PatchOperation {
            op: Op::Copy,
            path: "/a".into(),
            value: None,
            from: None,
        }];
        assert!(matches!(
            validate_operations(&ops),
            Err(PatchError::MissingField { field: "from", .. })
        ));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            validate_operations(&[]),
            Err(PatchError::EmptyBatch)
        ));
        let delta = Delta::from_value(json!({})).unwrap();
        assert!(matches!(delta.validate(), Err(PatchError::EmptyBatch)));
    }

    #[test]
    fn test_operation_serde_roundtrip() {
        let op = PatchOperation::replace("/root/props/title", json!("hi"));
        let json = serde_json::to_string(&op).unwrap();
        let back: PatchOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
        // Absent optional fields stay off the wire
        assert!(!serde_json::to_string(&PatchOperation::remove("/a"))
            .unwrap()
            .contains("value"));
    }
}
