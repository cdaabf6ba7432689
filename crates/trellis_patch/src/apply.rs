//! Delta application against the live document
//!
//! All operations mutate the shared document in place. No operation is
//! individually transactional: a failing `test` aborts the remaining
//! operations in the batch but does not roll back the ones already
//! applied. Callers that need atomicity place their `test` operations
//! first.

use crate::merge::merge_patch;
use crate::op::{validate_operations, Delta, Op, PatchError, PatchOperation, PatchResult};
use crate::pointer::{remove_path, resolve, set_path};
use serde_json::Value;

/// Outcome of applying a delta
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Number of operations applied (1 for a merge patch)
    pub applied: usize,
}

/// Apply a delta of either format to the document
///
/// The batch is validated up front; validation failures leave the
/// document untouched.
pub fn apply_delta(doc: &mut Value, delta: &Delta) -> PatchResult<ApplyReport> {
    delta.validate()?;
    match delta {
        Delta::Operations(ops) => apply_operations(doc, ops),
        Delta::Merge(patch) => {
            apply_merge(doc, patch);
            Ok(ApplyReport { applied: 1 })
        }
    }
}

/// Apply a validated RFC6902 operation batch in order
///
/// On a failed `test`, already-applied operations in the batch stay
/// applied; the error reports how many. This mirrors the behavior the
/// remote protocol has always had.
pub fn apply_operations(doc: &mut Value, ops: &[PatchOperation]) -> PatchResult<ApplyReport> {
    validate_operations(ops)?;

    let mut applied = 0;
    for (index, op) in ops.iter().enumerate() {
        apply_one(doc, index, op, applied)?;
        applied += 1;
    }

    Ok(ApplyReport { applied })
}

/// Apply an RFC7396 merge patch
pub fn apply_merge(doc: &mut Value, patch: &Value) {
    merge_patch(doc, patch);
}

fn apply_one(
    doc: &mut Value,
    index: usize,
    op: &PatchOperation,
    applied_so_far: usize,
) -> PatchResult {
    let unaddressable = || PatchError::PathUnaddressable {
        index,
        op: op.op,
        path: op.path.clone(),
    };

    let missing = |field: &'static str| PatchError::MissingField { index, field };

    match op.op {
        Op::Add => {
            let value = op.value.clone().ok_or_else(|| missing("value"))?;
            if !set_path(doc, &op.path, value) {
                return Err(unaddressable());
            }
        }
        Op::Remove => {
            if remove_path(doc, &op.path).is_none() {
                return Err(unaddressable());
            }
        }
        Op::Replace => {
            let value = op.value.clone().ok_or_else(|| missing("value"))?;
            // Replace is remove-then-add on the same path
            remove_path(doc, &op.path);
            if !set_path(doc, &op.path, value) {
                return Err(unaddressable());
            }
        }
        Op::Move => {
            let from = op.from.as_deref().ok_or_else(|| missing("from"))?;
            let Some(taken) = remove_path(doc, from) else {
                return Err(PatchError::PathUnaddressable {
                    index,
                    op: op.op,
                    path: from.to_string(),
                });
            };
            if !set_path(doc, &op.path, taken) {
                return Err(unaddressable());
            }
        }
        Op::Copy => {
            let from = op.from.as_deref().ok_or_else(|| missing("from"))?;
            let Some(found) = resolve(doc, from).cloned() else {
                return Err(PatchError::PathUnaddressable {
                    index,
                    op: op.op,
                    path: from.to_string(),
                });
            };
            if !set_path(doc, &op.path, found) {
                return Err(unaddressable());
            }
        }
        Op::Test => {
            let expected = op.value.as_ref().ok_or_else(|| missing("value"))?;
            let actual = resolve(doc, &op.path);
            if actual != Some(expected) {
                log::debug!(
                    "test failed at '{}': expected {}, found {}",
                    op.path,
                    expected,
                    actual.map(|v| v.to_string()).unwrap_or_else(|| "nothing".into())
                );
                return Err(PatchError::AssertionFailed {
                    path: op.path.clone(),
                    applied: applied_so_far,
                });
            }
        }
    }

    Ok(())
}
