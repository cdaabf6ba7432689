//! Operation-set optimization
//!
//! A purely internal efficiency pass over a batch before application.
//! It must never change the final document state, only the operation
//! count: consecutive `replace` operations on the same path collapse
//! into the last one.
//!
//! An `add` immediately followed by a `remove` on the same path is NOT
//! cancelled: `add` on a pre-existing object member overwrites it, so
//! the pair deletes the key while the cancelled no-op would keep the
//! old value. Whether the pair is a no-op depends on document state the
//! optimizer cannot see.
//!
//! Coalescing is restricted to `add`/`remove`/`replace`. Any `move`,
//! `copy` or `test` operation acts as a barrier: operations are never
//! coalesced across it, because those ops make order observable.

use crate::op::{Op, PatchOperation};

/// Statistics about an optimization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Operation count before optimization
    pub original_count: usize,
    /// Operation count after optimization
    pub optimized_count: usize,
    /// Number of operations dropped
    pub eliminated: usize,
}

impl BatchStats {
    /// Fraction of operations removed (0.0 = none, 1.0 = all)
    pub fn elimination_ratio(&self) -> f64 {
        if self.original_count == 0 {
            0.0
        } else {
            self.eliminated as f64 / self.original_count as f64
        }
    }
}

/// Optimize a batch, returning the reduced operations and statistics
pub fn optimize_operations(ops: Vec<PatchOperation>) -> (Vec<PatchOperation>, BatchStats) {
    let original_count = ops.len();
    let mut out: Vec<PatchOperation> = Vec::with_capacity(ops.len());

    for op in ops {
        match op.op {
            Op::Replace => {
                // Collapse into an immediately preceding replace on the
                // same path
                if let Some(prev) = out.last_mut() {
                    if prev.op == Op::Replace && prev.path == op.path {
                        *prev = op;
                        continue;
                    }
                }
                out.push(op);
            }
            // Everything else (including move/copy/test barriers) passes
            // through untouched
            _ => out.push(op),
        }
    }

    let stats = BatchStats {
        original_count,
        optimized_count: out.len(),
        eliminated: original_count - out.len(),
    };

    if stats.eliminated > 0 {
        log::debug!(
            "optimized delta batch: {} -> {} operations",
            stats.original_count,
            stats.optimized_count
        );
    }

    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_operations;
    use serde_json::json;

    #[test]
    fn test_consecutive_replaces_collapse() {
        let ops = vec![
            PatchOperation::replace("/x", json!(1)),
            PatchOperation::replace("/x", json!(2)),
            PatchOperation::replace("/x", json!(3)),
        ];

        let (optimized, stats) = optimize_operations(ops);
        assert_eq!(optimized.len(), 1);
        assert_eq!(optimized[0].value, Some(json!(3)));
        assert_eq!(stats.eliminated, 2);
        assert!((stats.elimination_ratio() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_then_remove_is_kept() {
        // add on a pre-existing key overwrites, so the pair must apply:
        // it deletes the key, while cancelling it would keep the value
        let ops = vec![
            PatchOperation::add("/x", json!(2)),
            PatchOperation::remove("/x"),
        ];

        let (optimized, stats) = optimize_operations(ops.clone());
        assert_eq!(optimized.len(), 2);
        assert_eq!(stats.eliminated, 0);

        let start = json!({ "x": 1 });
        let mut plain = start.clone();
        apply_operations(&mut plain, &ops).unwrap();
        let mut reduced = start;
        apply_operations(&mut reduced, &optimized).unwrap();

        assert_eq!(plain, reduced);
        assert_eq!(plain, json!({}));
    }

    #[test]
    fn test_interleaved_paths_do_not_collapse() {
        let ops = vec![
            PatchOperation::replace("/x", json!(1)),
            PatchOperation::replace("/y", json!(2)),
            PatchOperation::replace("/x", json!(3)),
        ];

        let (optimized, _) = optimize_operations(ops);
        assert_eq!(optimized.len(), 3);
    }

    #[test]
    fn test_barriers_block_coalescing() {
        let ops = vec![
            PatchOperation::add("/a", json!(1)),
            PatchOperation::copy("/a", "/b"),
            PatchOperation::remove("/a"),
        ];

        // The copy observes /a between add and remove
        let (optimized, stats) = optimize_operations(ops);
        assert_eq!(optimized.len(), 3);
        assert_eq!(stats.eliminated, 0);
    }

    #[test]
    fn test_optimization_preserves_final_state() {
        let start = json!({ "x": 0, "keep": true });
        let ops = vec![
            PatchOperation::replace("/x", json!(1)),
            PatchOperation::replace("/x", json!(2)),
            PatchOperation::add("/tmp", json!("gone")),
            PatchOperation::remove("/tmp"),
            PatchOperation::replace("/x", json!(3)),
        ];

        let mut plain = start.clone();
        apply_operations(&mut plain, &ops).unwrap();

        let (optimized, _) = optimize_operations(ops);
        let mut reduced = start;
        apply_operations(&mut reduced, &optimized).unwrap();

        assert_eq!(plain, reduced);
        assert_eq!(reduced["x"], json!(3));
    }
}
