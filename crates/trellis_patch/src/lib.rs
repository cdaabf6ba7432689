//! # trellis_patch - Incremental Delta Engine
//!
//! The remote source transmits a schema document once, then streams
//! deltas. This crate applies those deltas to the cached document:
//!
//! ```text
//! Delta stream ──► Debouncer ──► validate ──► optimize ──► apply ──► Document
//! ```
//!
//! ## Key Concepts
//!
//! - **JSON-Pointer**: `/`-delimited addressing into the document
//! - **Delta**: an RFC6902 operation batch or an RFC7396 merge object
//! - **Optimizer**: collapses redundant operations without changing the
//!   final document state
//! - **Debouncer**: coalesces bursts of deltas behind a quiet window

pub mod apply;
pub mod debounce;
pub mod merge;
pub mod op;
pub mod optimize;
pub mod pointer;

pub use apply::{apply_delta, apply_merge, apply_operations, ApplyReport};
pub use debounce::{DeltaDebouncer, DebouncerConfig};
pub use merge::merge_patch;
pub use op::{Delta, Op, PatchError, PatchOperation, PatchResult};
pub use optimize::{optimize_operations, BatchStats};
pub use pointer::{parse_pointer, remove_path, resolve, set_path, PointerSegment};
