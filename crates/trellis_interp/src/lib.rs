//! # trellis_interp - Schema Interpreter
//!
//! The orchestrating crate: a schema document goes in, a render tree
//! comes out, and subsequent deltas re-interpret the cached document
//! incrementally.
//!
//! ```text
//! JSON text ──► parse ──► SchemaDocument ──► build (platform ▸ template
//!   ▸ styles ▸ dispatch ▸ animation) ──► RenderTree
//!                 ▲
//!        Delta ───┘ (patch + re-interpret)
//! ```
//!
//! ## Key Concepts
//!
//! - **Interpreter**: owns the document, the caches and the animation
//!   runtime; single writer
//! - **RendererRegistry**: pluggable renderers loaded from manifests,
//!   taking precedence over the built-in allow-list
//! - **RenderCache**: transparent memoization of props, styles and
//!   dispatch
//! - Per-node failures become inline error nodes; only document-level
//!   failures surface as `Err`

pub mod builtins;
pub mod cache;
pub mod interpreter;
pub mod parse;
pub mod registry;
pub mod render;

pub use cache::{CacheStats, Dispatch, RenderCache};
pub use interpreter::{Interpreter, InterpreterConfig, InterpretError};
pub use parse::{parse_schema, ParseError, ParseHandle, BACKGROUND_PARSE_THRESHOLD};
pub use registry::{
    FnRenderer, ManifestError, RendererEntry, RendererManifest, RendererRegistry, Version,
};
pub use render::{RenderNode, RenderTree, Renderer};
pub use builtins::{is_builtin, render_builtin, BUILTIN_TYPES};
