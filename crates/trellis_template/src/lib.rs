//! # trellis_template - Template & Platform Resolution
//!
//! Two resolution passes run over every node's properties before it is
//! rendered, in a fixed order:
//!
//! 1. **Platform resolution** picks the branch of a platform-variant map
//!    matching the active target (the chosen branch may itself contain
//!    placeholders, which is why this pass runs first).
//! 2. **Template resolution** substitutes `{{ identifier }}` placeholders
//!    from a scoped [`RenderContext`]. Missing variables resolve to the
//!    empty string - rendering is deliberately permissive.

pub mod context;
pub mod platform;
pub mod template;

pub use context::RenderContext;
pub use platform::{Platform, PlatformResolver, FALLBACK_KEY, PLATFORM_IDS};
pub use template::{extract_variable_names, has_placeholders, resolve_string, resolve_value};
