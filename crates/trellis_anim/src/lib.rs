//! # trellis_anim - Animation Runtime
//!
//! Property animations declared on schema nodes are simulated here. Each
//! animation id owns a small lifecycle state machine; a shared progress
//! value (0 to 1) drives every property of the animation through its
//! easing curve or spring solution, producing a `current_values` map the
//! tree builder composes into visual transforms.
//!
//! ## Key Concepts
//!
//! - **AnimationSpec**: the declarative wire form (`timing`, `spring`,
//!   `decay`)
//! - **AnimationRuntime**: per-id state machine, advanced by `tick`
//! - **AnimationTicker**: a background thread driving `tick` periodically
//! - Disposal is explicit: an id's resources are released only through
//!   `dispose`, paired with the node leaving the tree

pub mod easing;
pub mod runtime;
pub mod spec;
pub mod spring;
pub mod ticker;

pub use easing::Easing;
pub use runtime::{AnimationPhase, AnimationRuntime, AnimationSnapshot};
pub use spec::{AnimationKind, AnimationSpec, PropertyAnimation, SpringConfig};
pub use spring::{settle_duration_ms, spring_progress, MAX_SPRING_DURATION_MS, MIN_SPRING_DURATION_MS};
pub use ticker::AnimationTicker;
