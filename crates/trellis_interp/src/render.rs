//! Render tree output types
//!
//! The interpreter produces a [`RenderTree`] of [`RenderNode`]s. What a
//! node looks like on screen is the pluggable Renderer's concern; this
//! tree only carries the resolved structure. Diagnostic nodes (errors,
//! unsupported types, the version banner) use reserved `__`-prefixed
//! kinds so a renderer can surface them distinctly.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Reserved kind for a node that failed to build
pub const ERROR_KIND: &str = "__error";
/// Reserved kind for a node whose type is not renderable
pub const UNSUPPORTED_KIND: &str = "__unsupported";
/// Reserved kind for the version-mismatch banner
pub const BANNER_KIND: &str = "__banner";
/// Reserved kind wrapping an animated subtree
pub const ANIMATED_KIND: &str = "__animated";

/// One node of the produced render tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub kind: String,
    pub props: Map<String, Value>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Create a node with no children
    pub fn new(kind: impl Into<String>, props: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            props,
            children: Vec::new(),
        }
    }

    /// Create a node with children
    pub fn with_children(
        kind: impl Into<String>,
        props: Map<String, Value>,
        children: Vec<RenderNode>,
    ) -> Self {
        Self {
            kind: kind.into(),
            props,
            children,
        }
    }

    /// An inline placeholder for a node that failed to build
    ///
    /// One bad subtree must never blacken the whole screen; the failure
    /// is contained here and interpretation continues.
    pub fn error(message: impl Into<String>) -> Self {
        let mut props = Map::new();
        props.insert("message".to_string(), Value::String(message.into()));
        Self::new(ERROR_KIND, props)
    }

    /// An explicit placeholder for a type outside the allow-list
    pub fn unsupported(node_type: impl Into<String>) -> Self {
        let mut props = Map::new();
        props.insert("nodeType".to_string(), Value::String(node_type.into()));
        Self::new(UNSUPPORTED_KIND, props)
    }

    /// The non-fatal warning banner prepended on version mismatch
    pub fn banner(message: impl Into<String>) -> Self {
        let mut props = Map::new();
        props.insert("message".to_string(), Value::String(message.into()));
        Self::new(BANNER_KIND, props)
    }

    /// Wrap a rendered node with an animation's live value stream
    pub fn animated(
        animation_id: impl Into<String>,
        values: impl IntoIterator<Item = (String, f64)>,
        inner: RenderNode,
    ) -> Self {
        let mut props = Map::new();
        props.insert("animationId".to_string(), Value::String(animation_id.into()));
        props.insert(
            "values".to_string(),
            Value::Object(values.into_iter().map(|(k, v)| (k, json!(v))).collect()),
        );
        Self::with_children(ANIMATED_KIND, props, vec![inner])
    }

    /// Whether this node is a diagnostic placeholder
    pub fn is_diagnostic(&self) -> bool {
        matches!(self.kind.as_str(), ERROR_KIND | UNSUPPORTED_KIND | BANNER_KIND)
    }

    /// Total node count of this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RenderNode::node_count).sum::<usize>()
    }
}

/// The full output of one interpretation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    /// Present when the document version mismatched the supported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<RenderNode>,
    pub root: RenderNode,
}

impl RenderTree {
    /// Total node count, banner included
    pub fn node_count(&self) -> usize {
        self.root.node_count() + self.banner.as_ref().map_or(0, RenderNode::node_count)
    }
}

/// Pluggable rendering capability
///
/// Returning `None` means "not found": the interpreter falls through to
/// the built-in allow-list and finally to an unsupported placeholder.
pub trait Renderer {
    fn render(
        &self,
        kind: &str,
        props: &Map<String, Value>,
        children: Vec<RenderNode>,
    ) -> Option<RenderNode>;
}
