//! Built-in node types
//!
//! Node types with no registered renderer fall back to this allow-list.
//! Anything outside it becomes an explicit unsupported placeholder so a
//! typo in a schema shows up on screen instead of silently vanishing.

use crate::render::RenderNode;
use serde_json::{Map, Value};

/// Node types the interpreter can always render
pub const BUILTIN_TYPES: &[&str] = &[
    "container", "row", "column", "stack", "text", "image", "button", "input", "list", "scroll",
    "spacer", "divider", "toggle", "slider", "progress", "icon",
];

/// Built-in types that accept children
const CONTAINER_TYPES: &[&str] = &["container", "row", "column", "stack", "list", "scroll", "button"];

/// Whether a node type is on the built-in allow-list
pub fn is_builtin(node_type: &str) -> bool {
    BUILTIN_TYPES.contains(&node_type)
}

/// Render a built-in node type
///
/// Returns `None` when the type is not on the allow-list. Children on a
/// leaf type are dropped, not an error.
pub fn render_builtin(
    node_type: &str,
    props: Map<String, Value>,
    children: Vec<RenderNode>,
) -> Option<RenderNode> {
    if !is_builtin(node_type) {
        return None;
    }

    if CONTAINER_TYPES.contains(&node_type) {
        return Some(RenderNode::with_children(node_type, props, children));
    }

    if !children.is_empty() {
        log::debug!("Dropping {} children of leaf type '{}'", children.len(), node_type);
    }

    let mut props = props;
    if node_type == "text" && !props.contains_key("content") {
        props.insert("content".to_string(), Value::String(String::new()));
    }

    Some(RenderNode::new(node_type, props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allow_list() {
        assert!(is_builtin("container"));
        assert!(is_builtin("slider"));
        assert!(!is_builtin("carousel"));
        assert!(!is_builtin(""));
    }

    #[test]
    fn test_container_keeps_children() {
        let child = RenderNode::new("text", Map::new());
        let node = render_builtin("row", Map::new(), vec![child]).unwrap();
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn test_leaf_drops_children() {
        let child = RenderNode::new("text", Map::new());
        let node = render_builtin("divider", Map::new(), vec![child]).unwrap();
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_text_defaults_content() {
        let node = render_builtin("text", Map::new(), Vec::new()).unwrap();
        assert_eq!(node.props["content"], json!(""));
    }

    #[test]
    fn test_unknown_type_is_none() {
        assert!(render_builtin("carousel", Map::new(), Vec::new()).is_none());
    }
}
