//! Typed views over schema nodes
//!
//! A node is `{ type, props, children, animation? }` somewhere in the
//! document tree. Identity is purely structural: the JSON-Pointer path to
//! the node is its address, there is no stable node id. `NodeRef` borrows
//! the underlying value and exposes the fields the builder cares about.

use serde_json::{Map, Value};

/// Borrowed view over one node in the schema tree
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    value: &'a Value,
}

impl<'a> NodeRef<'a> {
    /// Wrap a raw value as a node view
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Check that the underlying value is an object (a well-formed node)
    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }

    /// The node's type tag, if present and a string
    pub fn node_type(&self) -> Option<&'a str> {
        self.value.get("type").and_then(Value::as_str)
    }

    /// The node's property map; empty if absent or malformed
    pub fn props(&self) -> Option<&'a Map<String, Value>> {
        self.value.get("props").and_then(Value::as_object)
    }

    /// The node's children, in declared order; empty slice if absent
    pub fn children(&self) -> &'a [Value] {
        self.value
            .get("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The node's animation spec, raw and unvalidated
    pub fn animation(&self) -> Option<&'a Value> {
        self.value.get("animation")
    }

    /// The underlying JSON value
    pub fn value(&self) -> &'a Value {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_accessors() {
        let value = json!({
            "type": "text",
            "props": { "content": "hi" },
            "children": [ { "type": "icon" } ],
            "animation": { "id": "fade" }
        });
        let node = NodeRef::new(&value);

        assert_eq!(node.node_type(), Some("text"));
        assert_eq!(
            node.props().and_then(|p| p.get("content")).and_then(Value::as_str),
            Some("hi")
        );
        assert_eq!(node.children().len(), 1);
        assert!(node.animation().is_some());
    }

    #[test]
    fn test_missing_fields_are_absent_not_errors() {
        let value = json!({ "type": "spacer" });
        let node = NodeRef::new(&value);

        assert!(node.props().is_none());
        assert!(node.children().is_empty());
        assert!(node.animation().is_none());
    }

    #[test]
    fn test_malformed_node() {
        let value = json!("not a node");
        let node = NodeRef::new(&value);

        assert!(!node.is_object());
        assert!(node.node_type().is_none());
    }
}
