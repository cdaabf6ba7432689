//! JSON-Pointer addressing (RFC 6901)
//!
//! Pointer segments are `/`-delimited and unescaped (`~1` to `/`, `~0`
//! to `~`) before descending into objects (key lookup) or arrays
//! (numeric index, where an index equal to the array length means
//! "append"). Resolution returns `None` for any missing or out-of-range
//! segment rather than raising; error semantics belong to the caller.

use serde_json::{Map, Value};

/// One parsed pointer segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerSegment(pub String);

impl PointerSegment {
    /// Interpret the segment as an array index
    pub fn as_index(&self) -> Option<usize> {
        // Leading zeros and signs are not valid indices per RFC 6901
        if self.0 != "0" && (self.0.starts_with('0') || self.0.starts_with('+') || self.0.starts_with('-')) {
            return None;
        }
        self.0.parse().ok()
    }
}

/// Parse a pointer string into unescaped segments
///
/// The empty pointer addresses the whole document. A pointer not
/// starting with `/` yields `None`.
pub fn parse_pointer(path: &str) -> Option<Vec<PointerSegment>> {
    if path.is_empty() {
        return Some(Vec::new());
    }
    if !path.starts_with('/') {
        return None;
    }
    Some(
        path[1..]
            .split('/')
            .map(|seg| PointerSegment(seg.replace("~1", "/").replace("~0", "~")))
            .collect(),
    )
}

/// Resolve a pointer to a value within the document
pub fn resolve<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_pointer(path)?;
    let mut current = doc;

    for segment in &segments {
        current = match current {
            Value::Object(map) => map.get(&segment.0)?,
            Value::Array(items) => items.get(segment.as_index()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Set the value at a pointer path, mutating the document in place
///
/// Missing object keys along the way are created as empty objects; the
/// array "append" index (index == len) is honored at the final segment.
/// Returns `false` when the path cannot be addressed (bad pointer,
/// out-of-range array index, or descent through a scalar).
pub fn set_path(doc: &mut Value, path: &str, value: Value) -> bool {
    let Some(segments) = parse_pointer(path) else {
        return false;
    };

    if segments.is_empty() {
        *doc = value;
        return true;
    }

    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let mut current = doc;

    for segment in parents {
        current = match current {
            Value::Object(map) => map
                .entry(segment.0.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => match segment.as_index() {
                Some(idx) if idx < items.len() => &mut items[idx],
                _ => return false,
            },
            _ => return false,
        };
    }

    match current {
        Value::Object(map) => {
            map.insert(last.0.clone(), value);
            true
        }
        Value::Array(items) => match last.as_index() {
            Some(idx) if idx < items.len() => {
                items.insert(idx, value);
                true
            }
            Some(idx) if idx == items.len() => {
                items.push(value);
                true
            }
            _ => return false,
        },
        _ => false,
    }
}

/// Remove the value at a pointer path, returning it if present
pub fn remove_path(doc: &mut Value, path: &str) -> Option<Value> {
    let segments = parse_pointer(path)?;
    let (last, parents) = segments.split_last()?;

    let mut current = doc;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(&segment.0)?,
            Value::Array(items) => items.get_mut(segment.as_index()?)?,
            _ => return None,
        };
    }

    match current {
        Value::Object(map) => map.remove(&last.0),
        Value::Array(items) => {
            let idx = last.as_index()?;
            if idx < items.len() {
                Some(items.remove(idx))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_objects_and_arrays() {
        let doc = json!({ "a": { "b": [10, 20, 30] } });

        assert_eq!(resolve(&doc, "/a/b/1"), Some(&json!(20)));
        assert_eq!(resolve(&doc, "/a/b"), Some(&json!([10, 20, 30])));
        assert_eq!(resolve(&doc, ""), Some(&doc));
        assert_eq!(resolve(&doc, "/a/missing"), None);
        assert_eq!(resolve(&doc, "/a/b/9"), None);
    }

    #[test]
    fn test_escaping() {
        let doc = json!({ "a/b": 1, "m~n": 2 });

        assert_eq!(resolve(&doc, "/a~1b"), Some(&json!(1)));
        assert_eq!(resolve(&doc, "/m~0n"), Some(&json!(2)));
    }

    #[test]
    fn test_invalid_index_forms() {
        let doc = json!({ "a": [1, 2, 3] });

        assert_eq!(resolve(&doc, "/a/01"), None);
        assert_eq!(resolve(&doc, "/a/-1"), None);
        assert_eq!(resolve(&doc, "/a/x"), None);
    }

    #[test]
    fn test_set_path_object() {
        let mut doc = json!({ "a": {} });
        assert!(set_path(&mut doc, "/a/b", json!(5)));
        assert_eq!(doc, json!({ "a": { "b": 5 } }));
    }

    #[test]
    fn test_set_path_creates_intermediate_objects() {
        let mut doc = json!({});
        assert!(set_path(&mut doc, "/x/y/z", json!(1)));
        assert_eq!(doc, json!({ "x": { "y": { "z": 1 } } }));
    }

    #[test]
    fn test_set_path_array_insert_and_append() {
        let mut doc = json!({ "items": [1, 3] });

        assert!(set_path(&mut doc, "/items/1", json!(2)));
        assert_eq!(doc, json!({ "items": [1, 2, 3] }));

        // Index equal to length appends
        assert!(set_path(&mut doc, "/items/3", json!(4)));
        assert_eq!(doc, json!({ "items": [1, 2, 3, 4] }));

        // Beyond length fails
        assert!(!set_path(&mut doc, "/items/9", json!(9)));
    }

    #[test]
    fn test_set_whole_document() {
        let mut doc = json!({ "old": true });
        assert!(set_path(&mut doc, "", json!({ "new": true })));
        assert_eq!(doc, json!({ "new": true }));
    }

    #[test]
    fn test_remove_path() {
        let mut doc = json!({ "a": { "b": 1 }, "list": [1, 2, 3] });

        assert_eq!(remove_path(&mut doc, "/a/b"), Some(json!(1)));
        assert_eq!(remove_path(&mut doc, "/list/1"), Some(json!(2)));
        assert_eq!(doc, json!({ "a": {}, "list": [1, 3] }));

        assert_eq!(remove_path(&mut doc, "/nope"), None);
        assert_eq!(remove_path(&mut doc, "/list/9"), None);
    }
}
