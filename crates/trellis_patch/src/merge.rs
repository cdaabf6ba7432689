//! RFC 7396 JSON Merge Patch
//!
//! The patch object is walked recursively: a key mapped to `null`
//! removes that key from the target, a nested object merges recursively
//! when the target value is also an object, and any other value
//! replaces the target wholesale.

use serde_json::Value;

/// Apply a merge patch to the target in place
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        // Non-object patches replace the target wholesale
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, patch_value) in patch_map {
        match patch_value {
            Value::Null => {
                target_map.remove(key);
            }
            Value::Object(_) => match target_map.get_mut(key) {
                Some(existing @ Value::Object(_)) => merge_patch(existing, patch_value),
                _ => {
                    // Replacing wholesale, but nulls inside the patch
                    // object must still be stripped
                    let mut fresh = Value::Object(serde_json::Map::new());
                    merge_patch(&mut fresh, patch_value);
                    target_map.insert(key.clone(), fresh);
                }
            },
            other => {
                target_map.insert(key.clone(), other.clone());
            }
        }
    }
}
