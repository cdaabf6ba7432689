//! Template placeholder resolution
//!
//! Strings may embed `{{ identifier }}` placeholders. Each placeholder is
//! looked up in the active render context and replaced with the value's
//! display form; missing variables become the empty string. Resolution
//! recurses through objects (per key) and arrays (per element); every
//! other value kind passes through unchanged.

use crate::context::RenderContext;
use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Check whether a string contains at least one placeholder
pub fn has_placeholders(input: &str) -> bool {
    match input.find(OPEN) {
        Some(start) => input[start + OPEN.len()..].contains(CLOSE),
        None => false,
    }
}

/// Extract the trimmed identifiers of all placeholders, in order
///
/// Duplicates are preserved; an unterminated `{{` tail is ignored.
pub fn extract_variable_names(input: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        match after.find(CLOSE) {
            Some(end) => {
                names.push(after[..end].trim().to_string());
                rest = &after[end + CLOSE.len()..];
            }
            None => break,
        }
    }

    names
}

/// Resolve all placeholders in a string against a context
pub fn resolve_string(input: &str, context: &RenderContext) -> String {
    // Fast path: most strings carry no placeholders at all
    if !input.contains(OPEN) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        match after.find(CLOSE) {
            Some(end) => {
                let name = after[..end].trim();
                if let Some(value) = context.get(name) {
                    out.push_str(&display_value(&value));
                }
                // Missing variables render as the empty string
                rest = &after[end + CLOSE.len()..];
            }
            None => {
                // Unterminated placeholder: emit the tail verbatim
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve placeholders throughout a JSON value
///
/// Strings are substituted, objects and arrays recurse, everything else
/// is returned unchanged.
pub fn resolve_value(value: &Value, context: &RenderContext) -> Value {
    match value {
        Value::String(s) => Value::String(resolve_string(s, context)),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, context)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| resolve_value(v, context)).collect())
        }
        other => other.clone(),
    }
}

/// The display form a placeholder substitutes to
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Structured values embed as compact JSON
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_passthrough() {
        let ctx = RenderContext::new();
        assert_eq!(resolve_string("hello", &ctx), "hello");
        assert!(!has_placeholders("hello"));
    }

    #[test]
    fn test_simple_substitution() {
        let ctx = RenderContext::new();
        ctx.set("name", json!("world"));
        assert_eq!(resolve_string("Hello {{name}}!", &ctx), "Hello world!");
        assert_eq!(resolve_string("Hello {{ name }}!", &ctx), "Hello world!");
    }

    #[test]
    fn test_missing_variable_is_empty() {
        let ctx = RenderContext::new();
        assert_eq!(resolve_string("Hello {{name}}!", &ctx), "Hello !");
    }

    #[test]
    fn test_numeric_and_bool_values() {
        let ctx = RenderContext::new();
        ctx.set("count", json!(3));
        ctx.set("on", json!(true));
        assert_eq!(resolve_string("{{count}} items, {{on}}", &ctx), "3 items, true");
    }

    #[test]
    fn test_extract_names() {
        assert_eq!(
            extract_variable_names("{{a}} and {{ b }} and {{a}}"),
            vec!["a", "b", "a"]
        );
        assert!(extract_variable_names("no placeholders").is_empty());
    }

    #[test]
    fn test_unterminated_placeholder_kept_verbatim() {
        let ctx = RenderContext::new();
        assert_eq!(resolve_string("oops {{name", &ctx), "oops {{name");
        assert!(!has_placeholders("oops {{name"));
    }

    #[test]
    fn test_recursive_resolution() {
        let ctx = RenderContext::new();
        ctx.set("title", json!("Home"));

        let value = json!({
            "label": "{{title}}",
            "nested": { "items": ["{{title}}", 42, null] }
        });

        let resolved = resolve_value(&value, &ctx);
        assert_eq!(resolved["label"], json!("Home"));
        assert_eq!(resolved["nested"]["items"], json!(["Home", 42, null]));
    }

    #[test]
    fn test_non_string_kinds_pass_through() {
        let ctx = RenderContext::new();
        assert_eq!(resolve_value(&json!(7), &ctx), json!(7));
        assert_eq!(resolve_value(&json!(false), &ctx), json!(false));
        assert_eq!(resolve_value(&Value::Null, &ctx), Value::Null);
    }
}
