//! Schema interpretation
//!
//! The interpreter owns the current document and turns it into a render
//! tree: depth-first over the node hierarchy, resolving platform
//! variants, template placeholders and derived styles per node, then
//! dispatching to a registered renderer, the built-in allow-list, or an
//! unsupported placeholder. Failures inside one node are contained as
//! inline error nodes; interpretation always yields a full tree.
//!
//! Deltas mutate the owned document and trigger a full
//! re-interpretation. The caches make the unchanged parts of that pass
//! cheap, and the animation runtime is reconciled so that animations for
//! removed nodes are disposed while surviving ones keep their progress.

use crate::builtins;
use crate::cache::{CacheStats, Dispatch, RenderCache};
use crate::parse::{parse_schema, ParseError};
use crate::registry::RendererRegistry;
use crate::render::{RenderNode, RenderTree};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use trellis_anim::runtime::AnimationRuntime;
use trellis_anim::spec::AnimationSpec;
use trellis_patch::apply::{apply_delta, apply_operations};
use trellis_patch::op::{Delta, PatchError};
use trellis_patch::optimize::optimize_operations;
use trellis_schema::document::{SchemaDocument, SchemaError, SUPPORTED_VERSION};
use trellis_schema::node::NodeRef;
use trellis_template::context::RenderContext;
use trellis_template::platform::{Platform, PlatformResolver};
use trellis_template::template::{has_placeholders, resolve_value};

/// Errors surfaced by interpreter entry points
///
/// Only document-level failures reach here; per-node failures become
/// inline error nodes in the output tree.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Interpreter configuration
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Platform whose variants win during resolution
    pub platform: Platform,
    /// Schema version this host fully supports
    pub supported_version: String,
    /// Memoize property, style and dispatch resolution
    pub cache_enabled: bool,
    /// Collapse redundant operations before applying a delta batch
    pub optimize_deltas: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Web,
            supported_version: SUPPORTED_VERSION.to_string(),
            cache_enabled: true,
            optimize_deltas: true,
        }
    }
}

/// Owns a schema document and interprets it into render trees
pub struct Interpreter {
    config: InterpreterConfig,
    resolver: PlatformResolver,
    registry: Arc<RendererRegistry>,
    runtime: Arc<AnimationRuntime>,
    cache: RenderCache,
    document: Option<SchemaDocument>,
    variables: HashMap<String, Value>,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig, registry: Arc<RendererRegistry>) -> Self {
        let resolver = PlatformResolver::new(config.platform);
        let cache = RenderCache::new(config.cache_enabled);
        Self {
            config,
            resolver,
            registry,
            runtime: Arc::new(AnimationRuntime::new()),
            cache,
            document: None,
            variables: HashMap::new(),
        }
    }

    /// Shared animation runtime, for driving by a ticker
    pub fn runtime(&self) -> Arc<AnimationRuntime> {
        Arc::clone(&self.runtime)
    }

    pub fn registry(&self) -> &Arc<RendererRegistry> {
        &self.registry
    }

    /// The currently interpreted document, if any
    pub fn document(&self) -> Option<&SchemaDocument> {
        self.document.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached resolution work
    ///
    /// Needed after mutating the shared registry, since dispatch
    /// decisions are memoized per node type.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Seed a root-scope template variable
    ///
    /// Cached property resolutions may embed old variable values, so the
    /// cache is dropped.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
        self.cache.clear();
    }

    /// Interpret schema text into a render tree
    ///
    /// Large documents are parsed on a background thread; the call still
    /// blocks until the tree is built.
    pub fn interpret_str(&mut self, json: &str) -> Result<RenderTree, InterpretError> {
        let value = parse_schema(json.to_string()).join()?;
        Ok(self.interpret(value)?)
    }

    /// Interpret an already-parsed schema document into a render tree
    pub fn interpret(&mut self, value: Value) -> Result<RenderTree, SchemaError> {
        let document = SchemaDocument::new(value)?;
        self.document = Some(document);
        Ok(self.build_tree())
    }

    /// Apply a delta to the owned document and re-interpret
    ///
    /// Returns `Ok(None)` when no document has been interpreted yet. On
    /// a failed `test` assertion the operations already applied stay
    /// applied; the document may have advanced even though an error is
    /// returned, and the next successful call reflects that state.
    pub fn apply_delta(&mut self, delta: &Delta) -> Result<Option<RenderTree>, InterpretError> {
        let Some(document) = self.document.as_mut() else {
            log::debug!("Delta received before any document; ignoring");
            return Ok(None);
        };

        patch_document(document.value_mut(), delta, self.config.optimize_deltas)?;

        // A structural patch can break the document shape; surface that
        // as a document-level error rather than an error-node tree.
        SchemaDocument::validate(document.value())?;

        Ok(Some(self.build_tree()))
    }

    /// Apply a debounced batch of deltas, re-interpreting once at the end
    pub fn apply_deltas(&mut self, deltas: &[Delta]) -> Result<Option<RenderTree>, InterpretError> {
        let Some(document) = self.document.as_mut() else {
            log::debug!("Delta batch received before any document; ignoring");
            return Ok(None);
        };
        if deltas.is_empty() {
            return Ok(None);
        }

        for delta in deltas {
            patch_document(document.value_mut(), delta, self.config.optimize_deltas)?;
        }
        SchemaDocument::validate(document.value())?;

        Ok(Some(self.build_tree()))
    }

    /// Re-interpret the current document without mutating it
    pub fn reinterpret(&self) -> Option<RenderTree> {
        self.document.as_ref()?;
        Some(self.build_tree())
    }

    fn build_tree(&self) -> RenderTree {
        // The document is always Some here; build_tree is only reached
        // through paths that set it.
        let Some(document) = self.document.as_ref() else {
            return RenderTree {
                banner: None,
                root: RenderNode::error("no document"),
            };
        };

        let banner = if document.version_matches(&self.config.supported_version) {
            None
        } else {
            let message = format!(
                "Schema version {} does not match supported version {}",
                document.version(),
                self.config.supported_version
            );
            log::warn!("{}", message);
            Some(RenderNode::banner(message))
        };

        let context = RenderContext::with_variables(
            self.variables.iter().map(|(k, v)| (k.clone(), v.clone())),
        );

        let mut live_ids = Vec::new();
        let root = self.build_node(document.root(), &context, &mut live_ids);

        // Animations whose nodes are gone get disposed; survivors keep
        // their elapsed time across the rebuild.
        self.runtime.retain_ids(&live_ids);

        RenderTree { banner, root }
    }

    fn build_node(
        &self,
        node: NodeRef<'_>,
        context: &Arc<RenderContext>,
        live_ids: &mut Vec<String>,
    ) -> RenderNode {
        if !node.is_object() {
            return RenderNode::error("Node is not an object");
        }
        let Some(node_type) = node.node_type() else {
            return RenderNode::error("Node is missing a type");
        };
        if node_type.is_empty() {
            return RenderNode::error("Node has an empty type");
        }

        // A node may open a nested scope of template variables
        let scope = match node.value().get("variables").and_then(Value::as_object) {
            Some(vars) => {
                let child = context.child();
                for (name, value) in vars {
                    child.set(name.clone(), resolve_value(value, context.as_ref()));
                }
                child
            }
            None => Arc::clone(context),
        };

        let children: Vec<RenderNode> = node
            .children()
            .iter()
            .map(|child| self.build_node(NodeRef::new(child), &scope.child(), live_ids))
            .collect();

        let raw_props = node.props().cloned().unwrap_or_default();
        let props = self.resolve_props(node_type, &raw_props, &scope);

        let rendered = self.dispatch(node_type, props, children);

        match node.animation() {
            Some(animation) => self.attach_animation(node_type, animation, rendered, live_ids),
            None => rendered,
        }
    }

    /// Platform variants, then templates, then derived styles
    ///
    /// Props without placeholders are memoized; templated props bypass
    /// the cache because their resolution depends on the ambient scope.
    fn resolve_props(
        &self,
        node_type: &str,
        raw: &Map<String, Value>,
        context: &Arc<RenderContext>,
    ) -> Map<String, Value> {
        let raw_value = Value::Object(raw.clone());
        let serialized = raw_value.to_string();
        let templated = has_placeholders(&serialized);

        let key = RenderCache::props_key(node_type, &raw_value);
        if !templated {
            if let Some(cached) = self.cache.get_props(&key) {
                return cached;
            }
        }

        let resolved = self.resolver.resolve(&raw_value);
        let resolved = resolve_value(&resolved, context.as_ref());
        let mut props = match resolved {
            Value::Object(map) => map,
            _ => {
                log::warn!("Props of '{}' resolved to a non-object; dropping", node_type);
                Map::new()
            }
        };
        self.derive_styles(&mut props);

        if !templated {
            self.cache.put_props(key, props.clone());
        }
        props
    }

    /// Replace hex color strings with parsed color objects, memoized
    fn derive_styles(&self, props: &mut Map<String, Value>) {
        let keys: Vec<String> = props
            .iter()
            .filter(|(k, v)| is_color_key(k) && v.is_string())
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            let Some(source) = props.get(&key).and_then(Value::as_str) else {
                continue;
            };
            if !source.starts_with('#') {
                continue;
            }
            let source = source.to_string();
            let parsed = self.cache.style_or_compute(&source, || {
                parse_hex_color(&source).unwrap_or_else(|| {
                    log::debug!("Unparseable color '{}', keeping as-is", source);
                    Value::String(source.clone())
                })
            });
            props.insert(key, parsed);
        }

        if let Some(Value::Object(style)) = props.get_mut("style") {
            let mut style = std::mem::take(style);
            self.derive_style_object(&mut style);
            props.insert("style".to_string(), Value::Object(style));
        }
    }

    fn derive_style_object(&self, style: &mut Map<String, Value>) {
        let keys: Vec<String> = style
            .iter()
            .filter(|(k, v)| is_color_key(k) && v.is_string())
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            let Some(source) = style.get(&key).and_then(Value::as_str) else {
                continue;
            };
            if !source.starts_with('#') {
                continue;
            }
            let source = source.to_string();
            let parsed = self.cache.style_or_compute(&source, || {
                parse_hex_color(&source).unwrap_or_else(|| Value::String(source.clone()))
            });
            style.insert(key, parsed);
        }
    }

    fn dispatch(
        &self,
        node_type: &str,
        props: Map<String, Value>,
        children: Vec<RenderNode>,
    ) -> RenderNode {
        let decision = self.cache.dispatch_or_compute(node_type, || {
            if self.registry.contains(node_type) {
                Dispatch::Registered
            } else if builtins::is_builtin(node_type) {
                Dispatch::Builtin
            } else {
                Dispatch::Unsupported
            }
        });

        match decision {
            Dispatch::Registered => {
                if let Some(renderer) = self.registry.lookup(node_type) {
                    if let Some(node) = renderer.render(node_type, &props, children.clone()) {
                        return node;
                    }
                    log::debug!("Renderer declined '{}', falling back", node_type);
                }
                builtins::render_builtin(node_type, props, children)
                    .unwrap_or_else(|| self.unsupported(node_type))
            }
            Dispatch::Builtin => builtins::render_builtin(node_type, props, children)
                .unwrap_or_else(|| self.unsupported(node_type)),
            Dispatch::Unsupported => self.unsupported(node_type),
        }
    }

    fn unsupported(&self, node_type: &str) -> RenderNode {
        log::warn!("No renderer for node type '{}'", node_type);
        RenderNode::unsupported(node_type)
    }

    fn attach_animation(
        &self,
        node_type: &str,
        animation: &Value,
        rendered: RenderNode,
        live_ids: &mut Vec<String>,
    ) -> RenderNode {
        let spec: AnimationSpec = match serde_json::from_value(animation.clone()) {
            Ok(spec) => spec,
            Err(err) => {
                log::warn!("Invalid animation on '{}': {}", node_type, err);
                return RenderNode::error(format!("Invalid animation: {}", err));
            }
        };

        // A changed spec for a known id re-registers and restarts; an
        // unchanged one keeps its progress across the rebuild.
        let id = spec.id.clone();
        if self.runtime.sync(spec) {
            self.runtime.start(&id);
        }
        live_ids.push(id.clone());

        let values = self.runtime.current_values(&id).unwrap_or_default();
        RenderNode::animated(id, values, rendered)
    }
}

/// Apply one delta to the raw document, optimizing operation batches
fn patch_document(doc: &mut Value, delta: &Delta, optimize: bool) -> Result<(), PatchError> {
    match delta {
        Delta::Operations(ops) if optimize => {
            let (optimized, stats) = optimize_operations(ops.clone());
            if stats.eliminated > 0 {
                log::debug!(
                    "Delta optimized: {} -> {} operations",
                    stats.original_count,
                    optimized.len()
                );
            }
            apply_operations(doc, &optimized)?;
        }
        _ => {
            apply_delta(doc, delta)?;
        }
    }
    Ok(())
}

fn is_color_key(key: &str) -> bool {
    key == "color" || key == "tint" || key.ends_with("Color")
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into a color object
fn parse_hex_color(s: &str) -> Option<Value> {
    let hex = s.strip_prefix('#')?;
    let (r, g, b, a) = match hex.len() {
        3 => {
            let channel = |i: usize| -> Option<u8> {
                let d = u8::from_str_radix(&hex[i..i + 1], 16).ok()?;
                Some(d * 17)
            };
            (channel(0)?, channel(1)?, channel(2)?, 255)
        }
        6 | 8 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            let a = if hex.len() == 8 { channel(6)? } else { 255 };
            (channel(0)?, channel(2)?, channel(4)?, a)
        }
        _ => return None,
    };
    Some(json!({
        "r": r,
        "g": g,
        "b": b,
        "a": (a as f64) / 255.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::new(InterpreterConfig::default(), Arc::new(RendererRegistry::new()))
    }

    fn doc(root: Value) -> Value {
        json!({"version": "1.0", "root": root})
    }

    #[test]
    fn test_basic_tree() {
        let mut interp = interpreter();
        let tree = interp
            .interpret(doc(json!({
                "type": "column",
                "children": [
                    {"type": "text", "props": {"content": "hello"}},
                    {"type": "divider"}
                ]
            })))
            .unwrap();

        assert!(tree.banner.is_none());
        assert_eq!(tree.root.kind, "column");
        assert_eq!(tree.root.children.len(), 2);
        assert_eq!(tree.root.children[0].props["content"], json!("hello"));
    }

    #[test]
    fn test_version_mismatch_banner() {
        let mut interp = interpreter();
        let tree = interp
            .interpret(json!({"version": "0.9", "root": {"type": "container"}}))
            .unwrap();
        let banner = tree.banner.unwrap();
        assert_eq!(banner.kind, crate::render::BANNER_KIND);
        assert_eq!(tree.root.kind, "container");
    }

    #[test]
    fn test_node_failures_are_contained() {
        let mut interp = interpreter();
        let tree = interp
            .interpret(doc(json!({
                "type": "row",
                "children": [
                    {"props": {}},
                    {"type": "text", "props": {"content": "still here"}}
                ]
            })))
            .unwrap();

        assert_eq!(tree.root.children[0].kind, crate::render::ERROR_KIND);
        assert_eq!(tree.root.children[1].props["content"], json!("still here"));
    }

    #[test]
    fn test_unsupported_type_placeholder() {
        let mut interp = interpreter();
        let tree = interp
            .interpret(doc(json!({"type": "teleporter"})))
            .unwrap();
        assert_eq!(tree.root.kind, crate::render::UNSUPPORTED_KIND);
        assert_eq!(tree.root.props["nodeType"], json!("teleporter"));
    }

    #[test]
    fn test_template_variables_resolve() {
        let mut interp = interpreter();
        interp.set_variable("user", json!("Ada"));
        let tree = interp
            .interpret(doc(json!({
                "type": "text",
                "props": {"content": "Hi {{ user }}"}
            })))
            .unwrap();
        assert_eq!(tree.root.props["content"], json!("Hi Ada"));
    }

    #[test]
    fn test_node_scope_shadows_parent() {
        let mut interp = interpreter();
        interp.set_variable("label", json!("outer"));
        let tree = interp
            .interpret(doc(json!({
                "type": "column",
                "variables": {"label": "inner"},
                "children": [
                    {"type": "text", "props": {"content": "{{ label }}"}}
                ]
            })))
            .unwrap();
        assert_eq!(tree.root.children[0].props["content"], json!("inner"));
    }

    #[test]
    fn test_platform_variant_resolution() {
        let mut interp = Interpreter::new(
            InterpreterConfig {
                platform: Platform::Ios,
                ..InterpreterConfig::default()
            },
            Arc::new(RendererRegistry::new()),
        );
        let tree = interp
            .interpret(doc(json!({
                "type": "text",
                "props": {"content": {"ios": "cupertino", "fallback": "generic"}}
            })))
            .unwrap();
        assert_eq!(tree.root.props["content"], json!("cupertino"));
    }

    #[test]
    fn test_color_derivation() {
        let mut interp = interpreter();
        let tree = interp
            .interpret(doc(json!({
                "type": "container",
                "props": {"backgroundColor": "#ff0000", "style": {"borderColor": "#00ff0080"}}
            })))
            .unwrap();
        assert_eq!(tree.root.props["backgroundColor"]["r"], json!(255));
        assert_eq!(tree.root.props["backgroundColor"]["a"], json!(1.0));
        let border_alpha = tree.root.props["style"]["borderColor"]["a"].as_f64().unwrap();
        assert!((border_alpha - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_before_document_is_ignored() {
        let mut interp = interpreter();
        let delta = Delta::Operations(vec![trellis_patch::op::PatchOperation::replace(
            "/root/type",
            json!("row"),
        )]);
        assert!(interp.apply_delta(&delta).unwrap().is_none());
    }

    #[test]
    fn test_delta_reinterprets() {
        let mut interp = interpreter();
        interp
            .interpret(doc(json!({"type": "text", "props": {"content": "before"}})))
            .unwrap();

        let delta = Delta::Operations(vec![trellis_patch::op::PatchOperation::replace(
            "/root/props/content",
            json!("after"),
        )]);
        let tree = interp.apply_delta(&delta).unwrap().unwrap();
        assert_eq!(tree.root.props["content"], json!("after"));
    }

    #[test]
    fn test_animation_registered_and_disposed() {
        let mut interp = interpreter();
        interp
            .interpret(doc(json!({
                "type": "container",
                "children": [{
                    "type": "text",
                    "animation": {
                        "id": "fade-in",
                        "type": "timing",
                        "duration": 200,
                        "properties": [{"name": "opacity", "from": 0.0, "to": 1.0}]
                    }
                }]
            })))
            .unwrap();
        assert!(interp.runtime().contains("fade-in"));

        // Removing the animated node disposes its animation
        let delta = Delta::Operations(vec![trellis_patch::op::PatchOperation::remove(
            "/root/children/0",
        )]);
        interp.apply_delta(&delta).unwrap().unwrap();
        assert!(!interp.runtime().contains("fade-in"));
    }

    #[test]
    fn test_delta_rewriting_animation_spec_takes_effect() {
        let mut interp = interpreter();
        interp
            .interpret(doc(json!({
                "type": "container",
                "children": [{
                    "type": "text",
                    "animation": {
                        "id": "fade-in",
                        "type": "timing",
                        "duration": 200,
                        "properties": [{"name": "opacity", "from": 0.0, "to": 1.0}]
                    }
                }]
            })))
            .unwrap();
        interp
            .runtime()
            .advance(std::time::Duration::from_millis(100));

        // Same id, different spec: the old entry must not linger
        let delta = Delta::Operations(vec![trellis_patch::op::PatchOperation::replace(
            "/root/children/0/animation",
            json!({
                "id": "fade-in",
                "type": "timing",
                "duration": 400,
                "properties": [{"name": "opacity", "from": 1.0, "to": 0.0}]
            }),
        )]);
        interp.apply_delta(&delta).unwrap().unwrap();

        // Restarted from the new spec's starting value
        let values = interp.runtime().current_values("fade-in").unwrap();
        assert_eq!(values["opacity"], 1.0);

        interp
            .runtime()
            .advance(std::time::Duration::from_millis(200));
        let values = interp.runtime().current_values("fade-in").unwrap();
        assert!((values["opacity"] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_hex_color_forms() {
        assert_eq!(parse_hex_color("#fff").unwrap()["r"], json!(255));
        assert_eq!(parse_hex_color("#102030").unwrap()["g"], json!(32));
        assert!(parse_hex_color("#12345").is_none());
        assert!(parse_hex_color("nope").is_none());
    }
}
