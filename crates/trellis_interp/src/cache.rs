//! Interpretation caches
//!
//! Repeated interpretation of a mostly-unchanged document does the same
//! resolution work over and over. Three memoization layers absorb it:
//! resolved property maps keyed by node type plus raw props, derived
//! style objects keyed by source text, and renderer dispatch decisions
//! keyed by node type.
//!
//! Caching is transparent: with the cache disabled every entry point
//! recomputes and output is identical. Dispatch entries go stale when
//! the registry changes, so mutating the registry warrants a
//! [`RenderCache::clear`].

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// How a node type is rendered, memoized per type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A registered renderer handles it
    Registered,
    /// Falls back to the built-in allow-list
    Builtin,
    /// Neither: rendered as an unsupported placeholder
    Unsupported,
}

/// Hit/miss counters, one pair per cache layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub prop_hits: u64,
    pub prop_misses: u64,
    pub style_hits: u64,
    pub style_misses: u64,
    pub dispatch_hits: u64,
    pub dispatch_misses: u64,
}

/// Memoization for the interpretation pipeline
pub struct RenderCache {
    enabled: AtomicBool,
    props: RwLock<HashMap<String, Map<String, Value>>>,
    styles: RwLock<HashMap<String, Value>>,
    dispatch: RwLock<HashMap<String, Dispatch>>,
    prop_hits: AtomicU64,
    prop_misses: AtomicU64,
    style_hits: AtomicU64,
    style_misses: AtomicU64,
    dispatch_hits: AtomicU64,
    dispatch_misses: AtomicU64,
}

impl RenderCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            props: RwLock::new(HashMap::new()),
            styles: RwLock::new(HashMap::new()),
            dispatch: RwLock::new(HashMap::new()),
            prop_hits: AtomicU64::new(0),
            prop_misses: AtomicU64::new(0),
            style_hits: AtomicU64::new(0),
            style_misses: AtomicU64::new(0),
            dispatch_hits: AtomicU64::new(0),
            dispatch_misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Toggle caching; disabling also drops all entries
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        if !enabled {
            self.clear();
        }
    }

    /// Drop all cached entries; counters are kept
    pub fn clear(&self) {
        self.props.write().clear();
        self.styles.write().clear();
        self.dispatch.write().clear();
    }

    /// Cache key for a resolved property map
    pub fn props_key(node_type: &str, raw_props: &Value) -> String {
        format!("{}|{}", node_type, raw_props)
    }

    pub fn get_props(&self, key: &str) -> Option<Map<String, Value>> {
        if !self.is_enabled() {
            return None;
        }
        let hit = self.props.read().get(key).cloned();
        match hit {
            Some(props) => {
                self.prop_hits.fetch_add(1, Ordering::Relaxed);
                Some(props)
            }
            None => {
                self.prop_misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put_props(&self, key: String, props: Map<String, Value>) {
        if self.is_enabled() {
            self.props.write().insert(key, props);
        }
    }

    /// Memoized derivation of a style object from its source text
    pub fn style_or_compute<F>(&self, key: &str, compute: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        if !self.is_enabled() {
            return compute();
        }
        if let Some(style) = self.styles.read().get(key) {
            self.style_hits.fetch_add(1, Ordering::Relaxed);
            return style.clone();
        }
        self.style_misses.fetch_add(1, Ordering::Relaxed);
        let style = compute();
        self.styles.write().insert(key.to_string(), style.clone());
        style
    }

    /// Memoized renderer dispatch decision for a node type
    pub fn dispatch_or_compute<F>(&self, node_type: &str, compute: F) -> Dispatch
    where
        F: FnOnce() -> Dispatch,
    {
        if !self.is_enabled() {
            return compute();
        }
        if let Some(dispatch) = self.dispatch.read().get(node_type) {
            self.dispatch_hits.fetch_add(1, Ordering::Relaxed);
            return *dispatch;
        }
        self.dispatch_misses.fetch_add(1, Ordering::Relaxed);
        let dispatch = compute();
        self.dispatch.write().insert(node_type.to_string(), dispatch);
        dispatch
    }

    /// Snapshot of the hit/miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            prop_hits: self.prop_hits.load(Ordering::Relaxed),
            prop_misses: self.prop_misses.load(Ordering::Relaxed),
            style_hits: self.style_hits.load(Ordering::Relaxed),
            style_misses: self.style_misses.load(Ordering::Relaxed),
            dispatch_hits: self.dispatch_hits.load(Ordering::Relaxed),
            dispatch_misses: self.dispatch_misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_round_trip() {
        let cache = RenderCache::new(true);
        let key = RenderCache::props_key("text", &json!({"content": "hi"}));

        assert!(cache.get_props(&key).is_none());

        let mut props = Map::new();
        props.insert("content".to_string(), json!("hi"));
        cache.put_props(key.clone(), props.clone());

        assert_eq!(cache.get_props(&key), Some(props));
        let stats = cache.stats();
        assert_eq!(stats.prop_hits, 1);
        assert_eq!(stats.prop_misses, 1);
    }

    #[test]
    fn test_disabled_cache_always_recomputes() {
        let cache = RenderCache::new(false);
        let mut calls = 0;
        for _ in 0..3 {
            cache.style_or_compute("#fff", || {
                calls += 1;
                json!({"r": 255})
            });
        }
        assert_eq!(calls, 3);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_style_memoized() {
        let cache = RenderCache::new(true);
        let mut calls = 0;
        for _ in 0..3 {
            cache.style_or_compute("#fff", || {
                calls += 1;
                json!({"r": 255})
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats().style_hits, 2);
    }

    #[test]
    fn test_dispatch_memoized_and_cleared() {
        let cache = RenderCache::new(true);
        assert_eq!(cache.dispatch_or_compute("text", || Dispatch::Builtin), Dispatch::Builtin);
        // Served from cache, compute not consulted
        assert_eq!(cache.dispatch_or_compute("text", || Dispatch::Unsupported), Dispatch::Builtin);

        cache.clear();
        assert_eq!(
            cache.dispatch_or_compute("text", || Dispatch::Registered),
            Dispatch::Registered
        );
    }

    #[test]
    fn test_disabling_drops_entries() {
        let cache = RenderCache::new(true);
        cache.put_props("k".to_string(), Map::new());
        cache.set_enabled(false);
        cache.set_enabled(true);
        assert!(cache.get_props("k").is_none());
    }
}
