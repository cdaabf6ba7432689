//! Render contexts - scoped variable stores with parent inheritance
//!
//! One root context is created per interpretation; a child context is
//! created for each nested component scope and dropped when that scope
//! ends. Lookups walk up the parent chain, writes are always local.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A scoped key/value store for template variables
#[derive(Debug, Default)]
pub struct RenderContext {
    variables: RwLock<HashMap<String, Value>>,
    parent: Option<Arc<RenderContext>>,
}

impl RenderContext {
    /// Create a new root context
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a root context pre-populated with variables
    pub fn with_variables(variables: impl IntoIterator<Item = (String, Value)>) -> Arc<Self> {
        Arc::new(Self {
            variables: RwLock::new(variables.into_iter().collect()),
            parent: None,
        })
    }

    /// Create a child context scoped under this one
    pub fn child(self: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            variables: RwLock::new(HashMap::new()),
            parent: Some(Arc::clone(self)),
        })
    }

    /// Set a variable in this scope (never touches the parent)
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.write().insert(name.into(), value.into());
    }

    /// Look up a variable, searching this scope then the parent chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.variables.read().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Check whether a variable is visible from this scope
    pub fn contains(&self, name: &str) -> bool {
        self.variables.read().contains_key(name)
            || self.parent.as_ref().map_or(false, |p| p.contains(name))
    }

    /// Number of variables defined locally in this scope
    pub fn local_len(&self) -> usize {
        self.variables.read().len()
    }
}
