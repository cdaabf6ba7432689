//! Renderer registry and manifest loading
//!
//! Renderers plug in at runtime: a manifest declares which node types a
//! renderer pack provides, the host checks version compatibility, and
//! each entry is bound to a render function through a caller-supplied
//! resolver. Registered renderers take precedence over the built-in
//! allow-list during interpretation.

use crate::render::{RenderNode, Renderer};
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Semantic version for renderer pack compatibility
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    /// Create a new version
    #[inline]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Check if this version is compatible with a required minimum
    pub fn is_compatible_with(&self, required: &Version) -> bool {
        if self.major == 0 && required.major == 0 {
            // Pre-1.0: minor version must match exactly
            self.minor == required.minor
        } else {
            self.major == required.major
                && (self.minor > required.minor
                    || (self.minor == required.minor && self.patch >= required.patch))
        }
    }

    /// Parse from string "major.minor.patch"
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { major, minor, patch })
    }

    #[inline]
    const fn to_u64(self) -> u64 {
        (self.major as u64) << 32 | (self.minor as u64) << 16 | self.patch as u64
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u64().cmp(&other.to_u64())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self)
    }
}

/// One renderer declaration in a pack manifest
#[derive(Debug, Clone, Deserialize)]
pub struct RendererEntry {
    /// Node type this renderer handles
    #[serde(rename = "type")]
    pub node_type: String,
    /// Implementation identifier handed to the resolver
    pub class: String,
    /// Node types this renderer expects to also be registered
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A renderer pack manifest
#[derive(Debug, Clone, Deserialize)]
pub struct RendererManifest {
    pub name: String,
    pub version: String,
    /// Minimum host version this pack requires
    pub compatibility: String,
    pub renderers: Vec<RendererEntry>,
}

impl RendererManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: RendererManifest = serde_json::from_str(json)?;
        if manifest.renderers.is_empty() {
            return Err(ManifestError::Empty(manifest.name));
        }
        Ok(manifest)
    }
}

/// Errors from manifest loading
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest '{0}' declares no renderers")]
    Empty(String),

    #[error("Invalid version string '{0}'")]
    InvalidVersion(String),

    #[error("Pack '{name}' requires host {required}, host is {host}")]
    Incompatible {
        name: String,
        required: Version,
        host: Version,
    },
}

/// Thread-safe registry of pluggable renderers, keyed by node type
pub struct RendererRegistry {
    renderers: RwLock<HashMap<String, Arc<dyn Renderer + Send + Sync>>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self {
            renderers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a renderer for a node type, replacing any existing one
    pub fn register(&self, node_type: impl Into<String>, renderer: Arc<dyn Renderer + Send + Sync>) {
        let node_type = node_type.into();
        let replaced = self
            .renderers
            .write()
            .insert(node_type.clone(), renderer)
            .is_some();
        if replaced {
            log::debug!("Renderer for '{}' replaced", node_type);
        }
    }

    /// Remove the renderer for a node type
    pub fn unregister(&self, node_type: &str) -> bool {
        self.renderers.write().remove(node_type).is_some()
    }

    /// Look up the renderer for a node type
    pub fn lookup(&self, node_type: &str) -> Option<Arc<dyn Renderer + Send + Sync>> {
        self.renderers.read().get(node_type).cloned()
    }

    /// Whether any renderer is registered for the node type
    pub fn contains(&self, node_type: &str) -> bool {
        self.renderers.read().contains_key(node_type)
    }

    /// Number of registered renderers
    pub fn len(&self) -> usize {
        self.renderers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.read().is_empty()
    }

    /// Remove all registered renderers
    pub fn clear(&self) {
        self.renderers.write().clear();
    }

    /// Load a manifest, binding entries through `resolve`
    ///
    /// `resolve` maps an entry's class identifier to a renderer; entries
    /// it cannot resolve are skipped with a warning rather than failing
    /// the whole pack. Returns the number of renderers registered.
    pub fn load_manifest<F>(
        &self,
        manifest: &RendererManifest,
        host_version: Version,
        resolve: F,
    ) -> Result<usize, ManifestError>
    where
        F: Fn(&RendererEntry) -> Option<Arc<dyn Renderer + Send + Sync>>,
    {
        let required = Version::parse(&manifest.compatibility)
            .ok_or_else(|| ManifestError::InvalidVersion(manifest.compatibility.clone()))?;

        if !host_version.is_compatible_with(&required) {
            return Err(ManifestError::Incompatible {
                name: manifest.name.clone(),
                required,
                host: host_version,
            });
        }

        let mut registered = 0;
        for entry in &manifest.renderers {
            match resolve(entry) {
                Some(renderer) => {
                    self.register(entry.node_type.clone(), renderer);
                    registered += 1;
                }
                None => {
                    log::warn!(
                        "Pack '{}': no implementation for class '{}' (type '{}'), skipping",
                        manifest.name,
                        entry.class,
                        entry.node_type
                    );
                }
            }
        }

        log::info!(
            "Loaded renderer pack '{}' v{}: {}/{} renderers",
            manifest.name,
            manifest.version,
            registered,
            manifest.renderers.len()
        );
        Ok(registered)
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter turning a plain function into a [`Renderer`]
pub struct FnRenderer<F>(pub F);

impl<F> Renderer for FnRenderer<F>
where
    F: Fn(&str, &Map<String, Value>, Vec<RenderNode>) -> Option<RenderNode>,
{
    fn render(
        &self,
        kind: &str,
        props: &Map<String, Value>,
        children: Vec<RenderNode>,
    ) -> Option<RenderNode> {
        (self.0)(kind, props, children)
    }
}
