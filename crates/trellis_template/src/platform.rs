//! Platform-variant property resolution
//!
//! A property value that is an object whose keys are drawn from the
//! known platform-identifier set (plus an optional `fallback` key) is a
//! platform-variant map, not a literal object. Resolution picks the
//! branch for the active target, falling back to `fallback`, and yields
//! "no value" when neither is present - the caller logs a warning and
//! proceeds with the property's normal default.
//!
//! This pass runs before template resolution: the chosen branch may
//! itself contain placeholders.

use serde_json::{Map, Value};

/// The fallback key accepted alongside platform identifiers
pub const FALLBACK_KEY: &str = "fallback";

/// The closed set of known platform identifiers
pub const PLATFORM_IDS: &[&str] = &["ios", "android", "web", "macos", "windows", "linux"];

/// A render target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Android,
    Web,
    Macos,
    Windows,
    Linux,
}

impl Platform {
    /// The identifier used in variant maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }

    /// Parse a platform identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            "web" => Some(Self::Web),
            "macos" => Some(Self::Macos),
            "windows" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves platform-variant maps for one active target
#[derive(Debug, Clone, Copy)]
pub struct PlatformResolver {
    target: Platform,
}

impl PlatformResolver {
    /// Create a resolver for the given target
    pub fn new(target: Platform) -> Self {
        Self { target }
    }

    /// The active target
    pub fn target(&self) -> Platform {
        self.target
    }

    /// Check whether an object is a platform-variant map
    ///
    /// Every key must be a platform identifier or `fallback`, and at
    /// least one platform key must be present (a bare `{ fallback }`
    /// object is treated as a literal).
    pub fn is_variant_map(map: &Map<String, Value>) -> bool {
        if map.is_empty() {
            return false;
        }
        let mut has_platform_key = false;
        for key in map.keys() {
            if PLATFORM_IDS.contains(&key.as_str()) {
                has_platform_key = true;
            } else if key != FALLBACK_KEY {
                return false;
            }
        }
        has_platform_key
    }

    /// Pick the branch of a variant map for the active target
    ///
    /// Returns `None` ("no value") when neither the target nor a
    /// fallback branch exists.
    pub fn pick<'a>(&self, map: &'a Map<String, Value>) -> Option<&'a Value> {
        map.get(self.target.as_str()).or_else(|| map.get(FALLBACK_KEY))
    }

    /// Resolve variant maps throughout a value, recursively
    ///
    /// A variant map with no usable branch resolves to `null` and logs a
    /// warning; the builder then applies the property's default.
    pub fn resolve(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) if Self::is_variant_map(map) => match self.pick(map) {
                Some(branch) => self.resolve(branch),
                None => {
                    log::warn!(
                        "Platform variant has no branch for '{}' and no fallback",
                        self.target
                    );
                    Value::Null
                }
            },
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.resolve(v)).collect())
            }
            other => other.clone(),
        }
    }
}
