//! Animation wire types
//!
//! The declarative form carried on a schema node's `animation` field.
//! Durations and delays are in milliseconds; `iterations` is 1 by
//! default, -1 for indefinite repetition, n > 1 for that many runs.

use serde::{Deserialize, Serialize};

/// The interpolation mode of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// Duration + easing curve
    Timing,
    /// Damped harmonic oscillator
    Spring,
    /// Exponential decay toward the target
    Decay,
}

/// One animated property, interpolated from `from` to `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnimation {
    pub name: String,
    pub from: f64,
    pub to: f64,
}

/// Physical parameters for spring mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
        }
    }
}

/// A declarative animation attached to a schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Unique per tree; doubles as the runtime's resource handle
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// Duration in milliseconds (timing and decay modes)
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// Delay before the first frame, in milliseconds
    #[serde(default)]
    pub delay: u64,
    /// Named easing curve (timing mode); unknown names fall back to linear
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
    /// 1 = run once (default), -1 = indefinite, n > 1 = n repetitions
    #[serde(default = "default_iterations")]
    pub iterations: i32,
    pub properties: Vec<PropertyAnimation>,
    #[serde(rename = "springConfig", default, skip_serializing_if = "Option::is_none")]
    pub spring_config: Option<SpringConfig>,
}

fn default_duration() -> u64 {
    300
}

fn default_iterations() -> i32 {
    1
}

impl AnimationSpec {
    /// Whether this animation repeats forever
    pub fn is_infinite(&self) -> bool {
        self.iterations == -1
    }

    /// Number of runs, treating 0/1/unset as a single run
    pub fn iteration_count(&self) -> Option<u32> {
        if self.is_infinite() {
            None
        } else {
            Some(self.iterations.max(1) as u32)
        }
    }
}
