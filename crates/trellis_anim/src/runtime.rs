//! The animation runtime
//!
//! One entry per animation id, each with a small lifecycle state machine:
//!
//! ```text
//! idle ──start──► running ──┬──► completed ──start──► running
//!   ▲                       ├──► paused ─────start──► running
//!   └────────reset──────────┴──► cancelled
//! ```
//!
//! `advance` moves simulated time forward for every running entry and
//! recomputes `current_values`; the ticker thread calls it with measured
//! wall-clock deltas, tests call it with exact ones. Entries hold the
//! per-frame resources for their id, so removal is explicit: `dispose`
//! must be called when the owning node leaves the tree.

use crate::easing::Easing;
use crate::spec::{AnimationKind, AnimationSpec};
use crate::spring::{settle_duration_ms, spring_progress};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

/// Lifecycle phase of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Running,
    Paused,
    Completed,
    Cancelled,
}

/// A point-in-time view of one animation's state
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSnapshot {
    pub phase: AnimationPhase,
    pub current_values: HashMap<String, f64>,
}

struct AnimationEntry {
    spec: AnimationSpec,
    phase: AnimationPhase,
    /// Simulated time since start, including the delay
    elapsed: Duration,
    values: HashMap<String, f64>,
}

impl AnimationEntry {
    fn new(spec: AnimationSpec) -> Self {
        let values = spec
            .properties
            .iter()
            .map(|p| (p.name.clone(), clamp_property(&p.name, p.from)))
            .collect();
        Self {
            spec,
            phase: AnimationPhase::Idle,
            elapsed: Duration::ZERO,
            values,
        }
    }

    /// Duration of a single iteration, in milliseconds
    fn iteration_ms(&self) -> u64 {
        match self.spec.kind {
            AnimationKind::Timing | AnimationKind::Decay => self.spec.duration.max(1),
            AnimationKind::Spring => {
                settle_duration_ms(&self.spec.spring_config.unwrap_or_default())
            }
        }
    }

    /// Progress factor at the current elapsed time; true when finished
    fn progress(&self) -> (f64, bool) {
        let elapsed_ms = self.elapsed.as_secs_f64() * 1000.0;
        let after_delay = elapsed_ms - self.spec.delay as f64;
        if after_delay <= 0.0 {
            return (0.0, false);
        }

        let iteration_ms = self.iteration_ms() as f64;
        let cycles = after_delay / iteration_ms;

        if let Some(count) = self.spec.iteration_count() {
            if cycles >= count as f64 {
                return (1.0, true);
            }
        }

        let local = after_delay % iteration_ms;
        let t = local / iteration_ms;

        let factor = match self.spec.kind {
            AnimationKind::Timing => {
                let easing = self
                    .spec
                    .easing
                    .as_deref()
                    .map(Easing::parse_or_linear)
                    .unwrap_or(Easing::Linear);
                easing.apply(t)
            }
            AnimationKind::Spring => {
                let config = self.spec.spring_config.unwrap_or_default();
                spring_progress(&config, local / 1000.0)
            }
            AnimationKind::Decay => {
                // Exponential approach; ~0.25% from the target at t = 1
                1.0 - (-6.0 * t).exp()
            }
        };

        (factor, false)
    }

    fn recompute(&mut self) {
        let (factor, finished) = self.progress();
        for prop in &self.spec.properties {
            let value = prop.from + (prop.to - prop.from) * factor;
            self.values
                .insert(prop.name.clone(), clamp_property(&prop.name, value));
        }
        if finished {
            self.phase = AnimationPhase::Completed;
            log::debug!("Animation '{}' completed", self.spec.id);
        }
    }
}

/// Opacity composes as an alpha factor and must stay within [0, 1];
/// the transform axes (scale, rotation, translation) are unbounded.
fn clamp_property(name: &str, value: f64) -> f64 {
    if name == "opacity" {
        value.clamp(0.0, 1.0)
    } else {
        value
    }
}

/// Holds and advances every live animation
#[derive(Default)]
pub struct AnimationRuntime {
    entries: RwLock<HashMap<String, AnimationEntry>>,
}

impl AnimationRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation id, replacing any previous spec for it
    ///
    /// The entry starts idle with every property at its `from` value.
    pub fn register(&self, spec: AnimationSpec) {
        let id = spec.id.clone();
        self.entries.write().insert(id, AnimationEntry::new(spec));
    }

    /// Reconcile an id against an incoming spec
    ///
    /// If the id is already registered with an identical spec the entry
    /// is left untouched, preserving its phase and progress, and `false`
    /// is returned. Otherwise the entry is (re)created idle at its
    /// starting values and `true` is returned; the caller decides whether
    /// to start it.
    pub fn sync(&self, spec: AnimationSpec) -> bool {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(&spec.id) {
            if entry.spec == spec {
                return false;
            }
            log::debug!("Animation '{}' respecified, restarting", spec.id);
        }
        let id = spec.id.clone();
        entries.insert(id, AnimationEntry::new(spec));
        true
    }

    /// Start (or restart) an animation
    ///
    /// From `paused` the animation resumes where it left off; from
    /// `completed` or `cancelled` it restarts from the beginning. Unknown
    /// ids are ignored with a warning.
    pub fn start(&self, id: &str) {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(id) else {
            log::warn!("start: no animation registered with id '{}'", id);
            return;
        };
        if !matches!(entry.phase, AnimationPhase::Paused) {
            entry.elapsed = Duration::ZERO;
        }
        entry.phase = AnimationPhase::Running;
    }

    /// Pause a running animation in place
    pub fn pause(&self, id: &str) {
        if let Some(entry) = self.entries.write().get_mut(id) {
            if entry.phase == AnimationPhase::Running {
                entry.phase = AnimationPhase::Paused;
            }
        }
    }

    /// Cancel an animation, freezing its current values
    pub fn cancel(&self, id: &str) {
        if let Some(entry) = self.entries.write().get_mut(id) {
            entry.phase = AnimationPhase::Cancelled;
        }
    }

    /// Return an animation to idle at its starting values
    pub fn reset(&self, id: &str) {
        if let Some(entry) = self.entries.write().get_mut(id) {
            entry.phase = AnimationPhase::Idle;
            entry.elapsed = Duration::ZERO;
            for prop in &entry.spec.properties {
                entry
                    .values
                    .insert(prop.name.clone(), clamp_property(&prop.name, prop.from));
            }
        }
    }

    /// Release an id and its per-frame resources
    ///
    /// Must be paired with the owning node leaving the tree; entries are
    /// never collected implicitly.
    pub fn dispose(&self, id: &str) -> bool {
        let removed = self.entries.write().remove(id).is_some();
        if removed {
            log::debug!("Animation '{}' disposed", id);
        }
        removed
    }

    /// Dispose every id not present in `live`
    pub fn retain_ids(&self, live: &[String]) {
        let mut entries = self.entries.write();
        entries.retain(|id, _| {
            let keep = live.iter().any(|l| l == id);
            if !keep {
                log::debug!("Animation '{}' disposed (node left the tree)", id);
            }
            keep
        });
    }

    /// Advance simulated time for all running animations
    pub fn advance(&self, dt: Duration) {
        let mut entries = self.entries.write();
        for entry in entries.values_mut() {
            if entry.phase == AnimationPhase::Running {
                entry.elapsed += dt;
                entry.recompute();
            }
        }
    }

    /// Snapshot one animation's phase and values
    pub fn snapshot(&self, id: &str) -> Option<AnimationSnapshot> {
        self.entries.read().get(id).map(|e| AnimationSnapshot {
            phase: e.phase,
            current_values: e.values.clone(),
        })
    }

    /// Current interpolated values for one animation
    pub fn current_values(&self, id: &str) -> Option<HashMap<String, f64>> {
        self.entries.read().get(id).map(|e| e.values.clone())
    }

    /// Whether an id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    /// All registered ids
    pub fn ids(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of registered animations
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the runtime has no registered animations
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
