//! Source adapter abstraction shared by all input channels.

use std::fmt;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};
use winit::event::WindowEvent;

use crate::binding::{BindingMap, RawInput};

/// One input channel feeding action contributions into the controller.
///
/// Adapters own their bindings, their pressed-raw-input set, and an enable
/// flag. They never talk to listeners directly: raw events are translated
/// into a list of affected action names, and the controller recomputes
/// exactly those actions.
pub trait InputSource: fmt::Debug {
    /// Actions this source has declared bindings for.
    fn declared_actions(&self) -> Vec<String>;

    /// Returns `true` if this source currently asserts the action.
    fn contributes(&self, action: &str) -> bool;

    /// Returns `true` if the source is enabled.
    fn enabled(&self) -> bool;

    /// Enable or disable the source. Disabling clears the pressed set.
    ///
    /// Returns the actions whose aggregate state must be recomputed.
    fn set_enabled(&mut self, enabled: bool) -> Vec<String>;

    /// Merge a declarative binding map into this source's bindings.
    ///
    /// Returns the actions touched by the declaration.
    fn bind_actions(&mut self, bindings: BindingMap) -> Vec<String>;

    /// Record a raw press.
    ///
    /// Returns every action bound to the raw input, or nothing if the input
    /// is already down (key repeat), from a foreign channel, or the source
    /// is disabled.
    fn press(&mut self, raw: RawInput) -> Vec<String>;

    /// Record a raw release.
    ///
    /// Returns every action bound to the raw input, or nothing if the input
    /// was not down.
    fn release(&mut self, raw: RawInput) -> Vec<String>;

    /// Translate a host window event into presses/releases.
    ///
    /// Returns the affected actions; events for other channels are ignored.
    fn handle_event(&mut self, event: &WindowEvent) -> Vec<String>;

    /// Forget all pressed raw inputs.
    fn clear_pressed(&mut self);
}

/// Normalized binding for one action within a source.
#[derive(Debug, Clone, Default)]
struct ActionBinding {
    ids: HashSet<RawInput>,
    enabled: bool,
}

/// Shared bookkeeping for a source adapter.
///
/// Concrete adapters wrap this and add their channel's event translation.
#[derive(Debug)]
pub(crate) struct SourceState {
    bindings: HashMap<String, ActionBinding>,
    pressed: HashSet<RawInput>,
    enabled: bool,
}

impl Default for SourceState {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            pressed: HashSet::new(),
            enabled: true,
        }
    }
}

impl SourceState {
    pub(crate) fn bind_actions(&mut self, bindings: BindingMap) -> Vec<String> {
        let mut touched = Vec::with_capacity(bindings.len());
        for (action, decl) in bindings {
            let enabled = decl.enabled;
            let ids = decl.ids.normalize();
            if ids.is_empty() {
                warn!(action = %action, "binding declares no raw inputs, skipping");
                continue;
            }
            let binding = self.bindings.entry(action.clone()).or_default();
            // Re-binding merges ids; the enabled flag takes the latest value.
            binding.ids.extend(ids);
            binding.enabled = enabled;
            touched.push(action);
        }
        touched
    }

    pub(crate) fn declared_actions(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    pub(crate) fn contributes(&self, action: &str) -> bool {
        self.enabled
            && self.bindings.get(action).is_some_and(|binding| {
                binding.enabled && binding.ids.iter().any(|id| self.pressed.contains(id))
            })
    }

    pub(crate) const fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) -> Vec<String> {
        if self.enabled == enabled {
            return Vec::new();
        }
        self.enabled = enabled;
        if !enabled {
            self.pressed.clear();
        }
        debug!(enabled, "source enable toggled");
        self.declared_actions()
    }

    pub(crate) fn press(&mut self, raw: RawInput) -> Vec<String> {
        if !self.enabled || !self.pressed.insert(raw) {
            return Vec::new();
        }
        debug!(?raw, "raw input down");
        self.actions_bound_to(raw)
    }

    pub(crate) fn release(&mut self, raw: RawInput) -> Vec<String> {
        if !self.enabled || !self.pressed.remove(&raw) {
            return Vec::new();
        }
        debug!(?raw, "raw input up");
        self.actions_bound_to(raw)
    }

    pub(crate) fn clear_pressed(&mut self) {
        self.pressed.clear();
    }

    /// A raw id may legitimately be bound to several actions; one event
    /// affects all of them.
    fn actions_bound_to(&self, raw: RawInput) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|(_, binding)| binding.ids.contains(&raw))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
