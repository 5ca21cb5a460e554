//! Binding declarations mapping raw inputs to named actions.

use hashbrown::{HashMap, HashSet};
use serde::Deserialize;
use winit::keyboard::KeyCode;

use crate::mouse::MouseButton;

/// A raw input identifier from one of the supported channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum RawInput {
    /// A keyboard key.
    Key(KeyCode),
    /// A mouse button.
    Mouse(MouseButton),
}

impl RawInput {
    /// Create a key input.
    #[must_use]
    pub const fn key(key: KeyCode) -> Self {
        Self::Key(key)
    }

    /// Create a mouse button input.
    #[must_use]
    pub const fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

impl From<KeyCode> for RawInput {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for RawInput {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// One raw input or a list of them.
///
/// Declarative configs may bind a single id or several; either shape is
/// accepted and normalized to a set when the binding is installed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    /// A single raw input.
    One(RawInput),
    /// Several raw inputs.
    Many(Vec<RawInput>),
}

impl IdList {
    pub(crate) fn normalize(self) -> HashSet<RawInput> {
        match self {
            Self::One(id) => core::iter::once(id).collect(),
            Self::Many(ids) => ids.into_iter().collect(),
        }
    }
}

/// Declarative binding entry for one action.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingDecl {
    /// Raw inputs that assert the action (any one being down suffices).
    pub ids: IdList,
    /// Whether the binding starts enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl BindingDecl {
    /// Create an enabled declaration from any collection of raw inputs.
    pub fn new(ids: impl IntoIterator<Item = impl Into<RawInput>>) -> Self {
        Self {
            ids: IdList::Many(ids.into_iter().map(Into::into).collect()),
            enabled: true,
        }
    }

    /// Set the initial enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Declarative binding map: action name to binding entry.
pub type BindingMap = HashMap<String, BindingDecl>;

/// Builder for assembling a binding map with a fluent API.
#[derive(Debug, Default)]
pub struct BindingMapBuilder {
    map: BindingMap,
}

impl BindingMapBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw input to an action, creating the entry if needed.
    #[must_use]
    pub fn bind(mut self, action: impl Into<String>, id: impl Into<RawInput>) -> Self {
        let entry = self
            .map
            .entry(action.into())
            .or_insert_with(|| BindingDecl {
                ids: IdList::Many(Vec::new()),
                enabled: true,
            });
        let id = id.into();
        match &mut entry.ids {
            IdList::One(existing) => entry.ids = IdList::Many(vec![*existing, id]),
            IdList::Many(ids) => ids.push(id),
        }
        self
    }

    /// Add several raw inputs to an action.
    #[must_use]
    pub fn bind_many(
        mut self,
        action: impl Into<String>,
        ids: impl IntoIterator<Item = impl Into<RawInput>>,
    ) -> Self {
        let action = action.into();
        for id in ids {
            self = self.bind(action.clone(), id);
        }
        self
    }

    /// Set the enabled flag for an already-declared action.
    #[must_use]
    pub fn enabled(mut self, action: &str, enabled: bool) -> Self {
        if let Some(entry) = self.map.get_mut(action) {
            entry.enabled = enabled;
        }
        self
    }

    /// Build the binding map.
    #[must_use]
    pub fn build(self) -> BindingMap {
        self.map
    }
}
