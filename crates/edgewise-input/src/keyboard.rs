//! Keyboard source adapter.

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::binding::{BindingMap, RawInput};
use crate::source::{InputSource, SourceState};

/// Input source driven by keyboard key events.
///
/// Raw ids are [`winit::keyboard::KeyCode`] values; raw inputs from other
/// channels are ignored. Held-key repeat events are absorbed by the pressed
/// set, so each physical press affects its actions exactly once.
#[derive(Debug, Default)]
pub struct KeyboardSource {
    state: SourceState,
}

impl KeyboardSource {
    /// Create a source with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with an initial binding map.
    #[must_use]
    pub fn with_bindings(bindings: BindingMap) -> Self {
        let mut source = Self::default();
        source.state.bind_actions(bindings);
        source
    }
}

impl InputSource for KeyboardSource {
    fn declared_actions(&self) -> Vec<String> {
        self.state.declared_actions()
    }

    fn contributes(&self, action: &str) -> bool {
        self.state.contributes(action)
    }

    fn enabled(&self) -> bool {
        self.state.enabled()
    }

    fn set_enabled(&mut self, enabled: bool) -> Vec<String> {
        self.state.set_enabled(enabled)
    }

    fn bind_actions(&mut self, bindings: BindingMap) -> Vec<String> {
        self.state.bind_actions(bindings)
    }

    fn press(&mut self, raw: RawInput) -> Vec<String> {
        match raw {
            RawInput::Key(_) => self.state.press(raw),
            RawInput::Mouse(_) => Vec::new(),
        }
    }

    fn release(&mut self, raw: RawInput) -> Vec<String> {
        match raw {
            RawInput::Key(_) => self.state.release(raw),
            RawInput::Mouse(_) => Vec::new(),
        }
    }

    fn handle_event(&mut self, event: &WindowEvent) -> Vec<String> {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return Vec::new();
        };
        let PhysicalKey::Code(code) = event.physical_key else {
            return Vec::new();
        };
        match event.state {
            ElementState::Pressed => self.press(RawInput::Key(code)),
            ElementState::Released => self.release(RawInput::Key(code)),
        }
    }

    fn clear_pressed(&mut self) {
        self.state.clear_pressed();
    }
}
