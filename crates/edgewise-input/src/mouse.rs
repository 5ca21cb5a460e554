//! Mouse source adapter.

use serde::Deserialize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};

use crate::binding::{BindingMap, RawInput};
use crate::source::{InputSource, SourceState};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl TryFrom<WinitMouseButton> for MouseButton {
    type Error = ();

    fn try_from(button: WinitMouseButton) -> Result<Self, Self::Error> {
        match button {
            WinitMouseButton::Left => Ok(Self::Left),
            WinitMouseButton::Right => Ok(Self::Right),
            WinitMouseButton::Middle => Ok(Self::Middle),
            WinitMouseButton::Back => Ok(Self::Back),
            WinitMouseButton::Forward => Ok(Self::Forward),
            WinitMouseButton::Other(_) => Err(()),
        }
    }
}

/// Input source driven by mouse button events.
///
/// Raw ids are [`MouseButton`] values; raw inputs from other channels and
/// nonstandard extra buttons are ignored.
#[derive(Debug, Default)]
pub struct MouseSource {
    state: SourceState,
}

impl MouseSource {
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

impl InputSource for MouseSource {
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
            RawInput::Mouse(_) => self.state.press(raw),
            RawInput::Key(_) => Vec::new(),
        }
    }

    fn release(&mut self, raw: RawInput) -> Vec<String> {
        match raw {
            RawInput::Mouse(_) => self.state.release(raw),
            RawInput::Key(_) => Vec::new(),
        }
    }

    fn handle_event(&mut self, event: &WindowEvent) -> Vec<String> {
        let WindowEvent::MouseInput { state, button, .. } = event else {
            return Vec::new();
        };
        let Ok(button) = MouseButton::try_from(*button) else {
            return Vec::new();
        };
        match state {
            ElementState::Pressed => self.press(RawInput::Mouse(button)),
            ElementState::Released => self.release(RawInput::Mouse(button)),
        }
    }

    fn clear_pressed(&mut self) {
        self.state.clear_pressed();
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::*;
    use crate::binding::BindingMapBuilder;

    #[test]
    fn button_press_and_release() {
        let mut source = MouseSource::with_bindings(
            BindingMapBuilder::new().bind("fire", MouseButton::Left).build(),
        );

        assert_eq!(
            source.press(RawInput::Mouse(MouseButton::Left)),
            vec!["fire".to_string()]
        );
        assert!(source.contributes("fire"));

        source.release(RawInput::Mouse(MouseButton::Left));
        assert!(!source.contributes("fire"));
    }

    #[test]
    fn foreign_channel_inputs_ignored() {
        let mut source = MouseSource::with_bindings(
            BindingMapBuilder::new().bind("fire", KeyCode::KeyF).build(),
        );
        assert!(source.press(RawInput::Key(KeyCode::KeyF)).is_empty());
        assert!(!source.contributes("fire"));
    }

    #[test]
    fn nonstandard_buttons_rejected() {
        assert!(MouseButton::try_from(WinitMouseButton::Other(7)).is_err());
        assert_eq!(
            MouseButton::try_from(WinitMouseButton::Right),
            Ok(MouseButton::Right)
        );
    }
}
