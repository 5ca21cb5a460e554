//! Edge-triggered input-action abstraction layer.
//!
//! Decouples raw input events (key codes, mouse buttons) from named semantic
//! actions that application code queries or subscribes to. Multiple sources
//! can drive the same action; the controller OR-reduces their contributions
//! into one boolean per action and emits exactly one notification per state
//! transition.
//!
//! # Core Types
//!
//! - [`InputController`]: action registry, aggregator, and gate state machine
//! - [`InputSource`]: trait for pluggable input channels
//! - [`KeyboardSource`] / [`MouseSource`]: the built-in channels
//! - [`BindingMap`] / [`BindingMapBuilder`]: declarative raw-input-to-action
//!   bindings
//! - [`ActionEvent`]: activate/deactivate notification payload
//!
//! # Usage
//!
//! ```ignore
//! use edgewise_input::{BindingMapBuilder, InputController, KeyboardSource, KeyCode};
//!
//! let mut controller = InputController::new();
//! controller.add_source(
//!     "keyboard",
//!     KeyboardSource::with_bindings(
//!         BindingMapBuilder::new()
//!             .bind("left", KeyCode::ArrowLeft)
//!             .bind("left", KeyCode::KeyA)
//!             .bind("jump", KeyCode::Space)
//!             .build(),
//!     ),
//! )?;
//!
//! controller.on_action(|event| println!("{} {:?}", event.action, event.transition));
//! controller.attach(window.id());
//!
//! // In the host's event handler
//! fn on_event(controller: &mut InputController, event: &WindowEvent) -> bool {
//!     controller.process_window_event(event)
//! }
//!
//! // In application code
//! if controller.is_action_active("jump") {
//!     // ...
//! }
//! ```
//!
//! # Gating
//!
//! Setting [`InputController::set_enabled`] to `false`, or the target losing
//! focus, deactivates every active action with one notification each and
//! forces all queries to report inactive. Disable preserves source pressed
//! state (a held key resumes on re-enable); blur clears it (refocus requires
//! a fresh press).

mod binding;
mod controller;
mod error;
mod keyboard;
mod mouse;
mod notify;
mod source;

pub use binding::{BindingDecl, BindingMap, BindingMapBuilder, IdList, RawInput};
pub use controller::{InputController, TargetId};
pub use error::{Error, Result};
pub use keyboard::KeyboardSource;
pub use mouse::{MouseButton, MouseSource};
pub use notify::{ActionEvent, ActionTransition, ListenerId};
pub use source::InputSource;

// Re-export winit types commonly used with input
pub use winit::event::WindowEvent;
pub use winit::keyboard::KeyCode;
