//! Interactive demo for the edgewise input layer.
//!
//! Opens a window, binds arrows/WASD movement plus space and the mouse
//! buttons to named actions, and logs every action transition. F1 toggles
//! the mouse source on and off.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p edgewise-demo
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use edgewise_input::{BindingMapBuilder, InputController, KeyboardSource, MouseButton, MouseSource};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn build_controller() -> anyhow::Result<InputController> {
    let mut controller = InputController::new();

    controller
        .add_source(
            "keyboard",
            KeyboardSource::with_bindings(
                BindingMapBuilder::new()
                    .bind_many("left", [KeyCode::ArrowLeft, KeyCode::KeyA])
                    .bind_many("right", [KeyCode::ArrowRight, KeyCode::KeyD])
                    .bind_many("up", [KeyCode::ArrowUp, KeyCode::KeyW])
                    .bind_many("down", [KeyCode::ArrowDown, KeyCode::KeyS])
                    .bind("jump", KeyCode::Space)
                    .build(),
            ),
        )
        .context("registering keyboard source")?;

    controller
        .add_source(
            "mouse",
            MouseSource::with_bindings(
                BindingMapBuilder::new()
                    .bind("left", MouseButton::Left)
                    .bind("right", MouseButton::Right)
                    .build(),
            ),
        )
        .context("registering mouse source")?;

    controller.on_action(|event| info!(action = %event.action, transition = ?event.transition, "action"));

    Ok(controller)
}

struct DemoApp {
    window: Option<Arc<Window>>,
    controller: InputController,
}

impl DemoApp {
    fn toggle_mouse_source(&mut self) {
        let enabled = self.controller.source_enabled("mouse").unwrap_or(false);
        if let Err(e) = self.controller.set_source_enabled("mouse", !enabled) {
            error!("Failed to toggle mouse source: {e}");
        } else {
            info!(enabled = !enabled, "mouse source toggled");
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Edgewise Input Demo")
            .with_inner_size(PhysicalSize::new(WIDTH, HEIGHT));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                self.controller.attach(window.id());
                self.window = Some(window);
                info!("Window ready; press keys or mouse buttons (F1 toggles the mouse source)");
            }
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                self.controller.detach();
                event_loop.exit();
                return;
            }
            WindowEvent::KeyboardInput { event: key, .. } => {
                // The toggle is demo chrome, not an action binding
                if key.state == ElementState::Pressed
                    && key.physical_key == PhysicalKey::Code(KeyCode::F1)
                {
                    self.toggle_mouse_source();
                    return;
                }
            }
            _ => {}
        }

        self.controller.process_window_event(&event);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let controller = build_controller()?;

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DemoApp {
        window: None,
        controller,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {e}");
    }

    Ok(())
}
