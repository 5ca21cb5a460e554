//! Action registry, aggregation, and focus/enable gating.

use hashbrown::HashMap;
use tracing::{debug, info, warn};
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::binding::{BindingMap, RawInput};
use crate::error::{Error, Result};
use crate::notify::{ActionEvent, ActionTransition, ListenerId, Listeners};
use crate::source::InputSource;

/// Opaque identity of the host surface the controller is attached to.
///
/// The controller holds the id only; it never owns the surface itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

impl From<u64> for TargetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<WindowId> for TargetId {
    fn from(id: WindowId) -> Self {
        Self(id.into())
    }
}

/// Per-action registry entry.
#[derive(Debug, Clone, Copy)]
struct ActionState {
    /// Last value reported to listeners; the edge-detection reference.
    active: bool,
    /// Action-level enable flag, independent of any source's flag.
    enabled: bool,
}

#[derive(Debug)]
struct SourceEntry {
    name: String,
    source: Box<dyn InputSource>,
}

/// Single source of truth for action state.
///
/// Owns the registered sources and the canonical action table, reduces "does
/// any enabled source assert this action" into one boolean per action, and
/// emits exactly one [`ActionEvent`] per state transition.
///
/// # Usage
///
/// ```ignore
/// let mut controller = InputController::new();
/// controller.add_source(
///     "keyboard",
///     KeyboardSource::with_bindings(
///         BindingMapBuilder::new()
///             .bind("left", KeyCode::ArrowLeft)
///             .bind("left", KeyCode::KeyA)
///             .bind("jump", KeyCode::Space)
///             .build(),
///     ),
/// )?;
/// controller.on_action(|event| println!("{event:?}"));
/// controller.attach(window.id());
///
/// // In the host's event handler
/// controller.process_window_event(&event);
///
/// // Anywhere in application code
/// if controller.is_action_active("jump") { /* ... */ }
/// ```
#[derive(Debug)]
pub struct InputController {
    sources: Vec<SourceEntry>,
    actions: HashMap<String, ActionState>,
    listeners: Listeners,
    enabled: bool,
    focused: bool,
    target: Option<TargetId>,
}

impl Default for InputController {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            actions: HashMap::new(),
            listeners: Listeners::default(),
            enabled: true,
            focused: true,
            target: None,
        }
    }
}

impl InputController {
    /// Create a new controller with no sources and no target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Action registry =====

    /// Register an action name. Registering a known name is a no-op.
    pub fn register_action(&mut self, name: impl Into<String>) {
        self.actions.entry(name.into()).or_insert(ActionState {
            active: false,
            enabled: true,
        });
    }

    /// Report a new aggregated state for an action.
    ///
    /// This is the edge detector: on a value change the cached state is
    /// updated and exactly one notification fires; redundant reports are
    /// strict no-ops. Unknown names are registered on the fly. While no
    /// target is attached the cache still updates but nothing is emitted.
    pub fn set_action_state(&mut self, name: &str, active: bool) {
        if !self.actions.contains_key(name) {
            self.register_action(name);
        }
        let Some(state) = self.actions.get_mut(name) else {
            return;
        };
        if state.active == active {
            return;
        }
        state.active = active;

        let transition = if active {
            ActionTransition::Activated
        } else {
            ActionTransition::Deactivated
        };
        debug!(action = name, ?transition, "action transition");
        if self.target.is_some() {
            self.listeners.emit(&ActionEvent {
                action: name.to_string(),
                transition,
            });
        }
    }

    /// Returns `true` if the action is currently active.
    ///
    /// Unknown names return `false`. While the controller is disabled or the
    /// target is unfocused, every action reports inactive.
    #[must_use]
    pub fn is_action_active(&self, name: &str) -> bool {
        self.enabled
            && self.focused
            && self
                .actions
                .get(name)
                .is_some_and(|state| state.enabled && state.active)
    }

    /// Enable one action. Re-activates immediately if a bound input is held.
    pub fn enable_action(&mut self, name: &str) {
        let Some(state) = self.actions.get_mut(name) else {
            return;
        };
        if state.enabled {
            return;
        }
        state.enabled = true;
        debug!(action = name, "action enabled");
        self.recompute_action(name);
    }

    /// Disable one action. An active action deactivates with one
    /// notification; source-level pressed state is untouched.
    pub fn disable_action(&mut self, name: &str) {
        let Some(state) = self.actions.get_mut(name) else {
            return;
        };
        if !state.enabled {
            return;
        }
        state.enabled = false;
        let was_active = state.active;
        debug!(action = name, "action disabled");
        if was_active {
            self.set_action_state(name, false);
        }
    }

    // ===== Sources =====

    /// Register a source under a unique name.
    ///
    /// The source's declared actions are registered and recomputed, so a
    /// binding declared before registration counts immediately.
    pub fn add_source(
        &mut self,
        name: impl Into<String>,
        source: impl InputSource + 'static,
    ) -> Result<()> {
        let name = name.into();
        if self.source_index(&name).is_some() {
            warn!(source = %name, "source already registered");
            return Err(Error::DuplicateSource(name));
        }

        let affected = source.declared_actions();
        for action in &affected {
            self.register_action(action.clone());
        }
        self.sources.push(SourceEntry {
            name: name.clone(),
            source: Box::new(source),
        });
        info!(source = %name, "source added");

        for action in &affected {
            self.recompute_action(action);
        }
        Ok(())
    }

    /// Remove a source, releasing it. Every action it declared is
    /// recomputed, since it may have been the only active contributor.
    ///
    /// Returns `false` if no source has that name.
    pub fn remove_source(&mut self, name: &str) -> bool {
        let Some(index) = self.source_index(name) else {
            return false;
        };
        let entry = self.sources.remove(index);
        let affected = entry.source.declared_actions();
        drop(entry);
        info!(source = %name, "source removed");

        for action in &affected {
            self.recompute_action(action);
        }
        true
    }

    /// Returns `true` if a source is registered under this name.
    #[must_use]
    pub fn has_source(&self, name: &str) -> bool {
        self.source_index(name).is_some()
    }

    /// Returns the source's enable flag, or `None` for unknown names.
    #[must_use]
    pub fn source_enabled(&self, name: &str) -> Option<bool> {
        self.source_index(name)
            .map(|index| self.sources[index].source.enabled())
    }

    /// Enable or disable one source. Its actions are recomputed, so other
    /// sources' contributions keep counting.
    pub fn set_source_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let index = self
            .source_index(name)
            .ok_or_else(|| Error::UnknownSource(name.to_string()))?;
        let affected = self.sources[index].source.set_enabled(enabled);
        for action in &affected {
            self.recompute_action(action);
        }
        Ok(())
    }

    /// Merge a declarative binding map into the named source.
    ///
    /// Additive: new ids union with previously bound ones.
    pub fn bind_actions(&mut self, name: &str, bindings: BindingMap) -> Result<()> {
        let index = self
            .source_index(name)
            .ok_or_else(|| Error::UnknownSource(name.to_string()))?;
        let touched = self.sources[index].source.bind_actions(bindings);
        for action in &touched {
            self.register_action(action.clone());
        }
        for action in &touched {
            self.recompute_action(action);
        }
        Ok(())
    }

    // ===== Raw input =====

    /// Route a host window event to every source.
    ///
    /// Focus transitions are handled here; other events are dropped unless
    /// the controller is attached, enabled, and focused. Returns `true` if
    /// the event affected at least one action.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        if self.target.is_none() {
            return false;
        }
        if let WindowEvent::Focused(focused) = event {
            if *focused {
                self.handle_focus();
            } else {
                self.handle_blur();
            }
            return true;
        }
        if !self.enabled || !self.focused {
            return false;
        }

        let mut affected = Vec::new();
        for entry in &mut self.sources {
            affected.extend(entry.source.handle_event(event));
        }
        if affected.is_empty() {
            return false;
        }
        affected.sort_unstable();
        affected.dedup();
        for action in &affected {
            self.recompute_action(action);
        }
        true
    }

    /// Feed a synthetic raw press to the named source.
    ///
    /// The entry point for custom drivers and tests; gated exactly like the
    /// window-event path.
    pub fn press_raw(&mut self, source: &str, raw: impl Into<RawInput>) -> Result<()> {
        self.route_raw(source, raw.into(), true)
    }

    /// Feed a synthetic raw release to the named source.
    pub fn release_raw(&mut self, source: &str, raw: impl Into<RawInput>) -> Result<()> {
        self.route_raw(source, raw.into(), false)
    }

    fn route_raw(&mut self, source: &str, raw: RawInput, pressed: bool) -> Result<()> {
        let index = self
            .source_index(source)
            .ok_or_else(|| Error::UnknownSource(source.to_string()))?;
        if self.target.is_none() || !self.enabled || !self.focused {
            return Ok(());
        }
        let entry = &mut self.sources[index];
        let affected = if pressed {
            entry.source.press(raw)
        } else {
            entry.source.release(raw)
        };
        for action in &affected {
            self.recompute_action(action);
        }
        Ok(())
    }

    // ===== Target lifecycle =====

    /// Attach to a host surface. Re-attaching to the same target is a no-op;
    /// a different target detaches the previous one first.
    ///
    /// The controller starts out assuming the target is focused; the first
    /// `Focused` event the host forwards corrects this if the surface is
    /// actually unfocused.
    pub fn attach(&mut self, target: impl Into<TargetId>) {
        let target = target.into();
        if self.target == Some(target) {
            return;
        }
        if self.target.is_some() {
            self.detach();
        }
        self.target = Some(target);
        info!(?target, "controller attached");
        self.recompute_all();
    }

    /// Detach from the host surface.
    ///
    /// Pressed state is cleared and cached action states settle to inactive
    /// without emitting; detached is a legitimate lifecycle state, not an
    /// error.
    pub fn detach(&mut self) {
        if self.target.take().is_none() {
            return;
        }
        for entry in &mut self.sources {
            entry.source.clear_pressed();
        }
        // Focus events for a detached target never arrive, so the flag would
        // go stale; restore the default for the next attach
        self.focused = true;
        self.recompute_all();
        info!("controller detached");
    }

    /// Returns the attached target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<TargetId> {
        self.target
    }

    // ===== Enable / focus gates =====

    /// Returns `true` if the controller is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the whole controller.
    ///
    /// Disabling deactivates every active action (one notification each)
    /// while preserving source pressed state; re-enabling recomputes, so a
    /// still-held input re-activates immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        info!(enabled, "controller enable toggled");
        if enabled {
            self.recompute_all();
        } else {
            self.deactivate_all();
        }
    }

    /// Returns `true` if the attached target has focus.
    ///
    /// Driven by the environment's focus/blur signal; there is no setter.
    #[must_use]
    pub const fn focused(&self) -> bool {
        self.focused
    }

    fn handle_focus(&mut self) {
        self.focused = true;
        debug!("target gained focus");
        // Pressed sets were cleared on blur, so nothing re-activates here
        self.recompute_all();
    }

    fn handle_blur(&mut self) {
        self.focused = false;
        debug!("target lost focus");
        self.deactivate_all();
        // A key released while unfocused would otherwise stay stuck pressed
        for entry in &mut self.sources {
            entry.source.clear_pressed();
        }
    }

    // ===== Listeners =====

    /// Register a transition listener. Listeners run synchronously inside
    /// the call that flips the action state.
    pub fn on_action(&mut self, listener: impl FnMut(&ActionEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if the id is unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ===== Teardown =====

    /// Detach and drop all sources, actions, and listeners.
    pub fn clear(&mut self) {
        self.detach();
        self.sources.clear();
        self.actions.clear();
        self.listeners.clear();
        info!("controller cleared");
    }

    // ===== Aggregation =====

    /// OR-reduce source contributions for one action and feed the result
    /// into the edge detector.
    ///
    /// Gated the same way as [`is_action_active`](Self::is_action_active): a
    /// disabled action, a disabled controller, or an unfocused target all
    /// aggregate to inactive. Registry mutations that recompute while gated
    /// therefore settle the cache to false instead of leaking an activation,
    /// and the activation edge fires from the recompute on re-enable/refocus.
    fn recompute_action(&mut self, name: &str) {
        let enabled = self.actions.get(name).map_or(true, |state| state.enabled);
        let active = self.enabled
            && self.focused
            && enabled
            && self
                .sources
                .iter()
                .any(|entry| entry.source.contributes(name));
        self.set_action_state(name, active);
    }

    fn recompute_all(&mut self) {
        let names: Vec<String> = self.actions.keys().cloned().collect();
        for name in &names {
            self.recompute_action(name);
        }
    }

    fn deactivate_all(&mut self) {
        let active: Vec<String> = self
            .actions
            .iter()
            .filter(|(_, state)| state.active)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &active {
            self.set_action_state(name, false);
        }
    }

    fn source_index(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use winit::keyboard::KeyCode;

    use super::*;
    use crate::binding::BindingMapBuilder;
    use crate::keyboard::KeyboardSource;
    use crate::mouse::{MouseButton, MouseSource};

    type EventLog = Rc<RefCell<Vec<ActionEvent>>>;

    fn recording_controller() -> (InputController, EventLog) {
        let mut controller = InputController::new();
        let events: EventLog = Rc::default();
        let sink = Rc::clone(&events);
        controller.on_action(move |event| sink.borrow_mut().push(event.clone()));
        (controller, events)
    }

    fn keyboard(bind: &str, key: KeyCode) -> KeyboardSource {
        KeyboardSource::with_bindings(BindingMapBuilder::new().bind(bind, key).build())
    }

    #[test]
    fn edge_triggered_notifications() {
        let (mut controller, events) = recording_controller();
        controller.attach(1u64);

        controller.set_action_state("jump", true);
        controller.set_action_state("jump", true);
        controller.set_action_state("jump", true);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].transition, ActionTransition::Activated);

        controller.set_action_state("jump", false);
        controller.set_action_state("jump", false);
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(events.borrow()[1].transition, ActionTransition::Deactivated);
    }

    #[test]
    fn unknown_action_is_inactive() {
        let controller = InputController::new();
        assert!(!controller.is_action_active("does-not-exist"));
    }

    #[test]
    fn or_aggregation_across_sources() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("left", KeyCode::KeyA))
            .unwrap();
        controller
            .add_source(
                "mouse",
                MouseSource::with_bindings(
                    BindingMapBuilder::new().bind("left", MouseButton::Left).build(),
                ),
            )
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::KeyA).unwrap();
        assert!(controller.is_action_active("left"));
        controller.press_raw("mouse", MouseButton::Left).unwrap();
        assert!(controller.is_action_active("left"));
        // Second contributor arriving does not re-activate
        assert_eq!(events.borrow().len(), 1);

        controller.release_raw("keyboard", KeyCode::KeyA).unwrap();
        assert!(controller.is_action_active("left"));
        controller.release_raw("mouse", MouseButton::Left).unwrap();
        assert!(!controller.is_action_active("left"));
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn disable_forces_deactivation_and_reenable_resumes() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));

        controller.set_enabled(false);
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(events.borrow()[1].transition, ActionTransition::Deactivated);

        // Key is still physically held; pressed state survived the disable
        controller.set_enabled(true);
        assert!(controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 3);
        assert_eq!(events.borrow()[2].transition, ActionTransition::Activated);
    }

    #[test]
    fn blur_deactivates_and_clears_pressed() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert_eq!(events.borrow().len(), 1);

        controller.handle_blur();
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        // Late up event for a key released while unfocused
        controller.release_raw("keyboard", KeyCode::Space).unwrap();
        assert_eq!(events.borrow().len(), 2);

        controller.handle_focus();
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        // A fresh down edge is required after refocus
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 3);
    }

    #[test]
    fn events_while_disabled_are_dropped() {
        let (mut controller, _events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.set_enabled(false);
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        controller.set_enabled(true);
        // The press never reached the source, so nothing resumes
        assert!(!controller.is_action_active("jump"));
    }

    #[test]
    fn multi_action_single_raw_id() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source(
                "keyboard",
                KeyboardSource::with_bindings(
                    BindingMapBuilder::new()
                        .bind("jump", KeyCode::Space)
                        .bind("confirm", KeyCode::Space)
                        .build(),
                ),
            )
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));
        assert!(controller.is_action_active("confirm"));
        assert_eq!(events.borrow().len(), 2);

        controller.release_raw("keyboard", KeyCode::Space).unwrap();
        assert!(!controller.is_action_active("jump"));
        assert!(!controller.is_action_active("confirm"));
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn duplicate_source_rejected_without_mutation() {
        let mut controller = InputController::new();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();

        let err = controller
            .add_source("keyboard", keyboard("other", KeyCode::KeyO))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSource(_)));
        assert!(controller.has_source("keyboard"));
        assert!(!controller.is_action_active("other"));
    }

    #[test]
    fn removing_only_contributor_deactivates() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));

        assert!(controller.remove_source("keyboard"));
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        assert!(!controller.remove_source("keyboard"));
    }

    #[test]
    fn detach_suppresses_emissions_and_clears_state() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert_eq!(events.borrow().len(), 1);

        controller.detach();
        assert!(!controller.is_action_active("jump"));
        // Deactivation while detached is silent
        assert_eq!(events.borrow().len(), 1);

        // Detached controller ignores raw input
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(!controller.is_action_active("jump"));

        controller.attach(2u64);
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn reattach_same_target_is_idempotent() {
        let mut controller = InputController::new();
        controller.attach(7u64);
        controller.attach(7u64);
        assert_eq!(controller.target(), Some(TargetId::from(7u64)));
    }

    #[test]
    fn action_disable_and_reenable() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        controller.disable_action("jump");
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        // The binding still tracks the held key; re-enabling resumes
        controller.enable_action("jump");
        assert!(controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 3);

        // Enabling an already-enabled action is a no-op
        controller.enable_action("jump");
        assert_eq!(events.borrow().len(), 3);
    }

    #[test]
    fn disabled_action_ignores_new_presses() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.register_action("jump");
        controller.disable_action("jump");
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(!controller.is_action_active("jump"));
        assert!(events.borrow().is_empty());

        controller.enable_action("jump");
        assert!(controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn source_toggle_recomputes_affected_actions() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        controller.set_source_enabled("keyboard", false).unwrap();
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(controller.source_enabled("keyboard"), Some(false));

        // Source disable dropped its pressed state; enabling does not resume
        controller.set_source_enabled("keyboard", true).unwrap();
        assert!(!controller.is_action_active("jump"));

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));

        assert!(matches!(
            controller.set_source_enabled("gamepad", true),
            Err(Error::UnknownSource(_))
        ));
    }

    #[test]
    fn bind_actions_after_registration() {
        let (mut controller, _events) = recording_controller();
        controller.add_source("keyboard", KeyboardSource::new()).unwrap();
        controller.attach(1u64);

        controller
            .bind_actions(
                "keyboard",
                BindingMapBuilder::new().bind("jump", KeyCode::Space).build(),
            )
            .unwrap();
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));

        assert!(matches!(
            controller.bind_actions("gamepad", BindingMap::new()),
            Err(Error::UnknownSource(_))
        ));
    }

    #[test]
    fn listener_removal_stops_delivery() {
        let mut controller = InputController::new();
        let events: EventLog = Rc::default();
        let sink = Rc::clone(&events);
        let id = controller.on_action(move |event| sink.borrow_mut().push(event.clone()));
        controller.attach(1u64);

        controller.set_action_state("jump", true);
        assert_eq!(events.borrow().len(), 1);

        assert!(controller.remove_listener(id));
        controller.set_action_state("jump", false);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn clear_tears_everything_down() {
        let (mut controller, _events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);
        controller.press_raw("keyboard", KeyCode::Space).unwrap();

        controller.clear();
        assert!(controller.target().is_none());
        assert!(!controller.has_source("keyboard"));
        assert!(!controller.is_action_active("jump"));
    }

    #[test]
    fn focus_events_route_through_window_event_path() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.process_window_event(&WindowEvent::Focused(false)));
        assert!(!controller.focused());
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        assert!(controller.process_window_event(&WindowEvent::Focused(true)));
        assert!(controller.focused());
        assert!(!controller.is_action_active("jump"));
    }

    #[test]
    fn registry_mutations_while_disabled_stay_silent() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        controller.set_enabled(false);
        assert_eq!(events.borrow().len(), 2);

        // Rebinding the held key while disabled must not leak an activation
        controller
            .bind_actions(
                "keyboard",
                BindingMapBuilder::new().bind("jump", KeyCode::Space).build(),
            )
            .unwrap();
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        // Neither may an action enable round trip or a source toggle
        controller.disable_action("jump");
        controller.enable_action("jump");
        controller.set_source_enabled("keyboard", false).unwrap();
        controller.set_source_enabled("keyboard", true).unwrap();
        assert_eq!(events.borrow().len(), 2);

        // The activation edge belongs to the re-enable, exactly once. The
        // source toggle above dropped its pressed state, so hold the key
        // again through a fresh enabled window first.
        controller.set_enabled(true);
        assert_eq!(events.borrow().len(), 2);
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        controller.set_enabled(false);
        assert_eq!(events.borrow().len(), 4);

        controller.set_enabled(true);
        assert!(controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 5);
        assert_eq!(events.borrow()[4].transition, ActionTransition::Activated);
    }

    #[test]
    fn registry_mutations_while_unfocused_stay_silent() {
        let (mut controller, events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        controller.handle_blur();
        assert_eq!(events.borrow().len(), 2);

        controller
            .bind_actions(
                "keyboard",
                BindingMapBuilder::new().bind("jump", KeyCode::Space).build(),
            )
            .unwrap();
        controller.disable_action("jump");
        controller.enable_action("jump");
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);

        // Blur cleared the pressed set, so refocus does not re-activate
        controller.handle_focus();
        assert!(!controller.is_action_active("jump"));
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn detach_resets_focus_gate() {
        let (mut controller, _events) = recording_controller();
        controller
            .add_source("keyboard", keyboard("jump", KeyCode::Space))
            .unwrap();
        controller.attach(1u64);

        controller.process_window_event(&WindowEvent::Focused(false));
        assert!(!controller.focused());
        controller.detach();
        assert!(controller.focused());

        // A fresh attach starts from the default gate state
        controller.attach(2u64);
        controller.press_raw("keyboard", KeyCode::Space).unwrap();
        assert!(controller.is_action_active("jump"));
    }
}
