//! Edge-triggered action transition notifications.

use std::fmt;

/// Direction of an action state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTransition {
    /// The action went from inactive to active.
    Activated,
    /// The action went from active to inactive.
    Deactivated,
}

/// Notification payload for one action state change.
///
/// Exactly one of these is delivered per true state transition; redundant
/// state reports never produce an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    /// Name of the action that changed.
    pub action: String,
    /// Which way the state flipped.
    pub transition: ActionTransition,
}

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Per-controller listener registry.
///
/// Notifications are delivered synchronously to callbacks registered on the
/// owning controller; there is no shared global bus.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&ActionEvent)>)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: impl FnMut(&ActionEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: &ActionEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
