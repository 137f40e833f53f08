//! Actions waiting on a collaborator
//!
//! Dispatch takes an [`ActionGuard`] for the action. Every continuation the
//! action hands off keeps a clone, and the action stays pending until the
//! last clone is dropped, whether its reply was sent or discarded.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::actions::Action;

#[derive(Debug, Clone, Default)]
pub struct PendingActions(Arc<Mutex<HashSet<Action>>>);

impl PendingActions {
    fn lock(&self) -> MutexGuard<'_, HashSet<Action>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `action` as running; `None` while an earlier run is unresolved
    pub fn begin(&self, action: Action) -> Option<ActionGuard> {
        if !self.lock().insert(action) {
            return None;
        }
        Some(ActionGuard(Arc::new(Held {
            action,
            pending: self.clone(),
        })))
    }

    pub fn contains(&self, action: Action) -> bool {
        self.lock().contains(&action)
    }
}

/// Keeps an action pending while any clone is alive
#[derive(Debug, Clone)]
pub struct ActionGuard(Arc<Held>);

#[derive(Debug)]
struct Held {
    action: Action,
    pending: PendingActions,
}

impl Drop for Held {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.action);
        debug!("{} resolved", self.action.name());
    }
}
