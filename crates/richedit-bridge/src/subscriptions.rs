//! Selection and focus listener lists.
//!
//! Lists are append-only. A fan-out iterates a snapshot taken when it
//! starts, so listeners registered from inside a listener run from the
//! next event on. Each listener runs under `catch_unwind`: a panicking
//! listener is logged and the rest of the fan-out continues.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::warn;

use crate::sync::lock;

pub type SelectionListener = dyn Fn(&Value) + Send + Sync;
pub type FocusListener = dyn Fn() + Send + Sync;

#[derive(Default)]
pub struct SubscriptionRegistry {
    selection: Mutex<Vec<Arc<SelectionListener>>>,
    focus: Mutex<Vec<Arc<FocusListener>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_selection_listener<F>(&self, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        lock(&self.selection).push(Arc::new(listener));
    }

    pub fn register_focus_listener<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.focus).push(Arc::new(listener));
    }

    /// Invoke every selection listener in registration order.
    /// Returns how many completed without panicking.
    pub fn fire_selection_change(&self, state: &Value) -> usize {
        let snapshot = lock(&self.selection).clone();
        let mut completed = 0;
        for (index, listener) in snapshot.iter().enumerate() {
            if invoke_isolated("selection", index, || listener(state)) {
                completed += 1;
            }
        }
        completed
    }

    /// Invoke every focus listener in registration order.
    /// Returns how many completed without panicking.
    pub fn fire_focus(&self) -> usize {
        let snapshot = lock(&self.focus).clone();
        let mut completed = 0;
        for (index, listener) in snapshot.iter().enumerate() {
            if invoke_isolated("focus", index, || listener()) {
                completed += 1;
            }
        }
        completed
    }

    pub fn selection_listener_count(&self) -> usize {
        lock(&self.selection).len()
    }

    pub fn focus_listener_count(&self) -> usize {
        lock(&self.focus).len()
    }

    /// Drop every listener. Releases whatever the closures captured.
    pub(crate) fn clear(&self) {
        lock(&self.selection).clear();
        lock(&self.focus).clear();
    }
}

fn invoke_isolated(stream: &'static str, index: usize, call: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(()) => true,
        Err(_) => {
            warn!(stream, index, "listener panicked; continuing fan-out");
            false
        }
    }
}
