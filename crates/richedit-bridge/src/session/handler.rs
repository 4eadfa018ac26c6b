//! Inbound handlers: where each dispatched tag lands in the session.

use serde_json::Value;
use tracing::debug;

use super::SessionInner;
use crate::dispatch::InboundHandler;

impl InboundHandler for SessionInner {
    fn content_html(&self, html: String) {
        if !self.correlator.resolve(html) {
            debug!("content response with no pending request dropped");
        }
    }

    fn log(&self, values: Vec<Value>) {
        self.diagnostics.log(&values);
    }

    fn selection_change(&self, state: Value) {
        let completed = self.subscriptions.fire_selection_change(&state);
        debug!(listeners = completed, "selection change delivered");
    }

    fn content_focused(&self) {
        self.subscriptions.fire_focus();
    }

    fn offset_height(&self, height: f64) {
        if self.height.update(height) {
            debug!(height, "surface height changed");
        }
    }
}
