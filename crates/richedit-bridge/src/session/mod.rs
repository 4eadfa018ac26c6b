//! One bridge session per embedded surface.
//!
//! `BridgeSession` owns the request slot, listener lists, height and
//! lifecycle for one surface. Nothing is shared between sessions. Timer
//! tasks hold a `Weak` reference, so dropping every handle to a session
//! stops them as surely as `dispose()` does.

mod handler;
mod options;

use std::sync::Arc;

use richedit_common::BridgeError;
use serde_json::Value;
use tracing::{debug, info};

use crate::codec::{self, Command};
use crate::correlator::{ContentHtmlRequest, RequestCorrelator};
use crate::diagnostics::DiagnosticsSink;
use crate::dispatch::{self, DispatchOutcome};
use crate::height::HeightSynchronizer;
use crate::lifecycle::{LifecycleController, LifecycleState};
use crate::subscriptions::SubscriptionRegistry;
use crate::transport::Transport;

pub use options::{Callback, SessionOptions};

pub(crate) struct SessionInner {
    transport: Arc<dyn Transport>,
    initial_content: String,
    min_height: f64,
    on_initialized: Option<Callback>,
    pub(crate) diagnostics: Arc<dyn DiagnosticsSink>,
    pub(crate) lifecycle: LifecycleController,
    pub(crate) correlator: Arc<RequestCorrelator>,
    pub(crate) subscriptions: SubscriptionRegistry,
    pub(crate) height: HeightSynchronizer,
}

impl SessionInner {
    /// Encode and send unless disposed. Returns whether it was sent.
    fn send(&self, command: Command) -> bool {
        if self.lifecycle.is_disposed() {
            debug!(?command, "command dropped: session disposed");
            return false;
        }
        self.transport.send(codec::encode(&command));
        true
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.lifecycle.dispose();
        self.correlator.cancel();
    }
}

/// Handle to a bridge session. Clones share the same session.
///
/// Listeners that capture a clone form a reference cycle: the session and
/// its height poll stay alive until `dispose()`, which drops every
/// registered listener. Capture a clone only if `dispose()` is guaranteed.
#[derive(Clone)]
pub struct BridgeSession {
    inner: Arc<SessionInner>,
}

impl BridgeSession {
    pub fn new(transport: impl Transport, options: SessionOptions) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                transport: Arc::new(transport),
                initial_content: options.initial_content,
                min_height: options.min_height,
                on_initialized: options.on_initialized,
                diagnostics: options.diagnostics,
                lifecycle: LifecycleController::new(options.height_poll_interval),
                correlator: Arc::new(RequestCorrelator::new(options.request_timeout)),
                subscriptions: SubscriptionRegistry::new(),
                height: HeightSynchronizer::new(options.on_height_change),
            }),
        }
    }

    // -- Transport side ------------------------------------------------------

    /// The surface finished loading.
    ///
    /// Sends the initial content, runs the `on_initialized` callback and
    /// starts the `updateHeight` poll. Only the first signal counts.
    /// Must be called inside a tokio runtime.
    pub fn surface_loaded(&self) {
        let inner = &self.inner;
        if !inner.lifecycle.begin_initializing() {
            debug!(state = ?inner.lifecycle.state(), "load signal ignored");
            return;
        }

        inner.send(Command::SetHtml(inner.initial_content.clone()));
        if let Some(on_initialized) = &inner.on_initialized {
            on_initialized();
        }

        let weak = Arc::downgrade(inner);
        inner.lifecycle.start_height_poll(move || {
            weak.upgrade()
                .is_some_and(|inner| inner.send(Command::UpdateHeight))
        });

        if inner.lifecycle.mark_ready() {
            info!(
                poll_ms = inner.lifecycle.poll_interval().as_millis() as u64,
                "surface initialized"
            );
        }
    }

    /// Feed one inbound string from the transport.
    pub fn handle_message(&self, raw: &str) -> DispatchOutcome {
        if self.inner.lifecycle.is_disposed() {
            debug!(body_len = raw.len(), "inbound message discarded: session disposed");
            return DispatchOutcome::Ignored(BridgeError::Disposed);
        }
        dispatch::dispatch(raw, self.inner.as_ref())
    }

    // -- Public API ----------------------------------------------------------

    pub fn register_selection_listener<F>(&self, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if self.inner.lifecycle.is_disposed() {
            return;
        }
        self.inner.subscriptions.register_selection_listener(listener);
    }

    pub fn register_focus_listener<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.inner.lifecycle.is_disposed() {
            return;
        }
        self.inner.subscriptions.register_focus_listener(listener);
    }

    pub fn set_content_html(&self, html: impl Into<String>) {
        self.inner.send(Command::SetHtml(html.into()));
    }

    /// Ask the surface for its content.
    ///
    /// Rejects with `Timeout` if no response arrives in time, `Superseded`
    /// if another request is issued first, or `Disposed`.
    /// Must be called inside a tokio runtime.
    pub fn get_content_html(&self) -> ContentHtmlRequest {
        if self.inner.lifecycle.is_disposed() {
            return ContentHtmlRequest::rejected(BridgeError::Disposed);
        }
        let request = self.inner.correlator.begin();
        self.inner.send(Command::PostHtml);
        request
    }

    pub fn blur(&self) {
        self.inner.send(Command::Blur);
    }

    pub fn focus(&self) {
        self.inner.send(Command::Focus);
    }

    /// Insert an image; `attributes` go to the surface as-is.
    pub fn insert_image(&self, attributes: Value) {
        self.inner.send(Command::InsertImage(attributes));
    }

    /// Stop the poll, reject a pending request and drop all listeners.
    /// Later calls are no-ops.
    pub fn dispose(&self) {
        if !self.inner.lifecycle.dispose() {
            return;
        }
        self.inner.correlator.cancel();
        self.inner.subscriptions.clear();
        info!("session disposed");
    }

    // -- State ---------------------------------------------------------------

    pub fn state(&self) -> LifecycleState {
        self.inner.lifecycle.state()
    }

    /// Last height reported by the surface; 0 until the first report.
    pub fn height(&self) -> f64 {
        self.inner.height.current()
    }

    /// Height the host container should use: the reported height, or the
    /// configured minimum while the surface reports 0.
    pub fn display_height(&self) -> f64 {
        let height = self.height();
        if height == 0.0 {
            self.inner.min_height
        } else {
            height
        }
    }

    pub fn has_pending_request(&self) -> bool {
        self.inner.correlator.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelTransport;
    use std::time::Duration;

    #[test]
    fn starts_uninitialized_and_silent() {
        let (transport, mut rx) = ChannelTransport::new();
        let session = BridgeSession::new(transport, SessionOptions::new("<p>a</p>"));
        assert_eq!(session.state(), LifecycleState::Uninitialized);
        assert_eq!(session.height(), 0.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn display_height_falls_back_to_minimum() {
        let (transport, _rx) = ChannelTransport::new();
        let session = BridgeSession::new(transport, SessionOptions::default().min_height(120.0));
        assert_eq!(session.display_height(), 120.0);

        session.handle_message(r#"{"tag":"OFFSET_HEIGHT","data":48}"#);
        assert_eq!(session.display_height(), 48.0);
    }

    #[test]
    fn commands_before_load_are_forwarded() {
        let (transport, mut rx) = ChannelTransport::new();
        let session = BridgeSession::new(transport, SessionOptions::default());
        session.blur();
        assert_eq!(rx.try_recv().unwrap(), r#"{"tag":"content","name":"blur"}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_breaks_listener_cycle_and_stops_poll() {
        let (transport, mut rx) = ChannelTransport::new();
        let session = BridgeSession::new(transport, SessionOptions::default());
        let captured = session.clone();
        session.register_focus_listener(move || captured.blur());
        session.surface_loaded();
        let weak = Arc::downgrade(&session.inner);

        tokio::time::sleep(Duration::from_millis(450)).await;
        while rx.try_recv().is_ok() {}

        session.dispose();
        drop(session);
        assert!(weak.upgrade().is_none());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dispose_is_idempotent() {
        let (transport, _rx) = ChannelTransport::new();
        let session = BridgeSession::new(transport, SessionOptions::default());
        session.dispose();
        session.dispose();
        assert_eq!(session.state(), LifecycleState::Disposed);
    }
}
