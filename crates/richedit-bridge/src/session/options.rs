use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use richedit_config::BridgeConfig;

use crate::correlator::DEFAULT_REQUEST_TIMEOUT;
use crate::diagnostics::{DiagnosticsSink, TracingDiagnostics};
use crate::lifecycle::DEFAULT_HEIGHT_POLL_INTERVAL;

pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Everything a `BridgeSession` is built from.
///
/// The session owns these callbacks for its whole life; `dispose()` does
/// not release them. A callback that captures a `BridgeSession` clone keeps
/// that session alive for good.
#[derive(Clone)]
pub struct SessionOptions {
    /// HTML pushed with `content/setHtml` when the surface loads.
    pub initial_content: String,
    /// Display height while the surface reports 0.
    pub min_height: f64,
    pub request_timeout: Duration,
    pub height_poll_interval: Duration,
    pub(crate) on_height_change: Option<Callback>,
    pub(crate) on_initialized: Option<Callback>,
    pub(crate) diagnostics: Arc<dyn DiagnosticsSink>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("initial_content_len", &self.initial_content.len())
            .field("min_height", &self.min_height)
            .field("request_timeout", &self.request_timeout)
            .field("height_poll_interval", &self.height_poll_interval)
            .field("on_height_change", &self.on_height_change.is_some())
            .field("on_initialized", &self.on_initialized.is_some())
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_content: String::new(),
            min_height: 200.0,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            height_poll_interval: DEFAULT_HEIGHT_POLL_INTERVAL,
            on_height_change: None,
            on_initialized: None,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl SessionOptions {
    pub fn new(initial_content: impl Into<String>) -> Self {
        Self {
            initial_content: initial_content.into(),
            ..Default::default()
        }
    }

    /// Content, minimum height and timings from a loaded config file.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            initial_content: config.session.initial_content.clone(),
            min_height: config.session.min_height,
            request_timeout: config.timing.request_timeout(),
            height_poll_interval: config.timing.height_poll_interval(),
            ..Default::default()
        }
    }

    /// Called with no arguments whenever the reported height changes.
    pub fn on_height_change<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_height_change = Some(Arc::new(callback));
        self
    }

    /// Called once, after the initial content has been sent.
    pub fn on_initialized<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_initialized = Some(Arc::new(callback));
        self
    }

    pub fn diagnostics(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.diagnostics = Arc::new(sink);
        self
    }

    pub fn min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn height_poll_interval(mut self, interval: Duration) -> Self {
        self.height_poll_interval = interval;
        self
    }
}
