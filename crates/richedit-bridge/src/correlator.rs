//! Single-slot request/response correlation for `getContentHtml`.
//!
//! The surface answers `content/postHtml` with an untagged
//! `CONTENT_HTML_RESPONSE`, so at most one request can be matched at a
//! time. Each request owns a oneshot sender, which makes settlement
//! single-shot by construction, and a timeout task that rejects it with
//! `Timeout` if no response arrives.
//!
//! A second request while one is pending takes over the slot; the earlier
//! request is rejected with `Superseded` rather than left hanging.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use richedit_common::{BridgeError, Result};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::sync::lock;

/// Default time a request waits for its response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

// ---------------------------------------------------------------------------
// Request handle
// ---------------------------------------------------------------------------

/// Observable state of a request without awaiting it.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Pending,
    Resolved(String),
    Rejected(BridgeError),
}

/// Future returned by `get_content_html`. Resolves with the surface's
/// content or rejects with `Timeout`, `Superseded` or `Disposed`.
#[derive(Debug)]
pub struct ContentHtmlRequest {
    id: u64,
    reply: oneshot::Receiver<Result<String>>,
    outcome: Option<Result<String>>,
}

impl ContentHtmlRequest {
    fn pending(id: u64, reply: oneshot::Receiver<Result<String>>) -> Self {
        Self {
            id,
            reply,
            outcome: None,
        }
    }

    /// A request that was never sent; settles immediately with `error`.
    pub(crate) fn rejected(error: BridgeError) -> Self {
        let (_, reply) = oneshot::channel();
        Self {
            id: 0,
            reply,
            outcome: Some(Err(error)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Check for settlement without blocking.
    pub fn try_settlement(&mut self) -> Settlement {
        if self.outcome.is_none() {
            match self.reply.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(TryRecvError::Empty) => return Settlement::Pending,
                Err(TryRecvError::Closed) => self.outcome = Some(Err(BridgeError::Disposed)),
            }
        }
        match &self.outcome {
            Some(Ok(html)) => Settlement::Resolved(html.clone()),
            Some(Err(e)) => Settlement::Rejected(e.clone()),
            None => Settlement::Pending,
        }
    }
}

impl Future for ContentHtmlRequest {
    type Output = Result<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.outcome.take() {
            return Poll::Ready(outcome);
        }
        Pin::new(&mut self.reply)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(BridgeError::Disposed)))
    }
}

// ---------------------------------------------------------------------------
// Correlator
// ---------------------------------------------------------------------------

struct PendingRequest {
    id: u64,
    reply: oneshot::Sender<Result<String>>,
    timer: Option<JoinHandle<()>>,
}

impl PendingRequest {
    fn settle(mut self, outcome: Result<String>) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        // The caller may have dropped its request; nothing to deliver then.
        let _ = self.reply.send(outcome);
    }
}

pub struct RequestCorrelator {
    slot: Mutex<Option<PendingRequest>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl RequestCorrelator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Occupy the slot with a new request and arm its timeout.
    ///
    /// Must be called inside a tokio runtime.
    pub fn begin(self: &Arc<Self>) -> ContentHtmlRequest {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, receiver) = oneshot::channel();
        // Deadline is fixed here, not when the timer task first runs.
        let deadline = Instant::now() + self.timeout;
        let timer = tokio::spawn(expire_at(Arc::downgrade(self), id, deadline));

        let previous = lock(&self.slot).replace(PendingRequest {
            id,
            reply,
            timer: Some(timer),
        });
        if let Some(previous) = previous {
            debug!(
                superseded = previous.id,
                id, "content request superseded by a newer one"
            );
            previous.settle(Err(BridgeError::Superseded));
        }

        ContentHtmlRequest::pending(id, receiver)
    }

    /// Settle the pending request with the response payload.
    /// Returns false when no request was waiting.
    pub fn resolve(&self, html: String) -> bool {
        let pending = lock(&self.slot).take();
        match pending {
            Some(pending) => {
                debug!(id = pending.id, len = html.len(), "content request resolved");
                pending.settle(Ok(html));
                true
            }
            None => false,
        }
    }

    /// Reject the pending request with `Disposed` and cancel its timer.
    pub fn cancel(&self) -> bool {
        let pending = lock(&self.slot).take();
        match pending {
            Some(pending) => {
                pending.settle(Err(BridgeError::Disposed));
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Timer expiry for request `id`. No-op if that request already left
    /// the slot.
    fn expire(&self, id: u64) -> bool {
        let pending = {
            let mut slot = lock(&self.slot);
            match slot.as_ref() {
                Some(pending) if pending.id == id => slot.take(),
                _ => None,
            }
        };
        match pending {
            Some(mut pending) => {
                // Running on the timer task itself.
                pending.timer = None;
                debug!(id, "content request timed out");
                pending.settle(Err(BridgeError::Timeout(self.timeout)));
                true
            }
            None => false,
        }
    }
}

impl Drop for RequestCorrelator {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.slot).take() {
            pending.settle(Err(BridgeError::Disposed));
        }
    }
}

async fn expire_at(correlator: Weak<RequestCorrelator>, id: u64, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;
    if let Some(correlator) = correlator.upgrade() {
        correlator.expire(id);
    }
}
