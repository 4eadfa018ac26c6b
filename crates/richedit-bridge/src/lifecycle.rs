//! Load/init lifecycle and the periodic height poll.
//!
//! `Uninitialized -> Initializing -> Ready -> Disposed`. The poll task is
//! started while initializing and aborted on dispose. Aborting a finished
//! or already-aborted task is a no-op.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::sync::lock;

/// Default period of the `updateHeight` poll.
pub const DEFAULT_HEIGHT_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Waiting for the surface's load signal. Nothing has been sent.
    Uninitialized,
    /// Load signal received; initial content is being pushed.
    Initializing,
    /// Steady state; the height poll is running.
    Ready,
    /// Torn down. No commands leave and inbound messages are discarded.
    Disposed,
}

struct Inner {
    state: LifecycleState,
    poll: Option<JoinHandle<()>>,
}

pub struct LifecycleController {
    inner: Mutex<Inner>,
    poll_interval: Duration,
}

impl LifecycleController {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: LifecycleState::Uninitialized,
                poll: None,
            }),
            poll_interval,
        }
    }

    pub fn state(&self) -> LifecycleState {
        lock(&self.inner).state
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == LifecycleState::Disposed
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// `Uninitialized -> Initializing`. False from any other state.
    pub fn begin_initializing(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state != LifecycleState::Uninitialized {
            return false;
        }
        inner.state = LifecycleState::Initializing;
        debug!("lifecycle: initializing");
        true
    }

    /// `Initializing -> Ready`. Leaves `Disposed` alone.
    pub fn mark_ready(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state != LifecycleState::Initializing {
            return false;
        }
        inner.state = LifecycleState::Ready;
        debug!("lifecycle: ready");
        true
    }

    /// Start calling `tick` every poll interval, first call one interval
    /// from now. The poll stops when `tick` returns false or on dispose.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start_height_poll<F>(&self, tick: F) -> bool
    where
        F: Fn() -> bool + Send + 'static,
    {
        let mut inner = lock(&self.inner);
        if inner.state == LifecycleState::Disposed || inner.poll.is_some() {
            return false;
        }
        // `interval_at` panics on a zero period.
        let period = self.poll_interval.max(Duration::from_millis(1));
        inner.poll = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !tick() {
                    break;
                }
            }
        }));
        true
    }

    pub fn is_polling(&self) -> bool {
        lock(&self.inner)
            .poll
            .as_ref()
            .is_some_and(|poll| !poll.is_finished())
    }

    /// Enter `Disposed` and abort the poll. False if already disposed.
    pub fn dispose(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state == LifecycleState::Disposed {
            return false;
        }
        inner.state = LifecycleState::Disposed;
        if let Some(poll) = inner.poll.take() {
            poll.abort();
        }
        debug!("lifecycle: disposed");
        true
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if let Some(poll) = lock(&self.inner).poll.take() {
            poll.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_tick(count: &Arc<AtomicUsize>) -> impl Fn() -> bool + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn transitions_in_order() {
        let lifecycle = LifecycleController::new(DEFAULT_HEIGHT_POLL_INTERVAL);
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
        assert!(!lifecycle.mark_ready());

        assert!(lifecycle.begin_initializing());
        assert_eq!(lifecycle.state(), LifecycleState::Initializing);
        assert!(!lifecycle.begin_initializing());

        assert!(lifecycle.mark_ready());
        assert_eq!(lifecycle.state(), LifecycleState::Ready);
        assert!(!lifecycle.begin_initializing());

        assert!(lifecycle.dispose());
        assert!(lifecycle.is_disposed());
        assert!(!lifecycle.dispose());
    }

    #[test]
    fn dispose_during_initialization_sticks() {
        let lifecycle = LifecycleController::new(DEFAULT_HEIGHT_POLL_INTERVAL);
        lifecycle.begin_initializing();
        lifecycle.dispose();
        assert!(!lifecycle.mark_ready());
        assert_eq!(lifecycle.state(), LifecycleState::Disposed);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_ticks_every_interval() {
        let lifecycle = LifecycleController::new(DEFAULT_HEIGHT_POLL_INTERVAL);
        let count = Arc::new(AtomicUsize::new(0));
        assert!(lifecycle.start_height_poll(counting_tick(&count)));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert!(lifecycle.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_stops_poll() {
        let lifecycle = LifecycleController::new(DEFAULT_HEIGHT_POLL_INTERVAL);
        let count = Arc::new(AtomicUsize::new(0));
        lifecycle.start_height_poll(counting_tick(&count));

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        lifecycle.dispose();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!lifecycle.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_is_started_once() {
        let lifecycle = LifecycleController::new(DEFAULT_HEIGHT_POLL_INTERVAL);
        let count = Arc::new(AtomicUsize::new(0));
        assert!(lifecycle.start_height_poll(counting_tick(&count)));
        assert!(!lifecycle.start_height_poll(counting_tick(&count)));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_poll_after_dispose() {
        let lifecycle = LifecycleController::new(DEFAULT_HEIGHT_POLL_INTERVAL);
        lifecycle.dispose();
        let count = Arc::new(AtomicUsize::new(0));
        assert!(!lifecycle.start_height_poll(counting_tick(&count)));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_returning_false_ends_poll() {
        let lifecycle = LifecycleController::new(Duration::from_millis(10));
        lifecycle.start_height_poll(|| false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!lifecycle.is_polling());
    }
}
