//! Rendered-height state reported by the surface.

use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::sync::lock;

pub type HeightCallback = Arc<dyn Fn() + Send + Sync>;

/// Holds the last reported height and notifies on change.
///
/// The callback takes no arguments; read `current()` for the new value.
pub struct HeightSynchronizer {
    current: Mutex<f64>,
    on_change: Option<HeightCallback>,
}

impl HeightSynchronizer {
    pub fn new(on_change: Option<HeightCallback>) -> Self {
        Self {
            current: Mutex::new(0.0),
            on_change,
        }
    }

    pub fn current(&self) -> f64 {
        *lock(&self.current)
    }

    /// Store `height` if it differs from the current value and notify.
    /// Returns whether the value changed.
    pub fn update(&self, height: f64) -> bool {
        {
            let mut current = lock(&self.current);
            if *current == height {
                return false;
            }
            trace!(from = *current, to = height, "height changed");
            *current = height;
        }
        if let Some(on_change) = &self.on_change {
            on_change();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (HeightSynchronizer, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let sync = HeightSynchronizer::new(Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        (sync, count)
    }

    #[test]
    fn starts_at_zero() {
        let (sync, count) = counting();
        assert_eq!(sync.current(), 0.0);
        assert!(!sync.update(0.0));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn repeated_value_notifies_once() {
        let (sync, count) = counting();
        assert!(sync.update(340.0));
        assert!(!sync.update(340.0));
        assert_eq!(sync.current(), 340.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(sync.update(512.0));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn works_without_callback() {
        let sync = HeightSynchronizer::new(None);
        assert!(sync.update(10.0));
        assert_eq!(sync.current(), 10.0);
    }
}
