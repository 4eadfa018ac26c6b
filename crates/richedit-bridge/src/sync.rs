use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock ignoring poison. Listeners run outside every lock, so a poisoned
/// guard never holds half-written state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
