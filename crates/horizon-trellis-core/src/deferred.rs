//! Single-assignment deferred values.
//!
//! A [`Deferred<T>`] represents a value that may arrive after the call that
//! requested it (a template file load, typically). Producers resolve it at
//! most once; consumers poll. There is no callback registration and no
//! blocking: the binding layer re-polls at its next natural opportunity
//! (the next render).

use std::sync::Arc;

use parking_lot::RwLock;

enum State<T> {
    Pending,
    Ready(T),
}

/// A shareable, single-assignment cell.
///
/// Clones share the same state: resolving through one handle is observed by
/// all of them. The first resolution wins; later calls are ignored.
///
/// # Example
///
/// ```
/// use horizon_trellis_core::Deferred;
///
/// let value: Deferred<i32> = Deferred::pending();
/// let reader = value.clone();
///
/// assert!(reader.is_pending());
/// assert!(value.resolve(7));
/// assert!(!value.resolve(8)); // first resolution wins
/// assert_eq!(reader.poll(), Some(7));
/// ```
pub struct Deferred<T> {
    state: Arc<RwLock<State<T>>>,
}

impl<T> Deferred<T> {
    /// Creates an unresolved deferred value.
    pub fn pending() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::Pending)),
        }
    }

    /// Creates an already-resolved deferred value.
    pub fn ready(value: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::Ready(value))),
        }
    }

    /// Resolves the value. Returns `false` if it was already resolved, in
    /// which case the new value is dropped.
    pub fn resolve(&self, value: T) -> bool {
        let mut state = self.state.write();
        match *state {
            State::Pending => {
                *state = State::Ready(value);
                true
            }
            State::Ready(_) => {
                tracing::trace!(
                    target: crate::logging::targets::CORE,
                    "deferred value already resolved; late resolution dropped"
                );
                false
            }
        }
    }

    /// Returns `true` while no value has been resolved.
    pub fn is_pending(&self) -> bool {
        matches!(*self.state.read(), State::Pending)
    }

    /// Accesses the resolved value through a closure without cloning.
    ///
    /// Returns `None` while pending.
    pub fn with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        match &*self.state.read() {
            State::Ready(value) => Some(f(value)),
            State::Pending => None,
        }
    }
}

impl<T: Clone> Deferred<T> {
    /// Returns a clone of the resolved value, or `None` while pending.
    pub fn poll(&self) -> Option<T> {
        self.with(T::clone)
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("pending", &self.is_pending())
            .finish()
    }
}

static_assertions::assert_impl_all!(Deferred<String>: Send, Sync);
