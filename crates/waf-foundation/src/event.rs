#![forbid(unsafe_code)]

//! Publisher-side handler lists.
//!
//! # Design
//!
//! [`EventSource<H>`] stores its handlers as a copy-on-write list
//! (`Mutex<Arc<Vec<Arc<H>>>>`). Raising an event clones the outer `Arc`
//! under the lock, releases the lock, and walks the snapshot. Handlers may
//! therefore add or remove entries (including themselves) while the event is
//! being raised; the edit lands in a fresh list and is observed by the next
//! raise.
//!
//! | Operation  | Cost                                        |
//! |------------|---------------------------------------------|
//! | `raise()`  | one lock + one refcount bump, O(H) calls    |
//! | `add()`    | O(1) amortized, O(H) copy during a raise    |
//! | `remove()` | O(H)                                        |
//!
//! # Invariants
//!
//! 1. Handlers run in registration order.
//! 2. `remove()` drops the most recently added entry with the same identity,
//!    so adding the same handler twice needs two removals.
//! 3. The lock is never held while a handler runs.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handler shape carrying a sender and a payload.
pub type EventHandler<P, A> = dyn Fn(&P, &A) + Send + Sync;

/// Handler shape carrying only the sender.
pub type NotifyHandler<P> = dyn Fn(&P) + Send + Sync;

/// An event with a payload of type `A`, raised by a sender of type `P`.
pub type Event<P, A> = EventSource<EventHandler<P, A>>;

/// A payload-free notification raised by a sender of type `P`.
pub type Notify<P> = EventSource<NotifyHandler<P>>;

type HandlerList<H> = Arc<Vec<Arc<H>>>;

/// Ordered, identity-keyed list of event handlers.
pub struct EventSource<H: ?Sized> {
    handlers: Mutex<HandlerList<H>>,
}

impl<H: ?Sized> EventSource<H> {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Arc::new(Vec::new())),
        }
    }

    // A panicking handler never runs under the lock, so a poisoned list is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, HandlerList<H>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a handler.
    pub fn add(&self, handler: Arc<H>) {
        let mut handlers = self.lock();
        Arc::make_mut(&mut handlers).push(handler);
    }

    /// Remove the last entry that is the same allocation as `handler`.
    ///
    /// Returns `false` when no such entry exists.
    pub fn remove(&self, handler: &Arc<H>) -> bool {
        let mut handlers = self.lock();
        let Some(index) = handlers.iter().rposition(|h| Arc::ptr_eq(h, handler)) else {
            return false;
        };
        Arc::make_mut(&mut handlers).remove(index);
        true
    }

    /// Remove every handler.
    pub fn clear(&self) {
        *self.lock() = Arc::new(Vec::new());
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The current handler list. Later edits do not affect the snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Arc<H>>> {
        Arc::clone(&self.lock())
    }
}

impl<P, A> EventSource<EventHandler<P, A>> {
    /// Invoke every handler with `sender` and `args`.
    pub fn raise(&self, sender: &P, args: &A) {
        let handlers = self.snapshot();
        for handler in handlers.iter() {
            handler(sender, args);
        }
    }
}

impl<P> EventSource<NotifyHandler<P>> {
    /// Invoke every handler with `sender`.
    pub fn notify(&self, sender: &P) {
        let handlers = self.snapshot();
        for handler in handlers.iter() {
            handler(sender);
        }
    }
}

impl<H: ?Sized> Default for EventSource<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for EventSource<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("handler_count", &self.len())
            .finish()
    }
}
