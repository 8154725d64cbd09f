#![forbid(unsafe_code)]

//! Owning collection of weak subscriptions.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "tracing")]
use tracing::debug;

use super::proxy::ProxyHandle;

/// Holds [`ProxyHandle`]s and removes them together.
///
/// Dropping the group removes every subscription it still holds. A group
/// wrapped in an `Arc` can also be passed as the manager of the subscriptions
/// it owns, so they go stale together with the group even when the handles
/// were never pushed.
#[derive(Default)]
pub struct SubscriptionGroup {
    handles: Mutex<Vec<ProxyHandle>>,
}

impl SubscriptionGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProxyHandle>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take ownership of a subscription.
    ///
    /// Handles that were already removed, explicitly or because their
    /// subscriber went away, are dropped from the group first.
    pub fn push(&self, handle: ProxyHandle) {
        let mut handles = self.lock();
        handles.retain(|h| !h.is_removed());
        handles.push(handle);
    }

    /// Number of held subscriptions. Removed ones are counted until the next
    /// `push` or `remove_all`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the group holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every held subscription and empty the group.
    ///
    /// Returns how many handles were released.
    pub fn remove_all(&self) -> usize {
        // Unsubscribing calls back into publishers; do it outside the lock.
        let handles = std::mem::take(&mut *self.lock());
        for handle in &handles {
            handle.remove();
        }
        #[cfg(feature = "tracing")]
        debug!(count = handles.len(), "subscription group cleared");
        handles.len()
    }
}

impl Drop for SubscriptionGroup {
    fn drop(&mut self) {
        self.remove_all();
    }
}

impl fmt::Debug for SubscriptionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGroup")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Notify;
    use crate::weak_event::WeakEvent;
    use std::sync::Arc;

    #[derive(Default)]
    struct Publisher {
        tick: Notify<Publisher>,
    }

    fn add(publisher: &Arc<Publisher>) -> ProxyHandle {
        WeakEvent::no_args::<Publisher>()
            .publisher(publisher)
            .handler(|_, _| {})
            .subscribe(|p, h| p.tick.add(h))
            .unsubscribe(|p, h| {
                p.tick.remove(h);
            })
            .add()
            .unwrap()
    }

    #[test]
    fn remove_all_unsubscribes_everything() {
        let publisher = Arc::new(Publisher::default());
        let group = SubscriptionGroup::new();
        group.push(add(&publisher));
        group.push(add(&publisher));
        assert_eq!(publisher.tick.len(), 2);

        assert_eq!(group.remove_all(), 2);
        assert!(group.is_empty());
        assert!(publisher.tick.is_empty());
        assert_eq!(group.remove_all(), 0);
    }

    #[test]
    fn push_prunes_removed_handles() {
        let publisher = Arc::new(Publisher::default());
        let group = SubscriptionGroup::new();
        for _ in 0..1000 {
            let handle = add(&publisher);
            group.push(handle.clone());
            handle.remove();
        }
        assert!(publisher.tick.is_empty());
        assert_eq!(group.len(), 1);

        let live = add(&publisher);
        group.push(live.clone());
        assert_eq!(group.len(), 1);
        assert_eq!(group.remove_all(), 1);
        assert!(live.is_removed());
    }

    #[test]
    fn drop_unsubscribes() {
        let publisher = Arc::new(Publisher::default());
        let handle = add(&publisher);
        {
            let group = SubscriptionGroup::new();
            group.push(handle.clone());
            assert_eq!(group.len(), 1);
        }
        assert!(handle.is_removed());
        assert!(publisher.tick.is_empty());
    }
}
