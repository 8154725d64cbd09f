#![forbid(unsafe_code)]

//! Proxy state and the handle used to cancel a weak subscription.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

#[cfg(feature = "tracing")]
use tracing::trace;

/// Callback that unregisters a forwarding handler from its publisher.
pub(crate) type Unsubscribe<P, H> = Box<dyn Fn(&P, &Arc<H>) + Send + Sync>;

/// Mediator between one publisher and one forwarding handler.
///
/// The publisher owns the forwarding handler, and the handler owns this
/// proxy. The proxy only points back at both weakly.
pub(crate) struct WeakEventProxy<P, H: ?Sized> {
    removed: AtomicBool,
    publisher: Weak<P>,
    forwarder: OnceLock<Weak<H>>,
    unsubscribe: Unsubscribe<P, H>,
}

impl<P, H: ?Sized> WeakEventProxy<P, H> {
    pub(crate) fn new(publisher: &Arc<P>, unsubscribe: Unsubscribe<P, H>) -> Self {
        Self {
            removed: AtomicBool::new(false),
            publisher: Arc::downgrade(publisher),
            forwarder: OnceLock::new(),
            unsubscribe,
        }
    }

    /// Record the handler handed to the publisher. Only the first call wins.
    pub(crate) fn bind(&self, forwarder: &Arc<H>) {
        let _ = self.forwarder.set(Arc::downgrade(forwarder));
    }
}

/// Type-erased view of a proxy.
pub(crate) trait Detach: Send + Sync {
    /// Unregister the forwarding handler. Returns `true` only for the call
    /// that performed the transition to removed.
    fn detach(&self) -> bool;

    fn is_removed(&self) -> bool;
}

impl<P, H> Detach for WeakEventProxy<P, H>
where
    P: Send + Sync,
    H: ?Sized + Send + Sync,
{
    fn detach(&self) -> bool {
        if self.removed.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Either side may already be gone; then there is nothing to unhook.
        if let Some(publisher) = self.publisher.upgrade() {
            if let Some(forwarder) = self.forwarder.get().and_then(Weak::upgrade) {
                (self.unsubscribe)(&publisher, &forwarder);
            }
        }
        true
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }
}

/// Handle to a weak subscription.
///
/// Cloning yields another handle to the same subscription. Dropping a handle
/// does not unsubscribe: the subscription stays registered until
/// [`ProxyHandle::remove`] is called or its subscriber (or manager) is
/// dropped and the publisher raises again.
#[derive(Clone)]
pub struct ProxyHandle {
    proxy: Arc<dyn Detach>,
}

impl ProxyHandle {
    pub(crate) fn new(proxy: Arc<dyn Detach>) -> Self {
        Self { proxy }
    }

    /// Unregister the subscription from its publisher.
    ///
    /// Only the first call, across all clones and threads, reaches the
    /// publisher. Later calls are no-ops.
    pub fn remove(&self) {
        if self.proxy.detach() {
            #[cfg(feature = "tracing")]
            trace!("weak event proxy removed");
        }
    }

    /// Whether the subscription has been removed, explicitly or because its
    /// subscriber went away.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.proxy.is_removed()
    }

    /// Whether both handles refer to the same subscription.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.proxy, &other.proxy)
    }
}

impl fmt::Debug for ProxyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyHandle")
            .field("removed", &self.is_removed())
            .finish()
    }
}
