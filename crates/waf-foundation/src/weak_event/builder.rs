#![forbid(unsafe_code)]

//! Factory for weak subscriptions.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

#[cfg(feature = "tracing")]
use tracing::trace;

use super::proxy::{Detach, ProxyHandle, Unsubscribe, WeakEventProxy};
use super::signature::{NoArgs, Signature, WithArgs};
use crate::error::WeakEventError;

/// Calls the real handler. Returns `false` when the subscriber is gone.
type Deliver<P, A> = Box<dyn Fn(&P, &A) -> bool + Send + Sync>;

type Subscribe<P, H> = Box<dyn FnOnce(&P, Arc<H>)>;

/// Entry points for building weak subscriptions.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use waf_foundation::event::Event;
/// use waf_foundation::weak_event::WeakEvent;
///
/// #[derive(Default)]
/// struct Document {
///     saved: Event<Document, String>,
/// }
///
/// #[derive(Default)]
/// struct StatusBar {
///     saves: AtomicUsize,
/// }
///
/// impl StatusBar {
///     fn on_saved(&self, _doc: &Document, _path: &String) {
///         self.saves.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let doc = Arc::new(Document::default());
/// let bar = Arc::new(StatusBar::default());
/// let handle = WeakEvent::with_args::<Document, String>()
///     .publisher(&doc)
///     .subscriber(&bar, StatusBar::on_saved)
///     .subscribe(|d, h| d.saved.add(h))
///     .unsubscribe(|d, h| {
///         d.saved.remove(h);
///     })
///     .add()?;
///
/// doc.saved.raise(&doc, &"notes.txt".to_owned());
/// assert_eq!(bar.saves.load(Ordering::Relaxed), 1);
///
/// handle.remove();
/// assert!(doc.saved.is_empty());
/// # Ok::<(), waf_foundation::WeakEventError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WeakEvent;

impl WeakEvent {
    /// Build a subscription to a signal whose handlers take a sender and a
    /// payload of type `A`.
    #[must_use]
    pub fn with_args<P, A>() -> WeakEventBuilder<P, WithArgs<A>>
    where
        P: Send + Sync + 'static,
        A: 'static,
    {
        WeakEventBuilder::new()
    }

    /// Build a subscription to a signal whose handlers take only a sender.
    #[must_use]
    pub fn no_args<P>() -> WeakEventBuilder<P, NoArgs>
    where
        P: Send + Sync + 'static,
    {
        WeakEventBuilder::new()
    }
}

/// Collects the pieces of one weak subscription.
///
/// `publisher`, one of `subscriber`/`handler`, `subscribe` and `unsubscribe`
/// are required; `manager` is optional. [`WeakEventBuilder::add`] registers
/// the forwarding handler and returns its [`ProxyHandle`].
pub struct WeakEventBuilder<P, G: Signature<P>> {
    publisher: Option<Arc<P>>,
    deliver: Option<Deliver<P, G::Args>>,
    subscribe: Option<Subscribe<P, G::Handler>>,
    unsubscribe: Option<Unsubscribe<P, G::Handler>>,
    manager: Option<Weak<dyn Any + Send + Sync>>,
    _signature: PhantomData<fn() -> G>,
}

impl<P, G> WeakEventBuilder<P, G>
where
    P: Send + Sync + 'static,
    G: Signature<P>,
{
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            publisher: None,
            deliver: None,
            subscribe: None,
            unsubscribe: None,
            manager: None,
            _signature: PhantomData,
        }
    }

    /// The object raising the signal. Only a weak reference outlives `add`.
    #[must_use]
    pub fn publisher(mut self, publisher: &Arc<P>) -> Self {
        self.publisher = Some(Arc::clone(publisher));
        self
    }

    /// Deliver to `method` on `subscriber`.
    ///
    /// The subscriber is held weakly; `method` receives it resolved on each
    /// raise and must not capture it. Once the subscriber is dropped the next
    /// raise unregisters the subscription.
    #[must_use]
    pub fn subscriber<S, F>(mut self, subscriber: &Arc<S>, method: F) -> Self
    where
        S: Send + Sync + 'static,
        F: Fn(&S, &P, &G::Args) + Send + Sync + 'static,
    {
        let target = Arc::downgrade(subscriber);
        self.deliver = Some(Box::new(move |sender: &P, args: &G::Args| {
            match target.upgrade() {
                Some(subscriber) => {
                    method(&*subscriber, sender, args);
                    true
                }
                None => false,
            }
        }));
        self
    }

    /// Deliver to a handler with no subscriber object.
    ///
    /// Such a subscription only goes stale through its manager; without one
    /// it lives until removed.
    #[must_use]
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&P, &G::Args) + Send + Sync + 'static,
    {
        self.deliver = Some(Box::new(move |sender: &P, args: &G::Args| {
            handler(sender, args);
            true
        }));
        self
    }

    /// Registers the forwarding handler on the publisher.
    #[must_use]
    pub fn subscribe<F>(mut self, subscribe: F) -> Self
    where
        F: FnOnce(&P, Arc<G::Handler>) + 'static,
    {
        self.subscribe = Some(Box::new(subscribe));
        self
    }

    /// Unregisters the forwarding handler from the publisher.
    #[must_use]
    pub fn unsubscribe<F>(mut self, unsubscribe: F) -> Self
    where
        F: Fn(&P, &Arc<G::Handler>) + Send + Sync + 'static,
    {
        self.unsubscribe = Some(Box::new(unsubscribe));
        self
    }

    /// Gate the subscription on `manager` staying alive.
    ///
    /// When the manager is dropped the subscription is stale, whether or not
    /// the subscriber is still reachable.
    #[must_use]
    pub fn manager<M>(mut self, manager: &Arc<M>) -> Self
    where
        M: Send + Sync + 'static,
    {
        let manager: Weak<M> = Arc::downgrade(manager);
        self.manager = Some(manager);
        self
    }

    /// Register the subscription.
    ///
    /// Fails with [`WeakEventError::MissingArgument`] when a required piece
    /// was not supplied; the publisher is left untouched in that case.
    pub fn add(self) -> Result<ProxyHandle, WeakEventError> {
        let missing = |name| WeakEventError::MissingArgument { name };
        let publisher = self.publisher.ok_or_else(|| missing("publisher"))?;
        let deliver = self.deliver.ok_or_else(|| missing("handler"))?;
        let subscribe = self.subscribe.ok_or_else(|| missing("subscribe"))?;
        let unsubscribe = self.unsubscribe.ok_or_else(|| missing("unsubscribe"))?;

        let proxy = Arc::new(WeakEventProxy::<P, G::Handler>::new(&publisher, unsubscribe));
        #[cfg(feature = "tracing")]
        let gated = self.manager.is_some();
        let manager = self.manager;
        let gate = Arc::clone(&proxy);
        let forwarder = G::wrap(Box::new(move |sender: &P, args: &G::Args| {
            if gate.is_removed() {
                return;
            }
            // A dead manager makes the subscription stale even if the
            // subscriber is still alive.
            let live = manager.as_ref().is_none_or(|m| m.strong_count() > 0)
                && deliver(sender, args);
            if !live {
                gate.detach();
            }
        }));
        proxy.bind(&forwarder);
        subscribe(&publisher, forwarder);

        #[cfg(feature = "tracing")]
        trace!(gated, "weak event proxy registered");

        Ok(ProxyHandle::new(proxy))
    }
}

impl<P, G> Default for WeakEventBuilder<P, G>
where
    P: Send + Sync + 'static,
    G: Signature<P>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, G: Signature<P>> fmt::Debug for WeakEventBuilder<P, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventBuilder")
            .field("publisher", &self.publisher.is_some())
            .field("handler", &self.deliver.is_some())
            .field("subscribe", &self.subscribe.is_some())
            .field("unsubscribe", &self.unsubscribe.is_some())
            .field("manager", &self.manager.is_some())
            .finish()
    }
}
