#![forbid(unsafe_code)]

//! Handler shapes a publisher can expect.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::event::{EventHandler, NotifyHandler};

/// Type-erased forwarding callback built by the proxy for every shape.
pub type Forward<P, A> = Box<dyn Fn(&P, &A) + Send + Sync>;

/// Describes the handler type a publisher stores for one signal.
///
/// The proxy always forwards `(sender, args)`; [`Signature::wrap`] adapts
/// that callback to the publisher's own handler type. Shapes without a
/// payload use `()` as their `Args`.
pub trait Signature<P>: 'static {
    /// Payload delivered alongside the sender.
    type Args: 'static;
    /// Handler type stored by the publisher.
    type Handler: ?Sized + Send + Sync + 'static;

    /// Adapt a forwarding callback to the publisher's handler type.
    fn wrap(forward: Forward<P, Self::Args>) -> Arc<Self::Handler>;
}

/// Sender plus payload: `Fn(&P, &A)`.
pub struct WithArgs<A>(PhantomData<fn(&A)>);

impl<P: 'static, A: 'static> Signature<P> for WithArgs<A> {
    type Args = A;
    type Handler = EventHandler<P, A>;

    fn wrap(forward: Forward<P, A>) -> Arc<Self::Handler> {
        Arc::from(forward)
    }
}

/// Sender only: `Fn(&P)`.
pub struct NoArgs;

impl<P: 'static> Signature<P> for NoArgs {
    type Args = ();
    type Handler = NotifyHandler<P>;

    fn wrap(forward: Forward<P, ()>) -> Arc<Self::Handler> {
        Arc::new(move |sender: &P| forward(sender, &()))
    }
}
