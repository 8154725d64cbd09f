#![forbid(unsafe_code)]

//! Weak event subscriptions.
//!
//! A plain subscription (`publisher.event.add(subscriber_closure)`) makes the
//! publisher own the subscriber for as long as the publisher lives. The types
//! here put a small proxy in between so the publisher owns only the proxy.
//!
//! # Ownership
//!
//! ```text
//!  publisher ──strong──▶ forwarder ──strong──▶ proxy
//!      ▲                     ▲                   │
//!      └────────weak─────────┴───────weak────────┤
//!                                                ├──weak──▶ subscriber
//!                                                └──weak──▶ manager (optional)
//! ```
//!
//! The publisher's edge to the forwarding handler is the only strong edge
//! into the proxy graph. [`ProxyHandle`] holds the proxy too, but never the
//! subscriber, the manager, or the publisher.
//!
//! # Lifecycle
//!
//! A proxy is *active* from [`WeakEventBuilder::add`] until it is *removed*.
//! Removal is one-way and happens exactly once, by whichever comes first:
//!
//! - [`ProxyHandle::remove`], from any thread and any number of times;
//! - a raise that finds the manager or the subscriber dropped. The real
//!   handler is skipped and the proxy unregisters itself from inside the
//!   publisher's raise.
//!
//! A removed proxy never forwards again, even if the publisher is still
//! walking a snapshot that contains it.
//!
//! # Failure Modes
//!
//! - **Missing builder argument**: [`WeakEventBuilder::add`] returns
//!   [`WeakEventError::MissingArgument`](crate::WeakEventError) and registers
//!   nothing.
//! - **Publisher never raises again**: a stale proxy stays registered until
//!   the publisher is dropped or the handle is removed. It holds no
//!   subscriber memory in the meantime.

mod builder;
mod group;
mod proxy;
mod signature;

pub use builder::{WeakEvent, WeakEventBuilder};
pub use group::SubscriptionGroup;
pub use proxy::ProxyHandle;
pub use signature::{Forward, NoArgs, Signature, WithArgs};
