#![forbid(unsafe_code)]

//! Foundation: weak event subscriptions for long-lived publishers.
//!
//! # Role
//! View models and services often outlive the views that listen to them.
//! Subscribing a view's method directly to a service event pins the view in
//! memory until the service dies. `waf-foundation` lets the subscription
//! observe the view weakly instead: once the view is dropped, the next raise
//! unregisters the stale handler.
//!
//! # Primary responsibilities
//! - **EventSource**: ordered handler list a publisher raises, tolerant of
//!   handlers that unsubscribe while being called.
//! - **WeakEvent**: builder that registers a forwarding proxy for a
//!   subscriber method, optionally gated by a manager object.
//! - **ProxyHandle**: idempotent, thread-safe cancellation of one proxy.
//! - **SubscriptionGroup**: removes many proxies at once.
//!
//! # Features
//! - `tracing`: trace events for proxy registration and removal.

pub mod error;
pub mod event;
pub mod weak_event;

pub use error::WeakEventError;
pub use event::{Event, EventHandler, EventSource, Notify, NotifyHandler};
pub use weak_event::{ProxyHandle, SubscriptionGroup, WeakEvent, WeakEventBuilder};
