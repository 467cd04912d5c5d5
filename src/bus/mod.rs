//! Event system decoupling the editor, search, and queue modules.
//!
//! The event bus provides:
//! - Publish-subscribe delivery keyed by [`EventKind`]
//! - Ordered, synchronous delivery in subscribe order
//! - Fault containment: a failing subscriber never affects the publisher
//!
//! # Architecture
//!
//! Producers publish typed [`AppEvent`]s; consumers register [`Handler`]s:
//! - Search publishes `LoadInEditor` and `AddToQueue`
//! - The editor publishes `AddToQueue`
//! - The queue subscribes to `AddToQueue`, the app wires `LoadInEditor` into
//!   the editor

mod event_bus;
mod event_types;

pub use event_bus::{EventBus, Handler, HandlerError, HandlerResult, Subscription};
pub use event_types::{AppEvent, EventKind, EVENT_ADD_TO_QUEUE, EVENT_LOAD_IN_EDITOR};
