//! Scheduling primitives shared by the UI modules.
//!
//! - `debounce`: one cancellable deferred action per consumer
//! - `sequence`: request tickets used to drop stale responses

pub mod debounce;
pub mod sequence;

pub use debounce::{DebouncedAction, Debouncer};
pub use sequence::{RequestSequence, Ticket};
