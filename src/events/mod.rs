//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Producer`, `Consumer`, `Worker`, `CancellableLoop`,
//!   `ShutdownCoordinator`, `Pipeline` (actor failure).
//! - **Consumers**: the pipeline event listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
