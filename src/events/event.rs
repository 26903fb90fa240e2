//! # Runtime events emitted by the pipeline actors and the shutdown coordinator.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Actor events**: an actor loop started or ended
//! - **Work events**: items produced, skipped, dispatched, processed
//! - **Shutdown events**: request, duplicate request, completion, actor failure
//!
//! The [`Event`] struct carries optional metadata such as the actor name, the work item
//! and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use pipevisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ItemSkipped)
//!     .with_actor("consumer")
//!     .with_item(3)
//!     .with_reason("newer items queued");
//!
//! assert_eq!(ev.kind, EventKind::ItemSkipped);
//! assert_eq!(ev.actor.as_deref(), Some("consumer"));
//! assert_eq!(ev.item, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Actor lifecycle ===
    /// Actor loop is starting.
    ///
    /// Sets: `actor`
    ActorStarted,

    /// Actor loop observed its stop flag and ended.
    ///
    /// Sets: `actor`
    ActorStopped,

    /// Actor task ended abnormally (panic or unexpected exit).
    ///
    /// Sets: `actor`, `reason`
    ActorFailed,

    // === Work flow ===
    /// Producer pushed an item.
    ///
    /// Sets: `actor`, `item`
    ItemProduced,

    /// Consumer discarded a popped item because newer ones were queued.
    ///
    /// Sets: `actor`, `item`, `reason`
    ItemSkipped,

    /// Consumer handed an item to the worker.
    ///
    /// Sets: `actor`, `item`
    ItemDispatched,

    /// Worker started a unit of work.
    ///
    /// Sets: `actor`, `item`
    WorkStarted,

    /// Worker ran a unit of work to its nominal end.
    ///
    /// Sets: `actor`, `item`
    WorkDone,

    /// Worker was told to stop while a unit of work was in progress.
    ///
    /// Sets: `actor`, `item`
    WorkInterrupted,

    // === Shutdown ===
    /// First cancellation delivery; the termination sequence begins.
    ///
    /// Sets: `reason` (signal or caller name)
    ShutdownRequested,

    /// Cancellation delivered again while shutdown is already under way.
    ///
    /// Sets: `reason`
    ShutdownIgnored,

    /// Producer and consumer have both been joined.
    AllStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the actor, if applicable.
    pub actor: Option<Arc<str>>,
    /// Work item value, if applicable.
    pub item: Option<u64>,
    /// Human-readable reason (signal name, skip cause, panic message).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: None,
            item: None,
            reason: None,
        }
    }

    /// Attaches an actor name.
    #[inline]
    pub fn with_actor(mut self, actor: impl Into<Arc<str>>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attaches a work item value.
    #[inline]
    pub fn with_item(mut self, item: u64) -> Self {
        self.item = Some(item);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for events that belong to the shutdown sequence.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ShutdownRequested | EventKind::ShutdownIgnored | EventKind::AllStopped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::ItemProduced);
        let b = Event::new(EventKind::ItemProduced);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_fill_optional_fields() {
        let ev = Event::new(EventKind::ShutdownRequested).with_reason("SIGINT");
        assert!(ev.is_shutdown());
        assert_eq!(ev.reason.as_deref(), Some("SIGINT"));
        assert!(ev.actor.is_none());
        assert!(ev.item.is_none());
    }
}
