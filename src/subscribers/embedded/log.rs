//! # LogWriter — console event printer
//!
//! A subscriber that renders incoming [`Event`]s as `tracing` records, one line per event.
//! Install a `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see the output.
//!
//! ## Example output
//! ```text
//! [actor-started] actor="consumer"
//! [actor-started] actor="producer"
//! [produced] item=1
//! [dispatched] item=1
//! [work-started] item=1
//! [work-done] item=1
//! [skipped] item=4 reason="newer items queued"
//! [shutdown-requested] source="SIGINT"
//! [work-interrupted] item=5
//! [actor-stopped] actor="producer"
//! [actor-stopped] actor="consumer"
//! [all-stopped]
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let actor = e.actor.as_deref().unwrap_or("unknown");
        let item = e.item.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("unknown");

        match e.kind {
            EventKind::ActorStarted => info!("[actor-started] actor={actor:?}"),
            EventKind::ActorStopped => info!("[actor-stopped] actor={actor:?}"),
            EventKind::ActorFailed => warn!("[actor-failed] actor={actor:?} err={reason:?}"),
            EventKind::ItemProduced => info!("[produced] item={item}"),
            EventKind::ItemSkipped => info!("[skipped] item={item} reason={reason:?}"),
            EventKind::ItemDispatched => info!("[dispatched] item={item}"),
            EventKind::WorkStarted => info!("[work-started] item={item}"),
            EventKind::WorkDone => info!("[work-done] item={item}"),
            EventKind::WorkInterrupted => info!("[work-interrupted] item={item}"),
            EventKind::ShutdownRequested => info!("[shutdown-requested] source={reason:?}"),
            EventKind::ShutdownIgnored => {
                info!("[shutdown-ignored] source={reason:?} (already in progress)")
            }
            EventKind::AllStopped => info!("[all-stopped]"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
