//! # Consumer: drains the queue through a single worker.
//!
//! ## Loop
//! ```text
//! loop (while stop unset):
//!   pop(pop_timeout) ── None ──► re-loop (re-checks stop)
//!        │
//!        ▼ Some(item)
//!   SkipPolicy::CheckAfterPop:  queue non-empty? ──► publish ItemSkipped, re-loop
//!   SkipPolicy::DrainToLatest:  try_pop until empty, skip all but the last
//!        │
//!        ▼
//!   publish ItemDispatched ─► worker.process(item).await
//! ```
//!
//! The skip policy trades completeness for a bounded backlog: when the worker is
//! slower than the producer, only the freshest item is processed.
//!
//! ## Shutdown order
//! `terminate()` interrupts the worker **first**, then sets the consumer's own flag,
//! then joins. An in-progress `process` therefore returns at once, and the loop sees the
//! flag on its next check.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    core::{
        actor::{CancellableLoop, LoopBody},
        flag::StopFlag,
        queue::{WorkItem, WorkQueue},
        worker::Worker,
    },
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    policies::SkipPolicy,
};

const ACTOR: &str = "consumer";
const SKIP_REASON: &str = "newer items queued";

struct ConsumeLoop {
    queue: Arc<WorkQueue>,
    worker: Worker,
    pop_timeout: Duration,
    policy: SkipPolicy,
    bus: Bus,
}

impl ConsumeLoop {
    /// Applies the skip policy to a freshly popped item.
    ///
    /// Returns the item to dispatch, or `None` if it was discarded.
    fn select(&self, item: WorkItem) -> Option<WorkItem> {
        match self.policy {
            SkipPolicy::CheckAfterPop => {
                if self.queue.is_empty() {
                    Some(item)
                } else {
                    self.skip(item);
                    None
                }
            }
            SkipPolicy::DrainToLatest => {
                let mut latest = item;
                while let Some(newer) = self.queue.try_pop() {
                    self.skip(latest);
                    latest = newer;
                }
                Some(latest)
            }
        }
    }

    fn skip(&self, item: WorkItem) {
        self.bus.publish(
            Event::new(EventKind::ItemSkipped)
                .with_actor(ACTOR)
                .with_item(item.value())
                .with_reason(SKIP_REASON),
        );
    }
}

#[async_trait]
impl LoopBody for ConsumeLoop {
    async fn step(&mut self, _stop: &StopFlag) {
        let Some(popped) = self.queue.pop(self.pop_timeout).await else {
            return;
        };
        let Some(item) = self.select(popped) else {
            return;
        };

        self.bus.publish(
            Event::new(EventKind::ItemDispatched)
                .with_actor(ACTOR)
                .with_item(item.value()),
        );
        self.worker.process(item).await;
    }
}

/// Handle to the running consumer task.
pub struct Consumer {
    inner: CancellableLoop,
    worker_stop: StopFlag,
}

impl Consumer {
    /// Starts draining `queue` through `worker`.
    pub fn spawn(
        queue: Arc<WorkQueue>,
        worker: Worker,
        pop_timeout: Duration,
        policy: SkipPolicy,
        bus: Bus,
    ) -> Self {
        let worker_stop = worker.stop_flag();
        let body = ConsumeLoop {
            queue,
            worker,
            pop_timeout,
            policy,
            bus: bus.clone(),
        };
        Self {
            inner: CancellableLoop::spawn(ACTOR, body, StopFlag::new(), bus),
            worker_stop,
        }
    }

    /// Interrupts the worker, stops the loop and waits for the task to exit.
    pub async fn terminate(&self) -> Result<(), RuntimeError> {
        self.worker_stop.set();
        self.inner.terminate().await
    }

    /// True once the consumer task has exited.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// The consumer's own stop flag (not the worker's).
    pub fn stop_flag(&self) -> &StopFlag {
        self.inner.stop_flag()
    }

    /// Actor name used in events and errors (`"consumer"`).
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }
}
