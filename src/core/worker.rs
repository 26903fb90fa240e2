//! # Worker: one interruptible unit of work at a time.
//!
//! The worker has no task of its own. It runs inline on the consumer's task, but owns a
//! [`StopFlag`] so that an in-progress unit can be cut short without waiting out the full
//! nominal duration.
//!
//! ```text
//! process(item):  publish WorkStarted
//!                 stop.wait(duration) ──► ran to the end  → WorkDone        → Completed
//!                                    └─► stop was set     → WorkInterrupted → Interrupted
//! ```
//!
//! Once terminated, the flag stays set and any later `process` returns immediately.

use std::time::Duration;

use crate::{
    core::{flag::StopFlag, queue::WorkItem},
    events::{Bus, Event, EventKind},
};

const ACTOR: &str = "worker";

/// How a unit of work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    /// Ran for the full nominal duration.
    Completed,
    /// Cut short by [`Worker::terminate`].
    Interrupted,
}

/// Simulated fixed-duration processor.
pub struct Worker {
    duration: Duration,
    stop: StopFlag,
    bus: Bus,
}

impl Worker {
    /// Creates a worker whose units of work last `duration`.
    pub fn new(duration: Duration, bus: Bus) -> Self {
        Self {
            duration,
            stop: StopFlag::new(),
            bus,
        }
    }

    /// Processes one item; blocks the caller for up to the nominal duration.
    pub async fn process(&self, item: WorkItem) -> WorkOutcome {
        self.publish(EventKind::WorkStarted, item);
        self.stop.wait(self.duration).await;

        if self.stop.is_set() {
            self.publish(EventKind::WorkInterrupted, item);
            WorkOutcome::Interrupted
        } else {
            self.publish(EventKind::WorkDone, item);
            WorkOutcome::Completed
        }
    }

    /// Interrupts the current unit of work, if any. Never blocks.
    pub fn terminate(&self) {
        self.stop.set();
    }

    /// Handle to the worker's stop flag, for owners that keep the worker elsewhere.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    fn publish(&self, kind: EventKind, item: WorkItem) {
        self.bus.publish(
            Event::new(kind)
                .with_actor(ACTOR)
                .with_item(item.value()),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::{self, Instant};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn process_runs_nominal_duration() {
        let worker = Worker::new(Duration::from_secs(2), Bus::new(16));
        let start = Instant::now();

        let outcome = worker.process(WorkItem::new(1)).await;
        assert_eq!(outcome, WorkOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn terminate_interrupts_work_in_progress() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let worker = Arc::new(Worker::new(Duration::from_secs(30), bus));
        let runner = Arc::clone(&worker);
        let start = Instant::now();

        let handle = tokio::spawn(async move { runner.process(WorkItem::new(9)).await });
        time::sleep(Duration::from_secs(1)).await;
        worker.terminate();

        assert_eq!(handle.await.unwrap(), WorkOutcome::Interrupted);
        assert_eq!(start.elapsed(), Duration::from_secs(1));

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(kinds, vec![EventKind::WorkStarted, EventKind::WorkInterrupted]);
    }

    #[tokio::test(start_paused = true)]
    async fn terminate_while_idle_only_latches() {
        let worker = Worker::new(Duration::from_secs(2), Bus::new(16));
        worker.terminate();
        worker.terminate();

        let start = Instant::now();
        assert_eq!(worker.process(WorkItem::new(1)).await, WorkOutcome::Interrupted);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
