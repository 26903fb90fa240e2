//! # ShutdownCoordinator: ordered, idempotent termination.
//!
//! ## Shutdown path
//! ```text
//! deliver(source) / shutdown(source)
//!   └─► claim (atomic swap, first caller wins)
//!         ├─ lost  ─► publish ShutdownIgnored          (no re-entry)
//!         └─ won   ─► publish ShutdownRequested
//!                     requested.set()                 (main flow observes this)
//!                     producer.terminate().await      (no more pushes after this)
//!                     consumer.terminate().await      (worker interrupted, then joined)
//!                     publish AllStopped
//!                     finished.set()
//! ```
//!
//! ## Rules
//! - The termination sequence runs **at most once**, however often cancellation arrives.
//! - Producer is always stopped **before** the consumer.
//! - [`ShutdownCoordinator::deliver`] only flips flags and hands the sequence to a spawned
//!   task, so it is safe to call from a signal listener.
//! - The first failure seen while joining is kept and reported to the main flow.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    core::{consumer::Consumer, flag::StopFlag, producer::Producer},
    error::RuntimeError,
    events::{Bus, Event, EventKind},
};

/// Drives the fixed producer → consumer termination sequence.
pub struct ShutdownCoordinator {
    claimed: AtomicBool,
    requested: StopFlag,
    finished: StopFlag,
    failure: Mutex<Option<RuntimeError>>,
    producer: Arc<Producer>,
    consumer: Arc<Consumer>,
    bus: Bus,
}

impl ShutdownCoordinator {
    /// Creates a coordinator for the given actors.
    pub fn new(producer: Arc<Producer>, consumer: Arc<Consumer>, bus: Bus) -> Arc<Self> {
        Arc::new(Self {
            claimed: AtomicBool::new(false),
            requested: StopFlag::new(),
            finished: StopFlag::new(),
            failure: Mutex::new(None),
            producer,
            consumer,
            bus,
        })
    }

    /// Signal-safe trigger: claims the shutdown and runs the sequence on a spawned task.
    ///
    /// Returns `true` if this delivery started the shutdown.
    pub fn deliver(self: &Arc<Self>, source: &str) -> bool {
        if !self.claim(source) {
            return false;
        }
        let me = Arc::clone(self);
        tokio::spawn(async move {
            let _ = me.terminate_all().await;
        });
        true
    }

    /// Awaitable trigger.
    ///
    /// The call that claims the shutdown drives the sequence and returns its result;
    /// any other call waits until the sequence has finished and returns `Ok(())`.
    pub async fn shutdown(&self, source: &str) -> Result<(), RuntimeError> {
        if !self.claim(source) {
            self.finished.stopped().await;
            return Ok(());
        }
        self.terminate_all().await
    }

    /// True once a shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.is_set()
    }

    /// The process-wide "shutdown requested" flag.
    pub fn requested_flag(&self) -> &StopFlag {
        &self.requested
    }

    /// Waits until both actors have been joined.
    pub async fn stopped(&self) {
        self.finished.stopped().await;
    }

    /// Takes the first failure recorded by the termination sequence, if any.
    pub fn take_failure(&self) -> Option<RuntimeError> {
        self.failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    fn claim(&self, source: &str) -> bool {
        if self.claimed.swap(true, Ordering::SeqCst) {
            self.bus
                .publish(Event::new(EventKind::ShutdownIgnored).with_reason(source));
            return false;
        }
        self.bus
            .publish(Event::new(EventKind::ShutdownRequested).with_reason(source));
        self.requested.set();
        true
    }

    async fn terminate_all(&self) -> Result<(), RuntimeError> {
        let producer = self.producer.terminate().await;
        let consumer = self.consumer.terminate().await;
        let res = producer.and(consumer);

        if let Err(e) = &res {
            let mut slot = self
                .failure
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            slot.get_or_insert_with(|| e.clone());
        }
        self.bus.publish(Event::new(EventKind::AllStopped));
        self.finished.set();
        res
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::broadcast;
    use tokio::time::{self, Instant};

    use super::*;
    use crate::core::queue::WorkQueue;
    use crate::core::worker::Worker;
    use crate::policies::SkipPolicy;

    fn setup() -> (Arc<ShutdownCoordinator>, broadcast::Receiver<Event>) {
        let bus = Bus::new(256);
        let rx = bus.subscribe();
        let queue = Arc::new(WorkQueue::new());
        let consumer = Arc::new(Consumer::spawn(
            queue.clone(),
            Worker::new(Duration::from_secs(2), bus.clone()),
            Duration::from_secs(1),
            SkipPolicy::CheckAfterPop,
            bus.clone(),
        ));
        let producer = Arc::new(Producer::spawn(queue, Duration::from_secs(4), bus.clone()));
        (ShutdownCoordinator::new(producer, consumer, bus), rx)
    }

    fn shutdown_kinds(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.is_shutdown())
            .map(|ev| ev.kind)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn producer_stops_before_consumer() {
        let (coord, mut rx) = setup();
        time::sleep(Duration::from_secs(1)).await;

        coord.shutdown("test").await.unwrap();
        assert!(coord.is_requested());
        assert!(coord.producer.is_finished());
        assert!(coord.consumer.is_finished());

        let stops: Vec<Arc<str>> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.kind == EventKind::ActorStopped)
            .filter_map(|ev| ev.actor)
            .collect();
        assert_eq!(stops.len(), 2);
        assert_eq!(&*stops[0], "producer");
        assert_eq!(&*stops[1], "consumer");
    }

    #[tokio::test(start_paused = true)]
    async fn double_delivery_runs_sequence_once() {
        let (coord, mut rx) = setup();
        time::sleep(Duration::from_secs(1)).await;

        assert!(coord.deliver("SIGINT"));
        assert!(!coord.deliver("SIGINT"));

        let start = Instant::now();
        coord.stopped().await;
        assert!(start.elapsed() <= Duration::from_secs(1));
        assert!(coord.take_failure().is_none());

        // Late awaitable call returns at once with the same end state.
        coord.shutdown("SIGTERM").await.unwrap();

        assert_eq!(
            shutdown_kinds(&mut rx),
            vec![
                EventKind::ShutdownRequested,
                EventKind::ShutdownIgnored,
                EventKind::AllStopped,
                EventKind::ShutdownIgnored,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_shutdowns_both_return_after_join() {
        let (coord, _rx) = setup();
        time::sleep(Duration::from_secs(1)).await;

        let (a, b) = tokio::join!(coord.shutdown("a"), coord.shutdown("b"));
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert!(coord.producer.is_finished());
        assert!(coord.consumer.is_finished());
    }
}
