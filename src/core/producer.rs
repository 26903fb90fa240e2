//! # Producer: pushes sequential work items on a fixed period.
//!
//! ```text
//! loop (while stop unset):
//!   queue.push(counter) ─► publish ItemProduced ─► counter += 1 ─► stop.wait(period)
//! ```
//!
//! Termination latency is bounded by `period`, and the wait is cut short the moment
//! the stop flag is set.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    core::{
        actor::{CancellableLoop, LoopBody},
        flag::StopFlag,
        queue::{WorkItem, WorkQueue},
    },
    error::RuntimeError,
    events::{Bus, Event, EventKind},
};

const ACTOR: &str = "producer";

struct ProduceLoop {
    queue: Arc<WorkQueue>,
    period: Duration,
    next: u64,
    bus: Bus,
}

#[async_trait]
impl LoopBody for ProduceLoop {
    async fn step(&mut self, stop: &StopFlag) {
        let item = WorkItem::new(self.next);
        self.queue.push(item);
        self.next += 1;
        self.bus.publish(
            Event::new(EventKind::ItemProduced)
                .with_actor(ACTOR)
                .with_item(item.value()),
        );
        stop.wait(self.period).await;
    }
}

/// Handle to the running producer task.
pub struct Producer {
    inner: CancellableLoop,
}

impl Producer {
    /// Starts producing `1, 2, 3, …` into `queue`, one item every `period`.
    pub fn spawn(queue: Arc<WorkQueue>, period: Duration, bus: Bus) -> Self {
        let body = ProduceLoop {
            queue,
            period,
            next: 1,
            bus: bus.clone(),
        };
        Self {
            inner: CancellableLoop::spawn(ACTOR, body, StopFlag::new(), bus),
        }
    }

    /// Stops producing and waits for the task to exit.
    ///
    /// No item is pushed after this returns.
    pub async fn terminate(&self) -> Result<(), RuntimeError> {
        self.inner.terminate().await
    }

    /// True once the producer task has exited.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// The producer's stop flag.
    pub fn stop_flag(&self) -> &StopFlag {
        self.inner.stop_flag()
    }

    /// Actor name used in events and errors (`"producer"`).
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{self, Instant};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn produces_gapless_increasing_sequence() {
        let queue = Arc::new(WorkQueue::new());
        let producer = Producer::spawn(queue.clone(), Duration::from_secs(1), Bus::new(64));

        time::sleep(Duration::from_millis(5_500)).await;
        producer.terminate().await.unwrap();

        let values: Vec<u64> = std::iter::from_fn(|| queue.try_pop())
            .map(WorkItem::value)
            .collect();
        assert_eq!(values, (1..=6).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn no_push_after_terminate_returns() {
        let queue = Arc::new(WorkQueue::new());
        let producer = Producer::spawn(queue.clone(), Duration::from_secs(4), Bus::new(64));

        time::sleep(Duration::from_secs(6)).await;
        let start = Instant::now();
        producer.terminate().await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(4));
        assert!(producer.is_finished());
        assert!(producer.stop_flag().is_set());

        let len = queue.len();
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(queue.len(), len);
        assert_eq!(len, 2);
    }
}
