//! # WorkQueue: unbounded FIFO shared by producer and consumer.
//!
//! The queue carries its own synchronization: a short-lived [`std::sync::Mutex`] around a
//! [`VecDeque`] (never held across an `.await`) plus a [`Notify`] that wakes a pending
//! [`WorkQueue::pop`].
//!
//! ## Rules
//! - `push()` never blocks and never fails (no capacity limit).
//! - `pop(timeout)` returns `None` when nothing arrives in time; that is an expected
//!   outcome, not an error.
//! - `len()` is advisory: it may be stale the moment it returns.
//! - Items come out in push order.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time;

/// A single unit of produced work. Values start at 1 and only grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkItem(u64);

impl WorkItem {
    /// Wraps a raw value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unbounded FIFO of [`WorkItem`]s.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<WorkItem>>,
    ready: Notify,
}

impl WorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` to the tail and wakes a pending `pop`.
    pub fn push(&self, item: WorkItem) {
        self.lock().push_back(item);
        // Stores a permit when nobody waits yet, so a racing pop cannot miss it.
        self.ready.notify_one();
    }

    /// Removes the head if one is available right now.
    pub fn try_pop(&self) -> Option<WorkItem> {
        self.lock().pop_front()
    }

    /// Removes the head, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` ("empty") if the timeout passes with the queue still empty.
    /// Timeouts too large to form a deadline wait without bound.
    pub async fn pop(&self, timeout: Duration) -> Option<WorkItem> {
        let next = async {
            loop {
                if let Some(item) = self.try_pop() {
                    return item;
                }
                self.ready.notified().await;
            }
        };
        match time::timeout(timeout, next).await {
            Ok(item) => Some(item),
            Err(_elapsed) => self.try_pop(),
        }
    }

    /// Advisory number of queued items.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Advisory emptiness check.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<WorkItem>> {
        // A panic while holding the lock cannot leave the deque half-modified.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;

    #[test]
    fn push_and_try_pop_keep_fifo_order() {
        let q = WorkQueue::new();
        for v in 1..=3 {
            q.push(WorkItem::new(v));
        }
        assert_eq!(q.len(), 3);

        let drained: Vec<u64> = std::iter::from_fn(|| q.try_pop())
            .map(WorkItem::value)
            .collect();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(q.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pop_times_out_on_empty_queue() {
        let q = WorkQueue::new();
        let start = Instant::now();

        assert_eq!(q.pop(Duration::from_secs(1)).await, None);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn pop_wakes_when_item_is_pushed() {
        let q = Arc::new(WorkQueue::new());
        let pusher = Arc::clone(&q);

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(300)).await;
            pusher.push(WorkItem::new(7));
        });

        let start = Instant::now();
        let got = q.pop(Duration::from_secs(5)).await;
        assert_eq!(got, Some(WorkItem::new(7)));
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn pop_accepts_unbounded_timeout() {
        let q = Arc::new(WorkQueue::new());
        q.push(WorkItem::new(1));
        assert_eq!(q.pop(Duration::MAX).await, Some(WorkItem::new(1)));

        let pusher = Arc::clone(&q);
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(2)).await;
            pusher.push(WorkItem::new(2));
        });
        assert_eq!(q.pop(Duration::MAX).await, Some(WorkItem::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_permit_does_not_produce_phantom_item() {
        let q = WorkQueue::new();
        q.push(WorkItem::new(1));
        q.push(WorkItem::new(2));
        assert_eq!(q.try_pop(), Some(WorkItem::new(1)));
        assert_eq!(q.try_pop(), Some(WorkItem::new(2)));

        // The permit left by the pushes wakes the first wait, but the queue is empty.
        assert_eq!(q.pop(Duration::from_secs(1)).await, None);
    }
}
