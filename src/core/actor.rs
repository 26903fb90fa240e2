//! # CancellableLoop: run-until-flag actor with join-once semantics.
//!
//! Producer and consumer are not thread subtypes; each one configures a
//! [`CancellableLoop`] with its own [`LoopBody`].
//!
//! ## Architecture
//! ```text
//! CancellableLoop::spawn(name, body, stop, bus)
//!   └─► tokio::spawn:
//!         publish ActorStarted
//!         while !stop.is_set() {
//!             body.step(&stop).await     (may suspend in stop.wait / queue.pop)
//!         }
//!         publish ActorStopped
//!
//! terminate():  stop.set() ──► join() ──► Ok | ActorPanicked
//! ```
//!
//! ## Rules
//! - The stop flag is checked **between** steps; a step shortens its own waits by
//!   waiting on the flag it is handed.
//! - The task handle is joined **at most once**. A second `join()` that races the first
//!   waits for it to finish and then returns `Ok(())`.
//! - `terminate()` returns only after the task has fully exited.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};

use crate::{
    core::flag::StopFlag,
    error::RuntimeError,
    events::{Bus, Event, EventKind},
};

/// One iteration of an actor loop.
#[async_trait]
pub trait LoopBody: Send + 'static {
    /// Runs a single iteration. Only called while `stop` is unset.
    async fn step(&mut self, stop: &StopFlag);
}

/// A spawned actor loop plus its stop flag and task handle.
pub struct CancellableLoop {
    name: &'static str,
    stop: StopFlag,
    bus: Bus,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CancellableLoop {
    /// Spawns `body` on the current tokio runtime and returns its handle.
    pub fn spawn<B: LoopBody>(name: &'static str, mut body: B, stop: StopFlag, bus: Bus) -> Self {
        let flag = stop.clone();
        let events = bus.clone();

        let handle = tokio::spawn(async move {
            events.publish(Event::new(EventKind::ActorStarted).with_actor(name));
            while !flag.is_set() {
                body.step(&flag).await;
            }
            events.publish(Event::new(EventKind::ActorStopped).with_actor(name));
        });

        Self {
            name,
            stop,
            bus,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Actor name used in events and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The stop flag this loop observes.
    pub fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }

    /// True once the task has exited (or has already been joined).
    ///
    /// Returns `false` while another caller is in the middle of joining.
    pub fn is_finished(&self) -> bool {
        match self.handle.try_lock() {
            Ok(guard) => guard.as_ref().is_none_or(JoinHandle::is_finished),
            Err(_) => false,
        }
    }

    /// Sets the stop flag and waits for the task to exit.
    pub async fn terminate(&self) -> Result<(), RuntimeError> {
        self.stop.set();
        self.join().await
    }

    /// Waits for the task to exit without touching the stop flag.
    pub async fn join(&self) -> Result<(), RuntimeError> {
        let mut guard = self.handle.lock().await;
        let Some(handle) = guard.take() else {
            return Ok(());
        };

        match handle.await {
            Ok(()) => Ok(()),
            Err(e) => {
                let error = join_error_message(e);
                self.bus.publish(
                    Event::new(EventKind::ActorFailed)
                        .with_actor(self.name)
                        .with_reason(error.clone()),
                );
                Err(RuntimeError::ActorPanicked {
                    actor: self.name,
                    error,
                })
            }
        }
    }
}

/// Extracts a readable message from a panic payload.
fn join_error_message(e: JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use tokio::time::{self, Instant};

    use super::*;

    struct Tick {
        count: Arc<AtomicU32>,
    }

    #[async_trait]
    impl LoopBody for Tick {
        async fn step(&mut self, stop: &StopFlag) {
            self.count.fetch_add(1, Ordering::SeqCst);
            stop.wait(Duration::from_secs(10)).await;
        }
    }

    struct Boom;

    #[async_trait]
    impl LoopBody for Boom {
        async fn step(&mut self, _stop: &StopFlag) {
            panic!("boom");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn terminate_cuts_wait_short_and_joins_once() {
        let count = Arc::new(AtomicU32::new(0));
        let actor = CancellableLoop::spawn(
            "tick",
            Tick {
                count: count.clone(),
            },
            StopFlag::new(),
            Bus::new(16),
        );

        time::sleep(Duration::from_secs(25)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!actor.is_finished());

        let start = Instant::now();
        actor.terminate().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(actor.is_finished());

        // Second terminate is a no-op.
        actor.terminate().await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn panic_surfaces_as_runtime_error() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let actor = CancellableLoop::spawn("boom", Boom, StopFlag::new(), bus);

        let err = actor.join().await.unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ActorPanicked {
                actor: "boom",
                error: "boom".into(),
            }
        );

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(kinds, vec![EventKind::ActorStarted, EventKind::ActorFailed]);
    }
}
