//! # Pipeline: wires the actors, runs the main poll loop, flushes the logs.
//!
//! ## High-level architecture
//! ```text
//! PipelineBuilder::build()
//!   ├─► Bus + event listener (Bus ─► SubscriberSet)
//!   ├─► WorkQueue (shared)
//!   ├─► Consumer::spawn (owns Worker)      ← started first, waits on the queue
//!   ├─► Producer::spawn
//!   └─► ShutdownCoordinator(producer, consumer)
//!
//! Pipeline::run()
//!   ├─► shutdown::listen(coordinator)      (SIGINT/SIGTERM ─► coordinator.deliver)
//!   └─► wait():
//!         loop {
//!             requested?        ─► break
//!             actor finished?   ─► fail fast: shutdown + Err
//!             requested.wait(poll_interval)
//!         }
//!         coordinator.stopped()            (both actors joined)
//!         flush event listener
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        builder::PipelineBuilder, config::Config, consumer::Consumer,
        coordinator::ShutdownCoordinator, producer::Producer, queue::WorkQueue, shutdown,
    },
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    subscribers::SubscriberSet,
};

/// A running producer/consumer pipeline.
pub struct Pipeline {
    cfg: Config,
    bus: Bus,
    queue: Arc<WorkQueue>,
    producer: Arc<Producer>,
    consumer: Arc<Consumer>,
    coordinator: Arc<ShutdownCoordinator>,
    listener: EventListener,
}

impl Pipeline {
    /// Returns a builder; call [`PipelineBuilder::build`] to start the actors.
    pub fn builder(cfg: Config) -> PipelineBuilder {
        PipelineBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        queue: Arc<WorkQueue>,
        producer: Arc<Producer>,
        consumer: Arc<Consumer>,
        listener: EventListener,
    ) -> Self {
        let coordinator = ShutdownCoordinator::new(
            Arc::clone(&producer),
            Arc::clone(&consumer),
            bus.clone(),
        );
        Self {
            cfg,
            bus,
            queue,
            producer,
            consumer,
            coordinator,
            listener,
        }
    }

    /// Handle to the shutdown coordinator (e.g. for an embedding application's own trigger).
    pub fn coordinator(&self) -> Arc<ShutdownCoordinator> {
        Arc::clone(&self.coordinator)
    }

    /// The shared work queue.
    pub fn queue(&self) -> &Arc<WorkQueue> {
        &self.queue
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Registers OS termination signals and blocks until the pipeline has shut down.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let signals = match shutdown::listen(self.coordinator()) {
            Ok(handle) => handle,
            Err(e) => {
                let _ = self.coordinator.shutdown("signal-setup-failed").await;
                self.listener.flush().await;
                return Err(e);
            }
        };
        let res = self.wait().await;
        signals.abort();
        res
    }

    /// Blocks until a shutdown delivered through [`Pipeline::coordinator`] has completed.
    ///
    /// Fails fast if an actor task ends while no shutdown was requested.
    pub async fn wait(self) -> Result<(), RuntimeError> {
        let res = self.poll_until_stopped().await;
        self.listener.flush().await;
        res
    }

    async fn poll_until_stopped(&self) -> Result<(), RuntimeError> {
        let requested = self.coordinator.requested_flag();
        let poll = self.cfg.poll_interval();

        loop {
            if requested.is_set() {
                break;
            }
            if let Some(actor) = self.dead_actor() {
                // `requested` is always set before any actor is told to stop.
                if requested.is_set() {
                    break;
                }
                return Err(self.fail_fast(actor).await);
            }
            requested.wait(poll).await;
        }

        self.coordinator.stopped().await;
        match self.coordinator.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn dead_actor(&self) -> Option<&'static str> {
        if self.producer.is_finished() {
            Some(self.producer.name())
        } else if self.consumer.is_finished() {
            Some(self.consumer.name())
        } else {
            None
        }
    }

    /// Joins what is left and reports the dead actor. No restart is attempted.
    ///
    /// A panicked actor is already reported by its join; a clean exit is reported here.
    async fn fail_fast(&self, actor: &'static str) -> RuntimeError {
        let exited = RuntimeError::ActorExited { actor };
        if let Err(e) = self.coordinator.shutdown(exited.as_label()).await {
            return e;
        }
        if let Some(e) = self.coordinator.take_failure() {
            return e;
        }
        self.bus.publish(
            Event::new(EventKind::ActorFailed)
                .with_actor(actor)
                .with_reason(exited.as_message()),
        );
        exited
    }
}

/// Forwards bus events to the subscriber set until flushed.
pub(crate) struct EventListener {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl EventListener {
    /// Subscribes to `bus` immediately; events published after this call are delivered.
    pub(crate) fn spawn(bus: &Bus, subs: SubscriberSet) -> Self {
        let mut rx = bus.subscribe();
        let stop = CancellationToken::new();
        let token = stop.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => subs.emit(&ev),
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "event listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => break,
                }
            }
            // Deliver whatever was published before the flush request.
            loop {
                match rx.try_recv() {
                    Ok(ev) => subs.emit(&ev),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
            subs.shutdown().await;
        });

        Self { stop, handle }
    }

    /// Stops listening, delivers pending events and waits for every subscriber to finish.
    async fn flush(self) {
        self.stop.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::broadcast;
    use tokio::time;

    use super::*;

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn actor_exit_without_shutdown_fails_fast() {
        let pipeline = Pipeline::builder(Config::default()).build().unwrap();
        let mut rx = pipeline.bus.subscribe();
        time::sleep(Duration::from_millis(1500)).await;

        // The producer leaves its loop while nobody asked for a shutdown.
        pipeline.producer.stop_flag().set();
        let coord = pipeline.coordinator();
        let res = pipeline.wait().await;

        assert_eq!(res, Err(RuntimeError::ActorExited { actor: "producer" }));
        assert!(coord.is_requested());

        let events = drain(&mut rx);
        let stopped: Vec<&str> = events
            .iter()
            .filter(|ev| ev.kind == EventKind::ActorStopped)
            .filter_map(|ev| ev.actor.as_deref())
            .collect();
        assert_eq!(stopped, vec!["producer", "consumer"]);

        let failed: Vec<&Event> = events
            .iter()
            .filter(|ev| ev.kind == EventKind::ActorFailed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].actor.as_deref(), Some("producer"));
    }

    #[tokio::test(start_paused = true)]
    async fn far_future_time_unit_keeps_actors_alive() {
        let cfg = Config {
            time_unit: Duration::MAX,
            ..Config::default()
        };
        let pipeline = Pipeline::builder(cfg).build().unwrap();
        time::sleep(Duration::from_millis(200)).await;

        assert!(!pipeline.producer.is_finished());
        assert!(!pipeline.consumer.is_finished());
        assert_eq!(pipeline.queue().len(), 0);

        let coord = pipeline.coordinator();
        let (res, shut) = tokio::join!(pipeline.wait(), async {
            time::sleep(Duration::from_millis(100)).await;
            coord.shutdown("test").await
        });
        assert_eq!(shut, Ok(()));
        assert_eq!(res, Ok(()));
    }
}
