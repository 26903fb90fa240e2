use std::sync::Arc;

use crate::{
    core::{
        config::Config,
        consumer::Consumer,
        pipeline::{EventListener, Pipeline},
        producer::Producer,
        queue::WorkQueue,
        worker::Worker,
    },
    error::ConfigError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Pipeline`].
pub struct PipelineBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl PipelineBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers (the logging sinks).
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and starts the pipeline.
    ///
    /// Must be called from within a tokio runtime. The consumer is spawned before the
    /// producer so the first item never waits for a consumer to appear.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        self.cfg.validate()?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        // Listener must be subscribed before any actor can publish.
        let listener = EventListener::spawn(&bus, SubscriberSet::new(self.subscribers));
        let queue = Arc::new(WorkQueue::new());

        let worker = Worker::new(self.cfg.work_duration(), bus.clone());
        let consumer = Arc::new(Consumer::spawn(
            Arc::clone(&queue),
            worker,
            self.cfg.pop_timeout(),
            self.cfg.skip,
            bus.clone(),
        ));
        let producer = Arc::new(Producer::spawn(
            Arc::clone(&queue),
            self.cfg.period(),
            bus.clone(),
        ));

        Ok(Pipeline::new_internal(
            self.cfg, bus, queue, producer, consumer, listener,
        ))
    }
}
