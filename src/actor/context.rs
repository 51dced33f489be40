// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::actor::config::{ActorConfig, Parameters};
use crate::actor::logging::Logger;
use crate::config::consts::SUBMIT_BACKOFF;
use crate::errors::QueueError;
use crate::event::Event;
use crate::queue::QueuePool;

/// What a module sees of its actor: name, queues, logger, configuration
/// and the stop signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ActorContext {
    config: Arc<ActorConfig>,
    pool: Arc<QueuePool>,
    logger: Logger,
    cancel: CancellationToken,
}

impl ActorContext {
    pub(crate) fn new(config: Arc<ActorConfig>, pool: Arc<QueuePool>) -> Self {
        let logger = Logger::new(config.name.clone(), pool.clone());
        Self {
            config,
            pool,
            logger,
            cancel: CancellationToken::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<QueuePool> {
        &self.pool
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Parameters with templates rendered against an empty context
    pub fn parameters(&self) -> Parameters {
        self.config.static_parameters()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the actor has been told to stop
    pub async fn stopped(&self) {
        self.cancel.cancelled().await
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Deliver `event` to `queue`, waiting while the queue is full.
    ///
    /// This is the only place backpressure is applied: a full downstream
    /// queue keeps the caller here until the consumer catches up.
    pub async fn submit(&self, event: Event, queue: &str) -> Result<(), QueueError> {
        let target = self.pool.get_queue(queue)?;
        let mut pending = event;
        loop {
            match target.put(pending) {
                Ok(()) => return Ok(()),
                Err(QueueError::Full { event, .. }) => {
                    pending = *event;
                    tokio::time::sleep(SUBMIT_BACKOFF).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Sleep for `duration` unless the actor stops first. Returns false when
    /// interrupted by a stop.
    pub async fn sleep(&self, duration: std::time::Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}
