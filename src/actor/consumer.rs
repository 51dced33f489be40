// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Consumer loops.
//!
//! One loop per consumed queue. Each event is handled inside its own error
//! boundary: whatever the handler returns, the loop moves on to the next
//! event. Output modules use a bounded worker pool instead of handling
//! events one after another.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::actor::context::ActorContext;
use crate::config::consts::{QUEUE_FAILED, QUEUE_SUCCESS};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::observability::messages::actor::{EventExpired, EventFailed, SubmitFailed};
use crate::queue::Queue;
use crate::traits::{EventFunction, Module};

/// Everything one consumer loop needs
#[derive(Clone)]
pub(crate) struct Consumer {
    pub ctx: ActorContext,
    pub module: Arc<dyn Module>,
    pub queue_name: String,
    pub queue: Arc<Queue>,
    pub functions: Arc<[Arc<dyn EventFunction>]>,
}

impl Consumer {
    /// Handle events in strict arrival order until the actor stops
    pub async fn run_sequential(self) {
        loop {
            let event = tokio::select! {
                biased;
                _ = self.ctx.stopped() => break,
                event = self.queue.get() => event,
            };
            self.process(event).await;
        }
    }

    /// Handle up to `parallel_streams` events at once until the actor stops.
    /// In-flight events are finished before returning.
    pub async fn run_pooled(self, parallel_streams: usize) {
        let permits = Arc::new(Semaphore::new(parallel_streams.max(1)));
        let mut in_flight = JoinSet::new();

        loop {
            while in_flight.try_join_next().is_some() {}

            let permit = tokio::select! {
                biased;
                _ = self.ctx.stopped() => break,
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };
            let event = tokio::select! {
                biased;
                _ = self.ctx.stopped() => break,
                event = self.queue.get() => event,
            };

            let worker = self.clone();
            in_flight.spawn(async move {
                worker.process(event).await;
                drop(permit);
            });
        }

        while in_flight.join_next().await.is_some() {}
    }

    /// One event through TTL accounting, queue functions, the handler and
    /// success/failure routing
    pub async fn process(&self, mut event: Event) {
        let name = self.ctx.name();
        event.ensure_tmp_namespace(name);
        let params = self.ctx.config().resolve(&event);

        if event.decrement_ttl().is_err() {
            self.ctx.logger().warning(
                EventExpired {
                    actor: name,
                    queue: &self.queue_name,
                    uuid: event.uuid(),
                }
                .to_string(),
            );
            return;
        }

        let outcome = match self.apply_functions(&mut event) {
            Ok(()) => {
                self.module
                    .consume(&self.ctx, &self.queue_name, &params, &mut event)
                    .await
            }
            Err(err) => Err(err),
        };

        let destination = match outcome {
            Ok(()) => QUEUE_SUCCESS,
            Err(err) => {
                let location = format!("{}.{}", name, self.queue_name);
                let message = err.to_string();
                event.set_error(name, &location, err.kind(), &message);
                self.ctx.logger().error(
                    EventFailed {
                        actor: name,
                        queue: &self.queue_name,
                        uuid: event.uuid(),
                        kind: err.kind(),
                        error: &message,
                    }
                    .to_string(),
                );
                QUEUE_FAILED
            }
        };

        if let Err(err) = self.ctx.submit(event, destination).await {
            self.ctx.logger().error(
                SubmitFailed {
                    actor: name,
                    queue: destination,
                    error: &err,
                }
                .to_string(),
            );
        }
    }

    fn apply_functions(&self, event: &mut Event) -> Result<(), ModuleError> {
        for function in self.functions.iter() {
            function.apply(event)?;
        }
        Ok(())
    }
}
