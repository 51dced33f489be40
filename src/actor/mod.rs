// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Actor runtime.
//!
//! An [`Actor`] wraps a [`Module`] with a queue pool, one consumer loop per
//! consumed queue, a metrics loop and any background jobs the module asks
//! for. Lifecycle is one way: Constructed, Started, Stopped.

pub mod config;
pub mod context;
pub mod contract;
mod consumer;
pub mod logging;
pub mod metrics;

pub use config::{ActorConfig, ConfigValue, Parameters};
pub use context::ActorContext;
pub use logging::{Logger, Severity};

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::config::consts::DEFAULT_DRAIN_TIMEOUT;
use crate::errors::ActorError;
use crate::observability::messages::actor::{
    ActorStarted, ActorStopped, BackgroundJobFailed, TaskAbandoned,
};
use crate::observability::messages::StructuredLog;
use crate::queue::{Queue, QueuePool};
use crate::traits::{Module, ModuleKind};
use consumer::Consumer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Constructed,
    Started,
    Stopped,
}

pub struct Actor {
    context: ActorContext,
    module: Arc<dyn Module>,
    kind: ModuleKind,
    state: Mutex<ActorState>,
    lifecycle: tokio::sync::Mutex<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shutdown_timeout: Duration,
}

impl Actor {
    /// Build an actor around `module`. Input and output modules missing a
    /// required parameter are rejected here, before anything runs.
    pub fn new(config: ActorConfig, module: Arc<dyn Module>) -> Result<Self, ActorError> {
        let kind = module.kind();
        contract::check_required(&config, kind)?;

        let pool = Arc::new(QueuePool::new(config.size));
        for queue in module.queues() {
            pool.create_queue(&queue)?;
        }
        for queue in config.functions.keys() {
            pool.ensure_queue(queue);
        }

        let actor = Self {
            context: ActorContext::new(Arc::new(config), pool),
            module,
            kind,
            state: Mutex::new(ActorState::Constructed),
            lifecycle: tokio::sync::Mutex::new(()),
            tasks: Mutex::new(Vec::new()),
            shutdown_timeout: DEFAULT_DRAIN_TIMEOUT,
        };
        actor.parallel_streams()?;
        Ok(actor)
    }

    /// Upper bound on how long `stop` waits for a loop to finish its
    /// current event before abandoning it
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        self.context.name()
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn pool(&self) -> &Arc<QueuePool> {
        self.context.pool()
    }

    pub fn context(&self) -> &ActorContext {
        &self.context
    }

    pub fn state(&self) -> ActorState {
        *self.state.lock()
    }

    /// Queues the module consumes, as currently wired
    pub fn consumed_queues(&self) -> Vec<Arc<Queue>> {
        self.module
            .consumers(self.pool())
            .iter()
            .filter_map(|name| self.pool().get_queue(name).ok())
            .collect()
    }

    /// Run the pre-hook, then start every loop. Starting twice is a no-op;
    /// a stopped actor cannot be started again.
    pub async fn start(&self) -> Result<(), ActorError> {
        let _guard = self.lifecycle.lock().await;
        match self.state() {
            ActorState::Started => return Ok(()),
            ActorState::Stopped => return Err(ActorError::AlreadyStopped(self.name().to_string())),
            ActorState::Constructed => {}
        }

        self.module
            .pre_hook(&self.context)
            .await
            .map_err(|source| ActorError::Hook {
                actor: self.name().to_string(),
                source,
            })?;

        let consumers = self.build_consumers()?;
        let jobs = self.module.background_jobs();
        let parallel_streams = self.parallel_streams()?;

        let mut tasks = Vec::with_capacity(consumers.len() + jobs.len() + 1);
        for consumer in consumers.iter().cloned() {
            tasks.push(match parallel_streams {
                Some(streams) => tokio::spawn(consumer.run_pooled(streams)),
                None => tokio::spawn(consumer.run_sequential()),
            });
        }
        for job in jobs.iter().cloned() {
            tasks.push(tokio::spawn(run_background(
                self.context.clone(),
                self.module.clone(),
                job,
            )));
        }
        tasks.push(tokio::spawn(metrics::run(self.context.clone())));

        *self.tasks.lock() = tasks;
        *self.state.lock() = ActorState::Started;

        ActorStarted {
            actor: self.name(),
            kind: self.kind.as_str(),
            consumers: consumers.len(),
            background_jobs: jobs.len(),
        }
        .log();
        Ok(())
    }

    /// Signal every loop to stop, wait for in-flight work, then run the
    /// post-hook. Idempotent. The actor is Stopped even when the post-hook
    /// fails.
    pub async fn stop(&self) -> Result<(), ActorError> {
        let _guard = self.lifecycle.lock().await;
        match self.state() {
            ActorState::Stopped => return Ok(()),
            ActorState::Constructed => {
                *self.state.lock() = ActorState::Stopped;
                return Ok(());
            }
            ActorState::Started => {}
        }

        self.context.cancellation().cancel();
        let tasks: Vec<_> = std::mem::take(&mut *self.tasks.lock());
        for mut task in tasks {
            if tokio::time::timeout(self.shutdown_timeout, &mut task).await.is_err() {
                TaskAbandoned {
                    actor: self.name(),
                    timeout: self.shutdown_timeout,
                }
                .log();
                task.abort();
            }
        }

        *self.state.lock() = ActorState::Stopped;
        let hook = self.module.post_hook(&self.context).await;
        ActorStopped { actor: self.name() }.log();
        hook.map_err(|source| ActorError::Hook {
            actor: self.name().to_string(),
            source,
        })
    }

    fn build_consumers(&self) -> Result<Vec<Consumer>, ActorError> {
        let config = self.context.config();
        self.module
            .consumers(self.pool())
            .into_iter()
            .map(|queue_name| {
                let queue = self.pool().get_queue(&queue_name)?;
                let functions = config
                    .functions
                    .get(&queue_name)
                    .cloned()
                    .unwrap_or_default();
                Ok(Consumer {
                    ctx: self.context.clone(),
                    module: self.module.clone(),
                    queue_name,
                    queue,
                    functions: functions.into(),
                })
            })
            .collect()
    }

    /// Worker count for output modules, `None` for sequential consumption.
    /// Zero means one worker; more than a semaphore can hold is rejected.
    fn parallel_streams(&self) -> Result<Option<usize>, ActorError> {
        if self.kind != ModuleKind::Output {
            return Ok(None);
        }
        let init_failure = |reason: String| ActorError::InitFailure {
            actor: self.name().to_string(),
            reason,
        };
        let streams = self
            .context
            .parameters()
            .u64_or(contract::PARALLEL_STREAMS, 1)
            .map_err(|err| init_failure(err.to_string()))?;
        let streams = usize::try_from(streams)
            .ok()
            .filter(|n| *n <= Semaphore::MAX_PERMITS)
            .ok_or_else(|| {
                init_failure(format!(
                    "{} must be at most {}, got {}",
                    contract::PARALLEL_STREAMS,
                    Semaphore::MAX_PERMITS,
                    streams
                ))
            })?;
        Ok(Some(streams.max(1)))
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name())
            .field("kind", &self.kind)
            .field("state", &self.state())
            .finish()
    }
}

async fn run_background(ctx: ActorContext, module: Arc<dyn Module>, job: String) {
    let outcome = tokio::select! {
        biased;
        _ = ctx.stopped() => Ok(()),
        outcome = module.run_background(&ctx, &job) => outcome,
    };
    if let Err(err) = outcome {
        ctx.logger().error(
            BackgroundJobFailed {
                actor: ctx.name(),
                job: &job,
                error: &err,
            }
            .to_string(),
        );
    }
}

#[cfg(test)]
mod tests;
