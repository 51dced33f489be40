// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topology owner.
//!
//! The [`Router`] builds actors from component names, wires queue endpoints
//! together and drives the start and stop of the whole topology.
//!
//! Connecting `a.outbox -> b.inbox` does not copy events between queues.
//! The destination pool's `inbox` entry is pointed at the source's `outbox`
//! instance, so both names refer to one [`Queue`] and backpressure reaches
//! the producer directly.
//!
//! Two internal funnel actors are always present. `_logs` collects the
//! `logs` queue of every registered actor and `_metrics` collects their
//! `metrics` queue. Routes may read from `_logs.outbox` and
//! `_metrics.outbox` like from any other queue.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use switchyard::actor::ActorConfig;
//! use switchyard::config::ComponentRegistry;
//! use switchyard::router::{Router, RuntimeOptions};
//!
//! let mut router = Router::new(Arc::new(ComponentRegistry::builtin()), RuntimeOptions::default()).unwrap();
//! router
//!     .register_module("switchyard.module.flow.fanout", ActorConfig::new("split"))
//!     .unwrap();
//! router
//!     .register_module("switchyard.module.flow.funnel", ActorConfig::new("join"))
//!     .unwrap();
//! router.connect_queue("split.left", "join.left").unwrap();
//!
//! assert!(router.get_children("split").unwrap().contains("join"));
//! assert!(router.connect_queue("split.left", "join.other").is_err());
//! ```

pub mod graph;


pub use graph::{Connection, ConnectionGraph, Endpoint};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::actor::{Actor, ActorConfig, ActorState};
use crate::backends::modules::Funnel;
use crate::config::consts::{
    DEFAULT_DRAIN_TIMEOUT, DEFAULT_FREQUENCY, DEFAULT_QUEUE_SIZE, DRAIN_POLL_INTERVAL,
    INTERNAL_OUTBOX, LOGS_ACTOR, METRICS_ACTOR, QUEUE_LOGS, QUEUE_METRICS,
};
use crate::config::{ComponentResolver, RuntimeBuilder, TopologyConfig};
use crate::errors::{QueueError, RouterError};
use crate::observability::messages::queue::{DrainTimedOut, QueueEnforcing};
use crate::observability::messages::router::{
    ActorStopFailed, ModuleRegistered, QueuesConnected, RouterStarting, RouterStopped,
    RouterStopping,
};
use crate::observability::messages::StructuredLog;
use crate::queue::{Queue, QueuePool};
use crate::traits::Module;

/// Settings shared by every actor the router builds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeOptions {
    pub queue_size: usize,
    pub frequency: Duration,
    /// Bound on every wait for queues to drain during `stop`
    pub drain_timeout: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            frequency: DEFAULT_FREQUENCY,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

pub struct Router {
    resolver: Arc<dyn ComponentResolver>,
    options: RuntimeOptions,
    actors: BTreeMap<String, Arc<Actor>>,
    graph: ConnectionGraph,
}

impl Router {
    /// An empty topology holding only the internal `_logs` and `_metrics`
    /// actors
    pub fn new(
        resolver: Arc<dyn ComponentResolver>,
        options: RuntimeOptions,
    ) -> Result<Self, RouterError> {
        let mut router = Self {
            resolver,
            options,
            actors: BTreeMap::new(),
            graph: ConnectionGraph::new(),
        };
        for name in [LOGS_ACTOR, METRICS_ACTOR] {
            let config = router.actor_config(name);
            router.insert_actor(config, Arc::new(Funnel))?;
        }
        Ok(router)
    }

    /// Load-time entry point: validate `topology` and build it with the
    /// built-in components
    pub fn from_config(topology: &TopologyConfig) -> Result<Self, RouterError> {
        RuntimeBuilder::from_config(topology, Arc::new(crate::config::ComponentRegistry::builtin()))
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn actor(&self, name: &str) -> Option<&Arc<Actor>> {
        self.actors.get(name)
    }

    /// Every actor name, internal actors included, sorted
    pub fn actor_names(&self) -> Vec<&str> {
        self.actors.keys().map(String::as_str).collect()
    }

    pub fn connections(&self) -> &[Connection] {
        self.graph.connections()
    }

    /// Resolve `component`, build it from the static parameters of `config`
    /// and register the resulting actor
    pub fn register_module(&mut self, component: &str, config: ActorConfig) -> Result<(), RouterError> {
        let constructor = self.resolver.resolve_module(component)?;
        let module = constructor(&config.static_parameters()).map_err(|source| {
            RouterError::ModuleInit {
                name: config.name.clone(),
                source: Box::new(source),
            }
        })?;
        let name = config.name.clone();
        self.register_actor(config, module)?;
        ModuleRegistered {
            name: &name,
            component,
        }
        .log();
        Ok(())
    }

    /// Register an already constructed module under `config.name` and
    /// wire its `logs` and `metrics` queues to the internal actors
    pub fn register_actor(&mut self, config: ActorConfig, module: Arc<dyn Module>) -> Result<(), RouterError> {
        check_module_name(&config.name)?;
        if self.actors.contains_key(&config.name) {
            return Err(RouterError::DuplicateModule(config.name));
        }
        // the new actor would be wired into the running internal actors
        self.ensure_constructed(LOGS_ACTOR)?;
        self.ensure_constructed(METRICS_ACTOR)?;

        let name = config.name.clone();
        self.insert_actor(config, module)?;
        self.connect(
            Endpoint::new(&name, QUEUE_LOGS),
            Endpoint::new(LOGS_ACTOR, &name),
            true,
        )?;
        self.connect(
            Endpoint::new(&name, QUEUE_METRICS),
            Endpoint::new(METRICS_ACTOR, &name),
            true,
        )
    }

    /// Make `destination` share the queue behind `source`. Both names are
    /// `actor.queue`; missing queues are created on either side.
    pub fn connect_queue(&mut self, source: &str, destination: &str) -> Result<(), RouterError> {
        let source = Endpoint::parse(source)?;
        let destination = Endpoint::parse(destination)?;
        if QueuePool::is_reserved(&destination.queue) {
            return Err(QueueError::Reserved(destination.to_string()).into());
        }
        self.connect(source, destination, false)
    }

    /// Every actor downstream of `name`, following all connections
    pub fn get_children(&self, name: &str) -> Result<BTreeSet<String>, RouterError> {
        if !self.actors.contains_key(name) {
            return Err(RouterError::MissingModule(name.to_string()));
        }
        Ok(self.graph.children(name, true))
    }

    /// Start every actor. Consumers start before the actors feeding them.
    pub async fn start(&self) -> Result<(), RouterError> {
        RouterStarting {
            actors: self.actors.len(),
            connections: self.graph.connections().len(),
        }
        .log();

        let (order, log_group) = self.stop_order();
        for name in log_group.iter().rev().chain(order.iter().rev()) {
            if let Some(actor) = self.actors.get(name) {
                actor.start().await?;
            }
        }
        Ok(())
    }

    /// Stop producers before consumers, waiting for each actor's consumed
    /// queues to drain first. The log sink and everything downstream of it
    /// stop last, once every `logs` queue is empty. Every actor is stopped
    /// even when some fail; the first failure is returned.
    pub async fn stop(&self) -> Result<(), RouterError> {
        let (order, log_group) = self.stop_order();
        RouterStopping {
            order: &order,
            log_group: &log_group,
        }
        .log();

        let mut first_error = None;
        for name in &order {
            if let Err(err) = self.stop_actor(name).await {
                first_error.get_or_insert(err);
            }
        }

        let logs: Vec<Arc<Queue>> = self
            .actors
            .values()
            .filter_map(|actor| actor.pool().get_queue(QUEUE_LOGS).ok())
            .collect();
        self.wait_for_drain(LOGS_ACTOR, &logs).await;

        for name in &log_group {
            if let Err(err) = self.stop_actor(name).await {
                first_error.get_or_insert(err);
            }
        }

        RouterStopped {
            actors: self.actors.len(),
        }
        .log();
        first_error.map_or(Ok(()), Err)
    }

    /// `(everything else, log group)`, each in topological order
    fn stop_order(&self) -> (Vec<String>, Vec<String>) {
        let mut log_group = self.graph.children(LOGS_ACTOR, false);
        log_group.insert(LOGS_ACTOR.to_string());
        let others: BTreeSet<String> = self
            .actors
            .keys()
            .filter(|name| !log_group.contains(*name))
            .cloned()
            .collect();
        (
            self.graph.topological_order(&others, false),
            self.graph.topological_order(&log_group, false),
        )
    }

    async fn stop_actor(&self, name: &str) -> Result<(), RouterError> {
        let Some(actor) = self.actors.get(name) else {
            return Ok(());
        };
        if actor.state() == ActorState::Started {
            self.wait_for_drain(name, &actor.consumed_queues()).await;
        }
        actor.stop().await.map_err(|err| {
            ActorStopFailed {
                actor: name,
                error: &err,
            }
            .log();
            RouterError::from(err)
        })
    }

    async fn wait_for_drain(&self, actor: &str, queues: &[Arc<Queue>]) {
        let timeout = self.options.drain_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            let remaining: usize = queues.iter().map(|queue| queue.size()).sum();
            if remaining == 0 {
                return;
            }
            if Instant::now() >= deadline {
                DrainTimedOut {
                    actor,
                    remaining,
                    timeout,
                }
                .log();
                return;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }

    fn connect(&mut self, source: Endpoint, destination: Endpoint, internal: bool) -> Result<(), RouterError> {
        let source_actor = self.ensure_constructed(&source.actor)?;
        let destination_actor = self.ensure_constructed(&destination.actor)?;
        self.graph.add(Connection {
            source: source.clone(),
            destination: destination.clone(),
            internal,
        })?;

        let queue = source_actor.pool().ensure_queue(&source.queue);
        destination_actor.pool().ensure_queue(&destination.queue);
        destination_actor
            .pool()
            .replace(&destination.queue, queue.clone());

        queue.disable_fallthrough();
        QueueEnforcing {
            queue: &source.to_string(),
            capacity: queue.capacity(),
        }
        .log();
        QueuesConnected {
            source: &source.to_string(),
            destination: &destination.to_string(),
        }
        .log();
        Ok(())
    }

    fn existing(&self, name: &str) -> Result<Arc<Actor>, RouterError> {
        self.actors
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::MissingModule(name.to_string()))
    }

    /// Consumers hold on to the queues they were started with, so a running
    /// actor cannot be rewired
    fn ensure_constructed(&self, name: &str) -> Result<Arc<Actor>, RouterError> {
        let actor = self.existing(name)?;
        if actor.state() != ActorState::Constructed {
            return Err(RouterError::AlreadyStarted(name.to_string()));
        }
        Ok(actor)
    }

    fn actor_config(&self, name: &str) -> ActorConfig {
        ActorConfig::new(name)
            .with_size(self.options.queue_size)
            .with_frequency(self.options.frequency)
    }

    fn insert_actor(&mut self, config: ActorConfig, module: Arc<dyn Module>) -> Result<(), RouterError> {
        let name = config.name.clone();
        let actor = Actor::new(config, module)?.with_shutdown_timeout(self.options.drain_timeout);
        self.actors.insert(name, Arc::new(actor));
        Ok(())
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("actors", &self.actor_names())
            .field("connections", &self.graph.connections().len())
            .finish()
    }
}

/// Names must be usable as the first half of `actor.queue` and may not
/// clash with internal actors or reserved queue names
fn check_module_name(name: &str) -> Result<(), RouterError> {
    let reason = if name.trim().is_empty() {
        "empty"
    } else if name.contains('.') {
        "contains '.'"
    } else if name == LOGS_ACTOR || name == METRICS_ACTOR {
        "reserved for an internal actor"
    } else if name == INTERNAL_OUTBOX {
        "clashes with the output queue of the internal actors"
    } else if QueuePool::is_reserved(name) {
        "reserved queue name"
    } else {
        return Ok(());
    };
    Err(RouterError::InvalidModuleName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
