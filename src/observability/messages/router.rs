// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for topology construction and router lifecycle.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An actor was constructed and added to the router.
///
/// # Log Level
/// `debug!` - Topology construction detail
pub struct ModuleRegistered<'a> {
    pub name: &'a str,
    pub component: &'a str,
}

impl Display for ModuleRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registered module '{}' ({})", self.name, self.component)
    }
}

impl StructuredLog for ModuleRegistered<'_> {
    fn log(&self) {
        tracing::debug!(module = self.name, component = self.component, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "module",
            span_name = name,
            module = self.name,
            component = self.component,
        )
    }
}

/// Two queue endpoints now share one queue.
///
/// # Log Level
/// `debug!` - Topology construction detail
pub struct QueuesConnected<'a> {
    pub source: &'a str,
    pub destination: &'a str,
}

impl Display for QueuesConnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Connected '{}' -> '{}'", self.source, self.destination)
    }
}

impl StructuredLog for QueuesConnected<'_> {
    fn log(&self) {
        tracing::debug!(
            source = self.source,
            destination = self.destination,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "connection",
            span_name = name,
            source = self.source,
            destination = self.destination,
        )
    }
}

/// Router is starting its actors.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RouterStarting {
    pub actors: usize,
    pub connections: usize,
}

impl Display for RouterStarting {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting router: {} actor(s), {} connection(s)",
            self.actors, self.connections
        )
    }
}

impl StructuredLog for RouterStarting {
    fn log(&self) {
        tracing::info!(
            actors = self.actors,
            connections = self.connections,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "router",
            span_name = name,
            actors = self.actors,
            connections = self.connections,
        )
    }
}

/// Router computed its shutdown order.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RouterStopping<'a> {
    pub order: &'a [String],
    pub log_group: &'a [String],
}

impl Display for RouterStopping<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stopping router: {} then log group {}",
            self.order.join(", "),
            self.log_group.join(", ")
        )
    }
}

impl StructuredLog for RouterStopping<'_> {
    fn log(&self) {
        tracing::info!(
            order = %self.order.join(","),
            log_group = %self.log_group.join(","),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("router_stop", span_name = name)
    }
}

/// An actor failed to stop cleanly. Shutdown continues with the next one.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ActorStopFailed<'a> {
    pub actor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ActorStopFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Actor '{}' did not stop cleanly: {}", self.actor, self.error)
    }
}

impl StructuredLog for ActorStopFailed<'_> {
    fn log(&self) {
        tracing::error!(actor = self.actor, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("actor_stop", span_name = name, actor = self.actor)
    }
}

/// Every actor has stopped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RouterStopped {
    pub actors: usize,
}

impl Display for RouterStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Router stopped: {} actor(s) shut down", self.actors)
    }
}

impl StructuredLog for RouterStopped {
    fn log(&self) {
        tracing::info!(actors = self.actors, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("router_stopped", span_name = name, actors = self.actors)
    }
}
