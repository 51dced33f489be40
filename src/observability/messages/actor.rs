// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for actor lifecycle and per-event diagnostics.
//!
//! Lifecycle messages go straight to `tracing`. Per-event messages are
//! rendered and passed to the actor's logger.

use crate::errors::{ModuleError, QueueError};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Actor loops are running.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use switchyard::observability::messages::actor::ActorStarted;
///
/// let msg = ActorStarted {
///     actor: "ingest",
///     kind: "input",
///     consumers: 0,
///     background_jobs: 1,
/// };
///
/// assert!(msg.to_string().contains("ingest"));
/// ```
pub struct ActorStarted<'a> {
    pub actor: &'a str,
    pub kind: &'a str,
    pub consumers: usize,
    pub background_jobs: usize,
}

impl Display for ActorStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Started {} actor '{}': {} consumer(s), {} background job(s)",
            self.kind, self.actor, self.consumers, self.background_jobs
        )
    }
}

impl StructuredLog for ActorStarted<'_> {
    fn log(&self) {
        tracing::info!(
            actor = self.actor,
            kind = self.kind,
            consumers = self.consumers,
            background_jobs = self.background_jobs,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "actor",
            span_name = name,
            actor = self.actor,
            kind = self.kind,
        )
    }
}

/// Actor loops have exited and the post-hook ran.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ActorStopped<'a> {
    pub actor: &'a str,
}

impl Display for ActorStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stopped actor '{}'", self.actor)
    }
}

impl StructuredLog for ActorStopped<'_> {
    fn log(&self) {
        tracing::info!(actor = self.actor, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("actor_stopped", span_name = name, actor = self.actor)
    }
}

/// A loop did not finish its current event in time and was aborted.
///
/// # Log Level
/// `warn!` - Degraded shutdown, events may have been lost
pub struct TaskAbandoned<'a> {
    pub actor: &'a str,
    pub timeout: Duration,
}

impl Display for TaskAbandoned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Actor '{}' task did not finish within {:?}, aborting it",
            self.actor, self.timeout
        )
    }
}

impl StructuredLog for TaskAbandoned<'_> {
    fn log(&self) {
        tracing::warn!(
            actor = self.actor,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "task_abandoned",
            span_name = name,
            actor = self.actor,
            timeout = ?self.timeout,
        )
    }
}

/// An event ran out of hops and was dropped
pub struct EventExpired<'a> {
    pub actor: &'a str,
    pub queue: &'a str,
    pub uuid: &'a str,
}

impl Display for EventExpired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Event {} on '{}.{}' dropped: TTL expired",
            self.uuid, self.actor, self.queue
        )
    }
}

/// A handler or queue function rejected an event
pub struct EventFailed<'a> {
    pub actor: &'a str,
    pub queue: &'a str,
    pub uuid: &'a str,
    pub kind: &'a str,
    pub error: &'a str,
}

impl Display for EventFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Event {} on '{}.{}' failed ({}): {}",
            self.uuid, self.actor, self.queue, self.kind, self.error
        )
    }
}

/// An event could not be handed to a reserved queue
pub struct SubmitFailed<'a> {
    pub actor: &'a str,
    pub queue: &'a str,
    pub error: &'a QueueError,
}

impl Display for SubmitFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Actor '{}' could not submit to '{}': {}",
            self.actor, self.queue, self.error
        )
    }
}

/// A background job returned an error
pub struct BackgroundJobFailed<'a> {
    pub actor: &'a str,
    pub job: &'a str,
    pub error: &'a ModuleError,
}

impl Display for BackgroundJobFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Background job '{}' of actor '{}' failed: {}",
            self.job, self.actor, self.error
        )
    }
}
