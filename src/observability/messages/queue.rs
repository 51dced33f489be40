// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for queue wiring and draining.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A queue switched from fallthrough to enforcing mode.
///
/// # Log Level
/// `debug!` - Wiring detail
pub struct QueueEnforcing<'a> {
    pub queue: &'a str,
    pub capacity: usize,
}

impl Display for QueueEnforcing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queue '{}' now enforces its capacity of {}",
            self.queue, self.capacity
        )
    }
}

impl StructuredLog for QueueEnforcing<'_> {
    fn log(&self) {
        tracing::debug!(queue = self.queue, capacity = self.capacity, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("queue", span_name = name, queue = self.queue)
    }
}

/// Shutdown gave up waiting for queues to empty.
///
/// # Log Level
/// `warn!` - Events still buffered will not be processed
///
/// # Example
/// ```
/// use switchyard::observability::messages::queue::DrainTimedOut;
/// use std::time::Duration;
///
/// let msg = DrainTimedOut {
///     actor: "output",
///     remaining: 12,
///     timeout: Duration::from_secs(5),
/// };
///
/// assert!(msg.to_string().contains("12 event(s)"));
/// ```
pub struct DrainTimedOut<'a> {
    pub actor: &'a str,
    pub remaining: usize,
    pub timeout: Duration,
}

impl Display for DrainTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queues of '{}' still hold {} event(s) after {:?}, stopping anyway",
            self.actor, self.remaining, self.timeout
        )
    }
}

impl StructuredLog for DrainTimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            actor = self.actor,
            remaining = self.remaining,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "drain",
            span_name = name,
            actor = self.actor,
            remaining = self.remaining,
        )
    }
}
