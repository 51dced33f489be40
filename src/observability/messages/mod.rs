// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a small struct implementing `Display` so log texts live
//! in one place instead of being scattered through the runtime as format
//! strings.
//!
//! # Organization
//!
//! * `actor` - actor lifecycle and per-event diagnostics
//! * `queue` - queue wiring and draining
//! * `router` - topology construction, start and shutdown ordering
//! * `validation` - topology document loading and validation
//!
//! # Usage Pattern
//!
//! Messages that only go to `tracing` implement [`StructuredLog`] and are
//! emitted with `.log()`, which attaches their fields to the record.
//! Per-event diagnostics are formatted with `to_string()` and handed to the
//! actor's [`Logger`](crate::actor::Logger) so they also reach the `logs`
//! queue.
//!
//! ```rust
//! use switchyard::observability::messages::router::QueuesConnected;
//! use switchyard::observability::messages::StructuredLog;
//!
//! let msg = QueuesConnected {
//!     source: "input.outbox",
//!     destination: "output.inbox",
//! };
//!
//! msg.log();
//! assert_eq!(msg.to_string(), "Connected 'input.outbox' -> 'output.inbox'");
//! ```

use tracing::Span;

pub mod actor;
pub mod queue;
pub mod router;
pub mod validation;

/// A message that knows its own log level and structured fields
pub trait StructuredLog {
    /// Emit the message at its level with its fields attached
    fn log(&self);

    /// A span carrying the message fields, for wrapping a unit of work
    fn span(&self, name: &str) -> Span;
}
