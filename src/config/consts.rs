// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Hop budget given to every freshly created event
pub const DEFAULT_TTL: i64 = 254;
/// Capacity of every queue unless the actor configuration says otherwise
pub const DEFAULT_QUEUE_SIZE: usize = 100;
/// Interval between two rounds of queue metrics
pub const DEFAULT_FREQUENCY: Duration = Duration::from_secs(1);
/// Capacity of a bulk event when none is given
pub const DEFAULT_BULK_SIZE: usize = 100;
/// Upper bound on how long shutdown waits for a queue to drain
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
/// Pause between two attempts to submit into a full queue
pub const SUBMIT_BACKOFF: Duration = Duration::from_millis(10);
/// Poll interval used while waiting for queues to drain
pub const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub const QUEUE_SUCCESS: &str = "success";
pub const QUEUE_FAILED: &str = "failed";
pub const QUEUE_LOGS: &str = "logs";
pub const QUEUE_METRICS: &str = "metrics";

/// Queue names every pool owns and user code can never create
pub const RESERVED_QUEUES: [&str; 4] = [QUEUE_LOGS, QUEUE_METRICS, QUEUE_SUCCESS, QUEUE_FAILED];

/// Internal actor collecting the `logs` queue of every other actor
pub const LOGS_ACTOR: &str = "_logs";
/// Internal actor collecting the `metrics` queue of every other actor
pub const METRICS_ACTOR: &str = "_metrics";
/// Output queue of the internal actors. Their input queues are named after
/// the actors they collect from, so no module may take this name.
pub const INTERNAL_OUTBOX: &str = "outbox";

/// Namespace every built-in component name starts with
pub const COMPONENT_NAMESPACE: &str = "switchyard";
