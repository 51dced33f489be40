// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Queues and the per-actor pool that owns them.

mod pool;
#[allow(clippy::module_inception)]
mod queue;
mod stats;

pub use pool::QueuePool;
pub use queue::Queue;
pub use stats::QueueStats;
