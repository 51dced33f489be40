// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::event::Event;

/// Errors produced by queues and queue pools
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Enforcing queue at capacity. The rejected event is handed back.
    #[error("queue '{queue}' is full (capacity {capacity})")]
    Full {
        queue: String,
        capacity: usize,
        event: Box<Event>,
    },

    #[error("queue '{0}' is empty")]
    Empty(String),

    #[error("queue '{0}' does not exist")]
    Missing(String),

    #[error("queue name '{0}' is reserved")]
    Reserved(String),

    #[error("queue '{0}' already exists")]
    AlreadyExists(String),
}

impl QueueError {
    /// Recover the event carried by a `Full` error
    pub fn into_event(self) -> Option<Event> {
        match self {
            QueueError::Full { event, .. } => Some(*event),
            _ => None,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, QueueError::Full { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueueError::Empty(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QueueError::Full { .. } => "QueueFull",
            QueueError::Empty(_) => "QueueEmpty",
            QueueError::Missing(_) => "QueueMissing",
            QueueError::Reserved(_) => "ReservedQueueName",
            QueueError::AlreadyExists(_) => "QueueExists",
        }
    }
}
