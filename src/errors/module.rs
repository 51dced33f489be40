// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors a module handler may return for a single event.
//!
//! Anything returned from a handler is caught at the event boundary: the
//! event is annotated and routed to the `failed` queue, the actor keeps going.

use crate::errors::{EventError, QueueError};

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("parameter '{name}': {reason}")]
    Parameter { name: String, reason: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModuleError {
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ModuleError::Parameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Name recorded as the diagnostic `type` on failed events
    pub fn kind(&self) -> &'static str {
        match self {
            ModuleError::Event(e) => e.kind(),
            ModuleError::Queue(e) => e.kind(),
            ModuleError::Parameter { .. } => "ParameterError",
            ModuleError::Protocol(_) => "ProtocolError",
            ModuleError::Io(_) => "IoError",
            ModuleError::Other(_) => "ModuleError",
        }
    }
}
