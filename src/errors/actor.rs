// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ModuleError, QueueError};

/// Errors raised while constructing or driving an actor
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// A module declared as input/output lacks a parameter its kind requires
    #[error("actor '{actor}' is a {kind} module but is missing required parameter '{parameter}'")]
    MissingParameter {
        actor: String,
        kind: &'static str,
        parameter: &'static str,
    },

    #[error("actor '{actor}' failed to initialize: {reason}")]
    InitFailure { actor: String, reason: String },

    #[error("actor '{0}' has been stopped and cannot be started again")]
    AlreadyStopped(String),

    #[error("actor '{actor}' lifecycle hook failed: {source}")]
    Hook {
        actor: String,
        #[source]
        source: ModuleError,
    },

    #[error(transparent)]
    Queue(#[from] QueueError),
}
