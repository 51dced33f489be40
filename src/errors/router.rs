// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ActorError, ComponentError, QueueError, ValidationError};

/// Wiring and topology errors. All of them are raised before `start()`;
/// wiring a started topology fails with `AlreadyStarted`.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("no module named '{0}' is registered")]
    MissingModule(String),

    #[error("a module named '{0}' is already registered")]
    DuplicateModule(String),

    #[error("'{name}' cannot be used as a module name: {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("module '{0}' has already been started; the topology can no longer change")]
    AlreadyStarted(String),

    #[error("queue endpoint '{0}' is already connected")]
    AlreadyConnected(String),

    #[error("'{0}' is not a qualified queue name (expected 'actor.queue')")]
    InvalidQualifiedName(String),

    #[error("module '{name}' failed to initialize: {source}")]
    ModuleInit {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("topology validation failed:\n{}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
