// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for component lookup and instantiation.

use std::error::Error;
use std::fmt;

/// Errors that can occur while resolving a component name
#[derive(Debug)]
pub enum ComponentError {
    /// Name is not `namespace.type.category.name`
    InvalidName { name: String },

    /// Nothing is registered under this name
    NotFound { name: String },

    /// The component constructor rejected its arguments
    Construction { name: String, reason: String },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::InvalidName { name } => write!(
                f,
                "Component name '{}' is invalid. Expected 'namespace.type.category.name'.",
                name
            ),
            ComponentError::NotFound { name } => {
                write!(f, "No component registered under '{}'", name)
            }
            ComponentError::Construction { name, reason } => {
                write!(f, "Failed to construct component '{}': {}", name, reason)
            }
        }
    }
}

impl Error for ComponentError {}
