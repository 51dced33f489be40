// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during topology document validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The document could not be parsed at all
    Parse {
        reason: String,
    },
    /// One of the required top-level sections is absent
    MissingSection {
        section: &'static str,
    },
    /// A module entry does not name the component to instantiate
    MissingComponent {
        module: String,
    },
    /// A module uses a name the router keeps for itself
    ReservedModuleName {
        module: String,
    },
    /// A routing rule does not have the `a.q -> b.q` shape
    MalformedRoute {
        route: String,
        reason: String,
    },
    /// A routing rule points at a module that is not declared
    UnknownModule {
        route: String,
        module: String,
    },
    /// Two routing rules share a queue endpoint
    DuplicateEndpoint {
        endpoint: String,
    },
    /// A module references a protocol instance that is not declared
    UnknownProtocol {
        module: String,
        protocol: String,
    },
    /// A module references a function instance that is not declared
    UnknownFunction {
        module: String,
        queue: String,
        function: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Parse { reason } => {
                write!(f, "Topology document could not be parsed: {}", reason)
            }
            ValidationError::MissingSection { section } => {
                write!(f, "Topology document is missing the '{}' section", section)
            }
            ValidationError::MissingComponent { module } => {
                write!(f, "Module '{}' does not name a component ('module' field)", module)
            }
            ValidationError::ReservedModuleName { module } => {
                write!(f, "Module name '{}' is reserved for internal use", module)
            }
            ValidationError::MalformedRoute { route, reason } => {
                write!(f, "Route '{}' is malformed: {}", route, reason)
            }
            ValidationError::UnknownModule { route, module } => {
                write!(
                    f,
                    "Route '{}' references module '{}' which does not exist",
                    route, module
                )
            }
            ValidationError::DuplicateEndpoint { endpoint } => {
                write!(f, "Queue endpoint '{}' appears in more than one route", endpoint)
            }
            ValidationError::UnknownProtocol { module, protocol } => {
                write!(
                    f,
                    "Module '{}' uses protocol '{}' which is not declared",
                    module, protocol
                )
            }
            ValidationError::UnknownFunction {
                module,
                queue,
                function,
            } => {
                write!(
                    f,
                    "Module '{}' binds function '{}' to queue '{}' but it is not declared",
                    module, function, queue
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
