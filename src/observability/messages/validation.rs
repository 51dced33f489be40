// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for topology document loading and validation.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A topology document was read and parsed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use switchyard::observability::messages::validation::TopologyLoaded;
///
/// let msg = TopologyLoaded {
///     path: "configs/pipeline.yaml",
///     modules: 3,
///     routes: 2,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Loaded topology 'configs/pipeline.yaml': 3 module(s), 2 route(s)"
/// );
/// ```
pub struct TopologyLoaded<'a> {
    pub path: &'a str,
    pub modules: usize,
    pub routes: usize,
}

impl Display for TopologyLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded topology '{}': {} module(s), {} route(s)",
            self.path, self.modules, self.routes
        )
    }
}

impl StructuredLog for TopologyLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            modules = self.modules,
            routes = self.routes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("topology", span_name = name, path = self.path)
    }
}

/// One problem found in a topology document.
///
/// # Log Level
/// `error!` - Startup will be refused
pub struct TopologyInvalid<'a> {
    pub error: &'a ValidationError,
}

impl Display for TopologyInvalid<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invalid topology: {}", self.error)
    }
}

impl StructuredLog for TopologyInvalid<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("topology_invalid", span_name = name)
    }
}
