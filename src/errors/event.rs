// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while reading, mutating or (de)serializing events.

/// Errors produced by the event data model
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// Nothing is stored at the requested path
    #[error("no value found at '{0}'")]
    NotFound(String),

    /// The path targets a reserved root that cannot be changed or removed
    #[error("'{0}' is a protected field")]
    ProtectedField(String),

    /// A path segment runs into a value that cannot hold children
    #[error("path '{path}' conflicts with existing value at segment '{segment}'")]
    PathConflict { path: String, segment: String },

    /// The path itself is malformed or does not start at a reserved root
    #[error("invalid path '{0}'")]
    InvalidPath(String),

    /// Structurally wrong input: bad dump, incompatible merge, bad bulk append
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The hop budget of the event is exhausted
    #[error("event TTL expired in transit")]
    TtlExpired,

    /// The bulk event already holds `bulk_size` children
    #[error("bulk event is full ({0} items)")]
    BulkFull(usize),

    /// The template could not be parsed
    #[error("malformed template: {0}")]
    Template(String),
}

impl EventError {
    /// Short name of the error variant, used in event diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            EventError::NotFound(_) => "NotFound",
            EventError::ProtectedField(_) => "ProtectedField",
            EventError::PathConflict { .. } => "PathConflict",
            EventError::InvalidPath(_) => "InvalidPath",
            EventError::InvalidData(_) => "InvalidData",
            EventError::TtlExpired => "TtlExpired",
            EventError::BulkFull(_) => "BulkFull",
            EventError::Template(_) => "Template",
        }
    }
}
