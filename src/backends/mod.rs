// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in components.
//!
//! Everything here is reachable by name through the
//! [`ComponentRegistry`](crate::config::ComponentRegistry):
//!
//! ```text
//! switchyard.module.<category>.<name>    modules
//! switchyard.function.module.<name>      queue functions
//! switchyard.protocol.<decode|encode>.json
//! ```
//!
//! # Stub Modules (Test-Only)
//! `stub` holds small modules used by the runtime's own tests: one that
//! accepts everything, one that rejects `"bad"` events, one recording its
//! hooks and a slow output module. It is not part of release builds.

pub mod functions;
pub mod modules;
pub mod protocols;
#[cfg(test)]
pub mod stub;
