// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability for the runtime.
//!
//! Diagnostics flow through `tracing`. Message texts are centralized in
//! [`messages`] as `Display` structs so the runtime never formats log text
//! inline.
//!
//! # Usage
//!
//! ```rust
//! use switchyard::observability::messages::actor::EventExpired;
//!
//! let msg = EventExpired {
//!     actor: "router",
//!     queue: "inbox",
//!     uuid: "7c1f",
//! };
//!
//! tracing::warn!("{}", msg);
//! ```

pub mod messages;

/// Install a `tracing-subscriber` formatter filtered by `RUST_LOG`
/// (default `info`). Safe to call more than once.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
