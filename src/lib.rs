// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod actor;      // actor runtime: lifecycle, consumer loops, logging, metrics
pub mod backends;   // built-in modules, functions and protocols
pub mod config;     // topology documents + component registry
pub mod errors;     // error handling
pub mod event;      // event data model
pub mod observability;
pub mod queue;      // bounded queues and per-actor pools
pub mod router;     // wiring and topology lifecycle
pub mod traits;     // module, function and protocol abstractions
