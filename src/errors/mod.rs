// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod actor;
mod component;
mod config;
mod event;
mod module;
mod queue;
mod router;

pub use actor::ActorError;
pub use component::ComponentError;
pub use config::ValidationError;
pub use event::EventError;
pub use module::ModuleError;
pub use queue::QueueError;
pub use router::RouterError;
