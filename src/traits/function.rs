// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ModuleError;
use crate::event::Event;

/// A small transformation bound to one queue of an actor. Functions run in
/// declared order on every event taken from that queue, before the handler.
pub trait EventFunction: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, event: &mut Event) -> Result<(), ModuleError>;
}
