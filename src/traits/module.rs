// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::fmt;

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;

/// Role of a module in a topology. Input and output modules must carry the
/// parameters their role requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Input,
    Output,
    Flow,
    Process,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Input => "input",
            ModuleKind::Output => "output",
            ModuleKind::Flow => "flow",
            ModuleKind::Process => "process",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The processing step an actor runs.
///
/// The actor owns queues, loops, logging and metrics; a module only declares
/// which queues it needs and what to do with one event. `consume` is called
/// once per event taken from a queue returned by `consumers`. Returning an
/// error routes the event to `failed`; returning `Ok` routes it to `success`.
#[async_trait]
pub trait Module: Send + Sync {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Flow
    }

    /// Queues created when the actor is constructed
    fn queues(&self) -> Vec<String> {
        Vec::new()
    }

    /// Queues to consume. Evaluated at start, after wiring, so a module may
    /// consume whatever queues the router created for it.
    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        Vec::new()
    }

    /// Names of long-running jobs started next to the consumer loops
    fn background_jobs(&self) -> Vec<String> {
        Vec::new()
    }

    async fn consume(
        &self,
        ctx: &ActorContext,
        queue: &str,
        params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError>;

    /// Body of the background job `job`. Cancelled when the actor stops.
    async fn run_background(&self, _ctx: &ActorContext, _job: &str) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn pre_hook(&self, _ctx: &ActorContext) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn post_hook(&self, _ctx: &ActorContext) -> Result<(), ModuleError> {
        Ok(())
    }
}
