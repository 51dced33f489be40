// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::{Module, ModuleKind};

const INBOX: &str = "inbox";

/// Accepts and discards everything on `inbox`
#[derive(Debug, Default)]
pub struct Null;

impl Null {
    pub fn from_parameters(_params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self)
    }
}

#[async_trait]
impl Module for Null {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Output
    }

    fn queues(&self) -> Vec<String> {
        vec![INBOX.into()]
    }

    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        vec![INBOX.into()]
    }

    async fn consume(
        &self,
        _ctx: &ActorContext,
        _queue: &str,
        _params: &Parameters,
        _event: &mut Event,
    ) -> Result<(), ModuleError> {
        Ok(())
    }
}
