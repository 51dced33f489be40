// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::actor::contract::select_payload;
use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::{Module, ModuleKind, Protocol};

const INBOX: &str = "inbox";

/// Writes the selected payload of every event to standard output, one
/// line per event. Encoded with the actor's protocol when it has one.
#[derive(Debug, Default)]
pub struct Stdout;

impl Stdout {
    pub fn from_parameters(_params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self)
    }
}

/// Bytes written for `payload`: protocol output if given, else strings raw
/// and other values as JSON
pub fn render_line(payload: &Value, protocol: Option<&dyn Protocol>) -> Result<Vec<u8>, ModuleError> {
    let mut line = match (protocol, payload) {
        (Some(protocol), payload) => protocol.encode(payload)?,
        (None, Value::String(text)) => text.clone().into_bytes(),
        (None, other) => other.to_string().into_bytes(),
    };
    line.push(b'\n');
    Ok(line)
}

#[async_trait]
impl Module for Stdout {
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
        ctx: &ActorContext,
        _queue: &str,
        params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError> {
        let payload = select_payload(event, params)?;
        let line = render_line(&payload, ctx.config().protocol.as_deref())?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&line).await?;
        stdout.flush().await?;
        Ok(())
    }
}
