// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::actor::contract::build_event;
use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::traits::{Module, ModuleKind};

const OUTBOX: &str = "outbox";
const GENERATE: &str = "generate";
const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Emits `message` to `outbox` every `interval` seconds. With `numbered`
/// each event carries a sequence number at `tmp.<actor>.number`.
#[derive(Debug)]
pub struct Generator {
    interval: Duration,
    numbered: bool,
}

impl Generator {
    pub fn new(interval: Duration, numbered: bool) -> Self {
        Self { interval, numbered }
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self::new(
            params.duration_or("interval", DEFAULT_INTERVAL)?,
            params.bool_or("numbered", false)?,
        ))
    }

    /// `message` may be templated. It renders against a fresh event that
    /// already carries the sequence number.
    fn generate(&self, ctx: &ActorContext, number: u64) -> Result<Event, ModuleError> {
        let number_path = format!("tmp.{}.number", ctx.name());
        let mut seed = Event::default();
        if self.numbered {
            seed.set(&number_path, json!(number))?;
        }

        let params = ctx.config().resolve(&seed);
        let message = params
            .get("message")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| Value::String("test".into()));
        let mut event = build_event(message, &params)?;
        if self.numbered {
            event.set(&number_path, json!(number))?;
        }
        Ok(event)
    }
}

#[async_trait]
impl Module for Generator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Input
    }

    fn queues(&self) -> Vec<String> {
        vec![OUTBOX.into()]
    }

    fn background_jobs(&self) -> Vec<String> {
        vec![GENERATE.into()]
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

    async fn run_background(&self, ctx: &ActorContext, _job: &str) -> Result<(), ModuleError> {
        let mut number = 0u64;
        loop {
            let event = self.generate(ctx, number)?;
            ctx.submit(event, OUTBOX).await?;
            number += 1;
            if !ctx.sleep(self.interval).await {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::contract::input_defaults;
    use crate::actor::{Actor, ActorConfig};
    use crate::backends::stub::{capture, collect};
    use std::sync::Arc;

    #[tokio::test]
    async fn emits_numbered_messages() {
        let mut params = input_defaults();
        params.insert("destination".into(), json!("data.greeting"));
        params.insert("message".into(), json!("hello"));
        let config = ActorConfig::new("gen").with_parameters(params).unwrap();
        let actor = Actor::new(
            config,
            Arc::new(Generator::new(Duration::from_millis(10), true)),
        )
        .unwrap();
        let outbox = capture(&actor.pool().get_queue(OUTBOX).unwrap());

        actor.start().await.unwrap();
        let events = collect(&outbox, 3, Duration::from_secs(2)).await;
        actor.stop().await.unwrap();

        assert_eq!(events.len(), 3);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.get("data.greeting").unwrap(), json!("hello"));
            assert_eq!(event.get("tmp.gen.number").unwrap(), json!(i));
        }
    }

    #[tokio::test]
    async fn templated_message_sees_the_sequence_number() {
        let mut params = input_defaults();
        params.insert("message".into(), json!("tick {{ tmp.clock.number }}"));
        let config = ActorConfig::new("clock").with_parameters(params).unwrap();
        let actor = Actor::new(
            config,
            Arc::new(Generator::new(Duration::from_millis(10), true)),
        )
        .unwrap();
        let outbox = capture(&actor.pool().get_queue(OUTBOX).unwrap());

        actor.start().await.unwrap();
        let events = collect(&outbox, 2, Duration::from_secs(2)).await;
        actor.stop().await.unwrap();

        let messages: Vec<Value> = events.iter().map(|e| e.data().clone()).collect();
        assert_eq!(messages, vec![json!("tick 0"), json!("tick 1")]);
    }

    #[test]
    fn input_contract_is_enforced() {
        let result = Actor::new(
            ActorConfig::new("gen"),
            Arc::new(Generator::new(DEFAULT_INTERVAL, false)),
        );
        assert!(result.is_err());
    }
}
