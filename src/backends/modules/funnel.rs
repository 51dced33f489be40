// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::Module;

const OUTBOX: &str = "outbox";

/// Merges every incoming queue into `outbox`. Incoming queues are whatever
/// the router connected to this actor.
#[derive(Debug, Default)]
pub struct Funnel;

impl Funnel {
    pub fn from_parameters(_params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self)
    }
}

#[async_trait]
impl Module for Funnel {
    fn queues(&self) -> Vec<String> {
        vec![OUTBOX.into()]
    }

    fn consumers(&self, pool: &QueuePool) -> Vec<String> {
        pool.list_queues(false)
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name != OUTBOX)
            .collect()
    }

    async fn consume(
        &self,
        ctx: &ActorContext,
        _queue: &str,
        _params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError> {
        ctx.submit(event.clone(), OUTBOX).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorConfig};
    use crate::backends::stub::{capture, collect, feed};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn every_incoming_queue_reaches_outbox() {
        let actor = Actor::new(ActorConfig::new("funnel"), Arc::new(Funnel)).unwrap();
        let one = capture(&actor.pool().create_queue("one").unwrap());
        let two = capture(&actor.pool().create_queue("two").unwrap());
        let outbox = capture(&actor.pool().get_queue(OUTBOX).unwrap());

        actor.start().await.unwrap();
        feed(&one, [json!(1)]);
        feed(&two, [json!(2)]);

        let mut values: Vec<_> = collect(&outbox, 2, Duration::from_secs(2))
            .await
            .into_iter()
            .map(|e| e.data().clone())
            .collect();
        values.sort_by_key(|v| v.as_i64());
        assert_eq!(values, vec![json!(1), json!(2)]);
        actor.stop().await.unwrap();
    }
}
