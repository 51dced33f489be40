// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::Module;

const INBOX: &str = "inbox";

/// Forks every `inbox` event to each other queue. Every copy is an
/// independent clone with its own uuid.
#[derive(Debug, Default)]
pub struct Fanout;

impl Fanout {
    pub fn from_parameters(_params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self)
    }
}

#[async_trait]
impl Module for Fanout {
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
        _params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError> {
        for (name, _) in ctx.pool().list_queues(false) {
            if name != INBOX {
                ctx.submit(event.clone_event(), &name).await?;
            }
        }
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
    async fn each_branch_gets_an_independent_clone() {
        let actor = Actor::new(ActorConfig::new("fan"), Arc::new(Fanout)).unwrap();
        let left = capture(&actor.pool().create_queue("left").unwrap());
        let right = capture(&actor.pool().create_queue("right").unwrap());
        let inbox = capture(&actor.pool().get_queue(INBOX).unwrap());

        actor.start().await.unwrap();
        feed(&inbox, [json!({"n": 1})]);

        let l = collect(&left, 1, Duration::from_secs(2)).await;
        let r = collect(&right, 1, Duration::from_secs(2)).await;
        assert_ne!(l[0].uuid(), r[0].uuid());
        assert!(l[0].is_cloned() && r[0].is_cloned());
        assert_eq!(l[0].uuid_previous(), r[0].uuid_previous());
        actor.stop().await.unwrap();
    }
}
