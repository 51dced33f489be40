// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::Module;

const INBOX: &str = "inbox";

/// Spreads `inbox` events over the other queues in turn
#[derive(Debug, Default)]
pub struct RoundRobin {
    next: AtomicUsize,
}

impl RoundRobin {
    pub fn from_parameters(_params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self::default())
    }
}

#[async_trait]
impl Module for RoundRobin {
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
        let targets: Vec<String> = ctx
            .pool()
            .list_queues(false)
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name != INBOX)
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % targets.len();
        ctx.submit(event.clone(), &targets[index]).await?;
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
    async fn events_rotate_over_destinations() {
        let actor = Actor::new(ActorConfig::new("rr"), Arc::new(RoundRobin::default())).unwrap();
        let a = capture(&actor.pool().create_queue("a").unwrap());
        let b = capture(&actor.pool().create_queue("b").unwrap());
        let inbox = capture(&actor.pool().get_queue(INBOX).unwrap());

        actor.start().await.unwrap();
        feed(&inbox, (0..4).map(|i| json!(i)));

        let to_a = collect(&a, 2, Duration::from_secs(2)).await;
        let to_b = collect(&b, 2, Duration::from_secs(2)).await;
        assert_eq!(to_a.iter().map(|e| e.data().clone()).collect::<Vec<_>>(), vec![json!(0), json!(2)]);
        assert_eq!(to_b.iter().map(|e| e.data().clone()).collect::<Vec<_>>(), vec![json!(1), json!(3)]);
        actor.stop().await.unwrap();
    }
}
