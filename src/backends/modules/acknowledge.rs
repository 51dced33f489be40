// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::Module;

const INBOX: &str = "inbox";
const OUTBOX: &str = "outbox";
const ACKNOWLEDGE: &str = "acknowledge";
const DROPPED: &str = "dropped";
const ACK_ID: &str = "ack_id";

/// Lets one event per `ack_id` through until that id is acknowledged.
///
/// An id seen on `inbox` is held until an event with the same id arrives on
/// `acknowledge`. Repeats while held are routed to `dropped`.
#[derive(Debug, Default)]
pub struct Acknowledge {
    pending: Mutex<HashSet<String>>,
}

impl Acknowledge {
    pub fn from_parameters(params: &Parameters) -> Result<Self, ModuleError> {
        if !params.contains(ACK_ID) {
            return Err(ModuleError::parameter(ACK_ID, "missing"));
        }
        Ok(Self::default())
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.lock().contains(id)
    }
}

fn ack_id(params: &Parameters) -> Result<String, ModuleError> {
    match params.get(ACK_ID) {
        None | Some(Value::Null) => Err(ModuleError::parameter(ACK_ID, "resolved to nothing")),
        Some(Value::String(id)) if id.is_empty() => {
            Err(ModuleError::parameter(ACK_ID, "resolved to an empty string"))
        }
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

#[async_trait]
impl Module for Acknowledge {
    fn queues(&self) -> Vec<String> {
        [INBOX, OUTBOX, ACKNOWLEDGE, DROPPED]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        vec![INBOX.into(), ACKNOWLEDGE.into()]
    }

    async fn consume(
        &self,
        ctx: &ActorContext,
        queue: &str,
        params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError> {
        let id = ack_id(params)?;
        if queue == ACKNOWLEDGE {
            self.pending.lock().remove(&id);
            return Ok(());
        }

        let first = self.pending.lock().insert(id);
        let destination = if first { OUTBOX } else { DROPPED };
        ctx.submit(event.clone(), destination).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorConfig};
    use crate::backends::stub::{capture, collect};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn ack_id_parameter_is_required() {
        assert!(Acknowledge::from_parameters(&Parameters::default()).is_err());
    }

    #[tokio::test]
    async fn duplicates_are_dropped_until_acknowledged() {
        let config = ActorConfig::new("ack")
            .with_parameter(ACK_ID, json!("{{data.id}}"))
            .unwrap();
        let module = Arc::new(Acknowledge::default());
        let actor = Actor::new(config, module.clone()).unwrap();
        let inbox = capture(&actor.pool().get_queue(INBOX).unwrap());
        let acknowledge = capture(&actor.pool().get_queue(ACKNOWLEDGE).unwrap());
        let outbox = capture(&actor.pool().get_queue(OUTBOX).unwrap());
        let dropped = capture(&actor.pool().get_queue(DROPPED).unwrap());

        actor.start().await.unwrap();

        inbox.put(Event::new(json!({"id": "abc", "n": 1}))).unwrap();
        inbox.put(Event::new(json!({"id": "abc", "n": 2}))).unwrap();
        let passed = collect(&outbox, 1, WAIT).await;
        let held = collect(&dropped, 1, WAIT).await;
        assert_eq!(passed[0].get("data.n").unwrap(), json!(1));
        assert_eq!(held[0].get("data.n").unwrap(), json!(2));

        acknowledge.put(Event::new(json!({"id": "abc"}))).unwrap();
        tokio::time::timeout(WAIT, async {
            while module.is_pending("abc") {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("acknowledgement should release the id");

        inbox.put(Event::new(json!({"id": "abc", "n": 3}))).unwrap();
        let again = collect(&outbox, 1, WAIT).await;
        assert_eq!(again[0].get("data.n").unwrap(), json!(3));
        assert!(dropped.empty());

        actor.stop().await.unwrap();
    }
}
