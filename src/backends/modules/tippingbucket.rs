// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::actor::{ActorContext, Parameters};
use crate::config::consts::DEFAULT_BULK_SIZE;
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::QueuePool;
use crate::traits::Module;

const INBOX: &str = "inbox";
const OUTBOX: &str = "outbox";
const FLUSHER: &str = "flusher";
const DEFAULT_BUCKET_AGE: Duration = Duration::from_secs(10);
const MAX_CHECK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Bucket {
    bulk: Event,
    created: Instant,
}

/// Collects `inbox` events into bulk events of `bucket_size`.
///
/// A bucket is flushed to `outbox` as soon as it is full, or by the
/// background flusher once it is older than `bucket_age`. Whatever is left
/// at shutdown is flushed by the post-hook.
#[derive(Debug)]
pub struct TippingBucket {
    bucket_size: usize,
    bucket_age: Duration,
    bucket: Mutex<Option<Bucket>>,
}

impl TippingBucket {
    pub fn new(bucket_size: usize, bucket_age: Duration) -> Self {
        Self {
            bucket_size: bucket_size.max(1),
            bucket_age,
            bucket: Mutex::new(None),
        }
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self, ModuleError> {
        let size = params.u64_or("bucket_size", DEFAULT_BULK_SIZE as u64)?;
        if size == 0 {
            return Err(ModuleError::parameter("bucket_size", "must be at least 1"));
        }
        let age = params.duration_or("bucket_age", DEFAULT_BUCKET_AGE)?;
        Ok(Self::new(size as usize, age))
    }

    /// Events waiting in the current bucket
    pub fn pending(&self) -> usize {
        self.bucket.lock().as_ref().map_or(0, |b| b.bulk.bulk_len())
    }

    /// Add `event`, returning the bucket when this filled it
    fn add(&self, event: &Event) -> Result<Option<Event>, ModuleError> {
        let mut slot = self.bucket.lock();
        let bucket = slot.get_or_insert_with(|| Bucket {
            bulk: Event::new_bulk(self.bucket_size),
            created: Instant::now(),
        });
        bucket.bulk.append_bulk(event)?;
        if bucket.bulk.is_bulk_full() {
            return Ok(slot.take().map(|b| b.bulk));
        }
        Ok(None)
    }

    /// Take the bucket if it is non-empty and, unless `force`, old enough
    fn take_expired(&self, force: bool) -> Option<Event> {
        let mut slot = self.bucket.lock();
        let expired = slot.as_ref().is_some_and(|b| {
            b.bulk.bulk_len() > 0 && (force || b.created.elapsed() >= self.bucket_age)
        });
        if expired {
            slot.take().map(|b| b.bulk)
        } else {
            None
        }
    }
}

#[async_trait]
impl Module for TippingBucket {
    fn queues(&self) -> Vec<String> {
        vec![INBOX.into(), OUTBOX.into()]
    }

    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        vec![INBOX.into()]
    }

    fn background_jobs(&self) -> Vec<String> {
        vec![FLUSHER.into()]
    }

    async fn consume(
        &self,
        ctx: &ActorContext,
        _queue: &str,
        _params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError> {
        if let Some(full) = self.add(event)? {
            ctx.submit(full, OUTBOX).await?;
        }
        Ok(())
    }

    async fn run_background(&self, ctx: &ActorContext, _job: &str) -> Result<(), ModuleError> {
        let interval = self.bucket_age.min(MAX_CHECK_INTERVAL);
        while ctx.sleep(interval).await {
            if let Some(bulk) = self.take_expired(false) {
                ctx.submit(bulk, OUTBOX).await?;
            }
        }
        Ok(())
    }

    async fn post_hook(&self, ctx: &ActorContext) -> Result<(), ModuleError> {
        if let Some(bulk) = self.take_expired(true) {
            ctx.pool().get_queue(OUTBOX)?.put(bulk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorConfig};
    use crate::backends::stub::{capture, collect, feed};
    use crate::event::extract_bulk_items;
    use serde_json::json;
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn full_bucket_is_flushed_immediately() {
        let module = Arc::new(TippingBucket::new(10, Duration::from_secs(60)));
        let actor = Actor::new(ActorConfig::new("bucket"), module.clone()).unwrap();
        let inbox = capture(&actor.pool().get_queue(INBOX).unwrap());
        let outbox = capture(&actor.pool().get_queue(OUTBOX).unwrap());

        actor.start().await.unwrap();
        feed(&inbox, (0..11).map(|i| json!(i)));

        let flushed = collect(&outbox, 1, WAIT).await;
        assert_eq!(flushed.len(), 1);
        assert!(flushed[0].is_bulk());
        assert_eq!(flushed[0].bulk_len(), 10);
        let children: Vec<_> = extract_bulk_items(&flushed[0])
            .map(|c| c.unwrap().data().clone())
            .collect();
        assert_eq!(children, (0..10).map(|i| json!(i)).collect::<Vec<_>>());

        tokio::time::timeout(WAIT, async {
            while module.pending() != 1 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("the 11th event should start a new bucket");
        assert!(outbox.empty());

        actor.stop().await.unwrap();
        // the partial bucket is flushed on the way out
        assert_eq!(outbox.try_get().unwrap().bulk_len(), 1);
    }

    #[tokio::test]
    async fn old_bucket_is_flushed_by_age() {
        let module = Arc::new(TippingBucket::new(100, Duration::from_millis(50)));
        let actor = Actor::new(ActorConfig::new("aging"), module).unwrap();
        let inbox = capture(&actor.pool().get_queue(INBOX).unwrap());
        let outbox = capture(&actor.pool().get_queue(OUTBOX).unwrap());

        actor.start().await.unwrap();
        feed(&inbox, [json!("a"), json!("b")]);

        let flushed = collect(&outbox, 1, WAIT).await;
        assert_eq!(flushed[0].bulk_len(), 2);
        actor.stop().await.unwrap();
    }

    #[test]
    fn zero_bucket_size_is_rejected() {
        let params: Parameters = [("bucket_size".to_string(), json!(0))].into_iter().collect();
        assert!(TippingBucket::from_parameters(&params).is_err());
    }
}
