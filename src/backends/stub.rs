// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test modules and helpers.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::actor::{ActorContext, Parameters};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::queue::{Queue, QueuePool};
use crate::traits::{Module, ModuleKind};

/// Accepts every event on `inbox`
#[derive(Default)]
pub struct StubModule;

#[async_trait]
impl Module for StubModule {
    fn queues(&self) -> Vec<String> {
        vec!["inbox".into()]
    }

    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        vec!["inbox".into()]
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

/// Fails every event whose data is `"bad"`, counts the rest
#[derive(Default)]
pub struct PickyModule {
    pub handled: AtomicUsize,
}

#[async_trait]
impl Module for PickyModule {
    fn queues(&self) -> Vec<String> {
        vec!["inbox".into()]
    }

    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        vec!["inbox".into()]
    }

    async fn consume(
        &self,
        _ctx: &ActorContext,
        _queue: &str,
        _params: &Parameters,
        event: &mut Event,
    ) -> Result<(), ModuleError> {
        self.handled.fetch_add(1, Ordering::SeqCst);
        if event.data() == &json!("bad") {
            return Err(anyhow::anyhow!("refusing to handle a bad event").into());
        }
        Ok(())
    }
}

/// Records lifecycle hooks; the post-hook can be told to fail
#[derive(Default)]
pub struct HookModule {
    pub pre: AtomicBool,
    pub post: AtomicBool,
    pub fail_post: bool,
}

#[async_trait]
impl Module for HookModule {
    async fn consume(
        &self,
        _ctx: &ActorContext,
        _queue: &str,
        _params: &Parameters,
        _event: &mut Event,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn pre_hook(&self, _ctx: &ActorContext) -> Result<(), ModuleError> {
        self.pre.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn post_hook(&self, _ctx: &ActorContext) -> Result<(), ModuleError> {
        self.post.store(true, Ordering::SeqCst);
        if self.fail_post {
            return Err(ModuleError::Protocol("post hook failure".into()));
        }
        Ok(())
    }
}

/// Output module that holds every event for `delay` and tracks how many
/// events were in flight at once
pub struct SlowOutput {
    pub delay: Duration,
    pub current: AtomicUsize,
    pub peak: AtomicUsize,
}

impl SlowOutput {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Module for SlowOutput {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Output
    }

    fn queues(&self) -> Vec<String> {
        vec!["inbox".into()]
    }

    fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
        vec!["inbox".into()]
    }

    async fn consume(
        &self,
        _ctx: &ActorContext,
        _queue: &str,
        _params: &Parameters,
        _event: &mut Event,
    ) -> Result<(), ModuleError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Switch `queue` to enforcing mode so events can be observed
pub fn capture(queue: &Arc<Queue>) -> Arc<Queue> {
    queue.disable_fallthrough();
    queue.clone()
}

/// Wait until `queue` yields `count` events or `within` elapses
pub async fn collect(queue: &Queue, count: usize, within: Duration) -> Vec<Event> {
    let mut events = Vec::with_capacity(count);
    let _ = tokio::time::timeout(within, async {
        while events.len() < count {
            events.push(queue.get().await);
        }
    })
    .await;
    events
}

/// Put plain events carrying each of `values`
pub fn feed(queue: &Queue, values: impl IntoIterator<Item = Value>) {
    for value in values {
        queue
            .put(Event::new(value))
            .expect("test queue should have room");
    }
}
