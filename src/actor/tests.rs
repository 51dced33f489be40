// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::*;
use crate::backends::stub::{capture, collect, feed, HookModule, PickyModule, SlowOutput, StubModule};
use crate::config::consts::{QUEUE_FAILED, QUEUE_LOGS, QUEUE_SUCCESS};
use crate::errors::ModuleError;
use crate::event::Event;
use crate::traits::EventFunction;
use serde_json::json;
use std::sync::atomic::Ordering;

const WAIT: Duration = Duration::from_secs(2);

fn output_config(name: &str, streams: u64) -> ActorConfig {
    let mut params = contract::output_defaults();
    params.insert(contract::PARALLEL_STREAMS.into(), json!(streams));
    ActorConfig::new(name).with_parameters(params).unwrap()
}

#[tokio::test]
async fn bad_event_is_isolated() {
    let module = Arc::new(PickyModule::default());
    let actor = Actor::new(ActorConfig::new("picky"), module.clone()).unwrap();
    let success = capture(&actor.pool().get_queue(QUEUE_SUCCESS).unwrap());
    let failed = capture(&actor.pool().get_queue(QUEUE_FAILED).unwrap());
    let inbox = capture(&actor.pool().get_queue("inbox").unwrap());

    actor.start().await.unwrap();
    feed(&inbox, [json!("good"), json!("bad"), json!("good")]);

    let succeeded = collect(&success, 2, WAIT).await;
    let failures = collect(&failed, 1, WAIT).await;
    assert_eq!(succeeded.len(), 2);
    assert_eq!(failures.len(), 1);

    let diagnostic = failures[0].get("errors.picky").unwrap();
    assert_eq!(diagnostic["location"], json!("picky.inbox"));
    assert_eq!(diagnostic["type"], json!("ModuleError"));
    assert!(diagnostic["message"].as_str().unwrap().contains("bad event"));

    // the loop keeps going
    assert_eq!(actor.state(), ActorState::Started);
    feed(&inbox, [json!("good")]);
    assert_eq!(collect(&success, 1, WAIT).await.len(), 1);
    assert_eq!(module.handled.load(Ordering::SeqCst), 4);

    actor.stop().await.unwrap();
}

#[tokio::test]
async fn expired_events_are_dropped_and_logged() {
    let actor = Actor::new(ActorConfig::new("ttl"), Arc::new(StubModule)).unwrap();
    let success = capture(&actor.pool().get_queue(QUEUE_SUCCESS).unwrap());
    let failed = capture(&actor.pool().get_queue(QUEUE_FAILED).unwrap());
    let logs = capture(&actor.pool().get_queue(QUEUE_LOGS).unwrap());
    let inbox = capture(&actor.pool().get_queue("inbox").unwrap());

    actor.start().await.unwrap();
    inbox.put(Event::new(json!("old")).with_ttl(0)).unwrap();
    inbox.put(Event::new(json!("young")).with_ttl(1)).unwrap();

    let delivered = collect(&success, 1, WAIT).await;
    assert_eq!(delivered[0].data(), &json!("young"));
    assert_eq!(delivered[0].ttl(), 0);
    assert!(failed.empty());

    let expired = logs
        .dump()
        .filter(|e| e.get("data.message").unwrap().as_str().unwrap().contains("TTL"))
        .count();
    assert_eq!(expired, 1);

    actor.stop().await.unwrap();
}

#[tokio::test]
async fn tmp_namespace_and_template_parameters_per_event() {
    struct Echo;

    #[async_trait::async_trait]
    impl Module for Echo {
        fn queues(&self) -> Vec<String> {
            vec!["inbox".into()]
        }
        fn consumers(&self, _pool: &QueuePool) -> Vec<String> {
            vec!["inbox".into()]
        }
        async fn consume(
            &self,
            ctx: &ActorContext,
            _queue: &str,
            params: &Parameters,
            event: &mut Event,
        ) -> Result<(), ModuleError> {
            let greeting = params.str("greeting")?.to_string();
            event.set(&format!("tmp.{}.greeting", ctx.name()), json!(greeting))?;
            Ok(())
        }
    }

    let config = ActorConfig::new("echo")
        .with_parameter("greeting", json!("hello {{data.name}}"))
        .unwrap();
    let actor = Actor::new(config, Arc::new(Echo)).unwrap();
    let success = capture(&actor.pool().get_queue(QUEUE_SUCCESS).unwrap());
    let inbox = capture(&actor.pool().get_queue("inbox").unwrap());

    actor.start().await.unwrap();
    feed(&inbox, [json!({"name": "ada"}), json!({"name": "bob"})]);

    let events = collect(&success, 2, WAIT).await;
    assert_eq!(events[0].get("tmp.echo.greeting").unwrap(), json!("hello ada"));
    assert_eq!(events[1].get("tmp.echo.greeting").unwrap(), json!("hello bob"));
    actor.stop().await.unwrap();
}

#[tokio::test]
async fn queue_functions_run_before_the_handler() {
    struct Tag;

    impl EventFunction for Tag {
        fn name(&self) -> &str {
            "tag"
        }
        fn apply(&self, event: &mut Event) -> Result<(), ModuleError> {
            if event.data() == &json!("reject") {
                return Err(ModuleError::parameter("tag", "rejected"));
            }
            event.set("tags.0", json!("seen"))?;
            Ok(())
        }
    }

    let config = ActorConfig::new("fn").with_function("inbox", Arc::new(Tag));
    let actor = Actor::new(config, Arc::new(StubModule)).unwrap();
    let success = capture(&actor.pool().get_queue(QUEUE_SUCCESS).unwrap());
    let failed = capture(&actor.pool().get_queue(QUEUE_FAILED).unwrap());
    let inbox = capture(&actor.pool().get_queue("inbox").unwrap());

    actor.start().await.unwrap();
    feed(&inbox, [json!("ok"), json!("reject")]);

    let ok = collect(&success, 1, WAIT).await;
    assert_eq!(ok[0].tags(), &["seen".to_string()]);
    let rejected = collect(&failed, 1, WAIT).await;
    assert_eq!(rejected[0].get("errors.fn.type").unwrap(), json!("ParameterError"));
    actor.stop().await.unwrap();
}

#[tokio::test]
async fn lifecycle_is_one_way() {
    let module = Arc::new(HookModule::default());
    let actor = Actor::new(ActorConfig::new("life"), module.clone()).unwrap();
    assert_eq!(actor.state(), ActorState::Constructed);

    actor.start().await.unwrap();
    actor.start().await.unwrap();
    assert!(module.pre.load(Ordering::SeqCst));
    assert_eq!(actor.state(), ActorState::Started);

    actor.stop().await.unwrap();
    actor.stop().await.unwrap();
    assert!(module.post.load(Ordering::SeqCst));
    assert_eq!(actor.state(), ActorState::Stopped);

    assert!(matches!(actor.start().await, Err(ActorError::AlreadyStopped(_))));
}

#[tokio::test]
async fn failing_post_hook_still_stops() {
    let module = Arc::new(HookModule {
        fail_post: true,
        ..Default::default()
    });
    let actor = Actor::new(ActorConfig::new("hooked"), module).unwrap();
    actor.start().await.unwrap();
    assert!(matches!(actor.stop().await, Err(ActorError::Hook { .. })));
    assert_eq!(actor.state(), ActorState::Stopped);
}

#[test]
fn output_module_requires_its_parameters() {
    let err = Actor::new(
        ActorConfig::new("out"),
        Arc::new(SlowOutput::new(Duration::ZERO)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ActorError::MissingParameter { parameter: "selection", .. }
    ));
    assert!(Actor::new(output_config("out", 1), Arc::new(SlowOutput::new(Duration::ZERO))).is_ok());
}

#[test]
fn oversized_worker_pool_is_rejected_at_construction() {
    let err = Actor::new(
        output_config("wide", u64::MAX),
        Arc::new(SlowOutput::new(Duration::ZERO)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ActorError::InitFailure { ref actor, ref reason } if actor == "wide" && reason.contains("parallel_streams")
    ));
    // zero still means a single worker
    assert!(Actor::new(output_config("narrow", 0), Arc::new(SlowOutput::new(Duration::ZERO))).is_ok());
}

#[tokio::test]
async fn output_module_uses_a_bounded_worker_pool() {
    let module = Arc::new(SlowOutput::new(Duration::from_millis(50)));
    let actor = Actor::new(output_config("sink", 3), module.clone()).unwrap();
    let success = capture(&actor.pool().get_queue(QUEUE_SUCCESS).unwrap());
    let inbox = capture(&actor.pool().get_queue("inbox").unwrap());

    actor.start().await.unwrap();
    feed(&inbox, (0..9).map(|i| json!(i)));

    assert_eq!(collect(&success, 9, WAIT).await.len(), 9);
    let peak = module.peak.load(Ordering::SeqCst);
    assert!(peak > 1 && peak <= 3, "peak concurrency was {}", peak);
    actor.stop().await.unwrap();
}

#[tokio::test]
async fn metrics_loop_emits_on_schedule() {
    let config = ActorConfig::new("measured").with_frequency(Duration::from_millis(20));
    let actor = Actor::new(config, Arc::new(StubModule)).unwrap();
    let metrics = capture(&actor.pool().get_queue(crate::config::consts::QUEUE_METRICS).unwrap());

    actor.start().await.unwrap();
    let first = collect(&metrics, 1, WAIT).await;
    assert!(first[0]
        .get("data.name")
        .unwrap()
        .as_str()
        .unwrap()
        .starts_with("module.measured.queue."));
    actor.stop().await.unwrap();
}

#[test]
fn reserved_queue_declared_by_module_is_rejected() {
    struct Greedy;

    #[async_trait::async_trait]
    impl Module for Greedy {
        fn queues(&self) -> Vec<String> {
            vec!["success".into()]
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

    assert!(matches!(
        Actor::new(ActorConfig::new("greedy"), Arc::new(Greedy)),
        Err(ActorError::Queue(_))
    ));
}
