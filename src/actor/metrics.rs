// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Periodic queue metrics.

use serde_json::{json, Value};
use tokio::time::MissedTickBehavior;

use crate::actor::context::ActorContext;
use crate::config::consts::QUEUE_METRICS;
use crate::event::Event;

/// Host name reported as the metric source
pub fn source_host() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

/// Payload of a metric event
pub fn metric_record(time: f64, source: &str, name: &str, value: f64, unit: &str) -> Value {
    json!({
        "time": time,
        "type": "switchyard",
        "source": source,
        "name": name,
        "value": value,
        "unit": unit,
        "tags": [],
    })
}

/// Every `frequency`, emit one metric event per queue statistic until the
/// actor stops
pub(crate) async fn run(ctx: ActorContext) {
    let mut interval = tokio::time::interval(ctx.config().frequency);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the first tick completes immediately
    interval.tick().await;

    let source = source_host();
    loop {
        tokio::select! {
            biased;
            _ = ctx.stopped() => break,
            _ = interval.tick() => emit(&ctx, &source),
        }
    }
}

/// One round of metrics. Events that do not fit on `metrics` are dropped.
pub(crate) fn emit(ctx: &ActorContext, source: &str) {
    let Ok(metrics) = ctx.pool().get_queue(QUEUE_METRICS) else {
        return;
    };
    let time = chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0;

    for (queue_name, queue) in ctx.pool().list_queues(true) {
        let stats = queue.stats();
        for (stat, value, unit) in stats.entries() {
            let name = format!("module.{}.queue.{}.{}", ctx.name(), queue_name, stat);
            let _ = metrics.put(Event::new(metric_record(time, source, &name, value, unit)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::config::ActorConfig;
    use crate::queue::QueuePool;
    use std::sync::Arc;

    #[test]
    fn one_metric_per_queue_statistic() {
        let pool = Arc::new(QueuePool::new(200));
        pool.create_queue("inbox").unwrap();
        let metrics = pool.get_queue(QUEUE_METRICS).unwrap();
        metrics.disable_fallthrough();

        let ctx = ActorContext::new(Arc::new(ActorConfig::new("m")), pool);
        emit(&ctx, "host-a");

        // 5 queues, 7 statistics each
        assert_eq!(metrics.size(), 35);
        let names: Vec<String> = metrics
            .dump()
            .map(|e| e.get("data.name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"module.m.queue.inbox.size".to_string()));
        assert!(names.contains(&"module.m.queue.failed.dropped_rate".to_string()));
    }

    #[test]
    fn metric_shape() {
        let record = metric_record(1.5, "h", "module.a.queue.b.size", 3.0, "count");
        for key in ["time", "type", "source", "name", "value", "unit", "tags"] {
            assert!(record.get(key).is_some(), "missing {}", key);
        }
    }
}
