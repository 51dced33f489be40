// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded point-to-point event channel.
//!
//! A queue starts in fallthrough mode: `put` counts the event as dropped and
//! stores nothing. Connecting the queue switches it to enforcing mode, where
//! `put` buffers up to `capacity` events and hands the event back once full.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

use crate::errors::QueueError;
use crate::event::Event;
use crate::queue::stats::{Counters, QueueStats, RateSampler};

#[derive(Debug)]
pub struct Queue {
    name: String,
    capacity: usize,
    items: Mutex<VecDeque<Event>>,
    available: Notify,
    fallthrough: AtomicBool,
    counters: Counters,
    sampler: RateSampler,
}

impl Queue {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity: capacity.max(1),
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            fallthrough: AtomicBool::new(true),
            counters: Counters::default(),
            sampler: RateSampler::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store `event`. In fallthrough mode the event is discarded and counted
    /// as dropped. A full enforcing queue returns [`QueueError::Full`]
    /// carrying the event so the caller can retry without cloning.
    pub fn put(&self, event: Event) -> Result<(), QueueError> {
        if self.is_fallthrough() {
            self.counters.dropped_total.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        {
            let mut items = self.items.lock();
            if items.len() >= self.capacity {
                return Err(QueueError::Full {
                    queue: self.name.clone(),
                    capacity: self.capacity,
                    event: Box::new(event),
                });
            }
            items.push_back(event);
            self.counters.in_total.fetch_add(1, Ordering::Relaxed);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Wait until an event is available and take it
    pub async fn get(&self) -> Event {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(event) = self.pop() {
                return event;
            }
            notified.await;
        }
    }

    /// Take an event without waiting
    pub fn try_get(&self) -> Result<Event, QueueError> {
        self.pop().ok_or_else(|| QueueError::Empty(self.name.clone()))
    }

    fn pop(&self) -> Option<Event> {
        let event = self.items.lock().pop_front()?;
        self.counters.out_total.fetch_add(1, Ordering::Relaxed);
        Some(event)
    }

    pub fn size(&self) -> usize {
        self.items.lock().len()
    }

    pub fn empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        let totals = self.counters.snapshot();
        let [in_rate, out_rate, dropped_rate] = self.sampler.sample(totals);
        QueueStats {
            size: self.size(),
            in_total: totals[0],
            out_total: totals[1],
            dropped_total: totals[2],
            in_rate,
            out_rate,
            dropped_rate,
        }
    }

    /// Drain every buffered event. Drained events count as taken.
    pub fn dump(&self) -> impl Iterator<Item = Event> {
        let drained: Vec<Event> = self.items.lock().drain(..).collect();
        self.counters
            .out_total
            .fetch_add(drained.len() as u64, Ordering::Relaxed);
        drained.into_iter()
    }

    pub fn enable_fallthrough(&self) {
        self.fallthrough.store(true, Ordering::Release);
    }

    pub fn disable_fallthrough(&self) {
        self.fallthrough.store(false, Ordering::Release);
    }

    pub fn is_fallthrough(&self) -> bool {
        self.fallthrough.load(Ordering::Acquire)
    }

    /// Put back an event that was taken but not processed. It goes to the
    /// front, ignores capacity and is treated as never having left: the
    /// `out` counter is rolled back and `in` is untouched.
    pub fn rescue(&self, event: Event) {
        self.items.lock().push_front(event);
        self.counters.restore_out();
        self.available.notify_one();
    }
}
