// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Minimum distance between two rate samples
pub const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Point-in-time view of a queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QueueStats {
    pub size: usize,
    pub in_total: u64,
    pub out_total: u64,
    pub dropped_total: u64,
    pub in_rate: f64,
    pub out_rate: f64,
    pub dropped_rate: f64,
}

impl QueueStats {
    /// `(stat name, value, unit)` triples in emission order
    pub fn entries(&self) -> [(&'static str, f64, &'static str); 7] {
        [
            ("size", self.size as f64, "count"),
            ("in_total", self.in_total as f64, "count"),
            ("out_total", self.out_total as f64, "count"),
            ("dropped_total", self.dropped_total as f64, "count"),
            ("in_rate", self.in_rate, "count/s"),
            ("out_rate", self.out_rate, "count/s"),
            ("dropped_rate", self.dropped_rate, "count/s"),
        ]
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub in_total: AtomicU64,
    pub out_total: AtomicU64,
    pub dropped_total: AtomicU64,
}

impl Counters {
    pub fn snapshot(&self) -> [u64; 3] {
        [
            self.in_total.load(Ordering::Relaxed),
            self.out_total.load(Ordering::Relaxed),
            self.dropped_total.load(Ordering::Relaxed),
        ]
    }

    /// Undo one `out` increment without wrapping below zero
    pub fn restore_out(&self) {
        let _ = self
            .out_total
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }
}

#[derive(Debug)]
struct Sample {
    at: Instant,
    totals: [u64; 3],
    rates: [f64; 3],
}

/// Per-second rates recomputed at most once per [`SAMPLE_WINDOW`]. Callers
/// polling faster get the previous rates back.
#[derive(Debug)]
pub(crate) struct RateSampler {
    last: Mutex<Sample>,
}

impl RateSampler {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(at: Instant) -> Self {
        Self {
            last: Mutex::new(Sample {
                at,
                totals: [0; 3],
                rates: [0.0; 3],
            }),
        }
    }

    pub fn sample(&self, totals: [u64; 3]) -> [f64; 3] {
        self.sample_at(Instant::now(), totals)
    }

    fn sample_at(&self, now: Instant, totals: [u64; 3]) -> [f64; 3] {
        let mut last = self.last.lock();
        let elapsed = now.saturating_duration_since(last.at);
        if elapsed < SAMPLE_WINDOW {
            return last.rates;
        }

        let seconds = elapsed.as_secs_f64();
        let mut rates = [0.0; 3];
        for (i, rate) in rates.iter_mut().enumerate() {
            *rate = totals[i].saturating_sub(last.totals[i]) as f64 / seconds;
        }
        *last = Sample {
            at: now,
            totals,
            rates,
        };
        rates
    }
}
