// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-actor logger.
//!
//! Every record goes to `tracing` and, as a log event, to the actor's
//! reserved `logs` queue. The queue write never waits: when `logs` is full
//! the record is only kept by `tracing`.

use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use crate::config::consts::QUEUE_LOGS;
use crate::event::Event;
use crate::queue::QueuePool;

/// Syslog severities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    Debug = 7,
}

impl Severity {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Some(match level {
            0 => Severity::Emergency,
            1 => Severity::Alert,
            2 => Severity::Critical,
            3 => Severity::Error,
            4 => Severity::Warning,
            5 => Severity::Notice,
            6 => Severity::Informational,
            7 => Severity::Debug,
            _ => return None,
        })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Emergency => "emergency",
            Severity::Alert => "alert",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Informational => "informational",
            Severity::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Payload of a log event
pub fn log_record(time: f64, severity: Severity, pid: u32, module: &str, message: &str) -> Value {
    json!({
        "time": time,
        "level": severity.level(),
        "pid": pid,
        "module": module,
        "message": message,
    })
}

#[derive(Debug, Clone)]
pub struct Logger {
    module: String,
    pool: Arc<QueuePool>,
}

impl Logger {
    pub fn new(module: impl Into<String>, pool: Arc<QueuePool>) -> Self {
        Self {
            module: module.into(),
            pool,
        }
    }

    pub fn log(&self, severity: Severity, message: impl AsRef<str>) {
        let message = message.as_ref();
        match severity {
            Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
                tracing::error!(module = %self.module, level = severity.level(), "{}", message)
            }
            Severity::Warning => {
                tracing::warn!(module = %self.module, level = severity.level(), "{}", message)
            }
            Severity::Notice | Severity::Informational => {
                tracing::info!(module = %self.module, level = severity.level(), "{}", message)
            }
            Severity::Debug => {
                tracing::debug!(module = %self.module, level = severity.level(), "{}", message)
            }
        }

        let Ok(queue) = self.pool.get_queue(QUEUE_LOGS) else {
            return;
        };
        let time = chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        let record = log_record(time, severity, std::process::id(), &self.module, message);
        // full queue: the tracing copy above is all that remains
        let _ = queue.put(Event::new(record));
    }

    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(Severity::Critical, message)
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Severity::Error, message)
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Severity::Warning, message)
    }

    pub fn notice(&self, message: impl AsRef<str>) {
        self.log(Severity::Notice, message)
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Severity::Informational, message)
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Severity::Debug, message)
    }
}
