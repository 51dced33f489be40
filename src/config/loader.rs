// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::{DEFAULT_DRAIN_TIMEOUT, DEFAULT_FREQUENCY, DEFAULT_QUEUE_SIZE};
use crate::errors::{RouterError, ValidationError};
use crate::observability::messages::validation::{TopologyInvalid, TopologyLoaded};
use crate::observability::messages::StructuredLog;
use crate::router::RuntimeOptions;

/// A declarative topology document.
///
/// `modules` and `routingtable` are required. They are optional here so a
/// missing section is reported by validation next to every other problem
/// instead of as a bare parse error.
///
/// # Example
/// ```yaml
/// runtime:
///   queue_size: 200
/// protocols:
///   json_out:
///     protocol: switchyard.protocol.encode.json
/// module_functions:
///   shout:
///     function: switchyard.function.module.uppercase
///     arguments:
///       source: data
/// modules:
///   source:
///     module: switchyard.module.input.generator
///     arguments:
///       message: hello
///       interval: 1
///   sink:
///     module: switchyard.module.output.stdout
///     protocol: json_out
///     functions:
///       inbox: [shout]
/// routingtable:
///   - source.outbox -> sink.inbox
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub modules: Option<BTreeMap<String, ModuleEntry>>,
    #[serde(default)]
    pub routingtable: Option<Vec<String>>,
    #[serde(default)]
    pub protocols: BTreeMap<String, ProtocolEntry>,
    #[serde(default)]
    pub module_functions: BTreeMap<String, FunctionEntry>,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// One actor to build
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModuleEntry {
    /// Component name, e.g. `switchyard.module.flow.funnel`
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// Name of an entry in the `protocols` section
    #[serde(default)]
    pub protocol: Option<String>,
    /// Queue name to the ordered names of `module_functions` entries
    #[serde(default)]
    pub functions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProtocolEntry {
    pub protocol: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionEntry {
    pub function: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Runtime-wide settings. Durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout: f64,
}

fn default_queue_size() -> usize {
    DEFAULT_QUEUE_SIZE
}

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY.as_secs_f64()
}

fn default_drain_timeout() -> f64 {
    DEFAULT_DRAIN_TIMEOUT.as_secs_f64()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_size: default_queue_size(),
            frequency: default_frequency(),
            drain_timeout: default_drain_timeout(),
        }
    }
}

impl RuntimeConfig {
    /// Negative or non-finite durations fall back to the defaults
    pub fn options(&self) -> RuntimeOptions {
        RuntimeOptions {
            queue_size: self.queue_size,
            frequency: seconds(self.frequency, DEFAULT_FREQUENCY),
            drain_timeout: seconds(self.drain_timeout, DEFAULT_DRAIN_TIMEOUT),
        }
    }
}

fn seconds(value: f64, default: Duration) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(default)
}

/// Parse a YAML topology document
pub fn parse_yaml(content: &str) -> Result<TopologyConfig, ValidationError> {
    serde_yaml::from_str(content).map_err(|e| ValidationError::Parse {
        reason: e.to_string(),
    })
}

/// Parse a TOML topology document
pub fn parse_toml(content: &str) -> Result<TopologyConfig, ValidationError> {
    toml::from_str(content).map_err(|e| ValidationError::Parse {
        reason: e.to_string(),
    })
}

/// Read a topology document. `.toml` files are parsed as TOML, anything
/// else as YAML.
pub fn load_config<P: AsRef<Path>>(
    path: P,
) -> Result<TopologyConfig, Box<dyn std::error::Error + Send + Sync>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        parse_toml(&content)?
    } else {
        parse_yaml(&content)?
    };
    Ok(cfg)
}

/// Read and validate a topology document. Every validation problem is
/// logged and returned at once.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
) -> Result<TopologyConfig, Box<dyn std::error::Error + Send + Sync>> {
    let path = path.as_ref();
    let cfg = load_config(path)?;

    if let Err(errors) = crate::config::validate_topology(&cfg) {
        for error in &errors {
            TopologyInvalid { error }.log();
        }
        return Err(Box::new(RouterError::Validation(errors)));
    }

    TopologyLoaded {
        path: &path.display().to_string(),
        modules: cfg.modules.as_ref().map_or(0, BTreeMap::len),
        routes: cfg.routingtable.as_ref().map_or(0, Vec::len),
    }
    .log();
    Ok(cfg)
}
