// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Actor configuration and per-event parameter resolution.
//!
//! Parameters are declared once. A string parameter containing `{{` is
//! parsed into a [`ConfigValue::Templated`] at construction and rendered
//! against every event before the handler sees it, so handlers only ever
//! deal with concrete values.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::consts::{DEFAULT_FREQUENCY, DEFAULT_QUEUE_SIZE};
use crate::errors::{EventError, ModuleError};
use crate::event::{Event, Template};
use crate::traits::{EventFunction, Protocol};

/// A parameter value as declared in configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Static(Value),
    Templated(Template),
}

impl ConfigValue {
    /// Classify `value`. Only top-level strings can be templates.
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        match value {
            Value::String(text) if Template::is_template(&text) => {
                Ok(ConfigValue::Templated(Template::parse(&text)?))
            }
            other => Ok(ConfigValue::Static(other)),
        }
    }

    pub fn is_templated(&self) -> bool {
        matches!(self, ConfigValue::Templated(_))
    }

    /// Concrete value for an event rendered as `context`
    pub fn resolve(&self, context: &Value) -> Value {
        match self {
            ConfigValue::Static(value) => value.clone(),
            ConfigValue::Templated(template) => template.render_value(context),
        }
    }
}

/// Concrete parameter values for one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, Value>);

impl Parameters {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn str(&self, name: &str) -> Result<&str, ModuleError> {
        match self.require(name)? {
            Value::String(s) => Ok(s),
            other => Err(wrong_type(name, "a string", other)),
        }
    }

    pub fn str_or<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str, ModuleError> {
        if self.is_unset(name) {
            return Ok(default);
        }
        self.str(name)
    }

    pub fn bool(&self, name: &str) -> Result<bool, ModuleError> {
        let value = self.require(name)?;
        value.as_bool().ok_or_else(|| wrong_type(name, "a boolean", value))
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, ModuleError> {
        if self.is_unset(name) {
            return Ok(default);
        }
        self.bool(name)
    }

    pub fn u64(&self, name: &str) -> Result<u64, ModuleError> {
        let value = self.require(name)?;
        value
            .as_u64()
            .ok_or_else(|| wrong_type(name, "a non-negative integer", value))
    }

    pub fn u64_or(&self, name: &str, default: u64) -> Result<u64, ModuleError> {
        if self.is_unset(name) {
            return Ok(default);
        }
        self.u64(name)
    }

    pub fn f64(&self, name: &str) -> Result<f64, ModuleError> {
        let value = self.require(name)?;
        value.as_f64().ok_or_else(|| wrong_type(name, "a number", value))
    }

    pub fn f64_or(&self, name: &str, default: f64) -> Result<f64, ModuleError> {
        if self.is_unset(name) {
            return Ok(default);
        }
        self.f64(name)
    }

    /// Seconds given as an integer or float
    pub fn duration_or(&self, name: &str, default: Duration) -> Result<Duration, ModuleError> {
        if self.is_unset(name) {
            return Ok(default);
        }
        let seconds = self.f64(name)?;
        Duration::try_from_secs_f64(seconds)
            .map_err(|_| ModuleError::parameter(name, format!("{} is not a valid duration", seconds)))
    }

    fn require(&self, name: &str) -> Result<&Value, ModuleError> {
        self.0
            .get(name)
            .ok_or_else(|| ModuleError::parameter(name, "missing"))
    }

    fn is_unset(&self, name: &str) -> bool {
        self.0.get(name).map_or(true, Value::is_null)
    }
}

impl FromIterator<(String, Value)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn wrong_type(name: &str, expected: &str, got: &Value) -> ModuleError {
    ModuleError::parameter(name, format!("expected {}, got {}", expected, got))
}

/// Everything an actor needs besides its module
#[derive(Clone)]
pub struct ActorConfig {
    pub name: String,
    /// Capacity of every queue the actor owns
    pub size: usize,
    /// Interval of the metrics loop
    pub frequency: Duration,
    pub parameters: BTreeMap<String, ConfigValue>,
    pub protocol: Option<Arc<dyn Protocol>>,
    /// Functions applied to events taken from the named queue, in order
    pub functions: HashMap<String, Vec<Arc<dyn EventFunction>>>,
}

impl ActorConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: DEFAULT_QUEUE_SIZE,
            frequency: DEFAULT_FREQUENCY,
            parameters: BTreeMap::new(),
            protocol: None,
            functions: HashMap::new(),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_frequency(mut self, frequency: Duration) -> Self {
        self.frequency = frequency;
        self
    }

    /// Add every entry of `parameters`. Template strings are parsed here so
    /// a malformed template fails before the actor exists.
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Result<Self, EventError> {
        for (name, value) in parameters {
            self.parameters.insert(name, ConfigValue::from_value(value)?);
        }
        Ok(self)
    }

    pub fn with_parameter(mut self, name: &str, value: Value) -> Result<Self, EventError> {
        self.parameters
            .insert(name.to_string(), ConfigValue::from_value(value)?);
        Ok(self)
    }

    pub fn with_protocol(mut self, protocol: Arc<dyn Protocol>) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_function(mut self, queue: &str, function: Arc<dyn EventFunction>) -> Self {
        self.functions
            .entry(queue.to_string())
            .or_default()
            .push(function);
        self
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Concrete parameters for `event`. The event is only dumped when at
    /// least one parameter is templated.
    pub fn resolve(&self, event: &Event) -> Parameters {
        if !self.parameters.values().any(ConfigValue::is_templated) {
            return self.resolve_with(&Value::Null);
        }
        self.resolve_with(&event.dump())
    }

    /// Parameters as seen outside any event. Templates render against an
    /// empty context.
    pub fn static_parameters(&self) -> Parameters {
        self.resolve_with(&Value::Null)
    }

    fn resolve_with(&self, context: &Value) -> Parameters {
        self.parameters
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve(context)))
            .collect()
    }
}

impl fmt::Debug for ActorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorConfig")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("frequency", &self.frequency)
            .field("parameters", &self.parameters)
            .field("protocol", &self.protocol.as_ref().map(|p| p.name().to_string()))
            .field(
                "functions",
                &self
                    .functions
                    .iter()
                    .map(|(queue, fns)| (queue, fns.iter().map(|f| f.name()).collect::<Vec<_>>()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .finish()
    }
}
