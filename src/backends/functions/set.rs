// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::actor::Parameters;
use crate::errors::{EventError, ModuleError};
use crate::event::Event;
use crate::traits::EventFunction;

/// Stores a fixed value at `destination`
#[derive(Debug, Clone)]
pub struct SetFunction {
    value: Value,
    destination: String,
}

impl SetFunction {
    pub fn from_parameters(params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self {
            value: params.get("data").cloned().unwrap_or(Value::Null),
            destination: params.str_or("destination", "data")?.to_string(),
        })
    }
}

impl EventFunction for SetFunction {
    fn name(&self) -> &str {
        "set"
    }

    fn apply(&self, event: &mut Event) -> Result<(), ModuleError> {
        event.set(&self.destination, self.value.clone())?;
        Ok(())
    }
}

/// Appends a fixed value to the sequence at `destination`, creating the
/// sequence when absent
#[derive(Debug, Clone)]
pub struct AppendFunction {
    value: Value,
    destination: String,
}

impl AppendFunction {
    pub fn from_parameters(params: &Parameters) -> Result<Self, ModuleError> {
        Ok(Self {
            value: params.get("data").cloned().unwrap_or(Value::Null),
            destination: params.str_or("destination", "tags")?.to_string(),
        })
    }
}

impl EventFunction for AppendFunction {
    fn name(&self) -> &str {
        "append"
    }

    fn apply(&self, event: &mut Event) -> Result<(), ModuleError> {
        match event.get(&self.destination) {
            Ok(Value::Array(_)) => event.merge(&self.destination, Value::Array(vec![self.value.clone()]))?,
            Err(EventError::NotFound(_)) => {
                event.set(&self.destination, Value::Array(vec![self.value.clone()]))?
            }
            Ok(_) => {
                return Err(EventError::InvalidData(format!(
                    "cannot append to non-sequence at '{}'",
                    self.destination
                ))
                .into())
            }
            Err(other) => return Err(other.into()),
        }
        Ok(())
    }
}
