// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::actor::Parameters;
use crate::errors::{EventError, ModuleError};
use crate::event::Event;
use crate::traits::EventFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

/// Changes the case of the string at `source`, storing it at `destination`
#[derive(Debug, Clone)]
pub struct CaseFunction {
    case: Case,
    source: String,
    destination: String,
}

impl CaseFunction {
    pub fn from_parameters(case: Case, params: &Parameters) -> Result<Self, ModuleError> {
        let source = params.str_or("source", "data")?.to_string();
        let destination = params.str_or("destination", &source)?.to_string();
        Ok(Self {
            case,
            source,
            destination,
        })
    }
}

impl EventFunction for CaseFunction {
    fn name(&self) -> &str {
        match self.case {
            Case::Upper => "uppercase",
            Case::Lower => "lowercase",
        }
    }

    fn apply(&self, event: &mut Event) -> Result<(), ModuleError> {
        let Value::String(text) = event.get(&self.source)? else {
            return Err(EventError::InvalidData(format!("'{}' is not a string", self.source)).into());
        };
        let changed = match self.case {
            Case::Upper => text.to_uppercase(),
            Case::Lower => text.to_lowercase(),
        };
        event.set(&self.destination, Value::String(changed))?;
        Ok(())
    }
}
