// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parameters input and output modules must carry, and the shared helpers
//! that give those parameters their meaning.

use serde_json::Value;

use crate::actor::config::{ActorConfig, Parameters};
use crate::errors::{ActorError, ModuleError};
use crate::event::Event;
use crate::traits::ModuleKind;

pub const NATIVE_EVENTS: &str = "native_events";
pub const DESTINATION: &str = "destination";
pub const SELECTION: &str = "selection";
pub const PAYLOAD: &str = "payload";
pub const PARALLEL_STREAMS: &str = "parallel_streams";

pub const INPUT_PARAMETERS: [&str; 2] = [NATIVE_EVENTS, DESTINATION];
pub const OUTPUT_PARAMETERS: [&str; 4] = [SELECTION, PAYLOAD, NATIVE_EVENTS, PARALLEL_STREAMS];

/// Fail fast when an input or output module lacks a parameter its kind needs
pub fn check_required(config: &ActorConfig, kind: ModuleKind) -> Result<(), ActorError> {
    let required: &[&'static str] = match kind {
        ModuleKind::Input => &INPUT_PARAMETERS,
        ModuleKind::Output => &OUTPUT_PARAMETERS,
        ModuleKind::Flow | ModuleKind::Process => &[],
    };
    match required.iter().copied().find(|name| !config.has_parameter(name)) {
        Some(parameter) => Err(ActorError::MissingParameter {
            actor: config.name.clone(),
            kind: kind.as_str(),
            parameter,
        }),
        None => Ok(()),
    }
}

/// Default parameter set for an input module
pub fn input_defaults() -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    map.insert(NATIVE_EVENTS.into(), Value::Bool(false));
    map.insert(DESTINATION.into(), Value::String("data".into()));
    map
}

/// Default parameter set for an output module
pub fn output_defaults() -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    map.insert(SELECTION.into(), Value::String("data".into()));
    map.insert(PAYLOAD.into(), Value::Null);
    map.insert(NATIVE_EVENTS.into(), Value::Bool(false));
    map.insert(PARALLEL_STREAMS.into(), Value::from(1));
    map
}

/// What an output module should write for `event`: the whole dump for
/// native events, else `payload` when set, else the value at `selection`.
pub fn select_payload(event: &Event, params: &Parameters) -> Result<Value, ModuleError> {
    if params.bool_or(NATIVE_EVENTS, false)? {
        return Ok(event.dump());
    }
    match params.get(PAYLOAD) {
        Some(payload) if !payload.is_null() => Ok(payload.clone()),
        _ => Ok(event.get(params.str_or(SELECTION, "data")?)?),
    }
}

/// Turn a decoded value into an event: slurped for native events, else
/// stored at `destination` on a fresh event.
pub fn build_event(value: Value, params: &Parameters) -> Result<Event, ModuleError> {
    if params.bool_or(NATIVE_EVENTS, false)? {
        return Ok(Event::from_dump(value)?);
    }
    let mut event = Event::default();
    event.set(params.str_or(DESTINATION, "data")?, value)?;
    Ok(event)
}
