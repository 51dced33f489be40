// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The unit of work flowing between actors.
//!
//! An [`Event`] carries a dynamically shaped payload under `data` plus a set
//! of reserved metadata roots. Every field is addressable with a dotted path
//! whose first segment names the root, e.g. `data.user.name`,
//! `tmp.my_actor.counter` or `uuid_previous.0`.
//!
//! ```
//! use switchyard::event::Event;
//! use serde_json::json;
//!
//! let mut event = Event::new(json!({"user": {"name": "ada"}}));
//! event.set("data.user.id", json!(7)).unwrap();
//! assert_eq!(event.get("data.user.id").unwrap(), json!(7));
//!
//! let copy = event.clone_event();
//! assert!(copy.uuid_previous().contains(&event.uuid().to_string()));
//! ```

use serde_json::{json, Map, Value};

use crate::config::consts::{DEFAULT_BULK_SIZE, DEFAULT_TTL};
use crate::errors::EventError;
use crate::event::path::{self, PathExpr};
use crate::event::template::Template;

pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_DATA: &str = "data";
pub const FIELD_TMP: &str = "tmp";
pub const FIELD_ERRORS: &str = "errors";
pub const FIELD_UUID: &str = "uuid";
pub const FIELD_UUID_PREVIOUS: &str = "uuid_previous";
pub const FIELD_CLONED: &str = "cloned";
pub const FIELD_BULK: &str = "bulk";
pub const FIELD_TTL: &str = "ttl";
pub const FIELD_TAGS: &str = "tags";

/// Top-level keys every dump contains, in validation order
pub const RESERVED_FIELDS: [&str; 10] = [
    FIELD_TIMESTAMP,
    FIELD_DATA,
    FIELD_TMP,
    FIELD_ERRORS,
    FIELD_UUID,
    FIELD_UUID_PREVIOUS,
    FIELD_CLONED,
    FIELD_BULK,
    FIELD_TTL,
    FIELD_TAGS,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub(crate) data: Value,
    uuid: String,
    uuid_previous: Vec<String>,
    timestamp: f64,
    ttl: i64,
    tags: Vec<String>,
    errors: Map<String, Value>,
    tmp: Map<String, Value>,
    pub(crate) bulk: bool,
    pub(crate) bulk_size: Option<usize>,
    cloned: bool,
}

impl Default for Event {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl Event {
    /// Fresh event with a random uuid and the current time
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: data.into(),
            uuid: new_uuid(),
            uuid_previous: Vec::new(),
            timestamp: now(),
            ttl: DEFAULT_TTL,
            tags: Vec::new(),
            errors: Map::new(),
            tmp: Map::new(),
            bulk: false,
            bulk_size: None,
            cloned: false,
        }
    }

    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Empty bulk event able to hold `bulk_size` children
    pub fn new_bulk(bulk_size: usize) -> Self {
        let mut event = Self::new(Value::Array(Vec::new()));
        event.bulk = true;
        event.bulk_size = Some(bulk_size);
        event
    }

    /// Rehydrate an event from a [`dump`](Self::dump)
    pub fn from_dump(representation: Value) -> Result<Self, EventError> {
        let mut event = Self::default();
        event.slurp(representation)?;
        Ok(event)
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn uuid_previous(&self) -> &[String] {
        &self.uuid_previous
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn errors(&self) -> &Map<String, Value> {
        &self.errors
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn is_bulk(&self) -> bool {
        self.bulk
    }

    pub fn is_cloned(&self) -> bool {
        self.cloned
    }

    /// Value at `path`. The empty path returns the whole dump.
    pub fn get(&self, path: &str) -> Result<Value, EventError> {
        if path.trim().is_empty() {
            return Ok(self.dump());
        }
        let expr = self.reserved_path(path)?;
        self.get_expr(&expr)
    }

    fn get_expr(&self, expr: &PathExpr) -> Result<Value, EventError> {
        let not_found = || EventError::NotFound(expr.as_str().to_string());
        let root = expr.root();
        let found = match root.as_str() {
            FIELD_DATA => path::lookup(&self.data, expr.rest()).cloned(),
            FIELD_TMP => path::lookup_in_map(&self.tmp, expr.rest()),
            FIELD_ERRORS => path::lookup_in_map(&self.errors, expr.rest()),
            _ => {
                let whole = self.root_value(&root);
                path::lookup(&whole, expr.rest()).cloned()
            }
        };
        found.ok_or_else(not_found)
    }

    /// Store `value` at `path`, creating intermediate mappings as needed.
    /// Only `data`, `tmp`, `errors` and `tags` accept writes.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), EventError> {
        let expr = self.reserved_path(path)?;
        let raw = expr.as_str();
        match expr.root().as_str() {
            FIELD_DATA => path::assign(&mut self.data, expr.rest(), value, raw),
            FIELD_TMP => assign_in_map(&mut self.tmp, &expr, value),
            FIELD_ERRORS => assign_in_map(&mut self.errors, &expr, value),
            FIELD_TAGS => {
                let mut tags = Value::from(self.tags.clone());
                path::assign(&mut tags, expr.rest(), value, raw)?;
                self.tags = string_list(&tags, FIELD_TAGS)?;
                Ok(())
            }
            root => Err(EventError::ProtectedField(root.to_string())),
        }
    }

    /// Never fails: any error resolving the path means "absent"
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Remove the value at `path`. Reserved roots themselves are protected.
    pub fn delete(&mut self, path: &str) -> Result<Value, EventError> {
        let expr = self.reserved_path(path)?;
        let root = expr.root();
        if expr.rest().is_empty() {
            return Err(EventError::ProtectedField(root));
        }
        let removed = match root.as_str() {
            FIELD_DATA => path::remove(&mut self.data, expr.rest()),
            FIELD_TMP => remove_in_map(&mut self.tmp, expr.rest()),
            FIELD_ERRORS => remove_in_map(&mut self.errors, expr.rest()),
            FIELD_TAGS => {
                let mut tags = Value::from(self.tags.clone());
                let removed = path::remove(&mut tags, expr.rest());
                self.tags = string_list(&tags, FIELD_TAGS)?;
                removed
            }
            _ => return Err(EventError::ProtectedField(root)),
        };
        removed.ok_or_else(|| EventError::NotFound(expr.as_str().to_string()))
    }

    /// Deep copy the value at `source` into `destination`
    pub fn copy(&mut self, source: &str, destination: &str) -> Result<(), EventError> {
        let value = self.get(source)?;
        self.set(destination, value)
    }

    /// Concatenate sequences or union mappings at `path`. Any other pairing,
    /// including an absent target, is invalid data.
    pub fn merge(&mut self, path: &str, value: Value) -> Result<(), EventError> {
        let current = self
            .get(path)
            .map_err(|_| EventError::InvalidData(format!("cannot merge into unset '{}'", path)))?;

        let merged = match (current, value) {
            (Value::Array(mut left), Value::Array(right)) => {
                left.extend(right);
                Value::Array(left)
            }
            (Value::Object(mut left), Value::Object(right)) => {
                left.extend(right);
                Value::Object(left)
            }
            (left, right) => {
                return Err(EventError::InvalidData(format!(
                    "cannot merge {} into {} at '{}'",
                    type_name(&right),
                    type_name(&left),
                    path
                )))
            }
        };
        self.set(path, merged)
    }

    /// Independent deep copy with a new identity. The current uuid is
    /// appended to the copy's provenance chain.
    pub fn clone_event(&self) -> Event {
        let mut copy = self.clone();
        copy.uuid_previous.push(copy.uuid.clone());
        copy.uuid = new_uuid();
        copy.cloned = true;
        copy.timestamp = now();
        copy
    }

    /// Spend one hop. Fails once the budget has already reached zero; the
    /// caller must then treat the event as gone.
    pub fn decrement_ttl(&mut self) -> Result<(), EventError> {
        if self.ttl <= 0 {
            return Err(EventError::TtlExpired);
        }
        self.ttl -= 1;
        Ok(())
    }

    /// Plain representation containing exactly the reserved fields
    pub fn dump(&self) -> Value {
        json!({
            FIELD_TIMESTAMP: self.timestamp,
            FIELD_DATA: self.data,
            FIELD_TMP: self.tmp,
            FIELD_ERRORS: self.errors,
            FIELD_UUID: self.uuid,
            FIELD_UUID_PREVIOUS: self.uuid_previous,
            FIELD_CLONED: self.cloned,
            FIELD_BULK: self.bulk,
            FIELD_TTL: self.ttl,
            FIELD_TAGS: self.tags,
        })
    }

    /// Replace this event's state with a validated dump. The timestamp is
    /// refreshed; everything else is taken from the representation.
    pub fn slurp(&mut self, representation: Value) -> Result<(), EventError> {
        let Value::Object(mut fields) = representation else {
            return Err(EventError::InvalidData(
                "event representation must be a mapping".into(),
            ));
        };

        for field in RESERVED_FIELDS {
            if !fields.contains_key(field) {
                return Err(EventError::InvalidData(format!("missing field '{}'", field)));
            }
        }
        if let Some(extra) = fields.keys().find(|k| !RESERVED_FIELDS.contains(&k.as_str())) {
            return Err(EventError::InvalidData(format!("unexpected field '{}'", extra)));
        }

        let mut take = |name: &str| fields.remove(name).unwrap_or(Value::Null);

        if !take(FIELD_TIMESTAMP).is_number() {
            return Err(invalid_type(FIELD_TIMESTAMP, "a number"));
        }
        let data = take(FIELD_DATA);
        let Value::Object(tmp) = take(FIELD_TMP) else {
            return Err(invalid_type(FIELD_TMP, "a mapping"));
        };
        let Value::Object(errors) = take(FIELD_ERRORS) else {
            return Err(invalid_type(FIELD_ERRORS, "a mapping"));
        };
        let Value::String(uuid) = take(FIELD_UUID) else {
            return Err(invalid_type(FIELD_UUID, "a string"));
        };
        let uuid_previous = string_list(&take(FIELD_UUID_PREVIOUS), FIELD_UUID_PREVIOUS)?;
        let Value::Bool(cloned) = take(FIELD_CLONED) else {
            return Err(invalid_type(FIELD_CLONED, "a boolean"));
        };
        let Value::Bool(bulk) = take(FIELD_BULK) else {
            return Err(invalid_type(FIELD_BULK, "a boolean"));
        };
        let ttl = take(FIELD_TTL)
            .as_i64()
            .ok_or_else(|| invalid_type(FIELD_TTL, "an integer"))?;
        let tags = string_list(&take(FIELD_TAGS), FIELD_TAGS)?;

        let bulk_size = if bulk {
            let Some(items) = data.as_array() else {
                return Err(invalid_type(FIELD_DATA, "a sequence on a bulk event"));
            };
            Some(DEFAULT_BULK_SIZE.max(items.len()))
        } else {
            None
        };

        *self = Self {
            data,
            uuid,
            uuid_previous,
            timestamp: now(),
            ttl,
            tags,
            errors,
            tmp,
            bulk,
            bulk_size,
            cloned,
        };
        Ok(())
    }

    /// Render `template` with this event's dump as the context
    pub fn render(&self, template: &str) -> Result<String, EventError> {
        self.render_with(template, &self.dump())
    }

    /// Render `template` against an explicit context
    pub fn render_with(&self, template: &str, context: &Value) -> Result<String, EventError> {
        Ok(Template::parse(template)?.render(context))
    }

    /// Record a handler failure under `errors.<actor>`
    pub fn set_error(&mut self, actor: &str, location: &str, kind: &str, message: &str) {
        self.errors.insert(
            actor.to_string(),
            json!({"location": location, "type": kind, "message": message}),
        );
    }

    /// Make sure `tmp.<actor>` exists as a mapping
    pub fn ensure_tmp_namespace(&mut self, actor: &str) {
        let slot = self
            .tmp
            .entry(actor.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
    }

    fn reserved_path(&self, raw: &str) -> Result<PathExpr, EventError> {
        let expr = PathExpr::parse(raw)?;
        if !RESERVED_FIELDS.contains(&expr.root().as_str()) {
            return Err(EventError::InvalidPath(raw.to_string()));
        }
        Ok(expr)
    }

    fn root_value(&self, root: &str) -> Value {
        match root {
            FIELD_TIMESTAMP => json!(self.timestamp),
            FIELD_UUID => json!(self.uuid),
            FIELD_UUID_PREVIOUS => json!(self.uuid_previous),
            FIELD_CLONED => json!(self.cloned),
            FIELD_BULK => json!(self.bulk),
            FIELD_TTL => json!(self.ttl),
            FIELD_TAGS => json!(self.tags),
            FIELD_DATA => self.data.clone(),
            FIELD_TMP => Value::Object(self.tmp.clone()),
            FIELD_ERRORS => Value::Object(self.errors.clone()),
            _ => Value::Null,
        }
    }
}

fn assign_in_map(map: &mut Map<String, Value>, expr: &PathExpr, value: Value) -> Result<(), EventError> {
    if expr.rest().is_empty() {
        return match value {
            Value::Object(replacement) => {
                *map = replacement;
                Ok(())
            }
            other => Err(EventError::InvalidData(format!(
                "'{}' must be a mapping, got {}",
                expr.root(),
                type_name(&other)
            ))),
        };
    }

    let mut root = Value::Object(std::mem::take(map));
    let result = path::assign(&mut root, expr.rest(), value, expr.as_str());
    if let Value::Object(updated) = root {
        *map = updated;
    }
    result
}

fn remove_in_map(map: &mut Map<String, Value>, segments: &[path::Segment]) -> Option<Value> {
    let mut root = Value::Object(std::mem::take(map));
    let removed = path::remove(&mut root, segments);
    if let Value::Object(updated) = root {
        *map = updated;
    }
    removed
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>, EventError> {
    let Value::Array(items) = value else {
        return Err(invalid_type(field, "a sequence of strings"));
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid_type(field, "a sequence of strings"))
        })
        .collect()
}

fn invalid_type(field: &str, expected: &str) -> EventError {
    EventError::InvalidData(format!("field '{}' must be {}", field, expected))
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
