// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dotted path expressions over `serde_json::Value` trees.
//!
//! A path such as `data.users.0.name` is parsed once into segments and then
//! used for pure tree operations: [`lookup`], [`assign`]
//! and [`remove`]. An all-digit segment indexes into sequences and
//! is used as a plain key on mappings.

use serde_json::{Map, Value};
use std::fmt;

use crate::errors::EventError;

/// One step of a dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        let canonical = raw == "0" || !raw.starts_with('0');
        if canonical && !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    /// The segment as a mapping key
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A parsed dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parse `a.b.0.c`. Empty paths and empty segments (`a..b`) are rejected.
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EventError::InvalidPath(raw.to_string()));
        }

        let mut segments = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(EventError::InvalidPath(raw.to_string()));
            }
            segments.push(Segment::parse(part));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The first segment, rendered as a key
    pub fn root(&self) -> String {
        self.segments[0].as_key()
    }

    /// Everything after the first segment
    pub fn rest(&self) -> &[Segment] {
        &self.segments[1..]
    }

    /// Resolve the full path against `value`
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        lookup(value, &self.segments)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Walk `segments` down from `value`
pub fn lookup<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(map), segment) => map.get(&segment.as_key())?,
            (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Look up `segments` inside a mapping root, cloning the result. The empty
/// path returns the whole mapping.
pub fn lookup_in_map(map: &Map<String, Value>, segments: &[Segment]) -> Option<Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Value::Object(map.clone()));
    };
    lookup(map.get(&first.as_key())?, rest).cloned()
}

/// Mutable variant of [`lookup`]
pub fn lookup_mut<'a>(value: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(map), segment) => map.get_mut(&segment.as_key())?,
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Store `new` at `segments` below `value`, creating missing mappings on
/// the way. A `Null` intermediate is replaced by an empty mapping. Writing
/// one past the end of a sequence appends.
pub fn assign(
    value: &mut Value,
    segments: &[Segment],
    new: Value,
    path: &str,
) -> Result<(), EventError> {
    let Some((last, parents)) = segments.split_last() else {
        *value = new;
        return Ok(());
    };

    let mut current = value;
    for segment in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match (current, segment) {
            (Value::Object(map), segment) => map
                .entry(segment.as_key())
                .or_insert_with(|| Value::Object(Map::new())),
            (Value::Array(items), Segment::Index(index)) => {
                let len = items.len();
                if *index == len {
                    items.push(Value::Object(Map::new()));
                }
                items.get_mut(*index).ok_or_else(|| conflict(path, segment))?
            }
            _ => return Err(conflict(path, segment)),
        };
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    match (current, last) {
        (Value::Object(map), segment) => {
            map.insert(segment.as_key(), new);
            Ok(())
        }
        (Value::Array(items), Segment::Index(index)) => {
            if *index < items.len() {
                items[*index] = new;
                Ok(())
            } else if *index == items.len() {
                items.push(new);
                Ok(())
            } else {
                Err(conflict(path, last))
            }
        }
        _ => Err(conflict(path, last)),
    }
}

/// Remove and return the value at `segments`. The empty path removes nothing.
pub fn remove(value: &mut Value, segments: &[Segment]) -> Option<Value> {
    let (last, parents) = segments.split_last()?;
    match (lookup_mut(value, parents)?, last) {
        (Value::Object(map), segment) => map.remove(&segment.as_key()),
        (Value::Array(items), Segment::Index(index)) if *index < items.len() => {
            Some(items.remove(*index))
        }
        _ => None,
    }
}

fn conflict(path: &str, segment: &Segment) -> EventError {
    EventError::PathConflict {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_splits_keys_and_indexes() {
        let path = PathExpr::parse("data.items.2.name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("data".into()),
                Segment::Key("items".into()),
                Segment::Index(2),
                Segment::Key("name".into()),
            ]
        );
        assert_eq!(path.root(), "data");
        assert_eq!(path.rest().len(), 3);
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!(PathExpr::parse("").is_err());
        assert!(PathExpr::parse("data..x").is_err());
        assert!(PathExpr::parse(".data").is_err());
    }

    #[test]
    fn numeric_segment_is_a_key_on_mappings() {
        let value = json!({"7": "seven", "list": [10, 20]});
        assert_eq!(lookup(&value, &[Segment::Index(7)]), Some(&json!("seven")));
        assert_eq!(
            lookup(&value, &[Segment::Key("list".into()), Segment::Index(1)]),
            Some(&json!(20))
        );
    }

    #[test]
    fn assign_creates_intermediate_mappings() {
        let mut value = Value::Null;
        let path = PathExpr::parse("a.b.c").unwrap();
        assign(&mut value, path.segments(), json!(1), path.as_str()).unwrap();
        assert_eq!(value, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn assign_appends_one_past_the_end() {
        let mut value = json!({"list": [1]});
        let path = PathExpr::parse("list.1").unwrap();
        assign(&mut value, path.segments(), json!(2), path.as_str()).unwrap();
        assert_eq!(value, json!({"list": [1, 2]}));

        let gap = PathExpr::parse("list.5").unwrap();
        assert!(matches!(
            assign(&mut value, gap.segments(), json!(3), gap.as_str()),
            Err(EventError::PathConflict { .. })
        ));
    }

    #[test]
    fn assign_through_scalar_is_a_conflict() {
        let mut value = json!({"a": 5});
        let path = PathExpr::parse("a.b").unwrap();
        let err = assign(&mut value, path.segments(), json!(1), path.as_str()).unwrap_err();
        assert_eq!(
            err,
            EventError::PathConflict {
                path: "a.b".into(),
                segment: "b".into()
            }
        );
    }

    #[test]
    fn remove_returns_the_leaf() {
        let mut value = json!({"a": {"b": 1, "c": 2}, "l": [1, 2, 3]});
        assert_eq!(
            remove(&mut value, PathExpr::parse("a.b").unwrap().segments()),
            Some(json!(1))
        );
        assert_eq!(
            remove(&mut value, PathExpr::parse("l.0").unwrap().segments()),
            Some(json!(1))
        );
        assert_eq!(value, json!({"a": {"c": 2}, "l": [2, 3]}));
        assert_eq!(remove(&mut value, PathExpr::parse("a.zz").unwrap().segments()), None);
    }
}
