// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `{{ path }}` string templates rendered against an event dump.

use serde_json::Value;

use crate::errors::EventError;
use crate::event::path::PathExpr;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Literal(String),
    Placeholder(PathExpr),
}

/// A parsed template. Parsing happens once, rendering any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    raw: String,
    parts: Vec<Part>,
}

impl Template {
    /// True when `text` contains at least one placeholder opener
    pub fn is_template(text: &str) -> bool {
        text.contains(OPEN)
    }

    pub fn parse(text: &str) -> Result<Self, EventError> {
        let mut parts = Vec::new();
        let mut rest = text;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            let literal = &rest[..start];
            if let Some(stray) = literal.find(CLOSE) {
                return Err(EventError::Template(format!(
                    "unexpected '}}}}' at offset {}",
                    offset + stray
                )));
            }
            if !literal.is_empty() {
                parts.push(Part::Literal(literal.to_string()));
            }

            let after_open = &rest[start + OPEN.len()..];
            let end = after_open.find(CLOSE).ok_or_else(|| {
                EventError::Template(format!("unclosed '{{{{' at offset {}", offset + start))
            })?;
            let inner = &after_open[..end];
            if inner.contains(OPEN) {
                return Err(EventError::Template(format!(
                    "nested '{{{{' at offset {}",
                    offset + start
                )));
            }
            let expression = inner.trim();
            if expression.is_empty() {
                return Err(EventError::Template(format!(
                    "empty placeholder at offset {}",
                    offset + start
                )));
            }
            let path = PathExpr::parse(expression)
                .map_err(|_| EventError::Template(format!("invalid path '{}'", expression)))?;
            parts.push(Part::Placeholder(path));

            let consumed = start + OPEN.len() + end + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        if let Some(stray) = rest.find(CLOSE) {
            return Err(EventError::Template(format!(
                "unexpected '}}}}' at offset {}",
                offset + stray
            )));
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: text.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Render against `context`. Missing paths and nulls render empty,
    /// strings render raw, everything else as compact JSON.
    pub fn render(&self, context: &Value) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(path) => match path.lookup(context) {
                    None | Some(Value::Null) => {}
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                },
            }
        }
        out
    }

    /// Render, keeping the looked-up value's type when the template is a
    /// single placeholder with no surrounding text
    pub fn render_value(&self, context: &Value) -> Value {
        if let [Part::Placeholder(path)] = self.parts.as_slice() {
            return path.lookup(context).cloned().unwrap_or(Value::Null);
        }
        Value::String(self.render(context))
    }
}
