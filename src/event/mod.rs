// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event data model: payload, reserved metadata, dotted paths, templates
//! and bulk aggregation.

mod bulk;
mod model;
pub mod path;
pub mod template;

pub use bulk::{extract_bulk_item_values, extract_bulk_items};
pub use model::{
    Event, FIELD_BULK, FIELD_CLONED, FIELD_DATA, FIELD_ERRORS, FIELD_TAGS, FIELD_TIMESTAMP, FIELD_TMP,
    FIELD_TTL, FIELD_UUID, FIELD_UUID_PREVIOUS, RESERVED_FIELDS,
};
pub use path::PathExpr;
pub use template::Template;
