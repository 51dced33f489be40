// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bulk events: one event whose `data` is a sequence of child dumps.
//!
//! Children are stored in dumped form and only rehydrated when extracted,
//! so a bucket of thousands of events costs one allocation per child.

use serde_json::Value;

use crate::config::consts::DEFAULT_BULK_SIZE;
use crate::errors::EventError;
use crate::event::model::Event;

impl Event {
    /// Append `event`'s dump to this bulk event
    pub fn append_bulk(&mut self, event: &Event) -> Result<(), EventError> {
        self.push_bulk_item(event.dump())
    }

    /// Append an already dumped child. The representation is validated so a
    /// bulk never holds something that cannot be rehydrated.
    pub fn append_bulk_dump(&mut self, representation: Value) -> Result<(), EventError> {
        Event::from_dump(representation.clone())?;
        self.push_bulk_item(representation)
    }

    /// Number of children currently held
    pub fn bulk_len(&self) -> usize {
        match (&self.data, self.bulk) {
            (Value::Array(items), true) => items.len(),
            _ => 0,
        }
    }

    /// Maximum number of children, `None` for a regular event
    pub fn bulk_size(&self) -> Option<usize> {
        self.bulk.then(|| self.bulk_size.unwrap_or(DEFAULT_BULK_SIZE))
    }

    pub fn is_bulk_full(&self) -> bool {
        self.bulk_size().is_some_and(|size| self.bulk_len() >= size)
    }

    fn push_bulk_item(&mut self, item: Value) -> Result<(), EventError> {
        if !self.bulk {
            return Err(EventError::InvalidData(
                "cannot append to an event that is not a bulk event".into(),
            ));
        }
        let capacity = self.bulk_size.unwrap_or(DEFAULT_BULK_SIZE);
        let Value::Array(items) = &mut self.data else {
            return Err(EventError::InvalidData("bulk event data must be a sequence".into()));
        };
        if items.len() >= capacity {
            return Err(EventError::BulkFull(capacity));
        }
        items.push(item);
        Ok(())
    }
}

/// Lazily rehydrate every child of a bulk event. Yields nothing for a
/// regular event.
pub fn extract_bulk_items(event: &Event) -> impl Iterator<Item = Result<Event, EventError>> + '_ {
    children(event).map(|item| Event::from_dump(item.clone()))
}

/// Lazily pull the value at `path` out of every child of a bulk event.
/// `path` follows the rules of [`Event::get`].
pub fn extract_bulk_item_values<'a>(
    event: &'a Event,
    path: &str,
) -> impl Iterator<Item = Result<Value, EventError>> + 'a {
    let path = path.to_string();
    children(event).map(move |item| Event::from_dump(item.clone())?.get(&path))
}

fn children(event: &Event) -> impl Iterator<Item = &Value> {
    event
        .data
        .as_array()
        .filter(|_| event.bulk)
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bulk_accepts_exactly_bulk_size_items() {
        let mut bulk = Event::new_bulk(3);
        for i in 0..3 {
            bulk.append_bulk(&Event::new(json!(i))).unwrap();
        }
        assert!(bulk.is_bulk_full());
        assert_eq!(bulk.append_bulk(&Event::new(json!(4))), Err(EventError::BulkFull(3)));
        assert_eq!(bulk.bulk_len(), 3);
    }

    #[test]
    fn append_to_regular_event_is_invalid() {
        let mut event = Event::new(json!([]));
        assert!(matches!(
            event.append_bulk(&Event::default()),
            Err(EventError::InvalidData(_))
        ));
    }

    #[test]
    fn append_dump_validates_the_child() {
        let mut bulk = Event::new_bulk(2);
        assert!(matches!(
            bulk.append_bulk_dump(json!({"data": 1})),
            Err(EventError::InvalidData(_))
        ));
        bulk.append_bulk_dump(Event::new(json!("ok")).dump()).unwrap();
        assert_eq!(bulk.bulk_len(), 1);
    }

    #[test]
    fn extraction_rehydrates_children() {
        let mut bulk = Event::new_bulk(10);
        let first = Event::new(json!({"n": 1}));
        bulk.append_bulk(&first).unwrap();
        bulk.append_bulk(&Event::new(json!({"n": 2}))).unwrap();

        let items: Vec<Event> = extract_bulk_items(&bulk).collect::<Result<_, _>>().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].uuid(), first.uuid());

        let values: Vec<Value> = extract_bulk_item_values(&bulk, "data.n")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(values, vec![json!(1), json!(2)]);
    }

    #[test]
    fn extracted_paths_follow_event_get_rules() {
        let mut bulk = Event::new_bulk(2);
        bulk.append_bulk(&Event::new(json!({"n": 1}))).unwrap();

        let unknown_root: Vec<_> = extract_bulk_item_values(&bulk, "foo.x").collect();
        assert_eq!(unknown_root, vec![Err(EventError::InvalidPath("foo.x".into()))]);

        let missing: Vec<_> = extract_bulk_item_values(&bulk, "data.m").collect();
        assert!(matches!(missing.as_slice(), [Err(EventError::NotFound(_))]));
    }

    #[test]
    fn extraction_from_regular_event_is_empty() {
        let event = Event::new(json!([Event::default().dump()]));
        assert_eq!(extract_bulk_items(&event).count(), 0);
        assert_eq!(extract_bulk_item_values(&event, "data").count(), 0);
    }
}
