// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::consts::RESERVED_QUEUES;
use crate::errors::QueueError;
use crate::queue::Queue;

/// The named queues owned by one actor.
///
/// Entries are shared handles so the router can point a name at another
/// actor's queue when two endpoints are connected.
#[derive(Debug)]
pub struct QueuePool {
    capacity: usize,
    queues: RwLock<HashMap<String, Arc<Queue>>>,
}

impl QueuePool {
    /// Pool holding the four reserved queues, each with `capacity`
    pub fn new(capacity: usize) -> Self {
        let queues = RESERVED_QUEUES
            .iter()
            .map(|name| (name.to_string(), Arc::new(Queue::new(*name, capacity))))
            .collect();
        Self {
            capacity,
            queues: RwLock::new(queues),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED_QUEUES.contains(&name)
    }

    pub fn create_queue(&self, name: &str) -> Result<Arc<Queue>, QueueError> {
        if Self::is_reserved(name) {
            return Err(QueueError::Reserved(name.to_string()));
        }
        let mut queues = self.queues.write();
        if queues.contains_key(name) {
            return Err(QueueError::AlreadyExists(name.to_string()));
        }
        let queue = Arc::new(Queue::new(name, self.capacity));
        queues.insert(name.to_string(), queue.clone());
        Ok(queue)
    }

    /// Existing queue, or a freshly created one. Reserved names always exist.
    pub fn ensure_queue(&self, name: &str) -> Arc<Queue> {
        let mut queues = self.queues.write();
        queues
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Queue::new(name, self.capacity)))
            .clone()
    }

    pub fn get_queue(&self, name: &str) -> Result<Arc<Queue>, QueueError> {
        self.queues
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| QueueError::Missing(name.to_string()))
    }

    pub fn has_queue(&self, name: &str) -> bool {
        self.queues.read().contains_key(name)
    }

    /// `(name, queue)` pairs sorted by name
    pub fn list_queues(&self, include_reserved: bool) -> Vec<(String, Arc<Queue>)> {
        let mut listed: Vec<_> = self
            .queues
            .read()
            .iter()
            .filter(|(name, _)| include_reserved || !Self::is_reserved(name))
            .map(|(name, queue)| (name.clone(), queue.clone()))
            .collect();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        listed
    }

    /// Point `name` at `queue`, returning the handle it replaced
    pub(crate) fn replace(&self, name: &str, queue: Arc<Queue>) -> Option<Arc<Queue>> {
        self.queues.write().insert(name.to_string(), queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_holds_reserved_queues() {
        let pool = QueuePool::new(10);
        for name in RESERVED_QUEUES {
            assert!(pool.has_queue(name));
            assert!(pool.get_queue(name).unwrap().is_fallthrough());
        }
        assert!(pool.list_queues(false).is_empty());
        assert_eq!(pool.list_queues(true).len(), 4);
    }

    #[test]
    fn reserved_and_duplicate_names_are_rejected() {
        let pool = QueuePool::new(10);
        for name in RESERVED_QUEUES {
            assert!(matches!(pool.create_queue(name), Err(QueueError::Reserved(_))));
        }
        pool.create_queue("inbox").unwrap();
        assert!(matches!(
            pool.create_queue("inbox"),
            Err(QueueError::AlreadyExists(_))
        ));
        assert_eq!(pool.get_queue("inbox").unwrap().capacity(), 10);
    }

    #[test]
    fn missing_queue_lookup_fails() {
        let pool = QueuePool::new(10);
        assert!(matches!(pool.get_queue("nope"), Err(QueueError::Missing(_))));
        assert!(!pool.has_queue("nope"));
    }

    #[test]
    fn replace_aliases_another_queue() {
        let left = QueuePool::new(5);
        let right = QueuePool::new(5);
        let shared = left.create_queue("outbox").unwrap();
        right.create_queue("inbox").unwrap();

        right.replace("inbox", shared.clone());
        assert!(Arc::ptr_eq(&right.get_queue("inbox").unwrap(), &shared));
    }

    #[test]
    fn listing_is_sorted() {
        let pool = QueuePool::new(5);
        pool.create_queue("b").unwrap();
        pool.create_queue("a").unwrap();
        let names: Vec<_> = pool.list_queues(false).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        let all: Vec<_> = pool.list_queues(true).into_iter().map(|(n, _)| n).collect();
        assert_eq!(all, vec!["a", "b", "failed", "logs", "metrics", "success"]);
    }
}
