// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Connection graph between actors.
//!
//! Every connection joins two queue endpoints. Seen from the actors, the
//! connections form a directed graph that answers two questions: which
//! actors are downstream of a given actor, and in which order actors can be
//! stopped so producers go before the consumers they feed.
//!
//! # Algorithms
//!
//! * Downstream set: breadth-first search, O(V + E)
//! * Stop order: Kahn's algorithm over the selected actors. Actors caught in
//!   a cycle cannot be ordered and are appended by name.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use crate::errors::RouterError;

/// `actor.queue`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub actor: String,
    pub queue: String,
}

impl Endpoint {
    pub fn new(actor: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            queue: queue.into(),
        }
    }

    /// Split at the first `.`; both sides must be non-empty
    pub fn parse(qualified: &str) -> Result<Self, RouterError> {
        match qualified.trim().split_once('.') {
            Some((actor, queue)) if !actor.is_empty() && !queue.is_empty() => {
                Ok(Self::new(actor, queue))
            }
            _ => Err(RouterError::InvalidQualifiedName(qualified.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.actor, self.queue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: Endpoint,
    pub destination: Endpoint,
    /// Created by the router itself for `logs` and `metrics` collection
    pub internal: bool,
}

#[derive(Debug, Default)]
pub struct ConnectionGraph {
    connections: Vec<Connection>,
    endpoints: HashSet<Endpoint>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_connected(&self, endpoint: &Endpoint) -> bool {
        self.endpoints.contains(endpoint)
    }

    /// Record a connection. Each endpoint may take part in one connection.
    pub fn add(&mut self, connection: Connection) -> Result<(), RouterError> {
        for endpoint in [&connection.source, &connection.destination] {
            if self.is_connected(endpoint) {
                return Err(RouterError::AlreadyConnected(endpoint.to_string()));
            }
        }
        self.endpoints.insert(connection.source.clone());
        self.endpoints.insert(connection.destination.clone());
        self.connections.push(connection);
        Ok(())
    }

    fn adjacency(&self, include_internal: bool) -> HashMap<&str, BTreeSet<&str>> {
        let mut adjacency: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for connection in &self.connections {
            if connection.internal && !include_internal {
                continue;
            }
            adjacency
                .entry(connection.source.actor.as_str())
                .or_default()
                .insert(connection.destination.actor.as_str());
        }
        adjacency
    }

    /// Every actor reachable from `actor`, not counting `actor` itself
    pub fn children(&self, actor: &str, include_internal: bool) -> BTreeSet<String> {
        let adjacency = self.adjacency(include_internal);
        let mut seen: HashSet<&str> = HashSet::from([actor]);
        let mut queue: VecDeque<&str> = VecDeque::from([actor]);
        let mut children = BTreeSet::new();

        while let Some(current) = queue.pop_front() {
            let Some(next) = adjacency.get(current) else {
                continue;
            };
            for &child in next {
                if seen.insert(child) {
                    children.insert(child.to_string());
                    queue.push_back(child);
                }
            }
        }
        children
    }

    /// Order `actors` so every actor comes after the actors feeding it.
    /// Only connections between members of `actors` count.
    pub fn topological_order(&self, actors: &BTreeSet<String>, include_internal: bool) -> Vec<String> {
        let adjacency = self.adjacency(include_internal);

        let mut in_degree: HashMap<&str, usize> =
            actors.iter().map(|a| (a.as_str(), 0)).collect();
        for (source, targets) in &adjacency {
            if !actors.contains(*source) {
                continue;
            }
            for target in targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree += 1;
                }
            }
        }

        // BTreeSet iteration keeps the order stable between runs
        let mut ready: VecDeque<&str> = actors
            .iter()
            .map(String::as_str)
            .filter(|a| in_degree.get(a).copied() == Some(0))
            .collect();
        let mut order = Vec::with_capacity(actors.len());
        let mut placed = HashSet::new();

        while let Some(current) = ready.pop_front() {
            order.push(current.to_string());
            placed.insert(current);
            let Some(targets) = adjacency.get(current) else {
                continue;
            };
            for target in targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(*target);
                    }
                }
            }
        }

        for actor in actors {
            if !placed.contains(actor.as_str()) {
                order.push(actor.clone());
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(source: &str, destination: &str) -> Connection {
        Connection {
            source: Endpoint::parse(source).unwrap(),
            destination: Endpoint::parse(destination).unwrap(),
            internal: false,
        }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn endpoint_parsing() {
        assert_eq!(Endpoint::parse("a.q").unwrap(), Endpoint::new("a", "q"));
        assert_eq!(Endpoint::parse("a.q.x").unwrap(), Endpoint::new("a", "q.x"));
        for bad in ["a", ".q", "a.", ""] {
            assert!(matches!(
                Endpoint::parse(bad),
                Err(RouterError::InvalidQualifiedName(_))
            ));
        }
    }

    #[test]
    fn each_endpoint_is_used_once() {
        let mut graph = ConnectionGraph::new();
        graph.add(route("a.outbox", "b.inbox")).unwrap();

        let same_source = graph.add(route("a.outbox", "c.inbox")).unwrap_err();
        assert!(matches!(same_source, RouterError::AlreadyConnected(e) if e == "a.outbox"));

        let same_destination = graph.add(route("c.outbox", "b.inbox")).unwrap_err();
        assert!(matches!(same_destination, RouterError::AlreadyConnected(e) if e == "b.inbox"));
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn children_are_transitive_and_cycle_safe() {
        let mut graph = ConnectionGraph::new();
        graph.add(route("a.outbox", "b.inbox")).unwrap();
        graph.add(route("b.outbox", "c.inbox")).unwrap();
        graph.add(route("c.outbox", "a.inbox")).unwrap();
        graph.add(route("d.outbox", "e.inbox")).unwrap();

        assert_eq!(graph.children("a", true), set(&["b", "c"]));
        assert_eq!(graph.children("d", true), set(&["e"]));
        assert!(graph.children("e", true).is_empty());
    }

    #[test]
    fn internal_connections_can_be_ignored() {
        let mut graph = ConnectionGraph::new();
        graph.add(route("a.outbox", "b.inbox")).unwrap();
        graph
            .add(Connection {
                internal: true,
                ..route("b.logs", "_logs.b")
            })
            .unwrap();

        assert_eq!(graph.children("a", true), set(&["_logs", "b"]));
        assert_eq!(graph.children("a", false), set(&["b"]));
    }

    #[test]
    fn producers_are_ordered_before_consumers() {
        let mut graph = ConnectionGraph::new();
        graph.add(route("input.outbox", "fanout.inbox")).unwrap();
        graph.add(route("fanout.one", "out1.inbox")).unwrap();
        graph.add(route("fanout.two", "out2.inbox")).unwrap();

        let order = graph.topological_order(&set(&["out2", "out1", "fanout", "input"]), false);
        let position = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert!(position("input") < position("fanout"));
        assert!(position("fanout") < position("out1"));
        assert!(position("fanout") < position("out2"));
    }

    #[test]
    fn cycles_still_yield_every_actor() {
        let mut graph = ConnectionGraph::new();
        graph.add(route("a.outbox", "b.inbox")).unwrap();
        graph.add(route("b.outbox", "a.inbox")).unwrap();
        graph.add(route("src.outbox", "a.other")).unwrap();

        let order = graph.topological_order(&set(&["a", "b", "src"]), false);
        assert_eq!(order, vec!["src", "a", "b"]);
    }
}
