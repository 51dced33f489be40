// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topology document validation.
//!
//! Runs before any actor is constructed so a defective document never
//! produces a half-built topology. Every check runs to completion and all
//! problems are returned together, letting users fix a document in one
//! pass instead of one error at a time.
//!
//! # Checks
//!
//! 1. **Sections**: `modules` and `routingtable` are present
//! 2. **Modules**: each entry names a component, does not take an internal
//!    actor's name (or `outbox`, the internal actors' output queue) and only
//!    references declared protocols and functions
//! 3. **Routes**: each rule has the `actor.queue -> actor.queue` shape,
//!    points at declared modules (or the internal `_logs`/`_metrics`
//!    actors) and no endpoint takes part in two rules
//!
//! ```rust
//! use switchyard::config::{parse_yaml, validate_topology};
//! use switchyard::errors::ValidationError;
//!
//! let cfg = parse_yaml("
//! modules:
//!   a: {module: switchyard.module.flow.funnel}
//! routingtable:
//!   - a.outbox -> b.inbox
//! ").unwrap();
//!
//! let errors = validate_topology(&cfg).unwrap_err();
//! assert_eq!(
//!     errors,
//!     vec![ValidationError::UnknownModule {
//!         route: "a.outbox -> b.inbox".into(),
//!         module: "b".into()
//!     }]
//! );
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::config::consts::{INTERNAL_OUTBOX, LOGS_ACTOR, METRICS_ACTOR};
use crate::config::loader::{ModuleEntry, TopologyConfig};
use crate::errors::ValidationError;
use crate::router::Endpoint;

const ROUTE_SEPARATOR: &str = "->";

/// Validate `config`, returning every problem found
pub fn validate_topology(config: &TopologyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.modules.is_none() {
        errors.push(ValidationError::MissingSection { section: "modules" });
    }
    if config.routingtable.is_none() {
        errors.push(ValidationError::MissingSection {
            section: "routingtable",
        });
    }

    let empty = BTreeMap::new();
    let modules = config.modules.as_ref().unwrap_or(&empty);
    for (name, entry) in modules {
        validate_module(name, entry, config, &mut errors);
    }

    if let Some(routes) = &config.routingtable {
        validate_routes(routes, modules, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Split `a.q -> b.q` into its two endpoints
pub fn parse_route(route: &str) -> Result<(Endpoint, Endpoint), ValidationError> {
    let malformed = |reason: String| ValidationError::MalformedRoute {
        route: route.to_string(),
        reason,
    };

    let (source, destination) = route
        .split_once(ROUTE_SEPARATOR)
        .ok_or_else(|| malformed(format!("missing '{}'", ROUTE_SEPARATOR)))?;
    if destination.contains(ROUTE_SEPARATOR) {
        return Err(malformed(format!("more than one '{}'", ROUTE_SEPARATOR)));
    }

    let endpoint = |side: &str| {
        Endpoint::parse(side)
            .map_err(|_| malformed(format!("'{}' is not of the form 'module.queue'", side.trim())))
    };
    Ok((endpoint(source)?, endpoint(destination)?))
}

fn validate_module(
    name: &str,
    entry: &ModuleEntry,
    config: &TopologyConfig,
    errors: &mut Vec<ValidationError>,
) {
    if name == LOGS_ACTOR || name == METRICS_ACTOR || name == INTERNAL_OUTBOX {
        errors.push(ValidationError::ReservedModuleName {
            module: name.to_string(),
        });
    }

    if entry.module.as_deref().map_or(true, |m| m.trim().is_empty()) {
        errors.push(ValidationError::MissingComponent {
            module: name.to_string(),
        });
    }

    if let Some(protocol) = &entry.protocol {
        if !config.protocols.contains_key(protocol) {
            errors.push(ValidationError::UnknownProtocol {
                module: name.to_string(),
                protocol: protocol.clone(),
            });
        }
    }

    for (queue, functions) in &entry.functions {
        for function in functions {
            if !config.module_functions.contains_key(function) {
                errors.push(ValidationError::UnknownFunction {
                    module: name.to_string(),
                    queue: queue.clone(),
                    function: function.clone(),
                });
            }
        }
    }
}

fn validate_routes(
    routes: &[String],
    modules: &BTreeMap<String, ModuleEntry>,
    errors: &mut Vec<ValidationError>,
) {
    let known = |module: &str| {
        modules.contains_key(module) || module == LOGS_ACTOR || module == METRICS_ACTOR
    };
    let mut seen: HashSet<Endpoint> = HashSet::new();

    for route in routes {
        let (source, destination) = match parse_route(route) {
            Ok(endpoints) => endpoints,
            Err(error) => {
                errors.push(error);
                continue;
            }
        };

        for endpoint in [&source, &destination] {
            if !known(&endpoint.actor) {
                errors.push(ValidationError::UnknownModule {
                    route: route.clone(),
                    module: endpoint.actor.clone(),
                });
            }
            if !seen.insert(endpoint.clone()) {
                errors.push(ValidationError::DuplicateEndpoint {
                    endpoint: endpoint.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_yaml;

    fn errors_for(yaml: &str) -> Vec<ValidationError> {
        match validate_topology(&parse_yaml(yaml).unwrap()) {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        }
    }

    #[test]
    fn valid_document_passes() {
        let errors = errors_for(
            r#"
protocols:
  js: {protocol: switchyard.protocol.encode.json}
module_functions:
  up: {function: switchyard.function.module.uppercase}
modules:
  a: {module: switchyard.module.flow.fanout, functions: {inbox: [up]}}
  b: {module: switchyard.module.flow.funnel, protocol: js}
routingtable:
  - a.left -> b.left
  - _logs.outbox -> a.inbox
"#,
        );
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn missing_sections_are_both_reported() {
        assert_eq!(
            errors_for("runtime: {}"),
            vec![
                ValidationError::MissingSection { section: "modules" },
                ValidationError::MissingSection {
                    section: "routingtable"
                },
            ]
        );
    }

    #[test]
    fn internal_names_are_reserved() {
        let errors = errors_for(
            r#"
modules:
  outbox: {module: switchyard.module.flow.funnel}
  _metrics: {module: switchyard.module.flow.funnel}
routingtable: []
"#,
        );
        assert_eq!(
            errors,
            vec![
                ValidationError::ReservedModuleName {
                    module: "_metrics".into()
                },
                ValidationError::ReservedModuleName {
                    module: "outbox".into()
                },
            ]
        );
    }

    #[test]
    fn malformed_routes() {
        struct TestCase {
            route: &'static str,
            reason_contains: &'static str,
        }

        let cases = [
            TestCase { route: "a.outbox b.inbox", reason_contains: "missing '->'" },
            TestCase { route: "a.outbox -> b.inbox -> c.inbox", reason_contains: "more than one" },
            TestCase { route: "a -> b.inbox", reason_contains: "'a'" },
            TestCase { route: "a.outbox -> .inbox", reason_contains: "'.inbox'" },
        ];

        for case in cases {
            match parse_route(case.route) {
                Err(ValidationError::MalformedRoute { route, reason }) => {
                    assert_eq!(route, case.route);
                    assert!(reason.contains(case.reason_contains), "{}: {}", case.route, reason);
                }
                other => panic!("{}: unexpected {:?}", case.route, other),
            }
        }
    }

    #[test]
    fn problems_are_accumulated() {
        let errors = errors_for(
            r#"
modules:
  a: {module: switchyard.module.flow.fanout, protocol: nope, functions: {inbox: [missing]}}
  b: {arguments: {x: 1}}
  _logs: {module: switchyard.module.flow.funnel}
routingtable:
  - a.left -> b.left
  - a.left -> c.left
  - broken
"#,
        );

        assert!(errors.contains(&ValidationError::UnknownProtocol {
            module: "a".into(),
            protocol: "nope".into()
        }));
        assert!(errors.contains(&ValidationError::UnknownFunction {
            module: "a".into(),
            queue: "inbox".into(),
            function: "missing".into()
        }));
        assert!(errors.contains(&ValidationError::MissingComponent { module: "b".into() }));
        assert!(errors.contains(&ValidationError::ReservedModuleName {
            module: "_logs".into()
        }));
        assert!(errors.contains(&ValidationError::DuplicateEndpoint {
            endpoint: "a.left".into()
        }));
        assert!(errors.contains(&ValidationError::UnknownModule {
            route: "a.left -> c.left".into(),
            module: "c".into()
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MalformedRoute { route, .. } if route == "broken")));
        assert_eq!(errors.len(), 7);
    }
}
