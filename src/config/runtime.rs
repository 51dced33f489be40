// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::actor::{ActorConfig, Parameters};
use crate::config::loader::{ModuleEntry, TopologyConfig};
use crate::config::registry::ComponentResolver;
use crate::config::validation::{parse_route, validate_topology};
use crate::errors::{ComponentError, RouterError};
use crate::router::{Router, RuntimeOptions};
use crate::traits::{EventFunction, Protocol};

/// Topology builder - turns a validated document into a wired [`Router`].
///
/// Protocol and function instances are constructed once and shared by
/// every module referencing them. Modules are registered in name order,
/// then every route is connected in document order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use switchyard::config::{parse_yaml, ComponentRegistry, RuntimeBuilder};
///
/// let cfg = parse_yaml("
/// modules:
///   split: {module: switchyard.module.flow.fanout}
///   join: {module: switchyard.module.flow.funnel}
/// routingtable:
///   - split.a -> join.a
///   - split.b -> join.b
/// ").unwrap();
///
/// let router = RuntimeBuilder::from_config(&cfg, Arc::new(ComponentRegistry::builtin())).unwrap();
/// assert!(router.get_children("split").unwrap().contains("join"));
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Validate `cfg` and build every module and route it declares,
    /// resolving component names through `resolver`
    pub fn from_config(
        cfg: &TopologyConfig,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Result<Router, RouterError> {
        validate_topology(cfg).map_err(RouterError::Validation)?;

        let options = cfg.runtime.options();
        let protocols = build_protocols(cfg, resolver.as_ref())?;
        let functions = build_functions(cfg, resolver.as_ref())?;
        let mut router = Router::new(resolver, options)?;

        if let Some(modules) = &cfg.modules {
            for (name, entry) in modules {
                let config = actor_config(name, entry, &options, &protocols, &functions)?;
                let component = entry.module.as_deref().unwrap_or_default();
                router.register_module(component, config)?;
            }
        }

        for route in cfg.routingtable.iter().flatten() {
            let (source, destination) =
                parse_route(route).map_err(|error| RouterError::Validation(vec![error]))?;
            router.connect_queue(&source.to_string(), &destination.to_string())?;
        }

        Ok(router)
    }
}

fn build_protocols(
    cfg: &TopologyConfig,
    resolver: &dyn ComponentResolver,
) -> Result<HashMap<String, Arc<dyn Protocol>>, RouterError> {
    cfg.protocols
        .iter()
        .map(|(name, entry)| {
            let constructor = resolver.resolve_protocol(&entry.protocol)?;
            let params: Parameters = entry.arguments.clone().into_iter().collect();
            let protocol = constructor(&params).map_err(|e| construction(&entry.protocol, e))?;
            Ok((name.clone(), protocol))
        })
        .collect()
}

fn build_functions(
    cfg: &TopologyConfig,
    resolver: &dyn ComponentResolver,
) -> Result<HashMap<String, Arc<dyn EventFunction>>, RouterError> {
    cfg.module_functions
        .iter()
        .map(|(name, entry)| {
            let constructor = resolver.resolve_function(&entry.function)?;
            let params: Parameters = entry.arguments.clone().into_iter().collect();
            let function = constructor(&params).map_err(|e| construction(&entry.function, e))?;
            Ok((name.clone(), function))
        })
        .collect()
}

fn actor_config(
    name: &str,
    entry: &ModuleEntry,
    options: &RuntimeOptions,
    protocols: &HashMap<String, Arc<dyn Protocol>>,
    functions: &HashMap<String, Arc<dyn EventFunction>>,
) -> Result<ActorConfig, RouterError> {
    let mut config = ActorConfig::new(name)
        .with_size(options.queue_size)
        .with_frequency(options.frequency)
        .with_parameters(entry.arguments.clone())
        .map_err(|source| RouterError::ModuleInit {
            name: name.to_string(),
            source: Box::new(source),
        })?;

    if let Some(protocol) = entry.protocol.as_ref().and_then(|p| protocols.get(p)) {
        config = config.with_protocol(protocol.clone());
    }
    for (queue, names) in &entry.functions {
        for function in names.iter().filter_map(|f| functions.get(f)) {
            config = config.with_function(queue, function.clone());
        }
    }
    Ok(config)
}

fn construction(name: &str, error: impl std::fmt::Display) -> RouterError {
    RouterError::Component(ComponentError::Construction {
        name: name.to_string(),
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_yaml;
    use crate::config::ComponentRegistry;
    use crate::errors::ValidationError;

    fn build(yaml: &str) -> Result<Router, RouterError> {
        RuntimeBuilder::from_config(&parse_yaml(yaml).unwrap(), Arc::new(ComponentRegistry::builtin()))
    }

    #[test]
    fn wires_protocols_functions_and_runtime_options() {
        let router = build(
            r#"
runtime: {queue_size: 7, frequency: 2}
protocols:
  js: {protocol: switchyard.protocol.encode.json}
module_functions:
  up: {function: switchyard.function.module.uppercase}
  tag: {function: switchyard.function.module.append, arguments: {data: seen}}
modules:
  sink:
    module: switchyard.module.output.null
    protocol: js
    arguments: {selection: data, payload: null, native_events: false, parallel_streams: 2}
    functions: {inbox: [up, tag]}
routingtable: []
"#,
        )
        .unwrap();

        let sink = router.actor("sink").unwrap();
        let config = sink.context().config();
        assert_eq!(config.size, 7);
        assert_eq!(config.frequency, std::time::Duration::from_secs(2));
        assert_eq!(config.protocol.as_ref().unwrap().name(), "json");
        let names: Vec<&str> = config.functions["inbox"].iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["uppercase", "append"]);
        assert_eq!(sink.pool().capacity(), 7);
    }

    #[test]
    fn invalid_documents_never_build() {
        let err = build("modules: {a: {}}\nroutingtable: []").unwrap_err();
        match err {
            RouterError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::MissingComponent { module: "a".into() }])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_components_and_constructor_failures() {
        let err = build("modules: {a: {module: switchyard.module.flow.nope}}\nroutingtable: []")
            .unwrap_err();
        assert!(matches!(err, RouterError::Component(ComponentError::NotFound { .. })));

        // acknowledge refuses to be built without an ack_id
        let err = build("modules: {a: {module: switchyard.module.flow.acknowledge}}\nroutingtable: []")
            .unwrap_err();
        assert!(matches!(err, RouterError::ModuleInit { ref name, .. } if name == "a"));

        // output modules must carry their contract parameters
        let err = build("modules: {a: {module: switchyard.module.output.null}}\nroutingtable: []")
            .unwrap_err();
        assert!(matches!(err, RouterError::Actor(_)));
    }
}
