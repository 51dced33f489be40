// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component lookup by dotted name.
//!
//! The router never imports components itself. It asks a
//! [`ComponentResolver`] to turn a name such as
//! `switchyard.module.flow.funnel` into a constructor and calls that with
//! the module's static arguments. [`ComponentRegistry`] is the static table
//! shipped with the crate; embedders register their own constructors next
//! to the built-ins.
//!
//! # Examples
//! ```
//! use switchyard::actor::Parameters;
//! use switchyard::config::{ComponentRegistry, ComponentResolver};
//!
//! let registry = ComponentRegistry::builtin();
//! let funnel = registry.resolve_module("switchyard.module.flow.funnel").unwrap();
//! let module = funnel(&Parameters::default()).unwrap();
//! assert!(module.queues().contains(&"outbox".to_string()));
//!
//! assert!(registry.resolve_module("switchyard.module.flow").is_err());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::actor::Parameters;
use crate::backends::functions::{AppendFunction, Case, CaseFunction, SetFunction};
use crate::backends::modules::{
    Acknowledge, Fanout, Funnel, Generator, Null, RoundRobin, Stdout, TippingBucket,
};
use crate::backends::protocols::JsonProtocol;
use crate::config::consts::COMPONENT_NAMESPACE;
use crate::errors::{ComponentError, ModuleError};
use crate::traits::{EventFunction, Module, Protocol};

pub type ModuleConstructor =
    Arc<dyn Fn(&Parameters) -> Result<Arc<dyn Module>, ModuleError> + Send + Sync>;
pub type FunctionConstructor =
    Arc<dyn Fn(&Parameters) -> Result<Arc<dyn EventFunction>, ModuleError> + Send + Sync>;
pub type ProtocolConstructor =
    Arc<dyn Fn(&Parameters) -> Result<Arc<dyn Protocol>, ModuleError> + Send + Sync>;

/// Resolves a 4-part component name to its constructor
pub trait ComponentResolver: Send + Sync {
    fn resolve_module(&self, name: &str) -> Result<ModuleConstructor, ComponentError>;
    fn resolve_function(&self, name: &str) -> Result<FunctionConstructor, ComponentError>;
    fn resolve_protocol(&self, name: &str) -> Result<ProtocolConstructor, ComponentError>;
}

/// Static constructor table keyed by `namespace.type.category.name`
#[derive(Clone)]
pub struct ComponentRegistry {
    modules: HashMap<String, ModuleConstructor>,
    functions: HashMap<String, FunctionConstructor>,
    protocols: HashMap<String, ProtocolConstructor>,
}

impl ComponentRegistry {
    /// A registry with nothing in it
    pub fn empty() -> Self {
        Self {
            modules: HashMap::new(),
            functions: HashMap::new(),
            protocols: HashMap::new(),
        }
    }

    /// Every component that ships with the crate
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        let ns = COMPONENT_NAMESPACE;

        registry.insert_module(format!("{ns}.module.input.generator"), |p| {
            Ok(Arc::new(Generator::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.output.stdout"), |p| {
            Ok(Arc::new(Stdout::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.output.null"), |p| {
            Ok(Arc::new(Null::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.flow.acknowledge"), |p| {
            Ok(Arc::new(Acknowledge::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.flow.tippingbucket"), |p| {
            Ok(Arc::new(TippingBucket::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.flow.fanout"), |p| {
            Ok(Arc::new(Fanout::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.flow.funnel"), |p| {
            Ok(Arc::new(Funnel::from_parameters(p)?))
        });
        registry.insert_module(format!("{ns}.module.flow.roundrobin"), |p| {
            Ok(Arc::new(RoundRobin::from_parameters(p)?))
        });

        registry.insert_function(format!("{ns}.function.module.set"), |p| {
            Ok(Arc::new(SetFunction::from_parameters(p)?))
        });
        registry.insert_function(format!("{ns}.function.module.append"), |p| {
            Ok(Arc::new(AppendFunction::from_parameters(p)?))
        });
        registry.insert_function(format!("{ns}.function.module.uppercase"), |p| {
            Ok(Arc::new(CaseFunction::from_parameters(Case::Upper, p)?))
        });
        registry.insert_function(format!("{ns}.function.module.lowercase"), |p| {
            Ok(Arc::new(CaseFunction::from_parameters(Case::Lower, p)?))
        });

        registry.insert_protocol(format!("{ns}.protocol.decode.json"), |_| Ok(Arc::new(JsonProtocol)));
        registry.insert_protocol(format!("{ns}.protocol.encode.json"), |_| Ok(Arc::new(JsonProtocol)));

        registry
    }

    /// Add or replace a module constructor
    pub fn register_module<F>(&mut self, name: &str, constructor: F) -> Result<(), ComponentError>
    where
        F: Fn(&Parameters) -> Result<Arc<dyn Module>, ModuleError> + Send + Sync + 'static,
    {
        check_name(name)?;
        self.insert_module(name.to_string(), constructor);
        Ok(())
    }

    pub fn register_function<F>(&mut self, name: &str, constructor: F) -> Result<(), ComponentError>
    where
        F: Fn(&Parameters) -> Result<Arc<dyn EventFunction>, ModuleError> + Send + Sync + 'static,
    {
        check_name(name)?;
        self.functions.insert(name.to_string(), Arc::new(constructor));
        Ok(())
    }

    pub fn register_protocol<F>(&mut self, name: &str, constructor: F) -> Result<(), ComponentError>
    where
        F: Fn(&Parameters) -> Result<Arc<dyn Protocol>, ModuleError> + Send + Sync + 'static,
    {
        check_name(name)?;
        self.protocols.insert(name.to_string(), Arc::new(constructor));
        Ok(())
    }

    /// Registered module names, sorted
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert_module<F>(&mut self, name: String, constructor: F)
    where
        F: Fn(&Parameters) -> Result<Arc<dyn Module>, ModuleError> + Send + Sync + 'static,
    {
        self.modules.insert(name, Arc::new(constructor));
    }

    fn insert_function<F>(&mut self, name: String, constructor: F)
    where
        F: Fn(&Parameters) -> Result<Arc<dyn EventFunction>, ModuleError> + Send + Sync + 'static,
    {
        self.functions.insert(name, Arc::new(constructor));
    }

    fn insert_protocol<F>(&mut self, name: String, constructor: F)
    where
        F: Fn(&Parameters) -> Result<Arc<dyn Protocol>, ModuleError> + Send + Sync + 'static,
    {
        self.protocols.insert(name, Arc::new(constructor));
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("modules", &self.modules.len())
            .field("functions", &self.functions.len())
            .field("protocols", &self.protocols.len())
            .finish()
    }
}

impl ComponentResolver for ComponentRegistry {
    fn resolve_module(&self, name: &str) -> Result<ModuleConstructor, ComponentError> {
        lookup(&self.modules, name)
    }

    fn resolve_function(&self, name: &str) -> Result<FunctionConstructor, ComponentError> {
        lookup(&self.functions, name)
    }

    fn resolve_protocol(&self, name: &str) -> Result<ProtocolConstructor, ComponentError> {
        lookup(&self.protocols, name)
    }
}

fn lookup<T: Clone>(table: &HashMap<String, T>, name: &str) -> Result<T, ComponentError> {
    check_name(name)?;
    table.get(name).cloned().ok_or_else(|| ComponentError::NotFound {
        name: name.to_string(),
    })
}

/// Exactly four non-empty dotted parts
fn check_name(name: &str) -> Result<(), ComponentError> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() != 4 || parts.iter().any(|part| part.trim().is_empty()) {
        return Err(ComponentError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
