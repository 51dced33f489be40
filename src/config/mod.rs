// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod loader;
mod registry;
mod runtime;
mod validation;


pub use loader::{
    load_and_validate_config, load_config, parse_toml, parse_yaml, FunctionEntry, ModuleEntry,
    ProtocolEntry, RuntimeConfig, TopologyConfig,
};
pub use registry::{
    ComponentRegistry, ComponentResolver, FunctionConstructor, ModuleConstructor,
    ProtocolConstructor,
};
pub use runtime::RuntimeBuilder;
pub use validation::{parse_route, validate_topology};
