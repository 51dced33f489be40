// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod function;
pub mod module;
pub mod protocol;

pub use function::EventFunction;
pub use module::{Module, ModuleKind};
pub use protocol::Protocol;
