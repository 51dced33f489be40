// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in queue functions.

pub mod case;
pub mod set;

pub use case::{Case, CaseFunction};
pub use set::{AppendFunction, SetFunction};
