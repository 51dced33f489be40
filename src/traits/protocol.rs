// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::errors::ModuleError;

/// Converts between wire bytes and event payloads
pub trait Protocol: Send + Sync {
    fn name(&self) -> &str;

    /// One chunk of bytes may carry any number of payloads
    fn decode(&self, data: &[u8]) -> Result<Vec<Value>, ModuleError>;

    fn encode(&self, value: &Value) -> Result<Vec<u8>, ModuleError>;
}
