// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::errors::ModuleError;
use crate::traits::Protocol;

/// JSON documents. Decoding accepts any number of whitespace separated
/// documents, so newline-delimited JSON works as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonProtocol;

impl Protocol for JsonProtocol {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Value>, ModuleError> {
        serde_json::Deserializer::from_slice(data)
            .into_iter::<Value>()
            .map(|doc| doc.map_err(|e| ModuleError::Protocol(format!("invalid JSON: {}", e))))
            .collect()
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, ModuleError> {
        serde_json::to_vec(value).map_err(|e| ModuleError::Protocol(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_concatenated_documents() {
        let decoded = JsonProtocol.decode(b"{\"a\":1}\n[2]\n\"three\"").unwrap();
        assert_eq!(decoded, vec![json!({"a": 1}), json!([2]), json!("three")]);
        assert!(JsonProtocol.decode(b"").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_a_protocol_error() {
        assert!(matches!(
            JsonProtocol.decode(b"{\"a\":"),
            Err(ModuleError::Protocol(_))
        ));
    }
}
