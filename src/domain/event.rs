//! Event definitions fed to the decision service.
//!
//! A definition is pure data: a display label, a category tag, the origin
//! system identifier, and the CloudEvents-style payload envelope that is
//! forwarded to the decision service verbatim (plus an injected id).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable event definition, catalog-sourced or user-sourced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDefinition {
    /// Human-readable description shown in the result feed
    pub label: String,

    /// Category tag used for display grouping (e.g. "Finance", "HR")
    pub tag: String,

    /// Origin system identifier (e.g. "S4H-PROD-001")
    pub source: String,

    /// Structured envelope forwarded to the decision service.
    ///
    /// Loosely: `specversion`, `source`, `type`, an origin-system tag and a
    /// free-form `data` object. Treated as opaque here.
    pub payload: Value,
}

impl EventDefinition {
    /// Create a new event definition
    pub fn new(
        label: impl Into<String>,
        tag: impl Into<String>,
        source: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
            source: source.into(),
            payload,
        }
    }

    /// Payload with the given outcome id injected.
    ///
    /// Each dispatch gets a fresh id, so repeated catalog entries in an
    /// extended run are distinct events on the wire.
    pub fn payload_with_id(&self, id: &str) -> Value {
        let mut payload = self.payload.clone();
        if let Value::Object(ref mut map) = payload {
            map.insert("id".to_string(), Value::String(id.to_string()));
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_id_injection() {
        let def = EventDefinition::new(
            "Purchase order",
            "Finance",
            "S4H-PROD-001",
            json!({"specversion": "1.0", "type": "po.created", "data": {"NetAmount": 45000}}),
        );

        let payload = def.payload_with_id("evt-123");
        assert_eq!(payload["id"], json!("evt-123"));
        // Original definition is untouched
        assert!(def.payload.get("id").is_none());
    }

    #[test]
    fn test_injection_does_not_clobber_data() {
        let def = EventDefinition::new("x", "y", "z", json!({"data": {"Amount": 1}}));
        let payload = def.payload_with_id("evt-1");
        assert_eq!(payload["data"]["Amount"], json!(1));
    }
}
