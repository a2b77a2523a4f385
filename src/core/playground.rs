//! Ad-hoc event parsing for the playground evaluator.
//!
//! Accepts free-form JSON text in two shapes: a catalog envelope carrying
//! an optional `description`, optional `tag` and a nested `payload`
//! object, or a raw payload object directly. A parse failure is a local
//! validation error and never reaches the network or the store.

use serde_json::Value;
use thiserror::Error;

use crate::domain::EventDefinition;

/// Fallback label when neither a description nor a payload type is given
const DEFAULT_LABEL: &str = "Ad-hoc event";

/// Fallback category tag for playground submissions
const DEFAULT_TAG: &str = "Custom";

/// Local validation errors for playground input
#[derive(Debug, Clone, Error)]
pub enum PlaygroundError {
    #[error("Invalid JSON")]
    InvalidJson,
}

/// Parse raw playground text into an event definition.
///
/// The structure after unwrapping an optional `payload` field is the
/// canonical payload. Label defaults: explicit `description`, else the
/// payload's `type`, else a generic placeholder; tag defaults likewise.
pub fn parse_submission(raw: &str) -> Result<EventDefinition, PlaygroundError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| PlaygroundError::InvalidJson)?;

    let (description, tag, payload) = match &value {
        Value::Object(map) => {
            let description = map.get("description").and_then(Value::as_str).map(String::from);
            let tag = map.get("tag").and_then(Value::as_str).map(String::from);
            let payload = map.get("payload").cloned().unwrap_or(value.clone());
            (description, tag, payload)
        }
        _ => (None, None, value.clone()),
    };

    let label = description
        .or_else(|| payload.get("type").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| DEFAULT_LABEL.to_string());

    let tag = tag.unwrap_or_else(|| DEFAULT_TAG.to_string());

    let source = payload
        .get("sap_source_system")
        .or_else(|| payload.get("source"))
        .and_then(Value::as_str)
        .unwrap_or("playground")
        .to_string();

    Ok(EventDefinition::new(label, tag, source, payload))
}
