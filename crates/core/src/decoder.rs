//! Response Validator/Decoder
//!
//! Turns the backend's raw text into an [`ExamAnalysis`], or fails with the
//! specific reason it could not. Generative backends truncate output,
//! hallucinate fields and change enum casing, so nothing here coerces or
//! fills in defaults: the document either matches the shared descriptor
//! exactly or it is rejected.

use crate::{analysis::ExamAnalysis, error::DecodeError, schema::response_schema};
use serde_json::Value;
use tracing::warn;

/// Decodes a raw backend response into a validated analysis.
pub fn decode(raw_text: &str) -> Result<ExamAnalysis, DecodeError> {
    if raw_text.trim().is_empty() {
        return Err(DecodeError::EmptyResponse);
    }

    let document: Value = serde_json::from_str(raw_text).map_err(DecodeError::MalformedJson)?;
    check_node(&document, response_schema(), "$")?;

    // The structural walk above already enforces everything serde does; a
    // failure here means the descriptor and the model types disagree.
    serde_json::from_value(document).map_err(|e| {
        warn!(error = %e, "Document passed the descriptor but not the typed model");
        violation("$", e.to_string())
    })
}

fn violation(path: &str, reason: impl Into<String>) -> DecodeError {
    DecodeError::SchemaViolation {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Checks `value` against one descriptor node, reporting the first violation.
fn check_node(value: &Value, schema: &Value, path: &str) -> Result<(), DecodeError> {
    match schema.get("type").and_then(Value::as_str) {
        Some("object") => {
            let object = value.as_object().ok_or_else(|| {
                violation(path, format!("expected object, found {}", json_kind(value)))
            })?;

            let required = schema.get("required").and_then(Value::as_array);
            for field in required.into_iter().flatten().filter_map(Value::as_str) {
                if !object.contains_key(field) {
                    return Err(violation(
                        &format!("{path}.{field}"),
                        "missing required field",
                    ));
                }
            }

            let properties = schema.get("properties").and_then(Value::as_object);
            for (name, child_schema) in properties.into_iter().flatten() {
                if let Some(child) = object.get(name) {
                    check_node(child, child_schema, &format!("{path}.{name}"))?;
                }
            }
        }
        Some("array") => {
            let items = value.as_array().ok_or_else(|| {
                violation(path, format!("expected array, found {}", json_kind(value)))
            })?;
            if let Some(item_schema) = schema.get("items") {
                for (index, item) in items.iter().enumerate() {
                    check_node(item, item_schema, &format!("{path}[{index}]"))?;
                }
            }
        }
        Some("string") => {
            let text = value.as_str().ok_or_else(|| {
                violation(path, format!("expected string, found {}", json_kind(value)))
            })?;
            if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
                if !allowed.iter().any(|literal| literal.as_str() == Some(text)) {
                    let options: Vec<&str> = allowed.iter().filter_map(Value::as_str).collect();
                    return Err(violation(
                        path,
                        format!("'{}' is not one of [{}]", text, options.join(", ")),
                    ));
                }
            }
        }
        _ => {}
    }
    Ok(())
}
