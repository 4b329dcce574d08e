//! Response Schema Descriptor
//!
//! The structural contract the reasoning backend is told to honour. The same
//! value is attached to every outbound request by the composer and walked by
//! the decoder when checking the inbound document, so the two sides cannot
//! drift apart. Enum literal sets are taken from [`Priority::ALL`] and
//! [`Depth::ALL`].
//!
//! The descriptor uses a small JSON Schema subset (`type`, `properties`,
//! `required`, `items`, `enum`) that both supported providers understand
//! after their own light translation.

use crate::analysis::{Depth, Priority};
use serde_json::{Value, json};
use std::sync::LazyLock;

static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(build_response_schema);

/// Returns the shared response-schema descriptor.
pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn build_response_schema() -> Value {
    let priorities: Vec<&str> = Priority::ALL.iter().map(Priority::as_str).collect();
    let depths: Vec<&str> = Depth::ALL.iter().map(Depth::as_str).collect();

    let topic = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "priority": { "type": "string", "enum": priorities },
            "depth": { "type": "string", "enum": depths },
            "reasoning": { "type": "string" }
        },
        "required": ["name", "priority", "depth", "reasoning"]
    });

    let unit = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "topics": { "type": "array", "items": topic }
        },
        "required": ["title", "topics"]
    });

    json!({
        "type": "object",
        "properties": {
            "syllabus": { "type": "array", "items": unit },
            "keyInsights": string_array(),
            "studyPlan": {
                "type": "object",
                "properties": {
                    "masterNow": string_array(),
                    "deepDive": string_array(),
                    "quickRevision": string_array()
                },
                "required": ["masterNow", "deepDive", "quickRevision"]
            }
        },
        "required": ["syllabus", "keyInsights", "studyPlan"]
    })
}

/// Rewrites a descriptor node with every `type` keyword mapped through `map_type`
/// and every object node passed to `on_object`. Providers use this to adapt
/// the shared descriptor to their own dialect.
pub fn transform_schema(
    node: &Value,
    map_type: &dyn Fn(&str) -> String,
    on_object: &dyn Fn(&mut serde_json::Map<String, Value>),
) -> Value {
    match node {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                let value = match (key.as_str(), value) {
                    ("type", Value::String(ty)) => Value::String(map_type(ty)),
                    ("properties", Value::Object(props)) => Value::Object(
                        props
                            .iter()
                            .map(|(name, child)| {
                                (name.clone(), transform_schema(child, map_type, on_object))
                            })
                            .collect(),
                    ),
                    ("items", child) => transform_schema(child, map_type, on_object),
                    _ => value.clone(),
                };
                out.insert(key.clone(), value);
            }
            if map.get("type").and_then(Value::as_str) == Some("object") {
                on_object(&mut out);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}
