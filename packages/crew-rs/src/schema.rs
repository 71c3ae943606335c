//! JSON schema generation for tool arguments.
//!
//! Function-calling providers in strict mode reject schemas with optional
//! properties, open objects or `$ref` indirection, so the schemars output is
//! normalised before it is sent.

use schemars::{schema_for, JsonSchema};
use serde_json::{Map, Value};

/// Types usable as tool arguments.
///
/// Implemented for every `JsonSchema` type.
pub trait ToolSchema: JsonSchema {
    /// Strict-mode compatible parameter schema for this type.
    fn strict_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = value.get("definitions").cloned().unwrap_or(Value::Null);
        inline_refs(&mut value, &definitions);
        close_objects(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
            map.remove("title");
        }

        value
    }
}

impl<T: JsonSchema> ToolSchema for T {}

/// Mark every object schema as closed with all properties required.
fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".into(), Value::Bool(false));
                let required = required_keys(map);
                if let Some(required) = required {
                    map.insert("required".into(), required);
                }
            }
            map.values_mut().for_each(close_objects);
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

fn required_keys(map: &Map<String, Value>) -> Option<Value> {
    let props = map.get("properties")?.as_object()?;
    Some(Value::Array(
        props.keys().cloned().map(Value::String).collect(),
    ))
}

/// Replace `{"$ref": "#/definitions/X"}` with the definition body.
fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut resolved) = target {
                inline_refs(&mut resolved, definitions);
                *value = resolved;
                return;
            }

            for (key, child) in map.iter_mut() {
                if key != "definitions" {
                    inline_refs(child, definitions);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| inline_refs(v, definitions)),
        _ => {}
    }
}
