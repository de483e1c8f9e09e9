//! Schema induction from example JSON.

use serde_json::{Map, Value, json};

/// Parse hand-written JSON5 text: comments, trailing commas, unquoted keys and
/// single-quoted strings are accepted.
pub fn parse_json5(text: &str) -> Result<Value, String> {
    json5::from_str(text).map_err(|err| err.to_string())
}

/// Infer a JSON-Schema-shaped value from an example instance.
///
/// Objects mark every observed key as required, arrays are typed by their first element
/// (or `any` when empty).
pub fn infer_schema(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let properties: Map<String, Value> = map
                .iter()
                .map(|(key, v)| (key.clone(), infer_schema(v)))
                .collect();
            let required: Vec<Value> = map.keys().cloned().map(Value::String).collect();
            json!({ "type": "object", "properties": properties, "required": required })
        }
        Value::Array(items) => {
            let items = items.first().map_or_else(|| json!({ "type": "any" }), infer_schema);
            json!({ "type": "array", "items": items })
        }
        Value::String(_) => json!({ "type": "string" }),
        Value::Number(_) => json!({ "type": "number" }),
        Value::Bool(_) => json!({ "type": "boolean" }),
        Value::Null => json!({ "type": "null" }),
    }
}
