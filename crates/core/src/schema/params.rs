//! Flat parameter lists: query parameters, form fields and path parameters.

use serde_json::{Map, Value, json};

/// How a parameter is transported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
    /// Plain text value.
    #[default]
    Text,
    /// Uploaded file.
    File,
}

/// One entry of a flat parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    /// Parameter name.
    pub name: String,
    /// Whether the parameter must be sent.
    pub required: bool,
    /// Transport kind.
    pub kind: ParamKind,
    /// Trimmed description, if any.
    pub description: Option<String>,
}

/// Build a JSON-Schema-shaped object whose properties are exactly the listed parameters.
pub fn params_to_schema(params: &[ParamDef]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in params {
        let ty = match param.kind {
            ParamKind::Text => "string",
            ParamKind::File => "file",
        };
        let mut prop = json!({ "type": ty });
        if let (Some(description), Value::Object(map)) = (&param.description, &mut prop) {
            map.insert("description".into(), Value::String(description.clone()));
        }
        properties.insert(param.name.clone(), prop);
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    json!({ "type": "object", "properties": properties, "required": required })
}
