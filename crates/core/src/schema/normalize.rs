//! Normalization of every supported notation into [`SchemaNode`] trees.
//!
//! All notations are first turned into a JSON-Schema-shaped `serde_json::Value`, then
//! run through [`normalize_value`], the shared pass that:
//! - drops `title`, `id`, `minItems`, `maxItems` (there is no slot for them)
//! - closes every object (no additional properties)
//! - pivots list-style `properties` (`[{ "name": .. }, ..]`) into a name-keyed mapping
//! - trims property names and the names inside `required`
//! - recurses into properties and items

use serde_json::{Map, Value};

use super::infer::{infer_schema, parse_json5};
use super::mock::expand_template;
use super::params::{ParamDef, params_to_schema};
use super::{ObjectShape, SchemaKind, SchemaNode, SourceKind};
use crate::error::SchemaError;

/// A schema source, tagged with its notation.
#[derive(Debug, Clone, Copy)]
pub enum SchemaInput<'a> {
    /// JSON Schema text (strict JSON).
    JsonSchema(&'a str),
    /// Example instance written as JSON5.
    JsonExample(&'a str),
    /// Mock.js template written as JSON5.
    MockTemplate(&'a str),
    /// Flat parameter list.
    Params(&'a [ParamDef]),
}

impl SchemaInput<'_> {
    /// Notation of this source, for error reporting.
    pub fn kind(&self) -> SourceKind {
        match self {
            SchemaInput::JsonSchema(_) => SourceKind::JsonSchema,
            SchemaInput::JsonExample(_) => SourceKind::JsonExample,
            SchemaInput::MockTemplate(_) => SourceKind::MockTemplate,
            SchemaInput::Params(_) => SourceKind::ParamList,
        }
    }
}

/// Normalize any supported source into a canonical schema tree.
///
/// Blank text yields an `Unknown` node; malformed text yields [`SchemaError::Parse`].
pub fn normalize(input: SchemaInput<'_>) -> Result<SchemaNode, SchemaError> {
    let kind = input.kind();
    let parse = |text: &str| {
        parse_json5(text).map_err(|reason| SchemaError::Parse { kind, reason })
    };

    match input {
        SchemaInput::Params(params) => Ok(normalize_value(&params_to_schema(params))),
        SchemaInput::JsonSchema(text)
        | SchemaInput::JsonExample(text)
        | SchemaInput::MockTemplate(text)
            if text.trim().is_empty() =>
        {
            Ok(SchemaNode::unknown())
        }
        SchemaInput::JsonSchema(text) => {
            let value: Value = serde_json::from_str(text).map_err(|err| SchemaError::Parse {
                kind,
                reason: err.to_string(),
            })?;
            Ok(normalize_value(&value))
        }
        SchemaInput::JsonExample(text) => Ok(normalize_value(&infer_schema(&parse(text)?))),
        SchemaInput::MockTemplate(text) => {
            let instance = expand_template(&parse(text)?);
            Ok(normalize_value(&infer_schema(&instance)))
        }
    }
}

/// The shared normalization pass over a JSON-Schema-shaped value.
pub fn normalize_value(value: &Value) -> SchemaNode {
    let Value::Object(map) = value else {
        return SchemaNode::unknown();
    };

    let description = map
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string);

    let kind = match declared_type(map) {
        Some("object") => SchemaKind::Object(normalize_object(map)),
        Some("array") => SchemaKind::Array(Box::new(normalize_items(map.get("items")))),
        Some("string") => SchemaKind::String,
        Some("number" | "integer") => SchemaKind::Number,
        Some("boolean") => SchemaKind::Boolean,
        Some("file") => SchemaKind::File,
        Some("null" | "any") => SchemaKind::Any,
        Some(_) => SchemaKind::Unknown,
        None if map.contains_key("properties") => SchemaKind::Object(normalize_object(map)),
        None if map.contains_key("items") => {
            SchemaKind::Array(Box::new(normalize_items(map.get("items"))))
        }
        None => SchemaKind::Unknown,
    };

    SchemaNode { kind, description }
}

/// Resolve `type`, accepting both `"string"` and `["string", "null"]` forms.
fn declared_type(map: &Map<String, Value>) -> Option<&str> {
    match map.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => {
            let mut names = types.iter().filter_map(Value::as_str);
            let first = names.clone().find(|t| *t != "null");
            first.or_else(|| names.next())
        }
        _ => None,
    }
}

fn normalize_object(map: &Map<String, Value>) -> ObjectShape {
    let mut shape = ObjectShape::default();

    match map.get("properties") {
        Some(Value::Object(props)) => {
            for (name, prop) in props {
                insert_trimmed(&mut shape, name, prop);
            }
        }
        Some(Value::Array(props)) => {
            for prop in props {
                if let Some(name) = prop.get("name").and_then(Value::as_str) {
                    insert_trimmed(&mut shape, name, prop);
                }
            }
        }
        _ => {}
    }

    if let Some(Value::Array(required)) = map.get("required") {
        for name in required.iter().filter_map(Value::as_str) {
            let name = name.trim();
            if !name.is_empty() {
                shape.require(name.to_string());
            }
        }
    }

    shape
}

fn insert_trimmed(shape: &mut ObjectShape, name: &str, prop: &Value) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    shape.insert(name.to_string(), normalize_value(prop));
}

fn normalize_items(items: Option<&Value>) -> SchemaNode {
    match items {
        Some(Value::Array(tuple)) => tuple.first().map_or_else(SchemaNode::any, normalize_value),
        Some(item @ Value::Object(_)) => normalize_value(item),
        _ => SchemaNode::any(),
    }
}
