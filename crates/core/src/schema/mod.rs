//! Canonical schema representation.
//!
//! Every shape notation the documentation server emits (JSON Schema text, raw JSON
//! examples, mock templates, flat parameter lists) is normalized into a [`SchemaNode`]
//! tree. The variant of [`SchemaKind`] decides which of properties / required / items
//! exist, so an object without properties or an array without items cannot be built.
//!
//! ## Module Structure
//!
//! - `normalize`: entry point and the shared normalization pass
//! - `infer`: JSON5 parsing and schema induction from example instances
//! - `mock`: expansion of mock templates into representative instances
//! - `params`: flat parameter lists

mod infer;
mod mock;
mod normalize;
mod params;

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

pub use normalize::{SchemaInput, normalize, normalize_value};
pub use params::{ParamDef, ParamKind};

/// The notation a schema source was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Explicit JSON Schema text.
    JsonSchema,
    /// Raw JSON example text.
    JsonExample,
    /// Mock template text (`"name|1-10": "@string"`).
    MockTemplate,
    /// Query parameters, form fields or path parameters.
    ParamList,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::JsonSchema => "JSON Schema",
            SourceKind::JsonExample => "JSON example",
            SourceKind::MockTemplate => "mock template",
            SourceKind::ParamList => "parameter list",
        };
        f.write_str(name)
    }
}

/// A node of the canonical schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    /// Shape of the node.
    pub kind: SchemaKind,
    /// Trimmed, non-empty description.
    pub description: Option<String>,
}

/// Kind of a schema node, carrying the kind-specific children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// Closed object with ordered properties.
    Object(ObjectShape),
    /// Array with a single item schema.
    Array(Box<SchemaNode>),
    /// String value.
    String,
    /// Integer or floating-point value.
    Number,
    /// Boolean value.
    Boolean,
    /// Uploaded file (form fields).
    File,
    /// Any value.
    Any,
    /// No usable type information.
    Unknown,
}

/// Properties and required set of an object node. Objects are always closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectShape {
    properties: Vec<(String, SchemaNode)>,
    required: BTreeSet<String>,
}

impl ObjectShape {
    /// Insert or replace a property. A replaced property keeps its position.
    pub fn insert(&mut self, name: String, node: SchemaNode) {
        if let Some(slot) = self.properties.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = node;
        } else {
            self.properties.push((name, node));
        }
    }

    /// Mark a property as required.
    pub fn require(&mut self, name: String) {
        self.required.insert(name);
    }

    /// Properties in source order.
    pub fn properties(&self) -> &[(String, SchemaNode)] {
        &self.properties
    }

    /// Names of required properties.
    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// Whether `name` is required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// True when the object declares no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl SchemaNode {
    /// Node of the given kind without description.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    /// Replace the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// `{}` with no properties.
    pub fn empty_object() -> Self {
        Self::new(SchemaKind::Object(ObjectShape::default()))
    }

    /// Node accepting any value.
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Node with no type information.
    pub fn unknown() -> Self {
        Self::new(SchemaKind::Unknown)
    }

    /// Object shape, for object nodes.
    pub fn object(&self) -> Option<&ObjectShape> {
        match &self.kind {
            SchemaKind::Object(shape) => Some(shape),
            _ => None,
        }
    }

    /// Properties, for object nodes.
    pub fn properties(&self) -> Option<&[(String, SchemaNode)]> {
        self.object().map(ObjectShape::properties)
    }

    /// Required names, for object nodes.
    pub fn required(&self) -> Option<&BTreeSet<String>> {
        self.object().map(ObjectShape::required)
    }

    /// Item schema, for array nodes.
    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// True for nodes that carry no shape at all: `{}` sources and objects without fields.
    pub fn is_blank(&self) -> bool {
        match &self.kind {
            SchemaKind::Unknown => true,
            SchemaKind::Object(shape) => shape.is_empty(),
            _ => false,
        }
    }

    /// Serialize back to a JSON Schema value. Normalizing the result yields `self` again.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match &self.kind {
            SchemaKind::Object(shape) => {
                map.insert("type".into(), "object".into());
                let props: Map<String, Value> = shape
                    .properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_value()))
                    .collect();
                map.insert("properties".into(), Value::Object(props));
                map.insert(
                    "required".into(),
                    shape.required.iter().cloned().map(Value::String).collect(),
                );
                map.insert("additionalProperties".into(), Value::Bool(false));
            }
            SchemaKind::Array(items) => {
                map.insert("type".into(), "array".into());
                map.insert("items".into(), items.to_value());
            }
            SchemaKind::String => {
                map.insert("type".into(), "string".into());
            }
            SchemaKind::Number => {
                map.insert("type".into(), "number".into());
            }
            SchemaKind::Boolean => {
                map.insert("type".into(), "boolean".into());
            }
            SchemaKind::File => {
                map.insert("type".into(), "file".into());
            }
            SchemaKind::Any => {
                map.insert("type".into(), "any".into());
            }
            SchemaKind::Unknown => {}
        }
        if let Some(description) = &self.description {
            map.insert("description".into(), description.clone().into());
        }
        Value::Object(map)
    }
}

/// Merge path parameters into the primary (query or body) schema.
///
/// Properties are unioned with path parameters winning on name collisions, and the
/// required sets are unioned. Without a usable primary schema the path schema is used
/// as a whole.
pub fn merge_path_params(primary: Option<SchemaNode>, path_params: Option<SchemaNode>) -> SchemaNode {
    let Some(path_params) = path_params else {
        return primary.unwrap_or_else(SchemaNode::empty_object);
    };
    let Some(mut primary) = primary else {
        return path_params;
    };
    let SchemaKind::Object(path_shape) = path_params.kind else {
        return primary;
    };
    match &mut primary.kind {
        SchemaKind::Object(shape) => {
            for (name, node) in path_shape.properties {
                shape.insert(name, node);
            }
            shape.required.extend(path_shape.required);
            primary
        }
        SchemaKind::Unknown => SchemaNode {
            kind: SchemaKind::Object(path_shape),
            description: primary.description,
        },
        // Array or scalar bodies cannot host extra fields.
        _ => primary,
    }
}
