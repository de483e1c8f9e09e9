//! Request/response schema selection and TypeScript type synthesis.

use crate::error::SchemaError;
use crate::schema::{
    SchemaInput, SchemaKind, SchemaNode, merge_path_params, normalize,
};
use crate::ts::{TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
use crate::yapi::{InterfaceDescriptor, RequestBodyKind, ResponseBodyKind};

/// Opaque marker type for uploaded files, declared once per interface file.
pub const FILE_DATA_TYPE: &str = "FileData";

/// Canonical request schema: query parameters for GET-class methods, otherwise the body
/// (form fields or JSON), with path parameters merged in.
pub fn request_schema(detail: &InterfaceDescriptor) -> Result<SchemaNode, SchemaError> {
    let primary = if detail.method.is_query() {
        Some(normalize(SchemaInput::Params(&detail.query_param_defs()))?)
    } else {
        match detail.request_body_kind {
            RequestBodyKind::Form => Some(normalize(SchemaInput::Params(&detail.form_param_defs()))?),
            RequestBodyKind::Json if !detail.request_body_raw.trim().is_empty() => {
                let input = if detail.request_body_is_json_schema {
                    SchemaInput::JsonSchema(&detail.request_body_raw)
                } else {
                    SchemaInput::JsonExample(&detail.request_body_raw)
                };
                Some(normalize(input)?)
            }
            _ => None,
        }
    };

    let path_params = detail.path_param_defs();
    let path_schema = if path_params.is_empty() {
        None
    } else {
        Some(normalize(SchemaInput::Params(&path_params))?)
    };

    Ok(merge_path_params(primary, path_schema))
}

/// Canonical response schema. Non-JSON bodies are typed `any`; `data_key` selects that
/// property of the response object when it exists.
pub fn response_schema(
    detail: &InterfaceDescriptor,
    data_key: Option<&str>,
) -> Result<SchemaNode, SchemaError> {
    if detail.response_body_kind != ResponseBodyKind::Json {
        return Ok(SchemaNode::any());
    }

    let input = if detail.response_body_is_json_schema {
        SchemaInput::JsonSchema(&detail.response_body_raw)
    } else {
        SchemaInput::MockTemplate(&detail.response_body_raw)
    };
    let schema = normalize(input)?;

    let unwrapped = data_key
        .and_then(|key| schema.object().and_then(|shape| shape.get(key)))
        .cloned();
    Ok(unwrapped.unwrap_or(schema))
}

/// Map a schema node to a TypeScript type.
pub fn to_ts_type(node: &SchemaNode) -> TsType {
    match &node.kind {
        SchemaKind::Object(shape) => TsType::Object(object_props(node, shape.properties())),
        SchemaKind::Array(items) => TsType::Array(Box::new(to_ts_type(items))),
        SchemaKind::String => TsType::Primitive(TsPrimitive::String),
        SchemaKind::Number => TsType::Primitive(TsPrimitive::Number),
        SchemaKind::Boolean => TsType::Primitive(TsPrimitive::Boolean),
        SchemaKind::File => TsType::Ref(FILE_DATA_TYPE.to_string()),
        SchemaKind::Any => TsType::Primitive(TsPrimitive::Any),
        SchemaKind::Unknown => TsType::Primitive(TsPrimitive::Unknown),
    }
}

fn object_props(node: &SchemaNode, properties: &[(String, SchemaNode)]) -> Vec<TsProp> {
    properties
        .iter()
        .map(|(name, prop)| TsProp {
            name: name.clone(),
            ty: to_ts_type(prop),
            optional: !node.object().is_some_and(|shape| shape.is_required(name)),
            doc: prop.description.clone(),
        })
        .collect()
}

/// Declare `name` for a schema. Blank schemas give an empty interface, object roots give
/// an interface and everything else a type alias.
pub fn type_def(name: &str, node: &SchemaNode) -> TsTypeDef {
    let kind = match &node.kind {
        _ if node.is_blank() => TypeDefKind::Interface { properties: vec![] },
        SchemaKind::Object(shape) => TypeDefKind::Interface {
            properties: object_props(node, shape.properties()),
        },
        _ => TypeDefKind::TypeAlias { ty: to_ts_type(node) },
    };
    TsTypeDef {
        name: name.to_string(),
        doc: node.description.clone(),
        kind,
    }
}
