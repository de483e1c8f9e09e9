//! Code synthesis for one interface: its request/response types and service function.
//!
//! ## Module Structure
//!
//! - `typegen`: schema selection and schema -> type declaration
//! - `service`: service function (doc comment, signature, call expression)

mod service;
mod typegen;

pub use service::{ServiceContext, doc_comment, full_path, has_params, synthesize_function};
pub use typegen::{FILE_DATA_TYPE, request_schema, response_schema, to_ts_type, type_def};

use crate::error::SchemaError;
use crate::naming::{data_type_name, function_name, is_root_path, query_type_name};
use crate::renderer::ServiceRenderer;
use crate::tree::Fragment;
use crate::ts::{DocComment, Emit};
use crate::yapi::InterfaceDescriptor;

/// Identifiers derived from an interface's method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceNames {
    /// Service function name.
    pub function: String,
    /// Request parameter type name.
    pub query_type: String,
    /// Response data type name.
    pub data_type: String,
}

impl InterfaceNames {
    /// `None` for the root path, which produces no output.
    pub fn derive(detail: &InterfaceDescriptor) -> Option<Self> {
        if is_root_path(&detail.path) {
            return None;
        }
        let function = function_name(detail.method, &detail.path);
        Some(Self {
            query_type: query_type_name(&function),
            data_type: data_type_name(&function),
            function,
        })
    }
}

/// Settings shared by every interface of one configuration entry.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceContext<'a> {
    /// Documentation server, used for deep links.
    pub server: &'a str,
    /// Project base path.
    pub basepath: &'a str,
    /// Category name shown in doc comments.
    pub category: &'a str,
    /// Request instance identifier.
    pub instance: &'a str,
    /// Response property unwrapped into the data type.
    pub data_key: Option<&'a str>,
    /// Skip service functions.
    pub only_interface: bool,
    /// Caller overrides.
    pub renderer: &'a dyn ServiceRenderer,
}

/// Fragments synthesized for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceOutput {
    /// Query and data type declarations.
    pub types: Fragment,
    /// Absent with `only_interface` or when the path filter rejects the interface.
    pub function: Option<Fragment>,
}

/// Synthesize the type and function fragments of one interface.
///
/// Root-path interfaces give `Ok(None)`. Malformed schema text fails the whole interface,
/// so no function is emitted for types that do not exist.
pub fn synthesize_interface(
    detail: &InterfaceDescriptor,
    ctx: &InterfaceContext<'_>,
) -> Result<Option<InterfaceOutput>, SchemaError> {
    let Some(names) = InterfaceNames::derive(detail) else {
        return Ok(None);
    };

    let request = request_schema(detail)?;
    let response = response_schema(detail, ctx.data_key)?;

    let mut doc = DocComment::default();
    doc.push(if detail.title.trim().is_empty() {
        detail.path.trim()
    } else {
        detail.title.trim()
    });
    doc.push(format!("@category {}", ctx.category));

    let code = format!(
        "{}{}\n{}",
        doc.emit(),
        type_def(&names.query_type, &request).emit(),
        type_def(&names.data_type, &response).emit()
    );
    let types = Fragment {
        code,
        exports: vec![names.query_type.clone(), names.data_type.clone()],
        uses_query_string: false,
        instance: None,
    };

    let function = if ctx.only_interface {
        None
    } else {
        let service = ServiceContext {
            server: ctx.server,
            basepath: ctx.basepath,
            category: ctx.category,
            instance: ctx.instance,
            renderer: ctx.renderer,
        };
        synthesize_function(detail, &names, &request, &service)
    };

    Ok(Some(InterfaceOutput { types, function }))
}
