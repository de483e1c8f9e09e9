//! Wire types of the documentation server's REST surface.
//!
//! Only the fields the generator reads are modelled; everything else is ignored.

use serde::{Deserialize, Deserializer};

use crate::schema::{ParamDef, ParamKind};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// `0` on success.
    #[serde(default, deserialize_with = "null_default")]
    pub errcode: i64,
    /// Server message accompanying `errcode`.
    #[serde(default, deserialize_with = "null_default")]
    pub errmsg: String,
    /// Payload; absent on most errors.
    pub data: Option<T>,
}

/// Project metadata (`project/get`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    /// Project id.
    #[serde(rename = "_id", default, deserialize_with = "null_default")]
    pub id: u64,
    /// Project name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Prefix shared by every interface path.
    #[serde(default, deserialize_with = "null_default")]
    pub basepath: String,
}

/// A category of interfaces (`interface/getCatMenu`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    /// Category id.
    #[serde(rename = "_id", default, deserialize_with = "null_default")]
    pub id: u64,
    /// Category name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_default")]
    pub desc: String,
}

/// One page of interface summaries (`interface/list_cat`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfacePage {
    /// Number of pages reported by the server.
    #[serde(default, deserialize_with = "null_default")]
    pub count: u64,
    /// Interfaces on this page, in server order.
    #[serde(default, deserialize_with = "null_default")]
    pub list: Vec<InterfaceSummary>,
}

/// Summary row of an interface inside a category listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceSummary {
    /// Interface id.
    #[serde(rename = "_id", default, deserialize_with = "null_default")]
    pub id: u64,
    /// Interface title.
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    /// Interface path.
    #[serde(default, deserialize_with = "null_default")]
    pub path: String,
    /// HTTP method as sent by the server.
    #[serde(default, deserialize_with = "null_default")]
    pub method: String,
}

/// HTTP method of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Lower-case method name, as used on the axios instance.
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
        }
    }

    /// GET-class methods carry their parameters in the query string.
    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Options)
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(format!("unsupported HTTP method '{other}'")),
        }
    }
}

/// Request body encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum RequestBodyKind {
    /// No body.
    #[default]
    None,
    /// `multipart/form-data` or urlencoded fields.
    Form,
    /// JSON body.
    Json,
    /// Plain text body.
    Text,
    /// Single file upload.
    File,
    /// Raw body.
    Raw,
}

impl From<Option<String>> for RequestBodyKind {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("form") => RequestBodyKind::Form,
            Some("json") => RequestBodyKind::Json,
            Some("text") => RequestBodyKind::Text,
            Some("file") => RequestBodyKind::File,
            Some("raw") => RequestBodyKind::Raw,
            _ => RequestBodyKind::None,
        }
    }
}

/// Response body encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum ResponseBodyKind {
    /// JSON body.
    #[default]
    Json,
    /// Plain text body.
    Text,
    /// XML body.
    Xml,
    /// Raw body.
    Raw,
}

impl From<Option<String>> for ResponseBodyKind {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("text") => ResponseBodyKind::Text,
            Some("xml") => ResponseBodyKind::Xml,
            Some("raw") => ResponseBodyKind::Raw,
            _ => ResponseBodyKind::Json,
        }
    }
}

/// A query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParam {
    /// Parameter name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Whether the parameter must be sent.
    #[serde(default, deserialize_with = "required_flag")]
    pub required: bool,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_default")]
    pub desc: String,
}

/// A path parameter (`{id}` placeholder).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathParam {
    /// Placeholder name, without braces.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_default")]
    pub desc: String,
}

/// A form field of a `form` request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormField {
    /// Field name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Whether the field must be sent.
    #[serde(default, deserialize_with = "required_flag")]
    pub required: bool,
    /// `text` or `file`.
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    pub kind: String,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_default")]
    pub desc: String,
}

/// Full description of one interface (`interface/get`). Read-only snapshot per run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceDescriptor {
    /// Interface id.
    #[serde(rename = "_id", default, deserialize_with = "null_default")]
    pub id: u64,
    /// Owning project.
    #[serde(default, deserialize_with = "null_default")]
    pub project_id: u64,
    /// Owning category.
    #[serde(rename = "catid", default, deserialize_with = "null_default")]
    pub category_id: u64,
    /// Interface title.
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    /// Free-text description, possibly multi-line.
    #[serde(rename = "desc", default, deserialize_with = "null_default")]
    pub description: String,
    /// HTTP method.
    #[serde(default, deserialize_with = "null_default")]
    pub method: HttpMethod,
    /// Path relative to the project base path; may contain `{name}` placeholders.
    #[serde(default, deserialize_with = "null_default")]
    pub path: String,
    /// Declared query parameters.
    #[serde(rename = "req_query", default, deserialize_with = "null_default")]
    pub query_params: Vec<QueryParam>,
    /// Declared path parameters.
    #[serde(rename = "req_params", default, deserialize_with = "null_default")]
    pub path_params: Vec<PathParam>,
    /// Request body encoding.
    #[serde(rename = "req_body_type", default, deserialize_with = "null_default")]
    pub request_body_kind: RequestBodyKind,
    /// JSON Schema or JSON5 example text of a `json` body.
    #[serde(rename = "req_body_other", default, deserialize_with = "null_default")]
    pub request_body_raw: String,
    /// Whether `request_body_raw` is JSON Schema.
    #[serde(rename = "req_body_is_json_schema", default, deserialize_with = "null_default")]
    pub request_body_is_json_schema: bool,
    /// Fields of a `form` body.
    #[serde(rename = "req_body_form", default, deserialize_with = "null_default")]
    pub request_body_form: Vec<FormField>,
    /// Response body encoding.
    #[serde(rename = "res_body_type", default, deserialize_with = "null_default")]
    pub response_body_kind: ResponseBodyKind,
    /// JSON Schema or mock template text of the response.
    #[serde(rename = "res_body", default, deserialize_with = "null_default")]
    pub response_body_raw: String,
    /// Whether `response_body_raw` is JSON Schema.
    #[serde(rename = "res_body_is_json_schema", default, deserialize_with = "null_default")]
    pub response_body_is_json_schema: bool,
    /// Creation time, seconds since the epoch.
    #[serde(default, deserialize_with = "null_default")]
    pub add_time: i64,
    /// Last update time, seconds since the epoch.
    #[serde(default, deserialize_with = "null_default")]
    pub up_time: i64,
    /// Free-form tags.
    #[serde(rename = "tag", default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    /// Documentation status (`done`, `undone`).
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    /// Last editor.
    #[serde(rename = "username", default, deserialize_with = "null_default")]
    pub owner: String,
}

impl InterfaceDescriptor {
    /// Query parameters as a flat parameter list.
    pub fn query_param_defs(&self) -> Vec<ParamDef> {
        self.query_params
            .iter()
            .map(|p| ParamDef {
                name: p.name.clone(),
                required: p.required,
                kind: ParamKind::Text,
                description: non_empty(&p.desc),
            })
            .collect()
    }

    /// Path parameters are always required.
    pub fn path_param_defs(&self) -> Vec<ParamDef> {
        self.path_params
            .iter()
            .map(|p| ParamDef {
                name: p.name.clone(),
                required: true,
                kind: ParamKind::Text,
                description: non_empty(&p.desc),
            })
            .collect()
    }

    /// Form fields as a flat parameter list; `file` fields keep their kind.
    pub fn form_param_defs(&self) -> Vec<ParamDef> {
        self.request_body_form
            .iter()
            .map(|f| ParamDef {
                name: f.name.clone(),
                required: f.required,
                kind: if f.kind == "file" {
                    ParamKind::File
                } else {
                    ParamKind::Text
                },
                description: non_empty(&f.desc),
            })
            .collect()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Missing keys and explicit `null` both become `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Required flags arrive as `"1"`/`"0"` strings, numbers or booleans.
fn required_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        serde_json::Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}
