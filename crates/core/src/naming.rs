//! Deterministic names derived from interface metadata and configuration position.
//!
//! Everything here is a pure function: the same method, path and overrides always give
//! the same identifiers, so regenerating a project never renames exported symbols.

use std::sync::LazyLock;

use regex::Regex;

use crate::yapi::HttpMethod;

static PLACEHOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").ok());

static DOTTED_VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?P<major>\d)\.(?P<minor>\d)").ok());

/// The root path marks an interface that produces no output at all.
pub fn is_root_path(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default().trim();
    path.chars().all(|c| c == '/')
}

/// Function identifier for an interface: `GET /user-list/{id}` becomes `getUserList`.
///
/// The path is cleaned (query remnants, `{placeholder}` and `:param` segments dropped,
/// repeated separators collapsed, `v1.1` rewritten as `v1_1`) and each remaining
/// segment token is appended in PascalCase with a lower-case tail.
pub fn function_name(method: HttpMethod, path: &str) -> String {
    let mut name = method.as_lower().to_string();
    for token in path_tokens(path) {
        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(&chars.as_str().to_lowercase());
        }
    }
    name.trim().to_string()
}

fn path_tokens(path: &str) -> Vec<String> {
    let path = path.split('?').next().unwrap_or_default();
    let path = match PLACEHOLDER.as_ref() {
        Some(re) => re.replace_all(path, "").into_owned(),
        None => path.to_string(),
    };
    let path = match DOTTED_VERSION.as_ref() {
        Some(re) => re.replace_all(&path, "${major}_${minor}").into_owned(),
        None => path,
    };

    path.split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with(':'))
        .flat_map(|segment| {
            segment
                .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .filter(|token| !token.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Name of the request type for a function.
pub fn query_type_name(function_name: &str) -> String {
    format!("{function_name}Query")
}

/// Name of the response type for a function.
pub fn data_type_name(function_name: &str) -> String {
    format!("{function_name}Data")
}

/// Output file group of the category at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// File name without extension.
    pub id: String,
    /// The override at `index` repeats the one right before it, so this category's
    /// fragments are appended to the previous category's file.
    pub continues_previous: bool,
}

/// Resolve the file group for the category at `index` from the positional overrides.
///
/// Only an override identical to the immediately preceding one continues that file;
/// a non-adjacent repeat names the same group but does not continue it.
pub fn file_group_id(index: usize, overrides: &[String]) -> FileGroup {
    let current = overrides.get(index).map(|s| s.trim()).unwrap_or_default();
    if current.is_empty() {
        return FileGroup {
            id: format!("category_{index}"),
            continues_previous: false,
        };
    }

    let continues_previous = index
        .checked_sub(1)
        .and_then(|prev| overrides.get(prev))
        .is_some_and(|prev| prev.trim() == current);

    FileGroup {
        id: current.to_string(),
        continues_previous,
    }
}

/// Name of the generated HTTP client module, `request_<index>` unless overridden.
pub fn request_instance_name(index: usize, explicit: Option<&str>) -> String {
    match explicit.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("request_{index}"),
    }
}

/// Environment variable holding the server URL, `request_server_url_<slug(output)>` unless
/// overridden.
pub fn server_env_name(output: &str, explicit: Option<&str>) -> String {
    match explicit.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            let slug = slugify(output);
            if slug.is_empty() {
                "request_server_url".to_string()
            } else {
                format!("request_server_url_{slug}")
            }
        }
    }
}

fn slugify(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
