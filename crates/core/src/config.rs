//! `lts.config.toml` loading and validation.
//!
//! The file holds one `[[projects]]` table per configuration entry (a file with a single
//! top-level entry is accepted too). Each entry is validated on its own: a missing or
//! malformed `server`, `token` or `output` makes that entry unusable, while a malformed
//! optional field falls back to its default. Problems are collected as warnings so the
//! remaining entries still run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use toml::{Table, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::ConfigError;
use crate::naming::{request_instance_name, server_env_name};
use crate::renderer::{DefaultRenderer, PathFilter, ServiceRenderer, TemplateRenderer};
use crate::yapi::Category;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lts.config.toml";

/// Written by `lts init`.
pub const STARTER_CONFIG: &str = r#"# Generated by `lts init`. One [[projects]] table per documentation project.

[[projects]]
# Documentation server and project token (Project settings > Token).
server = "https://yapi.example.com"
token = "replace-with-project-token"
# Directory that receives the generated files.
output = "src/service"

# Optional: only generate these categories (names or numeric ids). Empty means all.
# categories = ["user", 12]
# Optional: file name per selected category; repeating the previous name appends to it.
# categories_file_name = ["user", "user", "order"]
# only_interface = false
# request_instance_name = "request"
# server_env_name = "API_URL"
# data_key = "data"
# render_import_instance = "import {{ instance }} from \"@/utils/{{ instance }}\";"
# render_service_func_return = "{{ instance }}.{{ method }}<{{ response_type }}>(`{{ path }}`)"
# include_paths = ["/api/user"]
# exclude_paths = ["/api/internal"]
"#;

const KNOWN_FIELDS: &[&str] = &[
    "server",
    "token",
    "output",
    "categories",
    "categories_file_name",
    "only_interface",
    "request_instance_name",
    "server_env_name",
    "data_key",
    "render_import_instance",
    "render_service_func_return",
    "include_paths",
    "exclude_paths",
];

/// Selects a category by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// Category id.
    Id(u64),
    /// Category name, compared after trimming.
    Name(String),
}

impl CategorySelector {
    /// Whether this selector picks `category`.
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategorySelector::Id(id) => category.id == *id,
            CategorySelector::Name(name) => category.name.trim() == name.trim(),
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::Id(id) => write!(f, "#{id}"),
            CategorySelector::Name(name) => f.write_str(name),
        }
    }
}

/// One validated configuration entry.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Position in the configuration file.
    pub index: usize,
    /// Base URL without trailing slashes.
    pub server: String,
    /// Project token, sent as a query parameter.
    pub token: String,
    /// Output directory, relative to the config file.
    pub output: String,
    /// Empty means every category.
    pub categories: Vec<CategorySelector>,
    /// File group name per selected category, by position.
    pub categories_file_name: Vec<String>,
    /// Generate types only, no service functions.
    pub only_interface: bool,
    /// Identifier and file name of the request instance.
    pub request_instance_name: String,
    /// Environment variable holding the request base URL.
    pub server_env_name: String,
    /// Response property whose schema becomes the data type.
    pub data_key: Option<String>,
    /// Import, call and path-filter overrides.
    pub renderer: Arc<dyn ServiceRenderer>,
}

impl ProjectConfig {
    /// Entry with derived names and no overrides.
    pub fn new(index: usize, server: &str, token: &str, output: &str) -> Self {
        Self {
            index,
            server: server.trim().trim_end_matches('/').to_string(),
            token: token.to_string(),
            output: output.to_string(),
            categories: Vec::new(),
            categories_file_name: Vec::new(),
            only_interface: false,
            request_instance_name: request_instance_name(index, None),
            server_env_name: server_env_name(output, None),
            data_key: None,
            renderer: Arc::new(DefaultRenderer),
        }
    }

    /// Replace the renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn ServiceRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Whether a category passes the `categories` filter.
    pub fn selects(&self, category: &Category) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|s| s.matches(category))
    }
}

/// Immutable configuration of one run.
#[derive(Debug)]
pub struct RunConfig {
    /// Directory relative outputs are resolved against.
    pub context: PathBuf,
    /// Usable entries, in file order.
    pub projects: Vec<ProjectConfig>,
    /// Problems that did not stop the run (skipped entries, ignored fields).
    pub warnings: Vec<ConfigError>,
}

impl RunConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let context = path
            .parent()
            .map(Path::to_path_buf)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&text, path, context)
    }

    /// Validate configuration text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path, context: PathBuf) -> Result<Self, ConfigError> {
        let root: Table = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: Vec<Option<&Table>> = match root.get("projects") {
            Some(Value::Array(items)) => items.iter().map(Value::as_table).collect(),
            Some(_) => {
                return Err(ConfigError::InvalidField {
                    index: 0,
                    field: "projects",
                    reason: "expected an array of tables".into(),
                });
            }
            None if root.contains_key("server") => vec![Some(&root)],
            None => vec![],
        };

        let mut warnings = Vec::new();
        let mut projects = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let Some(table) = entry else {
                warnings.push(ConfigError::InvalidField {
                    index,
                    field: "projects",
                    reason: "entry is not a table".into(),
                });
                continue;
            };
            let mut reader = EntryReader {
                index,
                table,
                problems: &mut warnings,
            };
            if let Some(project) = reader.project() {
                debug!(index, server = %project.server, output = %project.output, "Loaded configuration entry");
                projects.push(project);
            }
        }

        for problem in &warnings {
            warn!(error = %problem, "Configuration problem");
        }

        if projects.is_empty() {
            return Err(match warnings.into_iter().next() {
                Some(first) => first,
                None => ConfigError::NoProjects {
                    path: path.to_path_buf(),
                },
            });
        }

        Ok(Self {
            context,
            projects,
            warnings,
        })
    }

    /// Resolve a configured output directory against the configuration context.
    pub fn output_dir(&self, output: &str) -> PathBuf {
        self.context.join(output)
    }
}

/// Typed access to one entry's fields, recording problems instead of failing.
struct EntryReader<'a> {
    index: usize,
    table: &'a Table,
    problems: &'a mut Vec<ConfigError>,
}

impl EntryReader<'_> {
    fn invalid(&mut self, field: &'static str, reason: impl Into<String>) {
        self.problems.push(ConfigError::InvalidField {
            index: self.index,
            field,
            reason: reason.into(),
        });
    }

    fn string(&mut self, field: &'static str) -> Option<String> {
        match self.table.get(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::String(_) => None,
            other => {
                self.invalid(field, format!("expected a string, found {}", other.type_str()));
                None
            }
        }
    }

    fn required(&mut self, field: &'static str) -> Option<String> {
        let value = self.string(field);
        let wrong_type = self.table.get(field).is_some_and(|v| !v.is_str());
        if value.is_none() && !wrong_type {
            self.problems.push(ConfigError::MissingField {
                index: self.index,
                field,
            });
        }
        value
    }

    fn bool(&mut self, field: &'static str) -> bool {
        match self.table.get(field) {
            None => false,
            Some(Value::Boolean(b)) => *b,
            Some(other) => {
                self.invalid(field, format!("expected a boolean, found {}", other.type_str()));
                false
            }
        }
    }

    fn strings(&mut self, field: &'static str) -> Vec<String> {
        match self.table.get(field) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(s.trim().to_string()),
                        other => {
                            self.invalid(field, format!("expected strings, found {}", other.type_str()));
                            return Vec::new();
                        }
                    }
                }
                out
            }
            Some(other) => {
                self.invalid(field, format!("expected an array, found {}", other.type_str()));
                Vec::new()
            }
        }
    }

    fn selectors(&mut self) -> Vec<CategorySelector> {
        let field = "categories";
        match self.table.get(field) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(CategorySelector::Name(s.trim().to_string())),
                        Value::Integer(id) if *id >= 0 => out.push(CategorySelector::Id(id.unsigned_abs())),
                        other => self.invalid(
                            field,
                            format!("expected a category name or id, found {}", other.type_str()),
                        ),
                    }
                }
                out
            }
            Some(other) => {
                self.invalid(field, format!("expected an array, found {}", other.type_str()));
                Vec::new()
            }
        }
    }

    fn template(
        &mut self,
        field: &'static str,
        apply: impl FnOnce(&str) -> Result<(), tera::Error>,
    ) {
        if let Some(template) = self.string(field)
            && let Err(source) = apply(&template)
        {
            self.problems.push(ConfigError::Template {
                index: self.index,
                field,
                source,
            });
        }
    }

    fn project(&mut self) -> Option<ProjectConfig> {
        for key in self.table.keys() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                warn!(index = self.index, field = %key, "Ignoring unknown configuration field");
            }
        }

        let server = self.required("server");
        let token = self.required("token");
        let output = self.required("output");

        let server = server.and_then(|server| {
            let server = server.trim_end_matches('/').to_string();
            match Url::parse(&server) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(server),
                Ok(url) => {
                    self.invalid("server", format!("unsupported scheme `{}`", url.scheme()));
                    None
                }
                Err(err) => {
                    self.invalid("server", err.to_string());
                    None
                }
            }
        });

        let categories = self.selectors();
        let categories_file_name = self.strings("categories_file_name");
        let only_interface = self.bool("only_interface");
        let explicit_instance = self.string("request_instance_name");
        let explicit_env = self.string("server_env_name");
        let data_key = self.string("data_key");
        let filter = PathFilter {
            include: self.strings("include_paths"),
            exclude: self.strings("exclude_paths"),
        };

        let mut renderer = TemplateRenderer::new().with_filter(filter);
        self.template("render_import_instance", |t| renderer.set_import_template(t));
        self.template("render_service_func_return", |t| renderer.set_call_template(t));
        let renderer: Arc<dyn ServiceRenderer> = if renderer.is_default() {
            Arc::new(DefaultRenderer)
        } else {
            Arc::new(renderer)
        };

        let (server, token, output) = (server?, token?, output?);
        Some(ProjectConfig {
            index: self.index,
            request_instance_name: request_instance_name(self.index, explicit_instance.as_deref()),
            server_env_name: server_env_name(&output, explicit_env.as_deref()),
            server,
            token,
            output,
            categories,
            categories_file_name,
            only_interface,
            data_key,
            renderer,
        })
    }
}
