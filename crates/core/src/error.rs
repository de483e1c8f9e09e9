//! Error types shared across the generator.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SourceKind;

/// Problems found while loading or validating `lts.config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// A required field is absent or empty.
    #[error("config entry [{index}]: missing required field `{field}`")]
    MissingField {
        /// Position of the entry in `projects`.
        index: usize,
        /// Field name.
        field: &'static str,
    },
    /// A field is present but unusable.
    #[error("config entry [{index}]: invalid `{field}`: {reason}")]
    InvalidField {
        /// Position of the entry in `projects`.
        index: usize,
        /// Field name.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// An override template does not compile.
    #[error("config entry [{index}]: invalid template `{field}`: {source}")]
    Template {
        /// Position of the entry in `projects`.
        index: usize,
        /// Field holding the template.
        field: &'static str,
        /// Template compiler error.
        source: tera::Error,
    },
    /// Every entry was rejected.
    #[error("config file {} contains no usable project entries", path.display())]
    NoProjects {
        /// Config file path.
        path: PathBuf,
    },
}

/// A single request to the documentation server failed.
///
/// `url` is always the endpoint without its query string, so the project token never
/// appears in messages.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Builder error.
        source: reqwest::Error,
    },
    /// The server address does not form a valid URL.
    #[error("invalid request URL {url}: {source}")]
    Url {
        /// Endpoint URL.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
    /// Connection, timeout or other transport failure.
    #[error("request to {url} failed: {source}")]
    Http {
        /// Endpoint URL.
        url: String,
        /// Client error, stripped of its URL.
        source: reqwest::Error,
    },
    /// Non-2xx response.
    #[error("request to {url} returned status {status}")]
    Status {
        /// Endpoint URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body is not the expected JSON envelope.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Endpoint URL.
        url: String,
        /// Client error, stripped of its URL.
        source: reqwest::Error,
    },
    /// The envelope carried a non-zero `errcode`.
    #[error("{url} answered with errcode {code}: {message}")]
    Api {
        /// Endpoint URL.
        url: String,
        /// Server error code.
        code: i64,
        /// Server error message.
        message: String,
    },
}

/// Schema text for one interface could not be understood.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The text is not valid in its notation.
    #[error("malformed {kind} text: {reason}")]
    Parse {
        /// Notation the text was read as.
        kind: SourceKind,
        /// Parser message.
        reason: String,
    },
}

/// Fatal failure of a single configuration entry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Project metadata could not be fetched.
    #[error("project at {server} is unavailable: {source}")]
    ProjectUnavailable {
        /// Server base URL.
        server: String,
        /// Transport failure.
        source: TransportError,
    },
}
