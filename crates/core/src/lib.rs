//! Generate TypeScript request types and axios service functions from YApi documentation.
//!
//! ## Module Structure
//!
//! - `config`: `lts.config.toml` loading and validation
//! - `yapi`: wire model and HTTP transport for the documentation server
//! - `schema`: normalization of JSON Schema, examples, mock templates and parameter lists
//! - `naming`: identifiers derived from methods, paths and configuration positions
//! - `ts`: TypeScript IR and emitter
//! - `renderer`: pluggable import / call / path-filter strategy
//! - `synth`: per-interface type and function synthesis
//! - `pipeline`: per-entry fetch-and-synthesize runs
//! - `tree`: project trees and the cross-project merge
//! - `render`: file contents for a merged tree

#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod render;
pub mod renderer;
pub mod schema;
pub mod synth;
pub mod tree;
pub mod ts;
pub mod yapi;

pub use config::{CONFIG_FILE_NAME, CategorySelector, ProjectConfig, RunConfig, STARTER_CONFIG};
pub use error::{ConfigError, PipelineError, SchemaError, TransportError};
pub use pipeline::{RunOutcome, run_all, run_project};
pub use render::{RenderedFile, render};
pub use renderer::{DefaultRenderer, PathFilter, ServiceRenderer, TemplateRenderer};
pub use tree::{OutputTree, merge};
pub use yapi::{DocSource, YapiClient};
