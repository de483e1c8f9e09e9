//! Turn a merged [`OutputTree`] into file contents.
//!
//! Layout per output directory:
//! - `<output>/<requestInstanceName>.ts`: axios instance reading its base URL from the env
//! - `<output>/interface/<group>.ts`: type fragments
//! - `<output>/api/<group>.ts`: service functions importing their request instance and types

use std::path::PathBuf;

use tracing::debug;

use crate::renderer::default_import_instance;
use crate::synth::FILE_DATA_TYPE;
use crate::tree::{Fragment, MergedProject, OutputTree};
use crate::ts::{Emit, TsImport};

/// Header placed at the top of every generated file.
pub const GENERATED_HEADER: &str = concat!(
    "/* eslint-disable */\n",
    "/* tslint:disable */\n",
    "/**\n",
    " * This file is generated by lts. Do not edit it by hand,\n",
    " * run `lts gen` to regenerate it.\n",
    " */\n",
);

/// One file to write, relative to the configuration context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Output directory identity the file belongs to.
    pub output: String,
    /// Path relative to the configuration context.
    pub path: PathBuf,
    /// Full file text.
    pub contents: String,
}

/// Module exporting the HTTP client used by every service function of a project.
pub fn request_instance_module(server_env_name: &str) -> String {
    format!(
        "import axios from \"axios\";\n\
         \n\
         const instance = axios.create({{\n\
         \x20 baseURL: process.env.{server_env_name},\n\
         }});\n\
         \n\
         export default instance;\n"
    )
}

fn join_fragments(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.code.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn interface_file(fragments: &[Fragment]) -> String {
    format!(
        "{GENERATED_HEADER}\nexport type {FILE_DATA_TYPE} = File | Blob;\n\n{}\n",
        join_fragments(fragments)
    )
}

fn api_file(project: &MergedProject, group: &str, fragments: &[Fragment]) -> String {
    let mut imports = String::new();

    let mut instances: Vec<&str> = Vec::new();
    for name in fragments.iter().filter_map(|f| f.instance.as_deref()) {
        if !instances.contains(&name) {
            instances.push(name);
        }
    }
    for name in instances {
        let import = project
            .request_instance(name)
            .map_or_else(|| default_import_instance(name), |i| i.import.clone());
        imports.push_str(import.trim_end());
        imports.push('\n');
    }

    if fragments.iter().any(|f| f.uses_query_string) {
        imports.push_str(
            &TsImport {
                items: vec!["stringify".to_string()],
                from: "qs".to_string(),
                type_only: false,
            }
            .emit(),
        );
    }

    let exports: Vec<String> = project
        .interface()
        .get(group)
        .map(|types| types.iter().flat_map(|f| f.exports.iter().cloned()).collect())
        .unwrap_or_default();
    if !exports.is_empty() {
        imports.push_str(
            &TsImport {
                items: exports,
                from: format!("../interface/{group}"),
                type_only: true,
            }
            .emit(),
        );
    }

    format!("{GENERATED_HEADER}\n{imports}\n{}\n", join_fragments(fragments))
}

/// Render every file of the tree. Directories without any file group get nothing.
pub fn render(tree: &OutputTree) -> Vec<RenderedFile> {
    let mut files = Vec::new();

    for project in tree.projects() {
        let root = PathBuf::from(project.output());
        let has_types = project.interface().values().any(|f| !f.is_empty());
        if !has_types {
            debug!(output = %project.output(), "Nothing generated for output directory");
            continue;
        }

        for instance in project.request_instances() {
            files.push(RenderedFile {
                output: project.output().to_string(),
                path: root.join(format!("{}.ts", instance.name)),
                contents: format!("{GENERATED_HEADER}\n{}", instance.code),
            });
        }

        for (group, fragments) in project.interface() {
            if fragments.is_empty() {
                continue;
            }
            files.push(RenderedFile {
                output: project.output().to_string(),
                path: root.join("interface").join(format!("{group}.ts")),
                contents: interface_file(fragments),
            });
        }

        for (group, fragments) in project.api() {
            if fragments.is_empty() {
                continue;
            }
            files.push(RenderedFile {
                output: project.output().to_string(),
                path: root.join("api").join(format!("{group}.ts")),
                contents: api_file(project, group, fragments),
            });
        }
    }

    files
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::naming::FileGroup;
    use crate::tree::{ProjectTree, RequestInstance, merge};

    fn instance(name: &str) -> RequestInstance {
        RequestInstance {
            name: name.into(),
            code: request_instance_module("API_URL"),
            import: default_import_instance(name),
        }
    }

    fn types(code: &str, exports: &[&str]) -> Fragment {
        Fragment {
            code: code.into(),
            exports: exports.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    fn function(code: &str, query: bool) -> Fragment {
        Fragment {
            code: code.into(),
            uses_query_string: query,
            instance: Some("request_0".into()),
            ..Default::default()
        }
    }

    fn find<'a>(files: &'a [RenderedFile], path: &str) -> &'a RenderedFile {
        files
            .iter()
            .find(|f| f.path == PathBuf::from(path))
            .expect("file not rendered")
    }

    #[test]
    fn test_request_instance_module() {
        let code = request_instance_module("request_server_url_src");
        assert!(code.contains("baseURL: process.env.request_server_url_src,"));
        assert!(code.contains("export default instance;"));
    }

    #[test]
    fn test_render_layout() {
        let mut tree = ProjectTree::new(1, 0, "src/service", instance("request_0"));
        tree.add_group(
            &FileGroup {
                id: "user".into(),
                continues_previous: false,
            },
            vec![
                function("export function getUser() {}\n", true),
                function("export function postUser() {}\n", false),
            ],
            vec![
                types("export interface getUserQuery {}\n", &["getUserQuery", "getUserData"]),
                types("export interface postUserQuery {}\n", &["postUserQuery", "postUserData"]),
            ],
        );
        let files = render(&merge(vec![tree]));
        assert_eq!(files.len(), 3);

        let instance = find(&files, "src/service/request_0.ts");
        assert!(instance.contents.starts_with(GENERATED_HEADER));

        let interface = find(&files, "src/service/interface/user.ts");
        assert!(interface.contents.contains("export type FileData = File | Blob;"));
        assert!(interface.contents.contains(
            "export interface getUserQuery {}\n\nexport interface postUserQuery {}\n"
        ));

        let api = find(&files, "src/service/api/user.ts");
        assert!(api.contents.contains(
            "import request_0 from \"../request_0\";\n\
             import { stringify } from \"qs\";\n\
             import type { getUserQuery, getUserData, postUserQuery, postUserData } from \"../interface/user\";\n"
        ));
        assert!(api.contents.ends_with("export function getUser() {}\n\nexport function postUser() {}\n"));
    }

    #[test]
    fn test_types_only_project_has_no_api_files() {
        let mut tree = ProjectTree::new(1, 0, "out", instance("request_0"));
        tree.add_group(
            &FileGroup {
                id: "category_0".into(),
                continues_previous: false,
            },
            vec![],
            vec![types("export interface aQuery {}\n", &["aQuery"])],
        );
        let files = render(&merge(vec![tree]));
        assert!(files.iter().all(|f| !f.path.starts_with("out/api")));
        assert!(files.iter().any(|f| f.path == PathBuf::from("out/interface/category_0.ts")));
    }

    #[test]
    fn test_empty_project_renders_nothing() {
        let tree = ProjectTree::new(1, 0, "out", instance("request_0"));
        assert!(render(&merge(vec![tree])).is_empty());
    }
}
