//! Fetch-and-synthesize pipeline for configuration entries.
//!
//! Each entry walks project metadata, its category list and every interface in the selected
//! categories. Categories and interface details are fetched concurrently, but results are
//! reassembled by position, so fragments always follow category order then interface-list
//! order. Failures below the project level are logged and skipped.

use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use crate::config::ProjectConfig;
use crate::error::PipelineError;
use crate::naming::file_group_id;
use crate::render::request_instance_module;
use crate::synth::{InterfaceContext, synthesize_interface};
use crate::tree::{Fragment, OutputTree, ProjectTree, RequestInstance, merge};
use crate::yapi::{Category, DocSource, Project};

/// Fragments synthesized for one category.
#[derive(Debug, Default)]
struct CategoryOutput {
    api: Vec<Fragment>,
    interface: Vec<Fragment>,
}

/// Result of running every configuration entry.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Merged output of the entries that completed.
    pub tree: OutputTree,
    /// Entries that failed fatally, by configuration position.
    pub failures: Vec<(usize, PipelineError)>,
}

impl RunOutcome {
    /// True when no entry failed fatally.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

async fn run_category<S: DocSource>(
    source: &S,
    config: &ProjectConfig,
    project: &Project,
    category: &Category,
) -> CategoryOutput {
    let summaries = match source.interfaces(category.id).await {
        Ok(summaries) => summaries,
        Err(err) => {
            warn!(
                server = %source.server(),
                category = %category.name,
                error = %err,
                "Failed to list interfaces, skipping category"
            );
            return CategoryOutput::default();
        }
    };
    if summaries.is_empty() {
        info!(server = %source.server(), category = %category.name, "Category has no interfaces");
        return CategoryOutput::default();
    }

    let details = join_all(summaries.iter().map(|s| source.interface(s.id))).await;

    let ctx = InterfaceContext {
        server: source.server(),
        basepath: &project.basepath,
        category: &category.name,
        instance: &config.request_instance_name,
        data_key: config.data_key.as_deref(),
        only_interface: config.only_interface,
        renderer: config.renderer.as_ref(),
    };

    let mut output = CategoryOutput::default();
    for (summary, detail) in summaries.iter().zip(details) {
        let detail = match detail {
            Ok(detail) => detail,
            Err(err) => {
                warn!(
                    server = %source.server(),
                    category = %category.name,
                    interface_id = summary.id,
                    interface = %summary.title,
                    error = %err,
                    "Failed to fetch interface, skipping"
                );
                continue;
            }
        };

        match synthesize_interface(&detail, &ctx) {
            Ok(Some(synthesized)) => {
                output.interface.push(synthesized.types);
                output.api.extend(synthesized.function);
            }
            Ok(None) => {
                debug!(interface_id = summary.id, path = %detail.path, "Root path interface, nothing to generate");
            }
            Err(err) => {
                warn!(
                    server = %source.server(),
                    category = %category.name,
                    interface_id = summary.id,
                    interface = %summary.title,
                    error = %err,
                    "Failed to synthesize interface, skipping"
                );
            }
        }
    }
    output
}

/// Build the tree of one configuration entry.
///
/// Only an unreachable project is fatal. A failed category listing yields an empty tree.
pub async fn run_project<S: DocSource>(
    source: &S,
    config: &ProjectConfig,
) -> Result<ProjectTree, PipelineError> {
    let project = source.project().await.map_err(|source_err| {
        error!(
            index = config.index,
            server = %source.server(),
            error = %source_err,
            "Failed to fetch project metadata"
        );
        PipelineError::ProjectUnavailable {
            server: source.server().to_string(),
            source: source_err,
        }
    })?;
    debug!(index = config.index, project_id = project.id, name = %project.name, "Fetched project");

    let instance = RequestInstance {
        name: config.request_instance_name.clone(),
        code: request_instance_module(&config.server_env_name),
        import: config.renderer.render_import_instance(&config.request_instance_name),
    };
    let mut tree = ProjectTree::new(project.id, config.index, &config.output, instance);

    let categories = match source.categories(project.id).await {
        Ok(categories) => categories,
        Err(err) => {
            warn!(
                server = %source.server(),
                project_id = project.id,
                error = %err,
                "Failed to list categories"
            );
            Vec::new()
        }
    };

    let selected: Vec<&Category> = categories.iter().filter(|c| config.selects(c)).collect();
    if selected.is_empty() {
        info!(
            server = %source.server(),
            project_id = project.id,
            "No matching categories, nothing to generate"
        );
        return Ok(tree);
    }

    let outputs = join_all(
        selected
            .iter()
            .map(|category| run_category(source, config, &project, category)),
    )
    .await;

    for (position, (category, output)) in selected.iter().zip(outputs).enumerate() {
        if output.interface.is_empty() && output.api.is_empty() {
            debug!(category = %category.name, "Category produced no output");
            continue;
        }
        let group = file_group_id(position, &config.categories_file_name);
        debug!(
            category = %category.name,
            group = %group.id,
            types = output.interface.len(),
            functions = output.api.len(),
            "Category synthesized"
        );
        tree.add_group(&group, output.api, output.interface);
    }

    Ok(tree)
}

/// Run every entry concurrently and merge what succeeded.
///
/// A fatal failure in one entry never affects its siblings.
pub async fn run_all<S: DocSource>(jobs: &[(S, ProjectConfig)]) -> RunOutcome {
    let results = join_all(jobs.iter().map(|(source, config)| run_project(source, config))).await;

    let mut trees = Vec::new();
    let mut failures = Vec::new();
    for ((_, config), result) in jobs.iter().zip(results) {
        match result {
            Ok(tree) => trees.push(tree),
            Err(err) => failures.push((config.index, err)),
        }
    }

    info!(
        succeeded = trees.len(),
        failed = failures.len(),
        "Configuration entries processed"
    );
    RunOutcome {
        tree: merge(trees),
        failures,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::config::CategorySelector;
    use crate::error::TransportError;
    use crate::yapi::{HttpMethod, InterfaceDescriptor, InterfaceSummary, RequestBodyKind};

    /// In-memory documentation server. Detail fetches sleep for their configured delay.
    #[derive(Default)]
    struct FakeSource {
        server: String,
        project: Option<Project>,
        categories: Option<Vec<Category>>,
        interfaces: HashMap<u64, Vec<InterfaceSummary>>,
        details: HashMap<u64, (InterfaceDescriptor, u64)>,
    }

    fn unavailable(url: &str) -> TransportError {
        TransportError::Status {
            url: url.to_string(),
            status: 503,
        }
    }

    impl DocSource for FakeSource {
        fn server(&self) -> &str {
            &self.server
        }

        async fn project(&self) -> Result<Project, TransportError> {
            self.project.clone().ok_or_else(|| unavailable("project/get"))
        }

        async fn categories(&self, _project_id: u64) -> Result<Vec<Category>, TransportError> {
            self.categories
                .clone()
                .ok_or_else(|| unavailable("interface/getCatMenu"))
        }

        async fn interfaces(&self, category_id: u64) -> Result<Vec<InterfaceSummary>, TransportError> {
            self.interfaces
                .get(&category_id)
                .cloned()
                .ok_or_else(|| unavailable("interface/list_cat"))
        }

        async fn interface(&self, interface_id: u64) -> Result<InterfaceDescriptor, TransportError> {
            let (detail, delay) = self
                .details
                .get(&interface_id)
                .cloned()
                .ok_or_else(|| unavailable("interface/get"))?;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(detail)
        }
    }

    impl FakeSource {
        fn new(server: &str) -> Self {
            Self {
                server: server.to_string(),
                project: Some(Project {
                    id: 7,
                    name: "shop".into(),
                    basepath: "/api".into(),
                }),
                categories: Some(Vec::new()),
                ..Default::default()
            }
        }

        fn category(mut self, id: u64, name: &str) -> Self {
            self.categories.get_or_insert_with(Vec::new).push(Category {
                id,
                name: name.into(),
                desc: String::new(),
            });
            self.interfaces.entry(id).or_default();
            self
        }

        fn interface(mut self, category_id: u64, detail: InterfaceDescriptor, delay: u64) -> Self {
            self.interfaces.entry(category_id).or_default().push(InterfaceSummary {
                id: detail.id,
                title: detail.title.clone(),
                path: detail.path.clone(),
                method: detail.method.as_str().to_string(),
            });
            self.details.insert(detail.id, (detail, delay));
            self
        }
    }

    fn get(id: u64, path: &str) -> InterfaceDescriptor {
        InterfaceDescriptor {
            id,
            project_id: 7,
            title: format!("interface {id}"),
            method: HttpMethod::Get,
            path: path.into(),
            ..Default::default()
        }
    }

    fn exports(tree: &ProjectTree, group: &str) -> Vec<String> {
        tree.interface()[group]
            .iter()
            .flat_map(|f| f.exports.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_fragments_follow_list_order() {
        let source = FakeSource::new("https://yapi.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 40)
            .interface(1, get(11, "/user/b"), 0)
            .category(2, "order")
            .interface(2, get(20, "/order/list"), 0);
        let config = ProjectConfig::new(0, "https://yapi.example.com", "t", "src/service");

        let tree = run_project(&source, &config).await.unwrap();
        assert_eq!(tree.project_id(), 7);
        assert_eq!(
            exports(&tree, "category_0"),
            vec!["getUserAQuery", "getUserAData", "getUserBQuery", "getUserBData"]
        );
        assert_eq!(exports(&tree, "category_1"), vec!["getOrderListQuery", "getOrderListData"]);

        let api = &tree.api()["category_0"];
        assert_eq!(api.len(), 2);
        assert!(api[0].code.contains("request_0.get<getUserAData>(`/api/user/a`)"));
        assert_eq!(tree.request_instance().name, "request_0");
        assert!(
            tree.request_instance()
                .code
                .contains("process.env.request_server_url_src_service")
        );
    }

    #[tokio::test]
    async fn test_malformed_schema_only_skips_its_interface() {
        let mut broken = get(12, "/user/create");
        broken.method = HttpMethod::Post;
        broken.request_body_kind = RequestBodyKind::Json;
        broken.request_body_raw = "{ broken".into();

        let source = FakeSource::new("https://yapi.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 0)
            .interface(1, broken, 0)
            .interface(1, get(11, "/user/b"), 0);
        let config = ProjectConfig::new(0, "https://yapi.example.com", "t", "out");

        let tree = run_project(&source, &config).await.unwrap();
        assert_eq!(
            exports(&tree, "category_0"),
            vec!["getUserAQuery", "getUserAData", "getUserBQuery", "getUserBData"]
        );
        assert_eq!(tree.api()["category_0"].len(), 2);
    }

    #[tokio::test]
    async fn test_failed_detail_and_listing_are_skipped() {
        let mut source = FakeSource::new("https://yapi.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 0)
            .interface(1, get(11, "/user/b"), 0)
            .category(2, "order");
        source.details.remove(&11);
        source.interfaces.remove(&2);
        let config = ProjectConfig::new(0, "https://yapi.example.com", "t", "out");

        let tree = run_project(&source, &config).await.unwrap();
        assert_eq!(exports(&tree, "category_0"), vec!["getUserAQuery", "getUserAData"]);
        assert!(!tree.interface().contains_key("category_1"));
    }

    #[tokio::test]
    async fn test_category_filter_by_name_and_id() {
        let source = FakeSource::new("https://yapi.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 0)
            .category(2, "order")
            .interface(2, get(20, "/order/list"), 0)
            .category(3, "misc")
            .interface(3, get(30, "/misc/ping"), 0);
        let mut config = ProjectConfig::new(0, "https://yapi.example.com", "t", "out");
        config.categories = vec![CategorySelector::Name("misc".into()), CategorySelector::Id(1)];
        config.categories_file_name = vec!["account".into(), "tools".into()];

        let tree = run_project(&source, &config).await.unwrap();
        let groups: Vec<_> = tree.interface().keys().cloned().collect();
        assert_eq!(groups, vec!["account", "tools"]);
        assert_eq!(exports(&tree, "account"), vec!["getUserAQuery", "getUserAData"]);
        assert_eq!(exports(&tree, "tools"), vec!["getMiscPingQuery", "getMiscPingData"]);
    }

    #[tokio::test]
    async fn test_no_matching_categories_gives_empty_tree() {
        let source = FakeSource::new("https://yapi.example.com").category(1, "user");
        let mut config = ProjectConfig::new(0, "https://yapi.example.com", "t", "out");
        config.categories = vec![CategorySelector::Name("absent".into())];

        let tree = run_project(&source, &config).await.unwrap();
        assert!(tree.is_empty());

        let mut unlisted = FakeSource::new("https://yapi.example.com");
        unlisted.categories = None;
        let tree = run_project(&unlisted, &ProjectConfig::new(0, "https://yapi.example.com", "t", "out"))
            .await
            .unwrap();
        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn test_only_interface_skips_functions() {
        let source = FakeSource::new("https://yapi.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 0);
        let mut config = ProjectConfig::new(0, "https://yapi.example.com", "t", "out");
        config.only_interface = true;

        let tree = run_project(&source, &config).await.unwrap();
        assert_eq!(tree.interface()["category_0"].len(), 1);
        assert!(tree.api()["category_0"].is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_project_is_isolated() {
        let healthy = FakeSource::new("https://a.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 0);
        let mut broken = FakeSource::new("https://b.example.com");
        broken.project = None;

        let jobs = vec![
            (broken, ProjectConfig::new(0, "https://b.example.com", "t", "b")),
            (healthy, ProjectConfig::new(1, "https://a.example.com", "t", "a")),
        ];
        let outcome = run_all(&jobs).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.failures.len(), 1);
        let (index, err) = &outcome.failures[0];
        assert_eq!(*index, 0);
        assert!(matches!(err, PipelineError::ProjectUnavailable { server, .. } if server == "https://b.example.com"));
        assert_eq!(outcome.tree.len(), 1);
        assert!(outcome.tree.project("a").is_some());
    }

    #[tokio::test]
    async fn test_shared_output_is_concatenated() {
        let first = FakeSource::new("https://a.example.com")
            .category(1, "user")
            .interface(1, get(10, "/user/a"), 30);
        let second = FakeSource::new("https://b.example.com")
            .category(1, "user")
            .interface(1, get(11, "/user/b"), 0);

        let jobs = vec![
            (first, ProjectConfig::new(0, "https://a.example.com", "t", "./out/")),
            (second, ProjectConfig::new(1, "https://b.example.com", "t", "out")),
        ];
        let outcome = run_all(&jobs).await;
        assert!(outcome.is_success());

        let project = outcome.tree.project("out").unwrap();
        let names: Vec<_> = project.interface()["category_0"]
            .iter()
            .flat_map(|f| f.exports.clone())
            .collect();
        assert_eq!(
            names,
            vec!["getUserBQuery", "getUserBData", "getUserAQuery", "getUserAData"]
        );
        assert_eq!(project.request_instances().count(), 2);
    }
}
