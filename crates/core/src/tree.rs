//! Per-project output trees and the cross-project merge.
//!
//! A [`ProjectTree`] is what one configuration entry produces: its request instance module
//! plus two parallel file-group collections (`api` and `interface`). [`merge`] folds all
//! project trees into an [`OutputTree`] keyed by output directory, concatenating the
//! fragments of entries that write to the same directory.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::naming::FileGroup;

/// One synthesized block of code destined for a file group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Emitted TypeScript.
    pub code: String,
    /// Type names declared by this fragment.
    pub exports: Vec<String>,
    /// The fragment calls `stringify` from `qs`.
    pub uses_query_string: bool,
    /// Request instance the fragment calls, if any.
    pub instance: Option<String>,
}

/// Ordered fragments per file group id.
pub type FileGroups = BTreeMap<String, Vec<Fragment>>;

/// The generated HTTP client module of one configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInstance {
    /// Identifier and file name of the instance.
    pub name: String,
    /// Contents of `<output>/<name>.ts`.
    pub code: String,
    /// Statement importing the instance into `api/<group>.ts`.
    pub import: String,
}

/// Output of one configuration entry.
#[derive(Debug, Clone)]
pub struct ProjectTree {
    project_id: u64,
    index: usize,
    output: String,
    request_instance: RequestInstance,
    api: FileGroups,
    interface: FileGroups,
}

impl ProjectTree {
    /// Empty tree for one entry.
    pub fn new(project_id: u64, index: usize, output: &str, request_instance: RequestInstance) -> Self {
        Self {
            project_id,
            index,
            output: output_identity(output),
            request_instance,
            api: FileGroups::new(),
            interface: FileGroups::new(),
        }
    }

    /// Documentation project id.
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Position of the owning configuration entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Normalized output directory.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Request instance module of the entry.
    pub fn request_instance(&self) -> &RequestInstance {
        &self.request_instance
    }

    /// Service function fragments per group.
    pub fn api(&self) -> &FileGroups {
        &self.api
    }

    /// Type fragments per group.
    pub fn interface(&self) -> &FileGroups {
        &self.interface
    }

    /// True when no file group was added.
    pub fn is_empty(&self) -> bool {
        self.api.is_empty() && self.interface.is_empty()
    }

    /// Fold one category's fragments into its file group.
    ///
    /// A group continuing the previous category is appended to. Otherwise the group's
    /// content is replaced, so a non-adjacent repeat of a group name overwrites the earlier
    /// category's fragments.
    pub fn add_group(&mut self, group: &FileGroup, api: Vec<Fragment>, interface: Vec<Fragment>) {
        let existing = self.interface.get(&group.id).is_some_and(|f| !f.is_empty())
            || self.api.get(&group.id).is_some_and(|f| !f.is_empty());

        if group.continues_previous {
            self.api.entry(group.id.clone()).or_default().extend(api);
            self.interface.entry(group.id.clone()).or_default().extend(interface);
            return;
        }

        if existing {
            warn!(
                group = %group.id,
                output = %self.output,
                "File group is not adjacent to its previous use, replacing its content"
            );
        }
        self.api.insert(group.id.clone(), api);
        self.interface.insert(group.id.clone(), interface);
    }
}

/// Normalized identity of an output directory (`./src/service/` and `src/service` match).
pub fn output_identity(output: &str) -> String {
    let trimmed = output.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() && trimmed.starts_with('/') {
        "/".to_string()
    } else if stripped.is_empty() {
        ".".to_string()
    } else {
        stripped.to_string()
    }
}

/// Everything written into one output directory.
#[derive(Debug, Clone, Default)]
pub struct MergedProject {
    output: String,
    indexes: Vec<usize>,
    project_ids: Vec<u64>,
    request_instances: BTreeMap<String, RequestInstance>,
    api: FileGroups,
    interface: FileGroups,
}

impl MergedProject {
    /// Normalized output directory.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Configuration positions folded into this directory, in merge order.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Documentation project ids, in merge order.
    pub fn project_ids(&self) -> &[u64] {
        &self.project_ids
    }

    /// Request instance modules, by name.
    pub fn request_instances(&self) -> impl Iterator<Item = &RequestInstance> {
        self.request_instances.values()
    }

    /// Request instance module called `name`.
    pub fn request_instance(&self, name: &str) -> Option<&RequestInstance> {
        self.request_instances.get(name)
    }

    /// Service function fragments per group.
    pub fn api(&self) -> &FileGroups {
        &self.api
    }

    /// Type fragments per group.
    pub fn interface(&self) -> &FileGroups {
        &self.interface
    }

    fn absorb(&mut self, tree: ProjectTree) {
        self.indexes.push(tree.index);
        self.project_ids.push(tree.project_id);
        let instance = tree.request_instance;
        if self.request_instances.contains_key(&instance.name) {
            debug!(
                instance = %instance.name,
                index = tree.index,
                "Request instance name shared with a later entry, keeping this entry's module"
            );
        }
        self.request_instances.insert(instance.name.clone(), instance);
        for (group, fragments) in tree.api {
            self.api.entry(group).or_default().extend(fragments);
        }
        for (group, fragments) in tree.interface {
            self.interface.entry(group).or_default().extend(fragments);
        }
    }
}

/// Output of a whole run, keyed by output directory identity.
#[derive(Debug, Clone, Default)]
pub struct OutputTree {
    projects: BTreeMap<String, MergedProject>,
}

impl OutputTree {
    /// Output directories, sorted by identity.
    pub fn projects(&self) -> impl Iterator<Item = &MergedProject> {
        self.projects.values()
    }

    /// The directory matching `output` after normalization.
    pub fn project(&self, output: &str) -> Option<&MergedProject> {
        self.projects.get(&output_identity(output))
    }

    /// Number of output directories.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// True when nothing was generated.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Merge per-project trees in reverse configuration order.
///
/// Trees sharing an output directory have their file groups concatenated per key (later
/// configuration entries first). When they also share a request instance name, the
/// module of the earliest entry is kept.
pub fn merge(mut trees: Vec<ProjectTree>) -> OutputTree {
    trees.sort_by_key(|tree| tree.index);

    let mut output = OutputTree::default();
    for tree in trees.into_iter().rev() {
        let project = output
            .projects
            .entry(tree.output.clone())
            .or_insert_with(|| MergedProject {
                output: tree.output.clone(),
                ..Default::default()
            });
        project.absorb(tree);
    }
    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn fragment(code: &str) -> Fragment {
        Fragment {
            code: code.into(),
            ..Default::default()
        }
    }

    fn instance(name: &str, code: &str) -> RequestInstance {
        RequestInstance {
            name: name.into(),
            code: code.into(),
            import: format!("import {name} from \"../{name}\";"),
        }
    }

    fn group(id: &str, continues_previous: bool) -> FileGroup {
        FileGroup {
            id: id.into(),
            continues_previous,
        }
    }

    fn codes(fragments: Option<&Vec<Fragment>>) -> Vec<&str> {
        fragments
            .map(|f| f.iter().map(|f| f.code.as_str()).collect())
            .unwrap_or_default()
    }

    fn tree(project_id: u64, index: usize, output: &str, fragments: &[&str]) -> ProjectTree {
        let mut tree = ProjectTree::new(
            project_id,
            index,
            output,
            instance(&format!("request_{index}"), "client"),
        );
        tree.add_group(
            &group("user", false),
            fragments.iter().map(|c| fragment(&format!("fn {c}"))).collect(),
            fragments.iter().map(|c| fragment(&format!("type {c}"))).collect(),
        );
        tree
    }

    #[test]
    fn test_adjacent_groups_append() {
        let mut tree = ProjectTree::new(1, 0, "src", instance("request_0", ""));
        tree.add_group(&group("a", false), vec![fragment("f1")], vec![fragment("t1")]);
        tree.add_group(&group("a", true), vec![fragment("f2")], vec![fragment("t2")]);
        assert_eq!(codes(tree.api().get("a")), vec!["f1", "f2"]);
        assert_eq!(codes(tree.interface().get("a")), vec!["t1", "t2"]);
    }

    /// Deliberate quirk: a non-adjacent repeat replaces the earlier category's content.
    #[test]
    fn test_non_adjacent_group_replaces() {
        let mut tree = ProjectTree::new(1, 0, "src", instance("request_0", ""));
        tree.add_group(&group("a", false), vec![fragment("f1")], vec![fragment("t1")]);
        tree.add_group(&group("b", false), vec![fragment("f2")], vec![fragment("t2")]);
        tree.add_group(&group("a", false), vec![fragment("f3")], vec![fragment("t3")]);
        assert_eq!(codes(tree.api().get("a")), vec!["f3"]);
        assert_eq!(codes(tree.interface().get("b")), vec!["t2"]);
    }

    #[test]
    fn test_api_and_interface_share_keys() {
        let mut tree = ProjectTree::new(1, 0, "src", instance("request_0", ""));
        tree.add_group(&group("types_only", false), vec![], vec![fragment("t1")]);
        assert_eq!(
            tree.api().keys().collect::<Vec<_>>(),
            tree.interface().keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_same_output_concatenates_in_reverse_order() {
        let merged = merge(vec![
            tree(10, 0, "src/service", &["first"]),
            tree(20, 1, "./src/service/", &["second"]),
        ]);
        assert_eq!(merged.len(), 1);
        let project = merged.project("src/service").unwrap();
        assert_eq!(codes(project.api().get("user")), vec!["fn second", "fn first"]);
        assert_eq!(codes(project.interface().get("user")), vec!["type second", "type first"]);
        assert_eq!(project.indexes(), &[1, 0]);
        assert_eq!(project.project_ids(), &[20, 10]);
    }

    #[test]
    fn test_distinct_outputs_stay_independent() {
        let merged = merge(vec![
            tree(10, 0, "src/a", &["a"]),
            tree(10, 1, "src/b", &["b"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(codes(merged.project("src/a").unwrap().api().get("user")), vec!["fn a"]);
        assert_eq!(codes(merged.project("src/b").unwrap().api().get("user")), vec!["fn b"]);
    }

    #[test]
    fn test_first_entry_wins_shared_request_instance() {
        let mut first = ProjectTree::new(1, 0, "src", instance("request", "first client"));
        first.add_group(&group("a", false), vec![], vec![]);
        let mut second = ProjectTree::new(2, 1, "src", instance("request", "second client"));
        second.add_group(&group("b", false), vec![], vec![]);

        // Input order does not matter, configuration index does.
        let merged = merge(vec![second, first]);
        let project = merged.project("src").unwrap();
        assert_eq!(project.request_instances().count(), 1);
        assert_eq!(project.request_instance("request").unwrap().code, "first client");
        assert!(project.api().contains_key("a"));
        assert!(project.api().contains_key("b"));
    }

    #[test]
    fn test_output_identity() {
        assert_eq!(output_identity("./src/service/"), "src/service");
        assert_eq!(output_identity(" src/service "), "src/service");
        assert_eq!(output_identity("./"), ".");
        assert_eq!(output_identity("/"), "/");
    }
}
