//! Service function synthesis.

use chrono::DateTime;
use tracing::debug;

use super::InterfaceNames;
use crate::renderer::{CallSite, ServiceRenderer};
use crate::schema::SchemaNode;
use crate::tree::Fragment;
use crate::ts::utils::format_param_access;
use crate::ts::{DocComment, Emit, TemplatePart, TsExpr, TsFunction, TsParam, TsType};
use crate::yapi::{InterfaceDescriptor, RequestBodyKind};

/// Where a service function lives and what it calls.
#[derive(Debug, Clone, Copy)]
pub struct ServiceContext<'a> {
    /// Documentation server, used for the deep link.
    pub server: &'a str,
    /// Project base path prepended to every interface path.
    pub basepath: &'a str,
    /// Category name shown in the doc comment.
    pub category: &'a str,
    /// Request instance the call goes through.
    pub instance: &'a str,
    /// Caller overrides.
    pub renderer: &'a dyn ServiceRenderer,
}

/// Whether the function takes a `params` argument.
///
/// GET-class methods need at least one query parameter, form bodies at least one field and
/// JSON bodies a schema with content (`{}` counts as absent). Path parameters always count.
pub fn has_params(detail: &InterfaceDescriptor, request: &SchemaNode) -> bool {
    if !detail.path_params.is_empty() {
        return true;
    }
    if detail.method.is_query() {
        return !detail.query_params.is_empty();
    }
    match detail.request_body_kind {
        RequestBodyKind::Form => !detail.request_body_form.is_empty(),
        RequestBodyKind::Json => !request.is_blank(),
        _ => false,
    }
}

/// Project base path joined with the interface path.
pub fn full_path(basepath: &str, path: &str) -> String {
    let base = basepath.trim().trim_end_matches('/');
    let path = path.trim();
    match (base.is_empty(), path.starts_with('/')) {
        (true, _) => path.to_string(),
        (false, true) => format!("{base}{path}"),
        (false, false) => format!("{base}/{path}"),
    }
}

/// Template literal parts for a call path: `{name}` placeholders of declared path
/// parameters read from `params`, and GET-class calls with parameters get a
/// `?${stringify(params)}` suffix. Undeclared placeholders stay literal.
fn call_path(full_path: &str, path_params: &[&str], query_string: bool) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = full_path;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        let name = rest[open + 1..close].trim();
        if path_params.contains(&name) {
            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                parts.push(TemplatePart::Static(std::mem::take(&mut literal)));
            }
            parts.push(TemplatePart::Dynamic(TsExpr::Raw(format_param_access("params", name))));
        } else {
            literal.push_str(&rest[..=close]);
        }
        rest = &rest[close + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(TemplatePart::Static(literal));
    }

    if query_string {
        parts.push(TemplatePart::Static("?".to_string()));
        parts.push(TemplatePart::Dynamic(TsExpr::Raw("stringify(params)".to_string())));
    }
    parts
}

fn format_timestamp(secs: i64) -> Option<String> {
    (secs > 0)
        .then(|| DateTime::from_timestamp(secs, 0))
        .flatten()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Doc comment for a service function.
pub fn doc_comment(detail: &InterfaceDescriptor, ctx: &ServiceContext<'_>) -> DocComment {
    let mut doc = DocComment::default();
    let title = detail.title.trim();
    doc.push(if title.is_empty() { detail.path.trim() } else { title });

    let description: Vec<&str> = detail
        .description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if !description.is_empty() {
        doc.push("");
        description.into_iter().for_each(|line| doc.push(line));
    }

    doc.push("");
    doc.push(format!("@category {}", ctx.category));
    doc.push(format!("@method {}", detail.method.as_str()));
    if !detail.status.is_empty() {
        doc.push(format!("@status {}", detail.status));
    }
    if let Some(updated) = format_timestamp(detail.up_time) {
        doc.push(format!("@updatedAt {updated}"));
    }
    if let Some(created) = format_timestamp(detail.add_time) {
        doc.push(format!("@createdAt {created}"));
    }
    let tags: Vec<&str> = detail
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !tags.is_empty() {
        doc.push(format!("@tags {}", tags.join(" ")));
    }
    doc.push(format!(
        "@link {}/project/{}/interface/api/{}",
        ctx.server, detail.project_id, detail.id
    ));
    doc
}

/// Synthesize the service function of one interface.
///
/// Returns `None` when the renderer's path filter rejects the interface.
pub fn synthesize_function(
    detail: &InterfaceDescriptor,
    names: &InterfaceNames,
    request: &SchemaNode,
    ctx: &ServiceContext<'_>,
) -> Option<Fragment> {
    let full_path = full_path(ctx.basepath, &detail.path);
    if !ctx.renderer.accepts_path(&full_path) {
        debug!(path = %full_path, "Interface rejected by path filter");
        return None;
    }

    let with_params = has_params(detail, request);
    let query_string = with_params && detail.method.is_query();
    let path_params: Vec<&str> = detail.path_params.iter().map(|p| p.name.trim()).collect();
    let literal = TsExpr::Template(call_path(&full_path, &path_params, query_string)).emit();
    let path = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(&literal);

    let call = ctx.renderer.render_call(&CallSite {
        instance: ctx.instance,
        path,
        method: detail.method.as_lower(),
        response_type: &names.data_type,
        query_type: &names.query_type,
        has_params: with_params,
        params_in_body: !detail.method.is_query(),
    });

    let params = if with_params {
        vec![TsParam {
            name: "params".to_string(),
            ty: TsType::Ref(names.query_type.clone()),
        }]
    } else {
        vec![]
    };

    let function = TsFunction {
        name: names.function.clone(),
        doc: doc_comment(detail, ctx),
        params,
        returns: call,
    };

    Some(Fragment {
        code: function.emit(),
        exports: vec![],
        uses_query_string: query_string,
        instance: Some(ctx.instance.to_string()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::renderer::{DefaultRenderer, PathFilter, TemplateRenderer};
    use crate::schema::{SchemaInput, normalize};
    use crate::synth::typegen::request_schema;
    use crate::yapi::{HttpMethod, PathParam, QueryParam};

    fn ctx(renderer: &dyn ServiceRenderer) -> ServiceContext<'_> {
        ServiceContext {
            server: "https://yapi.example.com",
            basepath: "/api/",
            category: "user",
            instance: "request_0",
            renderer,
        }
    }

    fn detail(method: HttpMethod, path: &str) -> InterfaceDescriptor {
        InterfaceDescriptor {
            id: 42,
            project_id: 7,
            title: "User list".into(),
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    fn synth(detail: &InterfaceDescriptor, renderer: &dyn ServiceRenderer) -> Option<Fragment> {
        let names = InterfaceNames::derive(detail).unwrap();
        let request = request_schema(detail).unwrap();
        synthesize_function(detail, &names, &request, &ctx(renderer))
    }

    #[test]
    fn test_get_without_query_has_no_params() {
        let d = detail(HttpMethod::Get, "/user/list");
        let request = request_schema(&d).unwrap();
        assert!(!has_params(&d, &request));

        let fragment = synth(&d, &DefaultRenderer).unwrap();
        assert!(fragment.code.contains("export function getUserList() {"));
        assert!(fragment.code.contains("return request_0.get<getUserListData>(`/api/user/list`);"));
        assert!(!fragment.uses_query_string);
    }

    #[test]
    fn test_get_with_query_builds_query_string() {
        let mut d = detail(HttpMethod::Get, "/user/list");
        d.query_params = vec![QueryParam {
            name: "page".into(),
            required: false,
            desc: String::new(),
        }];
        let fragment = synth(&d, &DefaultRenderer).unwrap();
        assert!(fragment.code.contains("export function getUserList(params: getUserListQuery) {"));
        assert!(fragment.code.contains(
            "return request_0.get<getUserListData>(`/api/user/list?${stringify(params)}`);"
        ));
        assert!(fragment.uses_query_string);
        assert_eq!(fragment.instance.as_deref(), Some("request_0"));
    }

    #[test]
    fn test_path_params_are_interpolated() {
        let mut d = detail(HttpMethod::Delete, "/user/{id}");
        d.path_params = vec![PathParam {
            name: "id".into(),
            desc: String::new(),
        }];
        let fragment = synth(&d, &DefaultRenderer).unwrap();
        assert!(fragment.code.contains("export function deleteUser(params: deleteUserQuery) {"));
        assert!(
            fragment
                .code
                .contains("return request_0.delete<deleteUserData>(`/api/user/${params.id}`, params);")
        );
    }

    #[test]
    fn test_undeclared_placeholder_stays_literal() {
        let mut d = detail(HttpMethod::Get, "/user/{id}/orders");
        d.query_params = vec![QueryParam {
            name: "page".into(),
            required: false,
            desc: String::new(),
        }];
        let fragment = synth(&d, &DefaultRenderer).unwrap();
        assert!(!fragment.code.contains("params.id"));
        assert!(fragment.code.contains("`/api/user/{id}/orders?${stringify(params)}`"));

        d.path_params = vec![PathParam {
            name: "id".into(),
            desc: String::new(),
        }];
        let fragment = synth(&d, &DefaultRenderer).unwrap();
        assert!(
            fragment
                .code
                .contains("`/api/user/${params.id}/orders?${stringify(params)}`")
        );
    }

    #[test]
    fn test_empty_json_body_has_no_params() {
        let mut d = detail(HttpMethod::Post, "/user");
        d.request_body_kind = RequestBodyKind::Json;
        d.request_body_raw = "{}".into();
        let request = request_schema(&d).unwrap();
        assert!(!has_params(&d, &request));

        let body = normalize(SchemaInput::JsonExample(r#"{ "name": "x" }"#)).unwrap();
        assert!(has_params(&d, &body));
    }

    #[test]
    fn test_form_and_other_bodies() {
        let mut d = detail(HttpMethod::Post, "/upload");
        d.request_body_kind = RequestBodyKind::Raw;
        assert!(!has_params(&d, &SchemaNode::empty_object()));
        d.request_body_kind = RequestBodyKind::Form;
        assert!(!has_params(&d, &SchemaNode::empty_object()));
    }

    #[test]
    fn test_doc_comment_contents() {
        let mut d = detail(HttpMethod::Get, "/user/list");
        d.description = "Lists users.\n\n  Paged. ".into();
        d.status = "done".into();
        d.tags = vec!["admin".into(), "v2".into()];
        d.add_time = 1_600_000_000;
        d.up_time = 1_600_003_600;
        let doc = doc_comment(&d, &ctx(&DefaultRenderer));
        assert_eq!(
            doc.lines,
            vec![
                "User list",
                "",
                "Lists users.",
                "Paged.",
                "",
                "@category user",
                "@method GET",
                "@status done",
                "@updatedAt 2020-09-13 13:26:40",
                "@createdAt 2020-09-13 12:26:40",
                "@tags admin v2",
                "@link https://yapi.example.com/project/7/interface/api/42",
            ]
        );
    }

    #[test]
    fn test_path_filter_skips_function() {
        let renderer = TemplateRenderer::new().with_filter(PathFilter {
            include: vec![],
            exclude: vec!["/api/user".into()],
        });
        assert!(synth(&detail(HttpMethod::Get, "/user/list"), &renderer).is_none());
        assert!(synth(&detail(HttpMethod::Get, "/order/list"), &renderer).is_some());
    }

    #[test]
    fn test_call_override_receives_full_path() {
        let mut renderer = TemplateRenderer::new();
        renderer
            .set_call_template("{{ instance }}({ url: `{{ path }}`, method: \"{{ method }}\" })")
            .unwrap();
        let fragment = synth(&detail(HttpMethod::Get, "/user/list"), &renderer).unwrap();
        assert!(
            fragment
                .code
                .contains("return request_0({ url: `/api/user/list`, method: \"get\" });")
        );
    }

    #[test]
    fn test_full_path() {
        assert_eq!(full_path("", "/user"), "/user");
        assert_eq!(full_path("/api/", "/user"), "/api/user");
        assert_eq!(full_path("/api", "user"), "/api/user");
    }
}
