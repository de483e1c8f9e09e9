//! Caller-supplied overrides for service function rendering.
//!
//! A [`ServiceRenderer`] decides how the request instance is imported, which call expression
//! a service function returns and which interfaces get a function at all. Every method has
//! a default, so [`DefaultRenderer`] is an empty implementation; [`TemplateRenderer`] backs
//! the overrides that can be written in `lts.config.toml`.

use std::fmt;

use tera::{Context, Tera};
use tracing::warn;

use crate::ts::{TsExpr, TsType};

/// Everything known about one call site when its expression is rendered.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// Request instance identifier (`request_0`).
    pub instance: &'a str,
    /// Base path plus interface path, as template literal content (may contain `${..}`).
    pub path: &'a str,
    /// Lower-case HTTP method.
    pub method: &'a str,
    /// Name of the response data type.
    pub response_type: &'a str,
    /// Name of the request parameter type.
    pub query_type: &'a str,
    /// Whether the function declares a `params` argument.
    pub has_params: bool,
    /// Whether `params` travels in the body rather than the query string.
    pub params_in_body: bool,
}

/// Rendering strategy for service functions.
pub trait ServiceRenderer: Send + Sync + fmt::Debug {
    /// Statement importing the request instance into an `api/<group>.ts` file.
    fn render_import_instance(&self, instance: &str) -> String {
        default_import_instance(instance)
    }

    /// Expression returned by a service function.
    fn render_call(&self, call: &CallSite<'_>) -> TsExpr {
        default_call(call)
    }

    /// Whether a service function is emitted for this full path.
    fn accepts_path(&self, _full_path: &str) -> bool {
        true
    }
}

/// `import request_0 from "../request_0";`
pub fn default_import_instance(instance: &str) -> String {
    format!("import {instance} from \"../{instance}\";")
}

/// `request_0.get<getUserData>(`/user?${stringify(params)}`)`
pub fn default_call(call: &CallSite<'_>) -> TsExpr {
    let mut args = vec![TsExpr::Raw(format!("`{}`", call.path))];
    if call.has_params && call.params_in_body {
        args.push(TsExpr::Ident("params".to_string()));
    }
    TsExpr::Call {
        callee: Box::new(TsExpr::Member {
            object: Box::new(TsExpr::Ident(call.instance.to_string())),
            prop: call.method.to_string(),
        }),
        type_args: vec![TsType::Ref(call.response_type.to_string())],
        args,
    }
}

/// Built-in behaviour with no overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRenderer;

impl ServiceRenderer for DefaultRenderer {}

/// Path-prefix allow and deny lists.
#[derive(Debug, Default, Clone)]
pub struct PathFilter {
    /// Prefixes a path must start with; empty allows every path.
    pub include: Vec<String>,
    /// Prefixes that reject a path.
    pub exclude: Vec<String>,
}

impl PathFilter {
    /// True when the filter accepts every path.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Whether `full_path` passes both lists.
    pub fn accepts(&self, full_path: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|p| full_path.starts_with(p.as_str()));
        included && !self.exclude.iter().any(|p| full_path.starts_with(p.as_str()))
    }
}

const IMPORT_TEMPLATE: &str = "import_instance";
const CALL_TEMPLATE: &str = "service_func_return";

/// Overrides written as `tera` templates plus a path filter.
///
/// Templates see `instance`, `path`, `method`, `response_type` and `query_type`. A template
/// that fails to render at generation time falls back to the default output.
#[derive(Debug, Default)]
pub struct TemplateRenderer {
    tera: Tera,
    has_import: bool,
    has_call: bool,
    filter: PathFilter,
}

impl TemplateRenderer {
    /// Renderer with no templates and no filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the import override. On error the renderer is left unchanged.
    pub fn set_import_template(&mut self, template: &str) -> Result<(), tera::Error> {
        self.tera.add_raw_template(IMPORT_TEMPLATE, template)?;
        self.has_import = true;
        Ok(())
    }

    /// Compile the call-expression override. On error the renderer is left unchanged.
    pub fn set_call_template(&mut self, template: &str) -> Result<(), tera::Error> {
        self.tera.add_raw_template(CALL_TEMPLATE, template)?;
        self.has_call = true;
        Ok(())
    }

    /// Replace the path filter.
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// True when nothing differs from [`DefaultRenderer`].
    pub fn is_default(&self) -> bool {
        !self.has_import && !self.has_call && self.filter.is_empty()
    }

    fn render(&self, name: &str, context: &Context) -> Option<String> {
        match self.tera.render(name, context) {
            Ok(rendered) => Some(rendered.trim().to_string()),
            Err(err) => {
                warn!(template = name, error = %err, "Template rendering failed, using default");
                None
            }
        }
    }
}

impl ServiceRenderer for TemplateRenderer {
    fn render_import_instance(&self, instance: &str) -> String {
        if !self.has_import {
            return default_import_instance(instance);
        }
        let mut context = Context::new();
        context.insert("instance", instance);
        self.render(IMPORT_TEMPLATE, &context)
            .unwrap_or_else(|| default_import_instance(instance))
    }

    fn render_call(&self, call: &CallSite<'_>) -> TsExpr {
        if !self.has_call {
            return default_call(call);
        }
        let mut context = Context::new();
        context.insert("instance", call.instance);
        context.insert("path", call.path);
        context.insert("method", call.method);
        context.insert("response_type", call.response_type);
        context.insert("query_type", call.query_type);
        context.insert("has_params", &call.has_params);
        match self.render(CALL_TEMPLATE, &context) {
            Some(rendered) => TsExpr::Raw(rendered.trim_end_matches(';').to_string()),
            None => default_call(call),
        }
    }

    fn accepts_path(&self, full_path: &str) -> bool {
        self.filter.accepts(full_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ts::Emit;

    fn describe_call(renderer: &dyn ServiceRenderer, call: &CallSite<'_>) -> String {
        renderer.render_call(call).emit()
    }

    fn call_site<'a>(path: &'a str, method: &'a str, params_in_body: bool) -> CallSite<'a> {
        CallSite {
            instance: "request_0",
            path,
            method,
            response_type: "getUserData",
            query_type: "getUserQuery",
            has_params: true,
            params_in_body,
        }
    }

    #[test]
    fn test_default_renderer() {
        let renderer = DefaultRenderer;
        assert_eq!(
            renderer.render_import_instance("request_0"),
            "import request_0 from \"../request_0\";"
        );
        assert_eq!(
            describe_call(&renderer, &call_site("/user?${stringify(params)}", "get", false)),
            "request_0.get<getUserData>(`/user?${stringify(params)}`)"
        );
        assert_eq!(
            describe_call(&renderer, &call_site("/user", "post", true)),
            "request_0.post<getUserData>(`/user`, params)"
        );
        assert!(renderer.accepts_path("/anything"));
    }

    #[test]
    fn test_template_renderer_overrides() {
        let mut renderer = TemplateRenderer::new();
        renderer
            .set_import_template("import {{ instance }} from \"@/utils/{{ instance }}\";")
            .unwrap();
        renderer
            .set_call_template("{{ instance }}.{{ method }}<Response<{{ response_type }}>>(`{{ path }}`);")
            .unwrap();
        assert!(!renderer.is_default());
        assert_eq!(
            renderer.render_import_instance("http"),
            "import http from \"@/utils/http\";"
        );
        assert_eq!(
            describe_call(&renderer, &call_site("/user", "get", false)),
            "request_0.get<Response<getUserData>>(`/user`)"
        );
    }

    #[test]
    fn test_template_renderer_without_templates_uses_defaults() {
        let renderer = TemplateRenderer::new();
        assert_eq!(
            describe_call(&renderer, &call_site("/user", "post", true)),
            "request_0.post<getUserData>(`/user`, params)"
        );
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let mut renderer = TemplateRenderer::new();
        assert!(renderer.set_call_template("{{ unclosed").is_err());
        assert!(renderer.is_default());
    }

    #[test]
    fn test_failed_render_falls_back() {
        let mut renderer = TemplateRenderer::new();
        renderer.set_call_template("{{ not_a_variable }}").unwrap();
        assert_eq!(
            describe_call(&renderer, &call_site("/user", "get", false)),
            "request_0.get<getUserData>(`/user`)"
        );
    }

    #[test]
    fn test_path_filter() {
        let filter = PathFilter {
            include: vec!["/api/user".into()],
            exclude: vec!["/api/user/internal".into()],
        };
        assert!(filter.accepts("/api/user/list"));
        assert!(!filter.accepts("/api/user/internal/sync"));
        assert!(!filter.accepts("/api/order"));
        assert!(PathFilter::default().accepts("/x"));

        let renderer = TemplateRenderer::new().with_filter(filter);
        assert!(!renderer.accepts_path("/api/order"));
    }
}
