//! TypeScript code emission via the Emit trait.
//!
//! Each AST type implements `Emit`. Types that can span several lines (object literals,
//! type definitions, functions) also take an indentation level through `emit_indented`.

use super::types::{
    DocComment, TemplatePart, TsExpr, TsFunction, TsImport, TsParam, TsPrimitive, TsProp, TsType,
    TsTypeDef, TypeDefKind,
};
use super::utils::{escape_doc, escape_template, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string",
            TsPrimitive::Number => "number",
            TsPrimitive::Boolean => "boolean",
            TsPrimitive::Any => "any",
            TsPrimitive::Unknown => "unknown",
        }
        .to_string()
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl TsType {
    /// Emit with the given indentation level for the closing brace of object types.
    pub fn emit_indented(&self, level: usize) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => format!("{}[]", inner.emit_indented(level)),
            TsType::Object(props) if props.is_empty() => "{}".to_string(),
            TsType::Object(props) => {
                let mut output = "{\n".to_string();
                for prop in props {
                    output.push_str(&prop.emit_indented(level + 1));
                }
                output.push_str(&indent(level));
                output.push('}');
                output
            }
            TsType::Ref(name) => name.clone(),
        }
    }
}

impl TsProp {
    /// One `name?: type;` line, preceded by its doc comment.
    pub fn emit_indented(&self, level: usize) -> String {
        let prefix = indent(level);
        let mut output = String::new();
        if let Some(doc) = &self.doc {
            output.push_str(&format!("{prefix}/** {} */\n", escape_doc(doc)));
        }
        let opt = if self.optional { "?" } else { "" };
        output.push_str(&format!(
            "{prefix}{}{opt}: {};\n",
            quote_if_needed(&self.name),
            self.ty.emit_indented(level)
        ));
        output
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for DocComment {
    fn emit(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut output = "/**\n".to_string();
        for line in &self.lines {
            if line.is_empty() {
                output.push_str(" *\n");
            } else {
                output.push_str(&format!(" * {}\n", escape_doc(line)));
            }
        }
        output.push_str(" */\n");
        output
    }
}

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = self
            .doc
            .as_ref()
            .map(|doc| format!("/** {} */\n", escape_doc(doc)))
            .unwrap_or_default();
        match &self.kind {
            TypeDefKind::Interface { properties } => {
                output.push_str(&format!("export interface {} {{", self.name));
                if properties.is_empty() {
                    output.push_str("}\n");
                } else {
                    output.push('\n');
                    for prop in properties {
                        output.push_str(&prop.emit_indented(1));
                    }
                    output.push_str("}\n");
                }
            }
            TypeDefKind::TypeAlias { ty } => {
                output.push_str(&format!("export type {} = {};\n", self.name, ty.emit()));
            }
        }
        output
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Member { object, prop } => format!("{}.{}", object.emit(), prop),
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let type_args_str = if type_args.is_empty() {
                    String::new()
                } else {
                    let parts: Vec<_> = type_args.iter().map(Emit::emit).collect();
                    format!("<{}>", parts.join(", "))
                };
                let args_str = args.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                format!("{}{}({})", callee.emit(), type_args_str, args_str)
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => escape_template(s),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.emit()),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsExpr::Raw(code) => code.clone(),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        format!("{}: {}", self.name, self.ty.emit())
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let params = self.params.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
        format!(
            "{}export function {}({params}) {{\n{}return {};\n}}\n",
            self.doc.emit(),
            self.name,
            indent(1),
            self.returns.emit()
        )
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        format!(
            "import {type_keyword}{{ {} }} from \"{}\";\n",
            self.items.join(", "),
            self.from
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
