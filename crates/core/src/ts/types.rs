//! TypeScript AST for generated service modules.
//!
//! - TsType: types (primitives, arrays, object literals, named references)
//! - TsExpr: the expressions a service function needs (calls, members, templates)
//! - TsTypeDef / TsFunction / TsImport: top-level declarations

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, any, unknown
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Object type, printed one property per line
    Object(Vec<TsProp>),
    /// Named type reference: FileData, getUserData
    Ref(String),
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `any`
    Any,
    /// `unknown`
    Unknown,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProp {
    /// Property name, quoted on emission when needed.
    pub name: String,
    /// Property type.
    pub ty: TsType,
    /// Printed as `name?:`.
    pub optional: bool,
    /// Attached as a `/** .. */` comment above the property.
    pub doc: Option<String>,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    /// export interface Foo { ... }
    Interface {
        /// Members, in declaration order.
        properties: Vec<TsProp>,
    },
    /// export type Foo = ...;
    TypeAlias {
        /// Aliased type.
        ty: TsType,
    },
}

/// Type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsTypeDef {
    /// Declared type name.
    pub name: String,
    /// Single-line doc comment.
    pub doc: Option<String>,
    /// Interface or alias body.
    pub kind: TypeDefKind,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Member access: foo.bar
    Member {
        /// Accessed object.
        object: Box<TsExpr>,
        /// Property name.
        prop: String,
    },
    /// Function call with optional type arguments: foo<T>(a, b)
    Call {
        /// Called expression.
        callee: Box<TsExpr>,
        /// Explicit type arguments.
        type_args: Vec<TsType>,
        /// Call arguments.
        args: Vec<TsExpr>,
    },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Raw code that doesn't fit the AST
    Raw(String),
}

/// Template literal part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

/// Function parameter: `name: Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsParam {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: TsType,
}

/// Block comment (`/** ... */`), one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Comment lines; empty strings print as blank ` *` lines.
    pub lines: Vec<String>,
}

impl DocComment {
    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Exported function whose body is a single `return`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsFunction {
    /// Function name.
    pub name: String,
    /// Block comment above the function.
    pub doc: DocComment,
    /// Parameters.
    pub params: Vec<TsParam>,
    /// Returned expression.
    pub returns: TsExpr,
}

/// `import { a, b } from "x";` or `import type { a } from "x";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    /// Imported names.
    pub items: Vec<String>,
    /// Module specifier.
    pub from: String,
    /// Printed as `import type`.
    pub type_only: bool,
}
