//! TypeScript AST and printer for generated modules.
//!
//! Synthesis builds structured AST values (testable); emission is purely mechanical
//! string building through the [`Emit`] trait.
//!
//! ## Module Structure
//!
//! - `types`: the AST (TsType, TsExpr, TsFunction, TsTypeDef, TsImport)
//! - `emit`: AST -> code strings
//! - `utils`: identifier quoting and escaping helpers

mod emit;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{
    DocComment, TemplatePart, TsExpr, TsFunction, TsImport, TsParam, TsPrimitive, TsProp, TsType,
    TsTypeDef, TypeDefKind,
};
