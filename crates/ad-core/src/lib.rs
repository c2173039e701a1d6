pub mod ast;
mod error;
mod language;
mod param;

pub use ast::{
    Expr, ExprKind, FunctionBody, FunctionKind, FunctionNode, LiteralType, ObjectEntry, Pattern,
    PropertyPattern, TypeNode,
};
pub use error::CoreError;
pub use language::Language;
pub use param::{Destructure, Parameter};
