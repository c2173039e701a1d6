//! Closed syntax model consumed by the documentation engine.
//!
//! The parser crate lowers tree-sitter nodes into these enums, so every
//! pattern, type and expression shape the engine understands is matched
//! exhaustively rather than by node-kind strings.

use serde::Serialize;

/// A formal-parameter binding pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    /// `name`, `name: T`, `name?: T`
    Identifier {
        name: String,
        annotation: Option<TypeNode>,
        optional: bool,
    },
    /// `target = default`
    Assignment { target: Box<Pattern>, default: Expr },
    /// `{ a, b: c, ...rest }`
    Object {
        properties: Vec<PropertyPattern>,
        annotation: Option<TypeNode>,
    },
    /// `[a, , b]`; `None` entries are elisions.
    Array {
        elements: Vec<Option<Pattern>>,
        annotation: Option<TypeNode>,
    },
    /// `...argument`
    Rest {
        argument: Box<Pattern>,
        annotation: Option<TypeNode>,
    },
    /// Constructor parameter with an access modifier (`private x: T`).
    ParameterProperty { modifier: String, inner: Box<Pattern> },
    /// Anything the lowering step did not recognize.
    Unknown { text: String },
}

impl Pattern {
    /// The explicit type annotation attached to this pattern, if any.
    pub fn annotation(&self) -> Option<&TypeNode> {
        match self {
            Self::Identifier { annotation, .. }
            | Self::Object { annotation, .. }
            | Self::Array { annotation, .. }
            | Self::Rest { annotation, .. } => annotation.as_ref(),
            Self::Assignment { target, .. } => target.annotation(),
            Self::ParameterProperty { inner, .. } => inner.annotation(),
            Self::Unknown { .. } => None,
        }
    }
}

/// One entry of an object destructuring pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyPattern {
    /// `{ a }` or `{ a = 1 }`
    Shorthand { name: String, default: Option<Expr> },
    /// `{ key: value }` where `value` is any pattern.
    Pair { key: String, value: Pattern },
    /// `{ ...rest }`
    Rest { name: String },
    Unknown { text: String },
}

/// A syntactic type annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeNode {
    /// Predefined keyword types: `string`, `number`, `void`, ...
    Keyword(String),
    /// `T[]`
    Array(Box<TypeNode>),
    /// `Foo`, `ns.Foo`, `Map<K, V>`; qualified segments are already joined with `.`.
    Reference { name: String, args: Vec<TypeNode> },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Literal(LiteralType),
    /// `{ a: string }`
    ObjectShape,
    /// `[string, number]`
    Tuple(Vec<TypeNode>),
    /// `(a: T) => U`
    Function,
    Parenthesized(Box<TypeNode>),
    Unknown(String),
}

/// Runtime type of a literal in a literal type (`'a'`, `42`, `true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralType {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
}

impl LiteralType {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

/// An expression, kept with its normalized source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    /// Whitespace-normalized source text; empty when the source could not be read.
    pub text: String,
}

impl Expr {
    pub fn new(kind: ExprKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Look up a statically keyed entry of an object literal.
    pub fn object_entry(&self, key: &str) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Object(entries) => entries.iter().find(|e| e.key == key).map(|e| &e.value),
            _ => None,
        }
    }

    /// Positional element of an array literal; `None` for holes.
    pub fn array_element(&self, index: usize) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Array(items) => items.get(index).and_then(Option::as_ref),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Regex,
    /// Array literal by position; elisions are `None`.
    Array(Vec<Option<Expr>>),
    /// Object literal; only statically keyed entries are kept.
    Object(Vec<ObjectEntry>),
    Identifier,
    Function,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectEntry {
    pub key: String,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
    Method,
    Constructor,
    Getter,
    Setter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FunctionBody {
    /// `{ ... }` with every `return` in source order; `None` for a bare `return;`.
    Block { returns: Vec<Option<Expr>> },
    /// Concise arrow body.
    Expression(Expr),
    /// Overloads, abstract members and recovered trees without a body.
    Missing,
}

/// A function-like construct lowered from the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionNode {
    pub kind: FunctionKind,
    pub name: Option<String>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
    pub return_type: Option<TypeNode>,
    /// The parser recovered from a syntax error inside this function.
    pub has_error: bool,
}
