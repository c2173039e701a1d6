use ad_core::{Expr, ExprKind, TypeNode};

/// The display type used when nothing could be inferred.
pub const UNKNOWN_TYPE: &str = "any";

/// Translate a type annotation into its display name.
///
/// Purely structural: references are printed verbatim and never resolved.
/// Shapes without a display form fall back to `fallback`.
pub fn infer_type(node: Option<&TypeNode>, fallback: &str) -> String {
    match node {
        Some(node) => display(node, fallback),
        None => fallback.to_string(),
    }
}

fn display(node: &TypeNode, fallback: &str) -> String {
    match node {
        TypeNode::Keyword(kw) => match kw.as_str() {
            "string" | "number" | "boolean" | "void" | "any" | "unknown" | "never" | "null"
            | "undefined" | "symbol" | "bigint" => kw.clone(),
            "object" => "Object".to_string(),
            _ => fallback.to_string(),
        },
        TypeNode::Array(element) => format!("Array<{}>", display(element, UNKNOWN_TYPE)),
        TypeNode::Reference { name, args } if args.is_empty() => name.clone(),
        TypeNode::Reference { name, args } => {
            let args: Vec<String> = args.iter().map(|a| display(a, UNKNOWN_TYPE)).collect();
            format!("{name}<{}>", args.join(", "))
        }
        TypeNode::Union(members) => join_members(members, " | "),
        TypeNode::Intersection(members) => join_members(members, " & "),
        TypeNode::Literal(lit) => lit.name().to_string(),
        TypeNode::ObjectShape => "Object".to_string(),
        TypeNode::Tuple(_) => "Array".to_string(),
        TypeNode::Function => "Function".to_string(),
        TypeNode::Parenthesized(inner) => display(inner, fallback),
        TypeNode::Unknown(_) => fallback.to_string(),
    }
}

fn join_members(members: &[TypeNode], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(members.len());
    for member in members {
        let name = display(member, UNKNOWN_TYPE);
        // `'a' | 'b'` collapses to a single `string`
        if !parts.contains(&name) {
            parts.push(name);
        }
    }
    parts.join(sep)
}

/// Runtime type of a literal expression, used for default-value refinement.
///
/// Only the literal kinds that carry a useful type are recognized:
/// `null`, `undefined` and identifiers yield `None`.
pub fn literal_type(expr: &Expr) -> Option<&'static str> {
    match expr.kind {
        ExprKind::Number => Some("number"),
        ExprKind::String => Some("string"),
        ExprKind::Boolean => Some("boolean"),
        ExprKind::Array(_) => Some("Array"),
        ExprKind::Object(_) => Some("Object"),
        _ => None,
    }
}

/// Classification of a returned expression.
pub(crate) fn value_type(expr: &Expr) -> &'static str {
    match expr.kind {
        ExprKind::Null => "null",
        ExprKind::Undefined => "undefined",
        ExprKind::Regex => "RegExp",
        ExprKind::Function => "Function",
        _ => literal_type(expr).unwrap_or(UNKNOWN_TYPE),
    }
}
