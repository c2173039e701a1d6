//! Lowering of tree-sitter nodes into the `ad_core` syntax model.

use ad_core::{
    Expr, ExprKind, FunctionBody, FunctionKind, FunctionNode, LiteralType, ObjectEntry, Pattern,
    PropertyPattern, TypeNode,
};
use tree_sitter::Node;

use crate::visitor::VisitorContext;

/// Node kinds that open a new function scope; returns inside them belong elsewhere.
const SCOPE_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class_declaration",
    "class",
];

pub(crate) fn is_function_kind(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
    )
}

pub(crate) fn lower_function(
    ctx: &VisitorContext<'_>,
    node: Node<'_>,
    kind: FunctionKind,
    name: Option<String>,
) -> FunctionNode {
    let params = match node.child_by_field_name("parameters") {
        Some(list) => named_children(list)
            .filter_map(|param| lower_parameter(ctx, param))
            .collect(),
        // `x => x * 2`
        None => node
            .child_by_field_name("parameter")
            .map(|p| vec![lower_pattern(ctx, p)])
            .unwrap_or_default(),
    };

    let body = match node.child_by_field_name("body") {
        Some(body) if body.kind() == "statement_block" => {
            let mut returns = Vec::new();
            collect_returns(ctx, body, &mut returns);
            FunctionBody::Block { returns }
        }
        Some(expr) => FunctionBody::Expression(lower_expr(ctx, expr)),
        None => FunctionBody::Missing,
    };

    let return_type = node
        .child_by_field_name("return_type")
        .and_then(|ann| lower_type_annotation(ctx, ann));

    FunctionNode {
        kind,
        name,
        params,
        body,
        is_async: has_token(node, "async"),
        is_generator: node.kind().contains("generator") || has_token(node, "*"),
        return_type,
        has_error: node.has_error(),
    }
}

fn lower_parameter(ctx: &VisitorContext<'_>, node: Node<'_>) -> Option<Pattern> {
    match node.kind() {
        "comment" | "decorator" => None,
        "required_parameter" | "optional_parameter" => {
            let pattern = node.child_by_field_name("pattern")?;
            let annotation = node
                .child_by_field_name("type")
                .and_then(|ann| lower_type_annotation(ctx, ann));
            let optional = node.kind() == "optional_parameter";

            let mut lowered = with_annotation(lower_pattern(ctx, pattern), annotation, optional);
            if let Some(value) = node.child_by_field_name("value") {
                lowered = Pattern::Assignment {
                    target: Box::new(lowered),
                    default: lower_expr(ctx, value),
                };
            }

            let mut cursor = node.walk();
            let modifier = node
                .children(&mut cursor)
                .find(|c| matches!(c.kind(), "accessibility_modifier" | "readonly" | "override_modifier"))
                .map(|c| ctx.node_text(c).to_string());
            match modifier {
                Some(modifier) => Some(Pattern::ParameterProperty {
                    modifier,
                    inner: Box::new(lowered),
                }),
                None => Some(lowered),
            }
        }
        _ => Some(lower_pattern(ctx, node)),
    }
}

fn with_annotation(pattern: Pattern, annotation: Option<TypeNode>, optional: bool) -> Pattern {
    match pattern {
        Pattern::Identifier { name, .. } => Pattern::Identifier {
            name,
            annotation,
            optional,
        },
        Pattern::Object { properties, .. } => Pattern::Object {
            properties,
            annotation,
        },
        Pattern::Array { elements, .. } => Pattern::Array {
            elements,
            annotation,
        },
        Pattern::Rest { argument, .. } => Pattern::Rest {
            argument,
            annotation,
        },
        other => other,
    }
}

pub(crate) fn lower_pattern(ctx: &VisitorContext<'_>, node: Node<'_>) -> Pattern {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => Pattern::Identifier {
            name: ctx.node_text(node).to_string(),
            annotation: None,
            optional: false,
        },
        "object_pattern" => Pattern::Object {
            properties: named_children(node)
                .filter(|c| c.kind() != "comment")
                .map(|c| lower_property(ctx, c))
                .collect(),
            annotation: None,
        },
        "array_pattern" => Pattern::Array {
            elements: positional(node, |child| lower_pattern(ctx, child)),
            annotation: None,
        },
        "assignment_pattern" => {
            match (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                (Some(left), Some(right)) => Pattern::Assignment {
                    target: Box::new(lower_pattern(ctx, left)),
                    default: lower_expr(ctx, right),
                },
                _ => unknown_pattern(ctx, node),
            }
        }
        "rest_pattern" => match named_children(node).next() {
            Some(argument) => Pattern::Rest {
                argument: Box::new(lower_pattern(ctx, argument)),
                annotation: None,
            },
            None => unknown_pattern(ctx, node),
        },
        _ => unknown_pattern(ctx, node),
    }
}

fn unknown_pattern(ctx: &VisitorContext<'_>, node: Node<'_>) -> Pattern {
    Pattern::Unknown {
        text: ctx.node_text(node).to_string(),
    }
}

/// Positional children of an array pattern or literal; elisions become `None`.
fn positional<T>(node: Node<'_>, mut lower: impl FnMut(Node<'_>) -> T) -> Vec<Option<T>> {
    let mut elements = Vec::new();
    let mut pending = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "," => elements.push(pending.take()),
            "]" => {
                if let Some(last) = pending.take() {
                    elements.push(Some(last));
                }
            }
            "[" | "comment" => {}
            _ if child.is_named() => pending = Some(lower(child)),
            _ => {}
        }
    }
    elements
}

fn lower_property(ctx: &VisitorContext<'_>, node: Node<'_>) -> PropertyPattern {
    match node.kind() {
        "shorthand_property_identifier_pattern" => PropertyPattern::Shorthand {
            name: ctx.node_text(node).to_string(),
            default: None,
        },
        "object_assignment_pattern" => {
            let left = node.child_by_field_name("left");
            let right = node.child_by_field_name("right");
            match (left, right) {
                (Some(left), Some(right)) if left.kind() == "shorthand_property_identifier_pattern" => {
                    PropertyPattern::Shorthand {
                        name: ctx.node_text(left).to_string(),
                        default: Some(lower_expr(ctx, right)),
                    }
                }
                _ => unknown_property(ctx, node),
            }
        }
        "pair_pattern" => {
            match (node.child_by_field_name("key"), node.child_by_field_name("value")) {
                (Some(key), Some(value)) => PropertyPattern::Pair {
                    key: property_key(ctx, key),
                    value: lower_pattern(ctx, value),
                },
                _ => unknown_property(ctx, node),
            }
        }
        "rest_pattern" => match named_children(node).next() {
            Some(arg) if arg.kind() == "identifier" => PropertyPattern::Rest {
                name: ctx.node_text(arg).to_string(),
            },
            _ => unknown_property(ctx, node),
        },
        _ => unknown_property(ctx, node),
    }
}

fn unknown_property(ctx: &VisitorContext<'_>, node: Node<'_>) -> PropertyPattern {
    PropertyPattern::Unknown {
        text: ctx.node_text(node).to_string(),
    }
}

/// Static text of an object key, without quotes.
pub(crate) fn property_key(ctx: &VisitorContext<'_>, node: Node<'_>) -> String {
    let text = ctx.node_text(node);
    match node.kind() {
        "string" => text.trim_matches(|c| c == '\'' || c == '"').to_string(),
        _ => text.to_string(),
    }
}

fn lower_type_annotation(ctx: &VisitorContext<'_>, node: Node<'_>) -> Option<TypeNode> {
    if node.kind() == "type_annotation" {
        named_children(node).next().map(|ty| lower_type(ctx, ty))
    } else {
        // asserts / type predicate annotations
        Some(TypeNode::Unknown(ctx.node_text(node).to_string()))
    }
}

fn lower_type(ctx: &VisitorContext<'_>, node: Node<'_>) -> TypeNode {
    match node.kind() {
        "predefined_type" => TypeNode::Keyword(ctx.node_text(node).to_string()),
        "type_identifier" | "nested_type_identifier" | "identifier" => TypeNode::Reference {
            name: compact(ctx.node_text(node)),
            args: Vec::new(),
        },
        "generic_type" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| compact(ctx.node_text(n)))
                .unwrap_or_default();
            let args = node
                .child_by_field_name("type_arguments")
                .map(|list| {
                    named_children(list)
                        .filter(|c| c.kind() != "comment")
                        .map(|c| lower_type(ctx, c))
                        .collect()
                })
                .unwrap_or_default();
            if name.is_empty() {
                TypeNode::Unknown(ctx.node_text(node).to_string())
            } else {
                TypeNode::Reference { name, args }
            }
        }
        "array_type" => match named_children(node).next() {
            Some(element) => TypeNode::Array(Box::new(lower_type(ctx, element))),
            None => TypeNode::Unknown(ctx.node_text(node).to_string()),
        },
        "union_type" => {
            let mut members = Vec::new();
            flatten_members(ctx, node, "union_type", &mut members);
            TypeNode::Union(members)
        }
        "intersection_type" => {
            let mut members = Vec::new();
            flatten_members(ctx, node, "intersection_type", &mut members);
            TypeNode::Intersection(members)
        }
        "literal_type" => match named_children(node).next().map(|c| c.kind()) {
            Some("string" | "template_string") => TypeNode::Literal(LiteralType::String),
            Some("number" | "unary_expression") => TypeNode::Literal(LiteralType::Number),
            Some("true" | "false") => TypeNode::Literal(LiteralType::Boolean),
            Some("null") => TypeNode::Literal(LiteralType::Null),
            Some("undefined") => TypeNode::Literal(LiteralType::Undefined),
            _ => TypeNode::Unknown(ctx.node_text(node).to_string()),
        },
        "object_type" => TypeNode::ObjectShape,
        "tuple_type" => TypeNode::Tuple(named_children(node).map(|c| lower_type(ctx, c)).collect()),
        "function_type" | "constructor_type" => TypeNode::Function,
        "parenthesized_type" => match named_children(node).next() {
            Some(inner) => TypeNode::Parenthesized(Box::new(lower_type(ctx, inner))),
            None => TypeNode::Unknown(ctx.node_text(node).to_string()),
        },
        "readonly_type" => match named_children(node).next() {
            Some(inner) => lower_type(ctx, inner),
            None => TypeNode::Unknown(ctx.node_text(node).to_string()),
        },
        _ => TypeNode::Unknown(ctx.node_text(node).to_string()),
    }
}

/// `A | B | C` nests as `(A | B) | C`; flatten it into one member list.
fn flatten_members(ctx: &VisitorContext<'_>, node: Node<'_>, kind: &str, out: &mut Vec<TypeNode>) {
    for child in named_children(node) {
        if child.kind() == kind {
            flatten_members(ctx, child, kind, out);
        } else if child.kind() != "comment" {
            out.push(lower_type(ctx, child));
        }
    }
}

pub(crate) fn lower_expr(ctx: &VisitorContext<'_>, node: Node<'_>) -> Expr {
    let text = expr_text(ctx, node);
    let kind = match node.kind() {
        "number" => ExprKind::Number,
        "string" | "template_string" => ExprKind::String,
        "true" | "false" => ExprKind::Boolean,
        "null" => ExprKind::Null,
        "undefined" => ExprKind::Undefined,
        "identifier" if text == "undefined" => ExprKind::Undefined,
        "identifier" => ExprKind::Identifier,
        "regex" => ExprKind::Regex,
        "array" => ExprKind::Array(positional(node, |child| lower_expr(ctx, child))),
        "object" => ExprKind::Object(object_entries(ctx, node)),
        "unary_expression" => unary_kind(ctx, node),
        "parenthesized_expression" => match named_children(node).next() {
            Some(inner) => lower_expr(ctx, inner).kind,
            None => ExprKind::Other,
        },
        "arrow_function" | "function_expression" | "function" | "generator_function" => {
            ExprKind::Function
        }
        _ => ExprKind::Other,
    };
    Expr { kind, text }
}

fn unary_kind(ctx: &VisitorContext<'_>, node: Node<'_>) -> ExprKind {
    let operator = node
        .child_by_field_name("operator")
        .map(|op| ctx.node_text(op))
        .unwrap_or("");
    let argument = node.child_by_field_name("argument").map(|arg| arg.kind());
    match (operator, argument) {
        ("-" | "+", Some("number")) => ExprKind::Number,
        ("!", _) => ExprKind::Boolean,
        ("typeof", _) => ExprKind::String,
        ("void", _) => ExprKind::Undefined,
        _ => ExprKind::Other,
    }
}

fn object_entries(ctx: &VisitorContext<'_>, node: Node<'_>) -> Vec<ObjectEntry> {
    let mut entries = Vec::new();
    for child in named_children(node) {
        match child.kind() {
            "pair" => {
                let key = child.child_by_field_name("key");
                let value = child.child_by_field_name("value");
                if let (Some(key), Some(value)) = (key, value) {
                    if key.kind() == "computed_property_name" {
                        continue;
                    }
                    entries.push(ObjectEntry {
                        key: property_key(ctx, key),
                        value: lower_expr(ctx, value),
                    });
                }
            }
            "shorthand_property_identifier" => {
                let name = ctx.node_text(child).to_string();
                entries.push(ObjectEntry {
                    key: name.clone(),
                    value: Expr::new(ExprKind::Identifier, name),
                });
            }
            _ => {}
        }
    }
    entries
}

/// Every `return` in a body, skipping nested function and class scopes.
fn collect_returns(ctx: &VisitorContext<'_>, node: Node<'_>, out: &mut Vec<Option<Expr>>) {
    for child in named_children(node) {
        if child.kind() == "return_statement" {
            let value = named_children(child)
                .find(|c| c.kind() != "comment")
                .map(|value| lower_expr(ctx, value));
            out.push(value);
        } else if !SCOPE_KINDS.contains(&child.kind()) {
            collect_returns(ctx, child, out);
        }
    }
}

/// Method flavor from its `get`/`set` keyword or `constructor` name.
pub(crate) fn method_kind(node: Node<'_>, name: Option<&str>) -> FunctionKind {
    if name == Some("constructor") {
        FunctionKind::Constructor
    } else if has_token(node, "get") {
        FunctionKind::Getter
    } else if has_token(node, "set") {
        FunctionKind::Setter
    } else {
        FunctionKind::Method
    }
}

/// Whether `node` has a direct anonymous child token of the given kind.
fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

fn named_children(node: Node<'_>) -> impl Iterator<Item = Node<'_>> {
    (0..node.named_child_count()).filter_map(move |i| node.named_child(i))
}

/// Source text of an expression on one line. String, template and regex
/// literals keep their exact text.
fn expr_text(ctx: &VisitorContext<'_>, node: Node<'_>) -> String {
    let text = ctx.node_text(node);
    if !text.contains('\n') {
        return text.to_string();
    }
    let mut literals = Vec::new();
    if !literal_spans(node, text, node.start_byte(), &mut literals) {
        // a `//` comment ends at the line break; joining lines would swallow code
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for (start, end) in literals {
        if start < pos || end > text.len() {
            continue;
        }
        out.push_str(&normalize_text(&text[pos..start]));
        out.push_str(&text[start..end]);
        pos = end;
    }
    out.push_str(&normalize_text(&text[pos..]));
    out.trim().to_string()
}

/// Byte spans, relative to the start of `text`, of literals whose text must
/// survive. Returns `false` when the expression contains a line comment.
fn literal_spans(node: Node<'_>, text: &str, base: usize, out: &mut Vec<(usize, usize)>) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let span = (child.start_byte() - base, child.end_byte() - base);
        match child.kind() {
            "string" | "template_string" | "regex" => out.push(span),
            "comment" => {
                if text.get(span.0..span.1).is_some_and(|c| c.starts_with("//")) {
                    return false;
                }
            }
            _ => {
                if !literal_spans(child, text, base, out) {
                    return false;
                }
            }
        }
    }
    true
}

/// Collapse every whitespace run containing a line break into one space.
fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_whitespace(&mut out, &mut run);
        out.push(c);
    }
    flush_whitespace(&mut out, &mut run);
    out
}

fn flush_whitespace(out: &mut String, run: &mut String) {
    if run.contains('\n') {
        out.push(' ');
    } else {
        out.push_str(run);
    }
    run.clear();
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
