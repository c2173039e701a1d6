use std::collections::HashSet;
use std::path::Path;

use ad_core::{FunctionKind, FunctionNode, Language};
use tree_sitter::Node;

use crate::comment::has_leading_doc_comment;
use crate::decode::decode_source;
use crate::error::ParserError;
use crate::lower::{is_function_kind, lower_function, method_kind, property_key};
use crate::registry::ParserRegistry;

/// A documentable function and where its comment belongs.
#[derive(Debug, Clone)]
pub struct FunctionSite {
    pub function: FunctionNode,
    /// Byte offset of the outermost statement wrapping the function.
    pub anchor_byte: usize,
    /// 1-indexed line of `anchor_byte`.
    pub anchor_line: usize,
    /// Leading whitespace of the anchor line.
    pub indent: String,
    /// A comment already sits directly above the anchor.
    pub documented: bool,
}

/// Output of parsing a single file.
#[derive(Debug)]
pub struct ParseOutput {
    pub language: Language,
    /// Function sites in source order.
    pub sites: Vec<FunctionSite>,
    /// The tree contains at least one syntax error.
    pub has_errors: bool,
}

/// Parse a single source file, returning its documentable functions.
///
/// # Arguments
/// * `file_path` - Path used for language detection and error messages.
/// * `content` - Raw UTF-8 source bytes.
/// * `file_size` - Size reported by the filesystem; the buffer length is checked too.
pub fn parse_file(file_path: &str, content: &[u8], file_size: u64) -> Result<ParseOutput, ParserError> {
    let source = decode_source(file_path, content, file_size)?;

    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let language = ParserRegistry::language_for_extension(ext).ok_or_else(|| {
        ParserError::UnsupportedLanguage {
            path: file_path.to_string(),
        }
    })?;

    parse_with(file_path, source, language, ext)
}

/// Parse source text whose language is already known (e.g. read from stdin).
pub fn parse_source(source: &str, language: Language) -> Result<ParseOutput, ParserError> {
    let ext = match language {
        Language::TypeScript => "ts",
        Language::JavaScript => "js",
    };
    parse_with("<input>", source, language, ext)
}

fn parse_with(
    file_path: &str,
    source: &str,
    language: Language,
    ext: &str,
) -> Result<ParseOutput, ParserError> {
    let grammar = ParserRegistry::grammar_for_extension(language, ext);
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&grammar).map_err(|e| ParserError::ParseFailed {
        path: file_path.to_string(),
        reason: format!("failed to set language: {e}"),
    })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParserError::ParseFailed {
        path: file_path.to_string(),
        reason: "tree-sitter returned no tree".to_string(),
    })?;

    let ctx = VisitorContext {
        file_path,
        source,
        language,
    };

    let root = tree.root_node();
    let mut sites = Vec::new();
    let mut seen = HashSet::new();
    visit(&ctx, root, &mut sites, &mut seen);

    tracing::debug!(
        path = ctx.file_path,
        language = ctx.language.name(),
        functions = sites.len(),
        "source parsed"
    );

    Ok(ParseOutput {
        language,
        sites,
        has_errors: root.has_error(),
    })
}

/// Shared context passed to the tree walk and lowering.
pub(crate) struct VisitorContext<'a> {
    pub file_path: &'a str,
    pub source: &'a str,
    pub language: Language,
}

impl<'a> VisitorContext<'a> {
    /// Extract the text of a tree-sitter node from source.
    pub fn node_text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Whitespace before `byte` on its line.
    fn indent_at(&self, byte: usize) -> String {
        let line_start = self.source[..byte].rfind('\n').map_or(0, |i| i + 1);
        self.source[line_start..byte]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }
}

fn visit(
    ctx: &VisitorContext<'_>,
    node: Node<'_>,
    sites: &mut Vec<FunctionSite>,
    seen: &mut HashSet<usize>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_function_kind(child.kind()) {
            if let Some((kind, name, anchor)) = classify(ctx, child) {
                push_site(ctx, child, kind, name, anchor, sites, seen);
            }
        }
        visit(ctx, child, sites, seen);
    }
}

/// Decide whether a function node is documentable, and with which name and anchor.
///
/// Callbacks and IIFEs have no statement of their own to attach a comment
/// to and are skipped.
fn classify<'t>(
    ctx: &VisitorContext<'_>,
    node: Node<'t>,
) -> Option<(FunctionKind, Option<String>, Node<'t>)> {
    let field_name = |n: Node<'t>| {
        n.child_by_field_name("name")
            .map(|name| ctx.node_text(name).to_string())
    };

    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            Some((FunctionKind::Declaration, field_name(node), export_wrapper(node)))
        }
        "method_definition" => {
            let name = node
                .child_by_field_name("name")
                .and_then(|n| member_name(ctx, n));
            let kind = method_kind(node, name.as_deref());
            Some((kind, name, decorated_start(node)))
        }
        _ => {
            let kind = if node.kind() == "arrow_function" {
                FunctionKind::Arrow
            } else {
                FunctionKind::Expression
            };
            let parent = node.parent()?;
            match parent.kind() {
                "variable_declarator" => {
                    let name = parent
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier")
                        .map(|n| ctx.node_text(n).to_string());
                    let declaration = parent.parent()?;
                    Some((kind, name, export_wrapper(declaration)))
                }
                "assignment_expression" => {
                    let statement = parent.parent().filter(|p| p.kind() == "expression_statement")?;
                    let name = parent.child_by_field_name("left").and_then(|left| match left.kind() {
                        "member_expression" => left
                            .child_by_field_name("property")
                            .map(|p| ctx.node_text(p).to_string()),
                        "identifier" => Some(ctx.node_text(left).to_string()),
                        _ => None,
                    });
                    Some((kind, name, statement))
                }
                "pair" => {
                    let name = parent.child_by_field_name("key").and_then(|k| member_name(ctx, k));
                    Some((kind, name, parent))
                }
                "public_field_definition" => {
                    let name = parent
                        .child_by_field_name("name")
                        .and_then(|n| member_name(ctx, n));
                    Some((kind, name, decorated_start(parent)))
                }
                "export_statement" => Some((kind, field_name(node), parent)),
                _ => None,
            }
        }
    }
}

/// Name of a method, field or object key usable as a function name.
/// Computed, numeric and non-identifier string keys yield `None`.
fn member_name(ctx: &VisitorContext<'_>, key: Node<'_>) -> Option<String> {
    match key.kind() {
        "property_identifier" | "private_property_identifier" | "identifier" => {
            Some(ctx.node_text(key).to_string())
        }
        "string" => Some(property_key(ctx, key)).filter(|name| is_identifier(name)),
        _ => None,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn push_site(
    ctx: &VisitorContext<'_>,
    node: Node<'_>,
    kind: FunctionKind,
    name: Option<String>,
    anchor: Node<'_>,
    sites: &mut Vec<FunctionSite>,
    seen: &mut HashSet<usize>,
) {
    let anchor_byte = anchor.start_byte();
    // `const a = () => 1, b = () => 2;` shares one anchor
    if !seen.insert(anchor_byte) {
        return;
    }
    let anchor_line = anchor.start_position().row + 1;
    sites.push(FunctionSite {
        function: lower_function(ctx, node, kind, name),
        anchor_byte,
        anchor_line,
        indent: ctx.indent_at(anchor_byte),
        documented: has_leading_doc_comment(anchor_line, ctx.source),
    });
}

fn export_wrapper(node: Node<'_>) -> Node<'_> {
    match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => node,
    }
}

/// Decorators precede class members as siblings; the comment goes above them.
fn decorated_start(node: Node<'_>) -> Node<'_> {
    let mut start = node;
    while let Some(prev) = start.prev_sibling() {
        if prev.kind() != "decorator" {
            break;
        }
        start = prev;
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_is_taken_from_anchor_line() {
        let source = "class A {\n    run() {}\n}\n";
        let out = parse_source(source, Language::JavaScript).unwrap();
        assert_eq!(out.sites.len(), 1);
        assert_eq!(out.sites[0].indent, "    ");
        assert_eq!(out.sites[0].anchor_line, 2);
    }

    #[test]
    fn shared_declaration_anchor_is_deduplicated() {
        let source = "const a = () => 1, b = () => 2;\n";
        let out = parse_source(source, Language::JavaScript).unwrap();
        assert_eq!(out.sites.len(), 1);
        assert_eq!(out.sites[0].function.name.as_deref(), Some("a"));
    }

    #[test]
    fn callbacks_are_skipped() {
        let source = "items.map((x) => x * 2);\n";
        let out = parse_source(source, Language::JavaScript).unwrap();
        assert!(out.sites.is_empty());
    }

    #[test]
    fn computed_and_non_identifier_keys_are_anonymous() {
        let source = "class Bag {\n  [Symbol.iterator]() {}\n  get [key]() { return 1; }\n  'my-method'() {}\n  'plain'() {}\n  #hidden() {}\n}\n";
        let out = parse_source(source, Language::JavaScript).unwrap();
        let names: Vec<_> = out.sites.iter().map(|s| s.function.name.as_deref()).collect();
        assert_eq!(names, [None, None, None, Some("plain"), Some("#hidden")]);
        assert_eq!(out.sites[1].function.kind, FunctionKind::Getter);
    }

    #[test]
    fn computed_object_key_is_anonymous() {
        let source = "const handlers = {\n  [EVENT]: function () {},\n  42: () => 0,\n  ok: () => 1,\n};\n";
        let out = parse_source(source, Language::JavaScript).unwrap();
        let names: Vec<_> = out.sites.iter().map(|s| s.function.name.as_deref()).collect();
        assert_eq!(names, [None, None, Some("ok")]);
    }
}
