//! Insertion of generated comments into source text.

use ad_core::Language;
use ad_doc::render::FunctionDoc;
use ad_doc::{document_function, DocOptions, FALLBACK_COMMENT};
use ad_parser::{parse_source, ParseOutput};

use crate::error::WriterError;

/// Prepended to files above the configured size thresholds.
pub const LARGE_FILE_WARNING: &str =
    "// autodoc: large file, generated documentation may be incomplete. Review manually.";

/// Options for annotating one source.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// Rendering options; `typed` is set per source from its language.
    pub doc: DocOptions,
    pub large_file_lines: usize,
    pub large_file_bytes: usize,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            doc: DocOptions::default(),
            large_file_lines: 5000,
            large_file_bytes: 256 * 1024,
        }
    }
}

/// Result of annotating one source.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub output: String,
    /// Functions that received a generated comment.
    pub documented: usize,
    /// Functions skipped because a comment was already present.
    pub already_documented: usize,
    /// Functions that received the fallback comment.
    pub fallbacks: usize,
}

impl Annotation {
    pub fn changed(&self, source: &str) -> bool {
        self.output != source
    }
}

/// Parse `source` and insert a comment above every undocumented function.
pub fn annotate_source(
    source: &str,
    language: Language,
    options: &AnnotateOptions,
) -> Result<Annotation, WriterError> {
    let parsed = parse_source(source, language)?;
    Ok(annotate_parsed(source, &parsed, options))
}

/// Structured documentation model of every function in `source`,
/// documented or not.
pub fn describe_source(
    source: &str,
    language: Language,
    options: &DocOptions,
) -> Result<Vec<FunctionDoc>, WriterError> {
    let parsed = parse_source(source, language)?;
    Ok(describe_parsed(&parsed, options))
}

pub(crate) fn describe_parsed(parsed: &ParseOutput, options: &DocOptions) -> Vec<FunctionDoc> {
    let options = DocOptions {
        typed: parsed.language.is_typed(),
        ..options.clone()
    };
    parsed
        .sites
        .iter()
        .map(|site| FunctionDoc::describe(&site.function, &options))
        .collect()
}

pub(crate) fn annotate_parsed(source: &str, parsed: &ParseOutput, options: &AnnotateOptions) -> Annotation {
    let doc = DocOptions {
        typed: parsed.language.is_typed(),
        ..options.doc.clone()
    };

    let mut documented = 0usize;
    let mut already_documented = 0usize;
    let mut fallbacks = 0usize;
    let mut insertions: Vec<(usize, usize, String)> = Vec::new();

    for site in &parsed.sites {
        if site.documented {
            already_documented += 1;
            continue;
        }
        let comment = if site.function.has_error {
            tracing::debug!(line = site.anchor_line, "syntax error in function, using fallback");
            None
        } else {
            Some(document_function(&site.function, &doc)).filter(|c| !c.is_empty())
        };
        let comment = match comment {
            Some(comment) => {
                documented += 1;
                comment
            }
            None => {
                fallbacks += 1;
                FALLBACK_COMMENT.to_string()
            }
        };

        insertions.push(placement(source, site.anchor_byte, &comment, &site.indent));
    }

    let mut output = source.to_string();
    insertions.sort_by(|a, b| b.0.cmp(&a.0));
    for (start, end, text) in insertions {
        output.replace_range(start..end, &text);
    }

    if is_large(source, options) && !has_large_file_warning(source) {
        output = with_large_file_warning(&output);
    }

    Annotation {
        output,
        documented,
        already_documented,
        fallbacks,
    }
}

/// Byte range to replace and its replacement for a comment anchored at
/// `anchor`. Code ahead of the anchor on its line, such as the tail of a
/// multi-line template literal, stays put and the function moves to a new line.
fn placement(source: &str, anchor: usize, comment: &str, indent: &str) -> (usize, usize, String) {
    let line_start = source[..anchor].rfind('\n').map_or(0, |i| i + 1);
    let before = &source[line_start..anchor];
    if before.trim().is_empty() {
        return (line_start, line_start, indent_block(comment, indent));
    }
    let code_end = line_start + before.trim_end().len();
    let mut text = String::from("\n");
    text.push_str(&indent_block(comment, indent));
    text.push_str(indent);
    (code_end, anchor, text)
}

fn indent_block(comment: &str, indent: &str) -> String {
    let mut text = String::with_capacity(comment.len() + indent.len() * 8);
    for line in comment.lines() {
        text.push_str(indent);
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn is_large(source: &str, options: &AnnotateOptions) -> bool {
    source.len() > options.large_file_bytes || source.lines().count() > options.large_file_lines
}

fn has_large_file_warning(source: &str) -> bool {
    source.lines().take(2).any(|line| line == LARGE_FILE_WARNING)
}

/// Prepend the warning, keeping a `#!` line first.
fn with_large_file_warning(source: &str) -> String {
    let split = if source.starts_with("#!") {
        source.find('\n').map_or(source.len(), |i| i + 1)
    } else {
        0
    };
    let (head, rest) = source.split_at(split);
    let mut out = String::with_capacity(source.len() + LARGE_FILE_WARNING.len() + 2);
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(LARGE_FILE_WARNING);
    out.push('\n');
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate_js(source: &str) -> Annotation {
        annotate_source(source, Language::JavaScript, &AnnotateOptions::default()).unwrap()
    }

    #[test]
    fn inserts_above_declaration() {
        let source = "function add(a, b) {\n  return a + b;\n}\n";
        let out = annotate_js(source);
        assert_eq!(out.documented, 1);
        assert!(out.output.starts_with("/**\n * Function add with parameters 'a', 'b'\n"));
        assert!(out.output.ends_with(" */\nfunction add(a, b) {\n  return a + b;\n}\n"));
    }

    #[test]
    fn comment_follows_member_indentation() {
        let source = "class A {\n    run(x) {\n        return 1;\n    }\n}\n";
        let out = annotate_js(source);
        assert!(out.output.contains("class A {\n    /**\n     * Function run with parameter 'x'\n"), "{}", out.output);
        assert!(out.output.contains("     */\n    run(x) {"), "{}", out.output);
    }

    #[test]
    fn documented_functions_are_left_alone() {
        let source = "// existing\nfunction a() {}\n";
        let out = annotate_js(source);
        assert_eq!(out.already_documented, 1);
        assert_eq!(out.documented, 0);
        assert!(!out.changed(source));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let source = "export const f = ({ a = 1 }) => a;\n\nclass B {\n  get v() { return 1; }\n}\n";
        let first = annotate_js(source);
        assert!(first.changed(source));
        let second = annotate_js(&first.output);
        assert_eq!(second.output, first.output);
        assert_eq!(second.documented, 0);
    }

    #[test]
    fn several_functions_keep_order() {
        let source = "function a() {}\nfunction b() {}\n";
        let out = annotate_js(source);
        assert_eq!(out.documented, 2);
        let a = out.output.find("Function a").unwrap();
        let b = out.output.find("Function b").unwrap();
        assert!(a < b);
        assert!(out.output.contains(" */\nfunction a() {}\n/**\n"));
    }

    #[test]
    fn large_files_get_a_warning_once() {
        let options = AnnotateOptions {
            large_file_lines: 2,
            ..AnnotateOptions::default()
        };
        let source = "const x = 1;\nconst y = 2;\nconst z = 3;\n";
        let out = annotate_source(source, Language::JavaScript, &options).unwrap();
        assert!(out.output.starts_with(LARGE_FILE_WARNING));
        let again = annotate_source(&out.output, Language::JavaScript, &options).unwrap();
        assert_eq!(again.output, out.output);
    }

    #[test]
    fn warning_goes_after_shebang() {
        let out = with_large_file_warning("#!/usr/bin/env node\nmain();\n");
        assert_eq!(
            out,
            format!("#!/usr/bin/env node\n{LARGE_FILE_WARNING}\nmain();\n")
        );
        assert!(has_large_file_warning(&out));
    }

    #[test]
    fn typescript_sources_are_typed() {
        let source = "function id(x: string): string { return x; }\n";
        let out = annotate_source(source, Language::TypeScript, &AnnotateOptions::default()).unwrap();
        assert!(out.output.contains("@param {string} x\n"), "{}", out.output);
        assert!(out.output.contains("@returns {string}\n"), "{}", out.output);
    }

    #[test]
    fn describe_lists_every_function() {
        let source = "// documented\nfunction a(x) {}\nfunction b({ y }) {}\n";
        let docs = describe_source(source, Language::JavaScript, &DocOptions::default()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].params[0].name, "param1");
    }

    #[test]
    fn function_after_template_literal_on_same_line() {
        let source = "const t = `first\nlast`; function f(a) {}\n";
        let out = annotate_js(source);
        assert_eq!(out.documented, 1);
        assert!(out.output.starts_with("const t = `first\nlast`;\n/**\n"), "{}", out.output);
        assert!(out.output.ends_with(" */\nfunction f(a) {}\n"), "{}", out.output);
        let again = annotate_js(&out.output);
        assert_eq!(again.output, out.output);
        assert_eq!(again.already_documented, 1);
    }

    #[test]
    fn function_after_statement_on_same_line() {
        let source = "  foo(); function bar() {}\n";
        let out = annotate_js(source);
        assert_eq!(out.documented, 1);
        assert!(out.output.starts_with("  foo();\n  /**\n   * Function bar"), "{}", out.output);
        assert!(out.output.ends_with("   */\n  function bar() {}\n"), "{}", out.output);
        assert_eq!(annotate_js(&out.output).output, out.output);
    }

    #[test]
    fn two_functions_on_one_line_both_get_comments() {
        let source = "const a = () => 1; const b = () => 2;\n";
        let out = annotate_js(source);
        assert_eq!(out.documented, 2);
        assert!(out.output.contains("const a = () => 1;\n/**\n"), "{}", out.output);
        assert!(out.output.ends_with(" */\nconst b = () => 2;\n"), "{}", out.output);
        let again = annotate_js(&out.output);
        assert_eq!(again.output, out.output);
        assert_eq!(again.already_documented, 2);
    }
}
