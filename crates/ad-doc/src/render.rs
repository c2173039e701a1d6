use std::panic::{self, AssertUnwindSafe};

use ad_core::{Destructure, FunctionNode, Parameter};
use serde::Serialize;

use crate::extract::extract_params;
use crate::infer::UNKNOWN_TYPE;
use crate::options::DocOptions;
use crate::returns::infer_return;

/// Inserted by callers when a function could not be parsed or rendered.
pub const FALLBACK_COMMENT: &str = "/** Parsing failed for this function. Please check manually. */";

/// Summary used when the parameter names cannot be quoted meaningfully.
pub const PLACEHOLDER_SUMMARY: &str =
    "Auto-generated documentation. Please describe this function manually.";

const UNINFERRED_NOTE: &str = "(Type could not be inferred)";
const TODO_LINE: &str = "TODO: Add a description.";
const ANONYMOUS_CALLEE: &str = "anonymousFunction";

/// Structured documentation model of one function.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDoc {
    pub name: Option<String>,
    pub params: Vec<Parameter>,
    pub returns: Option<String>,
}

impl FunctionDoc {
    pub fn describe(func: &FunctionNode, options: &DocOptions) -> Self {
        Self {
            name: func.name.clone(),
            params: extract_params(&func.params, options.typed),
            returns: infer_return(func, options.typed),
        }
    }

    pub fn render(&self, options: &DocOptions) -> String {
        render(&self.params, self.name.as_deref(), self.returns.as_deref(), options)
    }
}

/// Extract, infer and render the JSDoc block for one function.
///
/// Never panics: an unexpected failure is logged and yields an empty
/// string, which callers replace with [`FALLBACK_COMMENT`].
pub fn document_function(func: &FunctionNode, options: &DocOptions) -> String {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        FunctionDoc::describe(func, options).render(options)
    }));
    match result {
        Ok(doc) => doc,
        Err(_) => {
            tracing::error!(function = ?func.name, "documentation render failed");
            String::new()
        }
    }
}

/// Render a parameter list into a `/** ... */` block.
pub fn render(
    params: &[Parameter],
    name: Option<&str>,
    return_type: Option<&str>,
    options: &DocOptions,
) -> String {
    let name = name.filter(|n| !n.is_empty());
    let mut body = vec![summary(params, name, options)];

    if options.include_todo_placeholder {
        body.push(TODO_LINE.to_string());
    }

    if options.include_example {
        body.push(String::new());
        body.push("@example".to_string());
        body.push(example_call(params, name));
    }

    let param_lines = format_param_lines(&flatten(params), options);
    if !param_lines.is_empty() {
        body.push(String::new());
        body.extend(param_lines);
    }

    if let Some(ty) = return_type {
        body.push(String::new());
        body.push(return_line(ty));
    }

    wrap(&body)
}

fn wrap(body: &[String]) -> String {
    let mut out = String::from("/**\n");
    for line in body {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(" * ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(" */");
    out
}

fn summary(params: &[Parameter], name: Option<&str>, options: &DocOptions) -> String {
    if !params.iter().all(|p| !p.synthetic && is_plain_identifier(&p.name)) {
        return PLACEHOLDER_SUMMARY.to_string();
    }

    let quoted: Vec<String> = params.iter().map(|p| format!("'{}'", display_name(p))).collect();

    if let Some(template) = &options.summary_template {
        return template
            .replace("{name}", name.unwrap_or(""))
            .replace("{params}", &quoted.join(", "))
            .replace("{count}", &params.len().to_string());
    }

    let head = match name {
        Some(name) => format!("Function {name}"),
        None => "Function".to_string(),
    };
    match quoted.as_slice() {
        [] => head,
        [only] => format!("{head} with parameter {only}"),
        many => format!("{head} with parameters {}", many.join(", ")),
    }
}

fn example_call(params: &[Parameter], name: Option<&str>) -> String {
    let args = vec!["null"; params.len()].join(", ");
    format!("{}({args})", name.unwrap_or(ANONYMOUS_CALLEE))
}

fn return_line(ty: &str) -> String {
    if ty == UNKNOWN_TYPE {
        format!("@returns {{{ty}}} {UNINFERRED_NOTE}")
    } else {
        format!("@returns {{{ty}}}")
    }
}

fn display_name(param: &Parameter) -> String {
    if param.is_rest {
        format!("...{}", param.name)
    } else {
        param.name.clone()
    }
}

fn is_plain_identifier(name: &str) -> bool {
    if name == "undefined" {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// One rendered `@param` row before column alignment.
#[derive(Debug)]
struct ParamLine {
    type_label: String,
    name_label: String,
    description: String,
}

fn flatten(params: &[Parameter]) -> Vec<ParamLine> {
    let mut out = Vec::new();
    for param in params {
        collect(param, None, false, &mut out);
    }
    out
}

/// Depth-first walk emitting one row per named parameter.
///
/// Synthetic containers (`param1`, `item2`) emit no row and add no path
/// segment; their children are labelled relative to the nearest named
/// ancestor.
fn collect(param: &Parameter, prefix: Option<&str>, nested: bool, out: &mut Vec<ParamLine>) {
    let path = match (param.synthetic, prefix) {
        (true, prefix) => prefix.map(str::to_string),
        (false, Some(prefix)) => Some(format!("{prefix}.{}", param.name)),
        (false, None) => Some(param.name.clone()),
    };

    if !param.synthetic {
        out.push(param_line(param, path.as_deref().unwrap_or(&param.name), nested));
    }

    match &param.children {
        Some(Destructure::Properties(props)) => {
            for prop in props {
                collect(prop, path.as_deref(), true, out);
            }
        }
        Some(Destructure::Elements(elems)) => {
            for elem in elems.iter().flatten() {
                collect(elem, path.as_deref(), true, out);
            }
        }
        None => {}
    }
}

fn param_line(param: &Parameter, path: &str, nested: bool) -> ParamLine {
    let mut notes = Vec::new();
    let default = param.default_value.as_deref().filter(|v| !v.is_empty());

    let name_label = if param.is_rest {
        notes.push("- Rest parameter".to_string());
        format!("...{path}")
    } else if param.has_default && !nested {
        match default {
            Some(value) => format!("[{path}={value}]"),
            None => format!("[{path}]"),
        }
    } else if param.has_default {
        if let Some(value) = default {
            notes.push(format!("- Default value: `{value}`"));
        }
        path.to_string()
    } else if param.optional {
        format!("[{path}]")
    } else {
        path.to_string()
    };

    if param.is_param_property {
        notes.push("- Also declared as a class property".to_string());
    }
    if param.is_untyped() {
        notes.push(UNINFERRED_NOTE.to_string());
    }

    ParamLine {
        type_label: format!("{{{}}}", param.type_name),
        name_label,
        description: notes.join(" "),
    }
}

/// Pad types and names to shared column widths and apply the line template.
fn format_param_lines(lines: &[ParamLine], options: &DocOptions) -> Vec<String> {
    let type_width = lines.iter().map(|l| l.type_label.chars().count()).max().unwrap_or(0);
    let name_width = lines.iter().map(|l| l.name_label.chars().count()).max().unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let ty = format!("{:<type_width$}", line.type_label);
            let name = format!("{:<name_width$}", line.name_label);
            let rendered = match &options.param_template {
                Some(template) => template
                    .replace("{type}", &ty)
                    .replace("{name}", &name)
                    .replace("{description}", &line.description),
                None => format!("@param {ty} {name} {}", line.description),
            };
            rendered.trim_end().to_string()
        })
        .collect()
}
