use ad_core::{Destructure, Expr, ExprKind, Parameter, Pattern, PropertyPattern, TypeNode};

use crate::infer::{infer_type, literal_type, UNKNOWN_TYPE};

/// Destructuring deeper than this is dropped instead of recursed into.
pub const MAX_PATTERN_DEPTH: usize = 64;

/// Where a pattern sits, which decides the name it gets when it has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming<'a> {
    /// A formal parameter of the function itself.
    TopLevel,
    /// The value side of `{ key: pattern }`.
    Key(&'a str),
    /// Zero-based position inside an array pattern.
    Element(usize),
}

/// Extract the normalized parameter list of one function.
pub fn extract_params(params: &[Pattern], typed: bool) -> Vec<Parameter> {
    let mut extractor = Extractor::new(typed);
    params
        .iter()
        .filter_map(|p| extractor.extract(p, Naming::TopLevel))
        .collect()
}

/// Converts pattern nodes into [`Parameter`] values.
///
/// Holds the `param<N>` counter for a single function's parameter list;
/// create a new one per function.
#[derive(Debug)]
pub struct Extractor {
    typed: bool,
    synthetic_count: usize,
}

impl Extractor {
    pub fn new(typed: bool) -> Self {
        Self {
            typed,
            synthetic_count: 0,
        }
    }

    /// Extract one pattern. Unrecognized shapes yield `None`.
    pub fn extract(&mut self, pattern: &Pattern, naming: Naming<'_>) -> Option<Parameter> {
        self.extract_at(pattern, naming, 0)
    }

    fn extract_at(&mut self, pattern: &Pattern, naming: Naming<'_>, depth: usize) -> Option<Parameter> {
        if depth > MAX_PATTERN_DEPTH {
            tracing::debug!(depth, "destructuring too deep, pattern skipped");
            return None;
        }

        match pattern {
            Pattern::Identifier {
                name,
                annotation,
                optional,
            } => {
                let name = match naming {
                    Naming::Key(key) => key,
                    Naming::TopLevel | Naming::Element(_) => name.as_str(),
                };
                if name.is_empty() {
                    return None;
                }
                let type_name = self
                    .annotated(annotation.as_ref())
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
                let mut param = Parameter::new(name, type_name);
                param.optional = self.typed && *optional;
                Some(param)
            }
            Pattern::Assignment { target, default } => {
                let mut param = self.extract_at(target, naming, depth)?;
                let annotated = self.annotated(target.annotation()).is_some();
                apply_default(&mut param, default, annotated, depth);
                Some(param)
            }
            Pattern::Object {
                properties,
                annotation,
            } => {
                let mut param = self.container(naming, annotation.as_ref(), "Object");
                let props = properties
                    .iter()
                    .filter_map(|prop| self.extract_property(prop, depth + 1))
                    .collect();
                param.children = Some(Destructure::Properties(props));
                Some(param)
            }
            Pattern::Array {
                elements,
                annotation,
            } => {
                let mut param = self.container(naming, annotation.as_ref(), "Array");
                let elems = elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| {
                        element
                            .as_ref()
                            .and_then(|e| self.extract_at(e, Naming::Element(i), depth + 1))
                    })
                    .collect();
                param.children = Some(Destructure::Elements(elems));
                Some(param)
            }
            Pattern::Rest {
                argument,
                annotation,
            } => {
                let inner = self.extract_at(argument, naming, depth)?;
                let type_name = match self.annotated(annotation.as_ref()) {
                    Some(ty) if ty.starts_with("Array") => ty,
                    Some(ty) => format!("Array<{ty}>"),
                    None => format!("Array<{UNKNOWN_TYPE}>"),
                };
                let mut param = Parameter::new(inner.name, type_name);
                param.synthetic = inner.synthetic;
                param.children = inner.children;
                param.is_rest = true;
                Some(param)
            }
            Pattern::ParameterProperty { inner, .. } => {
                let mut param = self.extract_at(inner, naming, depth)?;
                param.is_param_property = true;
                if let Some(ty) = self.annotated(inner.annotation()) {
                    param.type_name = ty;
                }
                Some(param)
            }
            Pattern::Unknown { text } => {
                tracing::debug!(pattern = %text, "unrecognized parameter pattern");
                None
            }
        }
    }

    fn extract_property(&mut self, prop: &PropertyPattern, depth: usize) -> Option<Parameter> {
        match prop {
            PropertyPattern::Shorthand { name, default } => {
                let mut param = Parameter::new(name, UNKNOWN_TYPE);
                if let Some(default) = default {
                    apply_default(&mut param, default, false, depth);
                }
                Some(param)
            }
            PropertyPattern::Pair { key, value } => self.extract_at(value, Naming::Key(key), depth),
            PropertyPattern::Rest { name } => {
                let mut param = Parameter::new(name, "Object");
                param.is_rest = true;
                Some(param)
            }
            PropertyPattern::Unknown { text } => {
                tracing::debug!(property = %text, "unrecognized destructured property");
                None
            }
        }
    }

    /// Name and base type for an object or array pattern.
    fn container(&mut self, naming: Naming<'_>, annotation: Option<&TypeNode>, base: &str) -> Parameter {
        let type_name = self
            .annotated(annotation)
            .unwrap_or_else(|| base.to_string());
        match naming {
            Naming::TopLevel => {
                self.synthetic_count += 1;
                Parameter::synthetic(format!("param{}", self.synthetic_count), type_name)
            }
            Naming::Key(key) => Parameter::new(key, type_name),
            Naming::Element(i) => Parameter::synthetic(format!("item{}", i + 1), type_name),
        }
    }

    fn annotated(&self, annotation: Option<&TypeNode>) -> Option<String> {
        if !self.typed {
            return None;
        }
        annotation.map(|node| infer_type(Some(node), UNKNOWN_TYPE))
    }
}

/// Apply `pattern = default` to an extracted parameter.
///
/// Leaves refine their type from the literal unless annotated; nested
/// leaves with an object-literal default grow properties from its shape.
/// Destructured parameters push matching literal entries down to their
/// leaves instead.
fn apply_default(param: &mut Parameter, default: &Expr, annotated: bool, depth: usize) {
    if param.is_rest {
        return;
    }
    param.set_default(default.text.clone());

    if param.is_leaf() {
        if !annotated {
            if let Some(ty) = literal_type(default) {
                param.type_name = ty.to_string();
            }
        }
        if depth > 0 {
            derive_from_default(param, default, depth);
        }
    } else {
        inherit_defaults(param, default);
    }
}

fn derive_from_default(param: &mut Parameter, default: &Expr, depth: usize) {
    if depth > MAX_PATTERN_DEPTH {
        return;
    }
    let ExprKind::Object(entries) = &default.kind else {
        return;
    };
    if entries.is_empty() {
        return;
    }
    let props = entries
        .iter()
        .map(|entry| {
            let type_name = literal_type(&entry.value).unwrap_or(UNKNOWN_TYPE);
            let mut child = Parameter::new(&entry.key, type_name).with_default(entry.value.text.clone());
            derive_from_default(&mut child, &entry.value, depth + 1);
            child
        })
        .collect();
    param.children = Some(Destructure::Properties(props));
}

fn inherit_defaults(param: &mut Parameter, default: &Expr) {
    match &mut param.children {
        Some(Destructure::Properties(props)) => {
            for prop in props.iter_mut().filter(|p| !p.is_rest) {
                if let Some(value) = default.object_entry(&prop.name) {
                    inherit(prop, value);
                }
            }
        }
        Some(Destructure::Elements(elems)) => {
            for (i, elem) in elems.iter_mut().enumerate() {
                let Some(elem) = elem.as_mut().filter(|e| !e.is_rest) else {
                    continue;
                };
                if let Some(value) = default.array_element(i) {
                    inherit(elem, value);
                }
            }
        }
        None => {}
    }
}

fn inherit(param: &mut Parameter, value: &Expr) {
    if !param.is_leaf() {
        inherit_defaults(param, value);
        return;
    }
    if param.has_default {
        return;
    }
    param.set_default(value.text.clone());
    if param.is_untyped() {
        if let Some(ty) = literal_type(value) {
            param.type_name = ty.to_string();
        }
    }
}
