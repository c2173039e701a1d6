use serde::Serialize;

/// Normalized parameter produced by pattern extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Local name; never a dotted path.
    pub name: String,
    /// Generated name (`param1`, `item2`) for patterns without a natural identifier.
    pub synthetic: bool,
    /// Display type; `any` means the type could not be inferred.
    #[serde(rename = "type")]
    pub type_name: String,
    pub is_rest: bool,
    pub has_default: bool,
    pub default_value: Option<String>,
    /// Only set for typed `name?: T` parameters.
    pub optional: bool,
    pub is_param_property: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Destructure>,
}

/// Nested bindings of a destructuring pattern, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destructure {
    Properties(Vec<Parameter>),
    /// Positional; `None` marks an elision hole.
    Elements(Vec<Option<Parameter>>),
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synthetic: false,
            type_name: type_name.into(),
            is_rest: false,
            has_default: false,
            default_value: None,
            optional: false,
            is_param_property: false,
            children: None,
        }
    }

    pub fn synthetic(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            synthetic: true,
            ..Self::new(name, type_name)
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.set_default(value);
        self
    }

    /// Record a default value. Rest parameters never take one.
    pub fn set_default(&mut self, value: impl Into<String>) {
        if self.is_rest {
            return;
        }
        self.has_default = true;
        self.default_value = Some(value.into());
    }

    pub fn properties(&self) -> Option<&[Parameter]> {
        match &self.children {
            Some(Destructure::Properties(props)) => Some(props),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[Option<Parameter>]> {
        match &self.children {
            Some(Destructure::Elements(elems)) => Some(elems),
            _ => None,
        }
    }

    /// A leaf has no nested properties or elements.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_untyped(&self) -> bool {
        self.type_name == "any"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_parameter_ignores_default() {
        let mut p = Parameter::new("args", "Array<any>");
        p.is_rest = true;
        p.set_default("[]");
        assert!(!p.has_default);
        assert!(p.default_value.is_none());
    }

    #[test]
    fn children_accessors_are_exclusive() {
        let mut p = Parameter::synthetic("param1", "Object");
        p.children = Some(Destructure::Properties(vec![Parameter::new("a", "any")]));
        assert_eq!(p.properties().map(|props| props.len()), Some(1));
        assert!(p.elements().is_none());
        assert!(!p.is_leaf());

        p.children = Some(Destructure::Elements(vec![None, Some(Parameter::new("b", "any"))]));
        assert!(p.properties().is_none());
        assert_eq!(p.elements().map(|e| e.len()), Some(2));
    }

    #[test]
    fn serializes_type_field_name() {
        let p = Parameter::new("a", "number").with_default("1");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["default_value"], "1");
        assert!(json.get("children").is_none());
    }
}
