use ad_core::{FunctionBody, FunctionKind, FunctionNode};

use crate::infer::{infer_type, value_type, UNKNOWN_TYPE};

/// Infer the display return type of a function.
///
/// Returns `None` when the function has no observable return value, which
/// is distinct from `Some("any")` (a value exists but its type is unknown).
pub fn infer_return(func: &FunctionNode, typed: bool) -> Option<String> {
    if matches!(func.kind, FunctionKind::Constructor | FunctionKind::Setter) {
        return None;
    }

    if typed {
        if let Some(annotation) = &func.return_type {
            return Some(infer_type(Some(annotation), UNKNOWN_TYPE));
        }
    }

    let value = match &func.body {
        FunctionBody::Block { returns } => returns.iter().flatten().next()?,
        FunctionBody::Expression(expr) => expr,
        FunctionBody::Missing => return None,
    };

    let ty = value_type(value);
    let wrapped = if func.is_async {
        format!("Promise<{ty}>")
    } else if func.is_generator {
        format!("Iterator<{ty}>")
    } else {
        ty.to_string()
    };
    Some(wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_core::{Expr, ExprKind, TypeNode};

    fn func(kind: FunctionKind, body: FunctionBody) -> FunctionNode {
        FunctionNode {
            kind,
            name: Some("f".into()),
            params: Vec::new(),
            body,
            is_async: false,
            is_generator: false,
            return_type: None,
            has_error: false,
        }
    }

    fn block(returns: Vec<Option<Expr>>) -> FunctionBody {
        FunctionBody::Block { returns }
    }

    #[test]
    fn no_return_statement_means_none() {
        let f = func(FunctionKind::Declaration, block(vec![]));
        assert_eq!(infer_return(&f, false), None);
    }

    #[test]
    fn bare_returns_are_ignored() {
        let f = func(FunctionKind::Declaration, block(vec![None]));
        assert_eq!(infer_return(&f, false), None);

        let f = func(
            FunctionKind::Declaration,
            block(vec![None, Some(Expr::new(ExprKind::Number, "5"))]),
        );
        assert_eq!(infer_return(&f, false).as_deref(), Some("number"));
    }

    #[test]
    fn first_value_wins() {
        let f = func(
            FunctionKind::Declaration,
            block(vec![
                Some(Expr::new(ExprKind::Array(vec![]), "[]")),
                Some(Expr::new(ExprKind::String, "'x'")),
            ]),
        );
        assert_eq!(infer_return(&f, false).as_deref(), Some("Array"));
    }

    #[test]
    fn identifiers_are_any() {
        let f = func(
            FunctionKind::Declaration,
            block(vec![Some(Expr::new(ExprKind::Other, "a + b"))]),
        );
        assert_eq!(infer_return(&f, false).as_deref(), Some("any"));
    }

    #[test]
    fn async_and_generator_wrappers() {
        let mut f = func(
            FunctionKind::Declaration,
            block(vec![Some(Expr::new(ExprKind::Object(vec![]), "{}"))]),
        );
        f.is_async = true;
        assert_eq!(infer_return(&f, false).as_deref(), Some("Promise<Object>"));

        f.is_async = false;
        f.is_generator = true;
        assert_eq!(infer_return(&f, false).as_deref(), Some("Iterator<Object>"));
    }

    #[test]
    fn concise_arrow_body() {
        let f = func(
            FunctionKind::Arrow,
            FunctionBody::Expression(Expr::new(ExprKind::Boolean, "true")),
        );
        assert_eq!(infer_return(&f, false).as_deref(), Some("boolean"));
    }

    #[test]
    fn annotation_first_when_typed() {
        let mut f = func(
            FunctionKind::Declaration,
            block(vec![Some(Expr::new(ExprKind::Number, "1"))]),
        );
        f.return_type = Some(TypeNode::Reference {
            name: "Promise".into(),
            args: vec![TypeNode::Keyword("void".into())],
        });
        assert_eq!(infer_return(&f, true).as_deref(), Some("Promise<void>"));
        assert_eq!(infer_return(&f, false).as_deref(), Some("number"));
    }

    #[test]
    fn constructors_and_setters_have_no_return() {
        let body = block(vec![Some(Expr::new(ExprKind::Number, "1"))]);
        assert_eq!(infer_return(&func(FunctionKind::Constructor, body.clone()), false), None);
        assert_eq!(infer_return(&func(FunctionKind::Setter, body), false), None);
    }
}
