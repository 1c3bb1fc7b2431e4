//! Small AST construction and inspection helpers shared by the passes.

use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::*;

pub fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

pub fn ident_name(name: &str) -> IdentName {
    IdentName::new(name.into(), DUMMY_SP)
}

pub fn str_lit(value: &str) -> Str {
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }
}

pub fn member(obj: Expr, prop: &str) -> MemberExpr {
    MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(ident_name(prop)),
    }
}

pub fn call(callee: Expr, args: Vec<ExprOrSpread>) -> CallExpr {
    CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(callee)),
        args,
        type_args: None,
    }
}

pub fn arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

/// `screen.method("value")`
pub fn screen_query(method: &str, value: &str) -> CallExpr {
    call(
        Expr::Member(member(Expr::Ident(ident("screen")), method)),
        vec![arg(Expr::Lit(Lit::Str(str_lit(value))))],
    )
}

/// The callee as a member access, split into receiver and method ident.
pub fn callee_member<'a>(call: &'a CallExpr) -> Option<(&'a Expr, &'a IdentName)> {
    if let Callee::Expr(callee) = &call.callee {
        if let Expr::Member(m) = &**callee {
            if let MemberProp::Ident(prop) = &m.prop {
                return Some((&m.obj, prop));
            }
        }
    }
    None
}

/// True when the call invokes a bare identifier with the given name.
pub fn is_ident_call(call: &CallExpr, name: &str) -> bool {
    if let Callee::Expr(callee) = &call.callee {
        if let Expr::Ident(id) = &**callee {
            return id.sym.as_ref() == name;
        }
    }
    false
}

/// `method()` with no arguments on some receiver; returns the method name.
pub fn nullary_method<'a>(call: &'a CallExpr) -> Option<(&'a Expr, &'a str)> {
    if !call.args.is_empty() {
        return None;
    }
    callee_member(call).map(|(obj, prop)| (obj, prop.sym.as_ref()))
}

/// Best-effort textual rendering of an expression for suggestion comments.
/// Covers the shapes that show up as wrapper-method arguments; anything
/// richer degrades to `None` and callers fall back to an ellipsis.
pub fn expr_snippet(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(i) => Some(i.sym.to_string()),
        Expr::Lit(Lit::Str(s)) => Some(format!("'{}'", s.value)),
        Expr::Lit(Lit::Num(n)) => Some(n.value.to_string()),
        Expr::Lit(Lit::Bool(b)) => Some(b.value.to_string()),
        Expr::Lit(Lit::Null(_)) => Some("null".to_string()),
        Expr::Member(m) => {
            let obj = expr_snippet(&m.obj)?;
            match &m.prop {
                MemberProp::Ident(p) => Some(format!("{}.{}", obj, p.sym)),
                MemberProp::Computed(c) => {
                    Some(format!("{}[{}]", obj, expr_snippet(&c.expr)?))
                }
                MemberProp::PrivateName(_) => None,
            }
        }
        Expr::Call(c) => {
            if let Callee::Expr(callee) = &c.callee {
                Some(format!("{}(...)", expr_snippet(callee)?))
            } else {
                None
            }
        }
        Expr::Object(_) => Some("{...}".to_string()),
        Expr::Arrow(_) | Expr::Fn(_) => Some("fn".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_cover_common_shapes() {
        let e = Expr::Member(member(Expr::Ident(ident("wrapper")), "state"));
        assert_eq!(expr_snippet(&e).as_deref(), Some("wrapper.state"));

        let lit = Expr::Lit(Lit::Str(str_lit("open")));
        assert_eq!(expr_snippet(&lit).as_deref(), Some("'open'"));

        let c = Expr::Call(call(Expr::Ident(ident("setup")), vec![]));
        assert_eq!(expr_snippet(&c).as_deref(), Some("setup(...)"));
    }

    #[test]
    fn screen_query_builds_member_call() {
        let q = screen_query("getByTestId", "element");
        let (obj, prop) = callee_member(&q).unwrap();
        assert!(matches!(obj, Expr::Ident(i) if i.sym.as_ref() == "screen"));
        assert_eq!(prop.sym.as_ref(), "getByTestId");
        assert_eq!(q.args.len(), 1);
    }
}
