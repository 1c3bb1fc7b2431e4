//! Structural method-call rewrites: text assertions, interaction
//! simulation, existence assertions, and removal of no-op chain segments.
//!
//! These run in a fixed order (text, simulate, exists, chain noise); each
//! assumes the tree state left by the one before. None of them needs the
//! wrapper-binding set.

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::imports::has_import_from;
use crate::util::{call, callee_member, ident, ident_name, is_ident_call, member, nullary_method, str_lit};

pub const USER_EVENT_PACKAGE: &str = "@testing-library/user-event";

// -----------------------------------------------------------------------------
// expect(X.text()).toEqual(Y) -> expect(X).toHaveTextContent(Y)
// -----------------------------------------------------------------------------

pub fn rewrite_text_assertions(module: &mut Module) {
    module.visit_mut_with(&mut TextAssertionRewriter);
}

struct TextAssertionRewriter;

impl TextAssertionRewriter {
    fn try_rewrite(n: &mut CallExpr) {
        let Callee::Expr(callee) = &mut n.callee else {
            return;
        };
        let Expr::Member(m) = &mut **callee else {
            return;
        };
        let MemberProp::Ident(prop) = &mut m.prop else {
            return;
        };
        if !matches!(prop.sym.as_ref(), "toEqual" | "toContain" | "toBe") {
            return;
        }
        let Expr::Call(expect_call) = &mut *m.obj else {
            return;
        };
        if !is_ident_call(expect_call, "expect") || expect_call.args.len() != 1 {
            return;
        }
        let slot = &mut expect_call.args[0];
        if slot.spread.is_some() {
            return;
        }
        let is_text_call = matches!(
            &*slot.expr,
            Expr::Call(c) if nullary_method(c).is_some_and(|(_, name)| name == "text")
        );
        if !is_text_call {
            return;
        }
        unwrap_receiver_into(slot);
        *prop = ident_name("toHaveTextContent");
    }
}

impl VisitMut for TextAssertionRewriter {
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        n.visit_mut_children_with(self);
        Self::try_rewrite(n);
    }
}

/// Replaces `X.m()` in an expect-argument slot with its receiver `X`.
fn unwrap_receiver_into(slot: &mut ExprOrSpread) {
    let inner = std::mem::replace(
        &mut slot.expr,
        Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
    );
    if let Expr::Call(mut inner_call) = *inner {
        if let Callee::Expr(inner_callee) = &mut inner_call.callee {
            if let Expr::Member(im) = &mut **inner_callee {
                slot.expr = std::mem::replace(
                    &mut im.obj,
                    Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
                );
            }
        }
    }
}

// -----------------------------------------------------------------------------
// X.simulate('click') -> userEvent.click(X)
// -----------------------------------------------------------------------------

pub fn rewrite_simulate_calls(module: &mut Module) {
    let mut rewriter = SimulateRewriter { matched: false };
    module.visit_mut_with(&mut rewriter);
    if rewriter.matched && !has_import_from(module, USER_EVENT_PACKAGE) {
        let at = leading_import_count(module);
        module.body.insert(at, user_event_import());
    }
}

fn map_event(name: &str) -> Option<&'static str> {
    match name {
        "click" => Some("click"),
        "mouseenter" | "mouseEnter" => Some("hover"),
        "mouseleave" | "mouseLeave" => Some("unhover"),
        _ => None,
    }
}

struct SimulateRewriter {
    matched: bool,
}

impl SimulateRewriter {
    fn try_rewrite(&mut self, n: &mut CallExpr) {
        let method = match (callee_member(n), n.args.first()) {
            (Some((_, prop)), Some(a)) if prop.sym.as_ref() == "simulate" && a.spread.is_none() => {
                match &*a.expr {
                    Expr::Lit(Lit::Str(s)) => map_event(s.value.as_ref()),
                    _ => None,
                }
            }
            _ => None,
        };
        // Unmapped events stay as .simulate(...) for the annotator.
        let Some(method) = method else {
            return;
        };
        let Callee::Expr(callee) = &mut n.callee else {
            return;
        };
        let Expr::Member(m) = &mut **callee else {
            return;
        };
        let receiver = std::mem::replace(
            &mut m.obj,
            Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
        );
        *n = call(
            Expr::Member(member(Expr::Ident(ident("userEvent")), method)),
            vec![ExprOrSpread {
                spread: None,
                expr: receiver,
            }],
        );
        self.matched = true;
    }
}

impl VisitMut for SimulateRewriter {
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        n.visit_mut_children_with(self);
        self.try_rewrite(n);
    }
}

fn leading_import_count(module: &Module) -> usize {
    module
        .body
        .iter()
        .take_while(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
        .count()
}

/// `import userEvent from "@testing-library/user-event";`
fn user_event_import() -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local: ident("userEvent"),
        })],
        src: Box::new(str_lit(USER_EVENT_PACKAGE)),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

// -----------------------------------------------------------------------------
// expect(E.exists()).toBe(true) -> expect(E).toBeInTheDocument()
// -----------------------------------------------------------------------------

pub fn rewrite_exists_assertions(module: &mut Module) {
    module.visit_mut_with(&mut ExistsAssertionRewriter);
}

struct ExistsAssertionRewriter;

impl ExistsAssertionRewriter {
    fn truthiness(n: &CallExpr) -> Option<bool> {
        let (_, prop) = callee_member(n)?;
        match (prop.sym.as_ref(), n.args.len()) {
            ("toBe" | "toEqual", 1) => match &*n.args[0].expr {
                Expr::Lit(Lit::Bool(b)) => Some(b.value),
                _ => None,
            },
            ("toBeTruthy", 0) => Some(true),
            ("toBeFalsy", 0) => Some(false),
            _ => None,
        }
    }

    fn try_rewrite(n: &mut CallExpr) {
        let Some(truthy) = Self::truthiness(n) else {
            return;
        };
        let Callee::Expr(callee) = &mut n.callee else {
            return;
        };
        let Expr::Member(m) = &mut **callee else {
            return;
        };
        let Expr::Call(expect_call) = &mut *m.obj else {
            return;
        };
        if !is_ident_call(expect_call, "expect") || expect_call.args.len() != 1 {
            return;
        }
        let slot = &mut expect_call.args[0];
        let is_exists_call = matches!(
            &*slot.expr,
            Expr::Call(c) if nullary_method(c).is_some_and(|(_, name)| name == "exists")
        );
        if !is_exists_call {
            return;
        }

        unwrap_receiver_into(slot);
        n.args.clear();
        if truthy {
            m.prop = MemberProp::Ident(ident_name("toBeInTheDocument"));
        } else {
            let expect_expr = std::mem::replace(
                &mut m.obj,
                Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
            );
            **callee = Expr::Member(member(
                Expr::Member(MemberExpr {
                    span: DUMMY_SP,
                    obj: expect_expr,
                    prop: MemberProp::Ident(ident_name("not")),
                }),
                "toBeInTheDocument",
            ));
        }
    }
}

impl VisitMut for ExistsAssertionRewriter {
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        n.visit_mut_children_with(self);
        Self::try_rewrite(n);
    }
}

// -----------------------------------------------------------------------------
// .first() / .hostNodes() / .update() chain noise
// -----------------------------------------------------------------------------

pub fn strip_chain_noise(module: &mut Module) {
    module.visit_mut_with(&mut ChainNoiseStripper);
}

struct ChainNoiseStripper;

fn is_noise_call(e: &Expr, names: &[&str]) -> bool {
    matches!(
        e,
        Expr::Call(c) if nullary_method(c).is_some_and(|(_, m)| names.contains(&m))
    )
}

impl VisitMut for ChainNoiseStripper {
    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        // `wrapper.update();` as a whole statement disappears outright.
        stmts.retain(|s| !matches!(s, Stmt::Expr(es) if is_noise_call(&es.expr, &["update"])));
        stmts.visit_mut_children_with(self);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        items.retain(|item| {
            !matches!(
                item,
                ModuleItem::Stmt(Stmt::Expr(es)) if is_noise_call(&es.expr, &["update"])
            )
        });
        items.visit_mut_children_with(self);
    }

    fn visit_mut_expr(&mut self, e: &mut Expr) {
        e.visit_mut_children_with(self);
        while is_noise_call(e, &["first", "hostNodes", "update"]) {
            let Expr::Call(c) = e else {
                break;
            };
            let Callee::Expr(callee) = &mut c.callee else {
                break;
            };
            let Expr::Member(m) = &mut **callee else {
                break;
            };
            let receiver = std::mem::replace(
                &mut m.obj,
                Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
            );
            *e = *receiver;
        }
    }
}
