//! Wrapper-reference resolution: find every binding that holds a rendered
//! wrapper and collapse the now-redundant declaration to a bare render call.
//!
//! Two-tier search. When rendering is abstracted behind a helper, the helper
//! return value is the signal (`const wrapper = renderComponent()`); when
//! the primitive was called directly, the call's own assigned name is the
//! signal (the render-call normalizer reports that name as the "helper").
//! The cheaper helper-shaped search runs first, the narrower fallbacks only
//! when it found nothing.

use indexmap::IndexSet;
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::diagnostics::{codes, Diagnostic};
use crate::util::is_ident_call;
use crate::ConvertOptions;

pub fn resolve_wrapper_bindings(
    module: &mut Module,
    render_fn: Option<&str>,
    options: &ConvertOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexSet<String> {
    let mut found = IndexSet::new();
    let Some(render_fn) = render_fn else {
        return found;
    };

    let mut init_pass = CollapseHelperInits {
        render_fn,
        found: &mut found,
    };
    module.visit_mut_with(&mut init_pass);

    let mut assigned = IndexSet::new();
    let mut assign_pass = CollapseHelperAssignments {
        render_fn,
        found: &mut assigned,
    };
    module.visit_mut_with(&mut assign_pass);
    if !assigned.is_empty() {
        let mut cleanup = RemoveDanglingDeclarators { names: &assigned };
        module.visit_mut_with(&mut cleanup);
        found.extend(assigned);
    }

    if found.is_empty() {
        let mut fallback = CollapseDirectRenders {
            render_fn,
            found: &mut found,
        };
        module.visit_mut_with(&mut fallback);
    }

    if found.is_empty() {
        tracing::warn!(render_fn, "no wrapper bindings discovered");
        diagnostics.push(Diagnostic::warning(
            options.file_path.display().to_string(),
            format!("no wrapper bindings found for render helper `{render_fn}`"),
            codes::NO_WRAPPER_BINDINGS,
        ));
    } else {
        tracing::debug!(count = found.len(), "wrapper bindings resolved");
    }
    found
}

fn take_boxed(slot: &mut Box<Expr>) -> Box<Expr> {
    std::mem::replace(slot, Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })))
}

// -----------------------------------------------------------------------------
// Tier one (a): const x = helper(...)
// -----------------------------------------------------------------------------

struct CollapseHelperInits<'a> {
    render_fn: &'a str,
    found: &'a mut IndexSet<String>,
}

impl CollapseHelperInits<'_> {
    fn collapse(&mut self, stmt: &mut Stmt) {
        let Stmt::Decl(Decl::Var(var)) = stmt else {
            return;
        };
        if var.decls.len() != 1 {
            return;
        }
        let d = &mut var.decls[0];
        let Some(name) = d.name.as_ident().map(|b| b.id.sym.to_string()) else {
            return;
        };
        let Some(init) = &d.init else {
            return;
        };
        let Expr::Call(call) = &**init else {
            return;
        };
        if !is_ident_call(call, self.render_fn) {
            return;
        }
        let span = var.span;
        if let Some(expr) = d.init.take() {
            *stmt = Stmt::Expr(ExprStmt { span, expr });
            self.found.insert(name);
        }
    }
}

impl VisitMut for CollapseHelperInits<'_> {
    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for stmt in stmts.iter_mut() {
            self.collapse(stmt);
        }
        stmts.visit_mut_children_with(self);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        for item in items.iter_mut() {
            if let ModuleItem::Stmt(stmt) = item {
                self.collapse(stmt);
            }
        }
        items.visit_mut_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// Tier one (b): x = helper(...), plus removal of the dangling `let x;`
// -----------------------------------------------------------------------------

struct CollapseHelperAssignments<'a> {
    render_fn: &'a str,
    found: &'a mut IndexSet<String>,
}

impl CollapseHelperAssignments<'_> {
    fn collapse(&mut self, stmt: &mut Stmt) {
        let Stmt::Expr(es) = stmt else {
            return;
        };
        let matched = match &*es.expr {
            Expr::Assign(a) => {
                a.op == AssignOp::Assign
                    && matches!(
                        &a.left,
                        AssignTarget::Simple(SimpleAssignTarget::Ident(_))
                    )
                    && matches!(&*a.right, Expr::Call(c) if is_ident_call(c, self.render_fn))
            }
            _ => false,
        };
        if !matched {
            return;
        }
        let expr = take_boxed(&mut es.expr);
        if let Expr::Assign(mut assign) = *expr {
            if let AssignTarget::Simple(SimpleAssignTarget::Ident(b)) = &assign.left {
                self.found.insert(b.id.sym.to_string());
            }
            es.expr = take_boxed(&mut assign.right);
        }
    }
}

impl VisitMut for CollapseHelperAssignments<'_> {
    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for stmt in stmts.iter_mut() {
            self.collapse(stmt);
        }
        stmts.visit_mut_children_with(self);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        for item in items.iter_mut() {
            if let ModuleItem::Stmt(stmt) = item {
                self.collapse(stmt);
            }
        }
        items.visit_mut_children_with(self);
    }
}

/// Drops `let x;` declarators left behind once `x = helper()` collapsed.
struct RemoveDanglingDeclarators<'a> {
    names: &'a IndexSet<String>,
}

impl RemoveDanglingDeclarators<'_> {
    fn is_dangling(&self, d: &VarDeclarator) -> bool {
        d.init.is_none()
            && d.name
                .as_ident()
                .is_some_and(|b| self.names.contains(b.id.sym.as_ref()))
    }

    fn prune(&self, stmt: &mut Stmt) -> bool {
        if let Stmt::Decl(Decl::Var(var)) = stmt {
            var.decls.retain(|d| !self.is_dangling(d));
            return var.decls.is_empty();
        }
        false
    }
}

impl VisitMut for RemoveDanglingDeclarators<'_> {
    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        stmts.retain_mut(|stmt| !self.prune(stmt));
        stmts.visit_mut_children_with(self);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        items.retain_mut(|item| match item {
            ModuleItem::Stmt(stmt) => !self.prune(stmt),
            _ => true,
        });
        items.visit_mut_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// Tier two fallbacks: direct primitive use
// -----------------------------------------------------------------------------

/// Covers `const wrapper = render(...)` where the declared name itself was
/// reported as the render-function name (the primitive was called without a
/// wrapping helper), and destructured `const { ... } = helper(...)` forms.
/// Destructured query bindings are not wrapper references, so only the
/// identifier form contributes to the binding set.
struct CollapseDirectRenders<'a> {
    render_fn: &'a str,
    found: &'a mut IndexSet<String>,
}

impl CollapseDirectRenders<'_> {
    fn collapse(&mut self, stmt: &mut Stmt) {
        let Stmt::Decl(Decl::Var(var)) = stmt else {
            return;
        };
        if var.decls.len() != 1 {
            return;
        }
        let d = &mut var.decls[0];
        let matched = match (&d.name, d.init.as_deref()) {
            (Pat::Ident(b), Some(Expr::Call(_))) => {
                if b.id.sym.as_ref() != self.render_fn {
                    return;
                }
                self.found.insert(b.id.sym.to_string());
                true
            }
            (Pat::Object(_), Some(Expr::Call(c))) => is_ident_call(c, self.render_fn),
            _ => false,
        };
        if !matched {
            return;
        }
        let span = var.span;
        if let Some(expr) = d.init.take() {
            *stmt = Stmt::Expr(ExprStmt { span, expr });
        }
    }
}

impl VisitMut for CollapseDirectRenders<'_> {
    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for stmt in stmts.iter_mut() {
            self.collapse(stmt);
        }
        stmts.visit_mut_children_with(self);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        for item in items.iter_mut() {
            if let ModuleItem::Stmt(stmt) = item {
                self.collapse(stmt);
            }
        }
        items.visit_mut_children_with(self);
    }
}
