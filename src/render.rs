//! Render-call normalization: `shallow(...)` / `mount(...)` become RTL
//! `render(...)` calls, and the helper that wraps the primitive is
//! identified by name for the wrapper resolver downstream.

use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

use crate::diagnostics::{codes, Diagnostic};
use crate::util::{ident, is_ident_call};
use crate::{ConvertError, ConvertOptions};

/// Replacement name for a user helper that is itself called `render`,
/// which would otherwise collide with the imported RTL `render`.
pub const RENAMED_RENDER_HELPER: &str = "renderComponent";

/// Finds every `shallow`/`mount` call, derives the render-helper name from
/// the first call's nearest enclosing declaration (function declaration,
/// then variable declaration, then assignment), and swaps all primitive
/// callees for `render`. A file using both primitives is rejected outright.
pub fn normalize_render_calls(
    module: &mut Module,
    options: &ConvertOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<String>, ConvertError> {
    let mut scan = RenderScan::default();
    module.visit_with(&mut scan);

    if scan.shallow && scan.mount {
        return Err(ConvertError::MixedRenderPrimitives);
    }
    if !scan.shallow && !scan.mount {
        tracing::warn!("no shallow/mount call in this file");
        diagnostics.push(Diagnostic::warning(
            options.file_path.display().to_string(),
            "neither shallow nor mount is called in this file",
            codes::NO_RENDER_PRIMITIVE,
        ));
        return Ok(None);
    }

    let mut render_fn = scan.site;
    if render_fn.is_none() {
        diagnostics.push(Diagnostic::warning(
            options.file_path.display().to_string(),
            "render primitive is called outside any recognizable declaration",
            codes::NO_RENDER_DECLARATION,
        ));
    }

    if render_fn.as_deref() == Some("render") {
        tracing::debug!("render helper collides with RTL render; renaming");
        module.visit_mut_with(&mut RenameRenderHelper);
        render_fn = Some(RENAMED_RENDER_HELPER.to_string());
    }

    module.visit_mut_with(&mut ReplacePrimitiveCallees);
    Ok(render_fn)
}

// -----------------------------------------------------------------------------
// Scan: primitive usage + enclosing declaration of the first call
// -----------------------------------------------------------------------------

#[derive(Default)]
struct RenderScan {
    shallow: bool,
    mount: bool,
    site: Option<String>,
    fn_stack: Vec<String>,
    var_stack: Vec<String>,
    assign_stack: Vec<String>,
}

impl RenderScan {
    fn enclosing_declaration(&self) -> Option<String> {
        // Declaration priority: function > variable > assignment.
        self.fn_stack
            .last()
            .or_else(|| self.var_stack.last())
            .or_else(|| self.assign_stack.last())
            .cloned()
    }
}

impl Visit for RenderScan {
    fn visit_fn_decl(&mut self, n: &FnDecl) {
        self.fn_stack.push(n.ident.sym.to_string());
        n.visit_children_with(self);
        self.fn_stack.pop();
    }

    fn visit_var_declarator(&mut self, n: &VarDeclarator) {
        let named = n.name.as_ident().map(|b| b.id.sym.to_string());
        if let Some(name) = named.clone() {
            self.var_stack.push(name);
        }
        n.visit_children_with(self);
        if named.is_some() {
            self.var_stack.pop();
        }
    }

    fn visit_assign_expr(&mut self, n: &AssignExpr) {
        let named = match &n.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(b)) => Some(b.id.sym.to_string()),
            _ => None,
        };
        if let Some(name) = named.clone() {
            self.assign_stack.push(name);
        }
        n.visit_children_with(self);
        if named.is_some() {
            self.assign_stack.pop();
        }
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        let is_shallow = is_ident_call(n, "shallow");
        let is_mount = is_ident_call(n, "mount");
        if is_shallow {
            self.shallow = true;
        }
        if is_mount {
            self.mount = true;
        }
        if (is_shallow || is_mount) && self.site.is_none() {
            self.site = self.enclosing_declaration();
        }
        n.visit_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// Rewrites
// -----------------------------------------------------------------------------

/// Renames a helper literally named `render` (declaration and call sites).
/// Scope-naive by design: the engine works syntactically, and test files
/// that alias `render` twice in different scopes are outside its contract.
struct RenameRenderHelper;

impl VisitMut for RenameRenderHelper {
    fn visit_mut_fn_decl(&mut self, n: &mut FnDecl) {
        if n.ident.sym.as_ref() == "render" {
            n.ident = ident(RENAMED_RENDER_HELPER);
        }
        n.visit_mut_children_with(self);
    }

    fn visit_mut_var_declarator(&mut self, n: &mut VarDeclarator) {
        if let Pat::Ident(b) = &mut n.name {
            if b.id.sym.as_ref() == "render" {
                b.id = ident(RENAMED_RENDER_HELPER);
            }
        }
        n.visit_mut_children_with(self);
    }

    fn visit_mut_assign_expr(&mut self, n: &mut AssignExpr) {
        if let AssignTarget::Simple(SimpleAssignTarget::Ident(b)) = &mut n.left {
            if b.id.sym.as_ref() == "render" {
                b.id = ident(RENAMED_RENDER_HELPER);
            }
        }
        n.visit_mut_children_with(self);
    }

    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        if let Callee::Expr(callee) = &mut n.callee {
            if let Expr::Ident(id) = &mut **callee {
                if id.sym.as_ref() == "render" {
                    *id = ident(RENAMED_RENDER_HELPER);
                }
            }
        }
        n.visit_mut_children_with(self);
    }
}

/// `shallow(args)` / `mount(args)` -> `render(args)`, arguments untouched.
struct ReplacePrimitiveCallees;

impl VisitMut for ReplacePrimitiveCallees {
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        if is_ident_call(n, "shallow") || is_ident_call(n, "mount") {
            n.callee = Callee::Expr(Box::new(Expr::Ident(ident("render"))));
        }
        n.visit_mut_children_with(self);
    }
}
