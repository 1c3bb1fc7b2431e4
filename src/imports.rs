//! Import rewriting: swap the enzyme import for the RTL entry points and
//! absolutize relative module specifiers.
//!
//! Converted files may be written somewhere other than the directory the
//! original lived in, so every relative specifier (imports and jest mock
//! directives) is resolved against the original file's directory up front.

use std::path::Path;

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::diagnostics::{codes, Diagnostic};
use crate::util::{ident, str_lit};
use crate::ConvertOptions;

pub const ENZYME_PACKAGE: &str = "enzyme";
pub const RTL_PACKAGE: &str = "@testing-library/react";

pub fn rewrite_imports(
    module: &mut Module,
    options: &ConvertOptions,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut saw_enzyme = false;
    module.body.retain(|item| {
        if let ModuleItem::ModuleDecl(ModuleDecl::Import(imp)) = item {
            if imp.src.value.as_ref() == ENZYME_PACKAGE {
                saw_enzyme = true;
                return false;
            }
        }
        true
    });

    if saw_enzyme {
        if !has_import_from(module, RTL_PACKAGE) {
            module.body.insert(0, rtl_import());
        }
    } else {
        tracing::warn!("no enzyme import found; render/screen import not inserted");
        diagnostics.push(Diagnostic::warning(
            options.file_path.display().to_string(),
            "no enzyme import declaration found in this file",
            codes::NO_ENZYME_IMPORT,
        ));
    }

    if let Some(base_dir) = options.file_path.parent() {
        for item in &mut module.body {
            if let ModuleItem::ModuleDecl(ModuleDecl::Import(imp)) = item {
                if let Some(abs) = absolutize(base_dir, imp.src.value.as_ref()) {
                    imp.src = Box::new(str_lit(&abs));
                }
            }
        }
        let mut mocks = MockPathRewriter { base_dir };
        module.visit_mut_with(&mut mocks);
    }
}

pub fn has_import_from(module: &Module, source: &str) -> bool {
    module.body.iter().any(|item| {
        matches!(
            item,
            ModuleItem::ModuleDecl(ModuleDecl::Import(imp)) if imp.src.value.as_ref() == source
        )
    })
}

/// `import { render, screen } from "@testing-library/react";`
fn rtl_import() -> ModuleItem {
    let named = |name: &str| {
        ImportSpecifier::Named(ImportNamedSpecifier {
            span: DUMMY_SP,
            local: ident(name),
            imported: None,
            is_type_only: false,
        })
    };
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![named("render"), named("screen")],
        src: Box::new(str_lit(RTL_PACKAGE)),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

/// Rewrites the module argument of `jest.mock(...)` / `jest.doMock(...)`.
struct MockPathRewriter<'a> {
    base_dir: &'a Path,
}

impl VisitMut for MockPathRewriter<'_> {
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        if is_mock_directive(n) {
            if let Some(first) = n.args.first_mut() {
                if first.spread.is_none() {
                    if let Expr::Lit(Lit::Str(s)) = &mut *first.expr {
                        if let Some(abs) = absolutize(self.base_dir, s.value.as_ref()) {
                            *s = str_lit(&abs);
                        }
                    }
                }
            }
        }
        n.visit_mut_children_with(self);
    }
}

fn is_mock_directive(call: &CallExpr) -> bool {
    if let Callee::Expr(callee) = &call.callee {
        if let Expr::Member(m) = &**callee {
            if let (Expr::Ident(obj), MemberProp::Ident(prop)) = (&*m.obj, &m.prop) {
                return obj.sym.as_ref() == "jest"
                    && matches!(prop.sym.as_ref(), "mock" | "doMock");
            }
        }
    }
    false
}

/// Lexically resolve a relative specifier against `base_dir`. Non-relative
/// specifiers (bare packages, already-absolute paths) pass through untouched.
fn absolutize(base_dir: &Path, spec: &str) -> Option<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") {
        return None;
    }
    let base = base_dir.to_string_lossy().replace('\\', "/");
    let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
    for seg in spec.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    Some(format!("/{}", parts.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn absolutize_resolves_dot_segments() {
        let base = PathBuf::from("/project/src/__tests__");
        assert_eq!(
            absolutize(&base, "./Button").as_deref(),
            Some("/project/src/__tests__/Button")
        );
        assert_eq!(
            absolutize(&base, "../utils/helpers").as_deref(),
            Some("/project/src/utils/helpers")
        );
        assert_eq!(
            absolutize(&base, "../../lib/./mock").as_deref(),
            Some("/project/lib/mock")
        );
        assert_eq!(absolutize(&base, "react"), None);
        assert_eq!(absolutize(&base, "@testing-library/react"), None);
    }
}
