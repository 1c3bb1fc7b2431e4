//! Selector classification and `.find(...)` rewriting.
//!
//! Recognized selector shapes are rewritten to `screen` queries; everything
//! else is left in place for the suggestion annotator. The rewrite replaces
//! the matched call expression itself, so surrounding chains survive.

use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::util::{callee_member, is_ident_call, screen_query};
use crate::ConvertOptions;

/// `[role="X"]` selectors, exactly.
static ROLE_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\[role\s*=\s*["']([^"']+)["']\]$"#).expect("role selector regex"));

/// Role tokens recognized by substring containment against the raw selector
/// text. A selector that merely embeds one of these words as part of an
/// unrelated token will be misclassified; that imprecision is a documented
/// property of the classifier, not a bug to paper over. More specific
/// tokens come first so `listitem` wins over `list`.
const ARIA_ROLE_TOKENS: &[&str] = &[
    "menuitem",
    "listitem",
    "listbox",
    "progressbar",
    "searchbox",
    "tabpanel",
    "textbox",
    "tooltip",
    "toolbar",
    "checkbox",
    "combobox",
    "navigation",
    "heading",
    "button",
    "dialog",
    "slider",
    "switch",
    "option",
    "alert",
    "radio",
    "table",
    "menu",
    "link",
    "list",
    "grid",
    "tab",
    "img",
];

pub fn rewrite_find_calls(module: &mut Module, options: &ConvertOptions) {
    let test_id_pattern = format!(
        r#"{}\s*=\s*["']([^"']+)["']"#,
        regex::escape(&options.test_id_attribute)
    );
    let mut rewriter = FindRewriter {
        test_id_attribute: options.test_id_attribute.clone(),
        test_id_value: Regex::new(&test_id_pattern).expect("test-id selector regex"),
        negation: Vec::new(),
    };
    module.visit_mut_with(&mut rewriter);
}

struct FindRewriter {
    test_id_attribute: String,
    test_id_value: Regex,
    negation: Vec<bool>,
}

impl FindRewriter {
    fn in_negated_expectation(&self) -> bool {
        self.negation.last().copied().unwrap_or(false)
    }

    fn test_id_query(&self, value: &str) -> CallExpr {
        // A non-existence assertion must not throw on absence.
        let method = if self.in_negated_expectation() {
            "queryByTestId"
        } else {
            "getByTestId"
        };
        screen_query(method, value)
    }

    fn rewrite(&self, call: &CallExpr) -> Option<CallExpr> {
        let (_, prop) = callee_member(call)?;
        if prop.sym.as_ref() != "find" || call.args.len() != 1 {
            return None;
        }
        let first = call.args.first()?;
        if first.spread.is_some() {
            return None;
        }
        match &*first.expr {
            Expr::Lit(Lit::Str(s)) => self.rewrite_string_selector(s.value.as_ref()),
            Expr::Object(obj) => self.rewrite_object_selector(obj),
            _ => None,
        }
    }

    fn rewrite_string_selector(&self, text: &str) -> Option<CallExpr> {
        if text.contains(&self.test_id_attribute) {
            // `attr="value"`; anything the pattern cannot pull a value out
            // of stays for the annotator.
            let value = self
                .test_id_value
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())?;
            return Some(self.test_id_query(&value));
        }
        if let Some(caps) = ROLE_SELECTOR.captures(text) {
            return Some(screen_query("getByRole", &caps[1]));
        }
        ARIA_ROLE_TOKENS
            .iter()
            .find(|role| text.contains(*role))
            .map(|role| screen_query("getByRole", role))
    }

    fn rewrite_object_selector(&self, obj: &ObjectLit) -> Option<CallExpr> {
        for prop in &obj.props {
            let PropOrSpread::Prop(p) = prop else { continue };
            let Prop::KeyValue(kv) = &**p else { continue };
            let key = match &kv.key {
                PropName::Ident(i) => i.sym.to_string(),
                PropName::Str(s) => s.value.to_string(),
                _ => continue,
            };
            if key != self.test_id_attribute {
                continue;
            }
            if let Expr::Lit(Lit::Str(value)) = &*kv.value {
                return Some(self.test_id_query(value.value.as_ref()));
            }
        }
        None
    }
}

impl VisitMut for FindRewriter {
    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        let expectation = expectation_context(call);
        if let Some(negated) = expectation {
            self.negation.push(negated);
        }
        call.visit_mut_children_with(self);
        if expectation.is_some() {
            self.negation.pop();
        }
        if let Some(rewritten) = self.rewrite(call) {
            *call = rewritten;
        }
    }
}

/// For a matcher call whose member chain roots at an `expect(...)` call,
/// reports whether the member adjacent to `expect` is `not`. Returns `None`
/// for calls that are not expectation matchers.
fn expectation_context(call: &CallExpr) -> Option<bool> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let mut props = Vec::new();
    let mut cursor: &Expr = callee;
    while let Expr::Member(m) = cursor {
        match &m.prop {
            MemberProp::Ident(p) => props.push(p.sym.as_ref()),
            _ => return None,
        }
        cursor = &m.obj;
    }
    match cursor {
        Expr::Call(root) if is_ident_call(root, "expect") && !props.is_empty() => {
            Some(props.last() == Some(&"not"))
        }
        _ => None,
    }
}
