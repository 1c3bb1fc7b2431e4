//! Suggestion annotation for wrapper-method calls with no deterministic
//! rewrite: each gets a line comment with migration guidance, inserted
//! immediately before the enclosing statement.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::common::comments::{Comment, CommentKind, Comments, SingleThreadedComments};
use swc_core::common::{BytePos, DUMMY_SP};
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::util::expr_snippet;
use crate::ConvertOptions;

/// Fixed marker identifying a migration-suggestion comment in the output,
/// so downstream tooling can locate unresolved constructs.
pub const SUGGESTION_MARKER: &str = "rtl-migration:";

/// `role="X"` attributes in a rendered-DOM snapshot.
static DOM_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"role\s*=\s*"([^"]+)""#).expect("dom role regex"));

pub fn annotate_unconverted_calls(
    module: &Module,
    wrappers: &IndexSet<String>,
    options: &ConvertOptions,
    comments: &SingleThreadedComments,
) {
    if wrappers.is_empty() {
        return;
    }
    let mut annotator = Annotator {
        wrappers,
        comments,
        find_hint: dom_find_hint(options),
        anchors: Vec::new(),
        inserted: 0,
    };
    module.visit_with(&mut annotator);
    tracing::debug!(count = annotator.inserted, "suggestion comments inserted");
}

/// Concrete query candidates pulled from the caller-supplied rendered-DOM
/// snapshot. `None` when no snapshot was supplied or it exposes neither a
/// test id nor a role; unconverted `find` calls then fall back to the
/// generic guidance table.
fn dom_find_hint(options: &ConvertOptions) -> Option<String> {
    let dom = options.rendered_dom.as_deref()?;
    let test_id = Regex::new(&format!(
        r#"{}\s*=\s*"([^"]+)""#,
        regex::escape(&options.test_id_attribute)
    ))
    .ok()?;
    let ids: IndexSet<String> = test_id.captures_iter(dom).map(|c| c[1].to_string()).collect();
    let roles: IndexSet<String> = DOM_ROLE.captures_iter(dom).map(|c| c[1].to_string()).collect();
    if ids.is_empty() && roles.is_empty() {
        return None;
    }
    let list = |set: &IndexSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
    let mut parts = Vec::new();
    if !ids.is_empty() {
        parts.push(format!("test ids [{}]", list(&ids)));
    }
    if !roles.is_empty() {
        parts.push(format!("roles [{}]", list(&roles)));
    }
    Some(format!(
        "the rendered DOM exposes {}; replace with screen.getByTestId(...) or screen.getByRole(...)",
        parts.join(" and ")
    ))
}

struct Annotator<'a> {
    wrappers: &'a IndexSet<String>,
    comments: &'a SingleThreadedComments,
    find_hint: Option<String>,
    /// Positions of enclosing variable-declaration / expression statements,
    /// innermost last. Comments attach to the innermost anchor.
    anchors: Vec<BytePos>,
    inserted: usize,
}

impl Annotator<'_> {
    fn suggest(&mut self, receiver: &str, method: &str, first_arg: Option<&Expr>, guidance: &str) {
        let Some(&anchor) = self.anchors.last() else {
            // No statement-level ancestor: silently skip, never guess.
            return;
        };
        let rendered_arg = first_arg
            .and_then(expr_snippet)
            .unwrap_or_else(|| if first_arg.is_some() { "...".into() } else { String::new() });
        let text =
            format!(" {SUGGESTION_MARKER} `{receiver}.{method}({rendered_arg})` -> {guidance}");

        let duplicate = self
            .comments
            .with_leading(anchor, |existing| {
                existing.iter().any(|c| c.text.as_ref() == text.as_str())
            });
        if duplicate {
            return;
        }
        self.comments.add_leading(
            anchor,
            Comment {
                kind: CommentKind::Line,
                span: DUMMY_SP,
                text: text.into(),
            },
        );
        self.inserted += 1;
    }

    fn inspect_call(&mut self, call: &CallExpr) {
        let Callee::Expr(callee) = &call.callee else {
            return;
        };
        let Expr::Member(m) = &**callee else {
            return;
        };
        let (Expr::Ident(obj), MemberProp::Ident(prop)) = (&*m.obj, &m.prop) else {
            return;
        };
        if !self.wrappers.contains(obj.sym.as_ref()) {
            return;
        }
        let method = prop.sym.as_ref();
        if is_rtl_query(method) {
            return;
        }
        // A `find` still hanging off a wrapper here had an unrecognizable
        // selector; the snapshot-derived hint names concrete replacements.
        let guidance = if method == "find" {
            self.find_hint
                .clone()
                .unwrap_or_else(|| guidance_for("find").to_string())
        } else {
            guidance_for(method).to_string()
        };
        let first_arg = call
            .args
            .first()
            .filter(|a| a.spread.is_none())
            .map(|a| &*a.expr);
        self.suggest(obj.sym.as_ref(), method, first_arg, &guidance);
    }
}

impl Visit for Annotator<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        let anchor = match stmt {
            Stmt::Decl(Decl::Var(v)) if !v.span.is_dummy() => Some(v.span.lo),
            Stmt::Expr(e) if !e.span.is_dummy() => Some(e.span.lo),
            _ => None,
        };
        if let Some(pos) = anchor {
            self.anchors.push(pos);
        }
        stmt.visit_children_with(self);
        if anchor.is_some() {
            self.anchors.pop();
        }
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        self.inspect_call(call);
        call.visit_children_with(self);
    }
}

/// RTL query methods that may legitimately hang off a wrapper-named binding
/// after conversion; annotating those would be noise.
fn is_rtl_query(method: &str) -> bool {
    const PREFIXES: &[&str] = &["getBy", "getAllBy", "queryBy", "queryAllBy", "findBy", "findAllBy"];
    PREFIXES.iter().any(|p| method.starts_with(p))
}

/// Migration guidance keyed by Enzyme wrapper-method name.
fn guidance_for(method: &str) -> &'static str {
    match method {
        "setState" => {
            "RTL cannot set state directly; drive the UI through props or userEvent and assert on the rendered DOM"
        }
        "state" => "RTL does not expose component state; assert on the rendered output instead",
        "props" | "prop" => {
            "RTL does not expose props; assert on the rendered output, or test the child component directly"
        }
        "instance" => "component instances are unreachable in RTL; test observable behavior instead",
        "ref" => "attach a ref in the test setup or reach the DOM node through a screen query",
        "context" => "wrap the component in its real provider inside render(...) instead of stubbing context",
        "contains" | "containsMatchingElement" | "containsAllMatchingElements" => {
            "locate the content with screen.getByText/getByRole and assert toBeInTheDocument()"
        }
        "matchesElement" | "equals" => {
            "structural element comparison has no RTL equivalent; assert on text, roles, or attributes instead"
        }
        "find" => {
            "no deterministic rewrite for this selector; query the rendered output with screen.getByRole or screen.getByTestId"
        }
        "findWhere" => {
            "replace the predicate search with a concrete query such as screen.getByRole or screen.getByTestId"
        }
        "getDOMNode" => "screen queries already return DOM nodes; use screen.getBy* directly",
        "html" => "use the container returned by render(...) or the toContainHTML matcher",
        "text" => "use screen.getByText or the toHaveTextContent matcher",
        "debug" => "use screen.debug()",
        "update" | "setProps" => "re-render with the rerender(...) function returned by render(...)",
        "simulate" => "dispatch the event with userEvent or fireEvent from @testing-library",
        _ => "no direct RTL equivalent is known; rewrite this call against the rendered DOM",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guidance_covers_known_methods() {
        assert!(guidance_for("setState").contains("state"));
        assert!(guidance_for("getDOMNode").contains("DOM"));
        assert!(guidance_for("somethingNovel").contains("no direct RTL equivalent"));
    }

    #[test]
    fn rtl_queries_are_skipped() {
        assert!(is_rtl_query("getByText"));
        assert!(is_rtl_query("queryAllByRole"));
        assert!(!is_rtl_query("setState"));
    }

    #[test]
    fn dom_hint_lists_test_ids_and_roles() {
        let options = ConvertOptions::new("/a/b.test.jsx").with_rendered_dom(
            r#"<div role="dialog"><span data-testid="row">x</span><span data-testid="row">y</span></div>"#,
        );
        let hint = dom_find_hint(&options).unwrap();
        assert!(hint.contains("test ids [row]"));
        assert!(hint.contains("roles [dialog]"));
    }

    #[test]
    fn dom_hint_absent_without_snapshot() {
        let options = ConvertOptions::new("/a/b.test.jsx");
        assert!(dom_find_hint(&options).is_none());

        let empty = options.with_rendered_dom("<div><span>plain</span></div>");
        assert!(dom_find_hint(&empty).is_none());
    }
}
