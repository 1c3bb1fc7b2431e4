//! Codemod engine that rewrites Enzyme test files to React Testing Library.
//!
//! The engine is a fixed pipeline of syntax-tree passes over an swc
//! `Module`: imports are swapped and absolutized, `shallow`/`mount` calls
//! become `render` calls, wrapper bindings are resolved and collapsed,
//! recognizable `.find(...)` selectors become `screen` queries, a family of
//! structural method rewrites runs, and whatever legacy wrapper usage
//! remains is annotated with migration-guidance comments.
//!
//! Each invocation is a pure function of (source text, options) to
//! (rewritten text, diagnostics): no filesystem access, no process-global
//! state, nothing shared across files. Callers own all I/O.
//!
//! ```no_run
//! use enzyme_rtl_codemod::{convert, ConvertOptions};
//!
//! let options = ConvertOptions::new("/project/src/__tests__/Button.test.jsx");
//! let conversion = convert("import { shallow } from 'enzyme';", &options).unwrap();
//! println!("{}", conversion.code);
//! ```

use std::path::PathBuf;

use serde::Deserialize;

pub mod ast;
pub mod diagnostics;
pub mod imports;
pub mod methods;
pub mod queries;
pub mod render;
pub mod suggestions;
pub mod util;
pub mod wrappers;

pub use diagnostics::{codes, Diagnostic, DiagnosticCategory};
pub use suggestions::SUGGESTION_MARKER;

/// Caller-supplied conversion settings, threaded explicitly through the
/// pipeline. No pass reads process-wide configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Attribute name treated as a test-id selector hook.
    pub test_id_attribute: String,
    /// Original absolute path of the file being converted; drives syntax
    /// selection and relative-import absolutization. The engine never
    /// touches the filesystem through it.
    pub file_path: PathBuf,
    /// Externally captured textual snapshot of the test's rendered DOM.
    /// When present, annotations on unconverted `find` calls name the
    /// concrete test ids and roles the snapshot exposes; when absent they
    /// fall back to the generic guidance table.
    pub rendered_dom: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            test_id_attribute: "data-testid".to_string(),
            file_path: PathBuf::new(),
            rendered_dom: None,
        }
    }
}

impl ConvertOptions {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    pub fn with_test_id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.test_id_attribute = attribute.into();
        self
    }

    pub fn with_rendered_dom(mut self, dom: impl Into<String>) -> Self {
        self.rendered_dom = Some(dom.into());
        self
    }
}

/// Result of converting one file.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The rewritten source text, valid and parseable standalone.
    pub code: String,
    /// Warning-level absence diagnostics collected along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Wrapper-binding names discovered by the resolver, in order of first
    /// discovery. Exposed for observability; may be empty.
    pub wrapper_bindings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },
    #[error("file uses both shallow and mount; mixed render primitives are unsupported")]
    MixedRenderPrimitives,
    #[error("failed to serialize rewritten tree")]
    Emit(#[source] std::io::Error),
}

/// Runs the full conversion pipeline over one file's source text.
///
/// Pass order is load-bearing: imports first so inserted declarations are
/// never re-matched by later structural queries; render and wrapper passes
/// next because the selector and suggestion passes key off the names and
/// binding set they produce; serialization last, through the comment store
/// the annotator wrote into.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let _span =
        tracing::debug_span!("convert", file = %options.file_path.display()).entered();

    let ast::ParsedModule {
        mut module,
        source_map,
        comments,
    } = ast::parse(source, &options.file_path)?;

    let mut diagnostics = Vec::new();

    imports::rewrite_imports(&mut module, options, &mut diagnostics);

    let render_fn = render::normalize_render_calls(&mut module, options, &mut diagnostics)?;

    let wrappers = wrappers::resolve_wrapper_bindings(
        &mut module,
        render_fn.as_deref(),
        options,
        &mut diagnostics,
    );

    queries::rewrite_find_calls(&mut module, options);

    methods::rewrite_text_assertions(&mut module);
    methods::rewrite_simulate_calls(&mut module);
    methods::rewrite_exists_assertions(&mut module);
    methods::strip_chain_noise(&mut module);

    suggestions::annotate_unconverted_calls(&module, &wrappers, options, &comments);

    let code = ast::print(&module, source_map, &comments)?;
    Ok(Conversion {
        code,
        diagnostics,
        wrapper_bindings: wrappers.into_iter().collect(),
    })
}
