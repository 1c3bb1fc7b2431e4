//! Warning-level diagnostics emitted by the conversion pipeline.
//!
//! Absences (no enzyme import, no render primitive, no wrapper bindings) are
//! expected conditions, not errors: the pipeline keeps going with degraded
//! coverage and surfaces what it skipped through these records.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub message_text: String,
}

impl Diagnostic {
    pub fn warning(file: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            file: file.into(),
            message_text: message.into(),
        }
    }
}

pub mod codes {
    /// No import declaration sourced from the enzyme package.
    pub const NO_ENZYME_IMPORT: u32 = 1001;
    /// Neither `shallow` nor `mount` is called anywhere in the file.
    pub const NO_RENDER_PRIMITIVE: u32 = 1002;
    /// A render helper was identified but no wrapper bindings were found.
    pub const NO_WRAPPER_BINDINGS: u32 = 1003;
    /// A render primitive is called outside any recognizable declaration.
    pub const NO_RENDER_DECLARATION: u32 = 1004;
}
