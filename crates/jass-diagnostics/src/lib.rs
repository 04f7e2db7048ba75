// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compiler diagnostics.
//!
//! Lexer and parser errors are converted to a unified `Diagnostic` through
//! the `ToDiagnostic` trait, so the stage crates stay free of rendering
//! concerns. Diagnostics render to colored terminal text or to JSON.

pub mod codes;
pub mod convert;
pub mod formatter;
pub mod json;

use jass_ast::Span;
use serde::Serialize;

pub use formatter::DiagnosticFormatter;

// ============================================================================
// Core Types
// ============================================================================

/// A diagnostic with everything needed for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

/// A labeled source span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub span: Span,
    pub style: LabelStyle,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// An error code like E0100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub String);

// ============================================================================
// Builder API
// ============================================================================

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self { severity, code: None, message: message.into(), labels: Vec::new(), notes: Vec::new(), help: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(ErrorCode(code.into()));
        self
    }

    pub fn with_label(mut self, span: Span, style: LabelStyle, msg: impl Into<String>) -> Self {
        self.labels.push(Label { span, style, message: Some(msg.into()) });
        self
    }

    pub fn with_primary(self, span: Span, msg: impl Into<String>) -> Self {
        self.with_label(span, LabelStyle::Primary, msg)
    }

    pub fn with_secondary(self, span: Span, msg: impl Into<String>) -> Self {
        self.with_label(span, LabelStyle::Secondary, msg)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Returns the primary span (first primary label, or first label).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.style == LabelStyle::Primary).or(self.labels.first()).map(|l| l.span)
    }
}

// ============================================================================
// Conversion Trait
// ============================================================================

/// Convert a stage error into a rich diagnostic.
pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

/// Count diagnostics by severity: `(errors, warnings)`.
pub fn count(diagnostics: &[Diagnostic]) -> (usize, usize) {
    diagnostics.iter().fold((0, 0), |(e, w), d| match d.severity {
        Severity::Error => (e + 1, w),
        Severity::Warning => (e, w + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_parts() {
        let diag = Diagnostic::error("bad thing")
            .with_code("E0100")
            .with_secondary(Span::new(0, 1), "started here")
            .with_primary(Span::new(4, 6), "here")
            .with_note("a note")
            .with_help("try this");
        assert!(diag.is_error());
        assert_eq!(diag.code, Some(ErrorCode("E0100".into())));
        assert_eq!(diag.primary_span(), Some(Span::new(4, 6)));
        assert_eq!(diag.notes, vec!["a note".to_string()]);
        assert_eq!(diag.help.as_deref(), Some("try this"));
    }

    #[test]
    fn primary_span_falls_back_to_first_label() {
        let diag = Diagnostic::warning("w").with_secondary(Span::new(2, 3), "x");
        assert_eq!(diag.primary_span(), Some(Span::new(2, 3)));
        assert_eq!(Diagnostic::warning("w").primary_span(), None);
    }

    #[test]
    fn counts_by_severity() {
        let diags = vec![Diagnostic::error("a"), Diagnostic::warning("b"), Diagnostic::error("c")];
        assert_eq!(count(&diags), (2, 1));
    }
}
