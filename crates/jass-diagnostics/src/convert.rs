// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from stage error types to `Diagnostic`.
//!
//! Lexical anomalies never stop compilation, so they surface as warnings.

use jass_lexer::{LexError, LexErrorKind};
use jass_parser::{ParseError, ParseErrorKind};

use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            LexErrorKind::UnexpectedChar(_) => ("E0001", "not part of the language"),
            LexErrorKind::UnterminatedString => ("E0002", "string starts here"),
            LexErrorKind::UnterminatedComment => ("E0003", "comment starts here"),
        };
        let mut diag = Diagnostic::warning(self.to_string()).with_code(code).with_primary(self.span, label);
        if let Some(hint) = self.hint() {
            diag = diag.with_help(hint);
        }
        diag
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            ParseErrorKind::UnexpectedToken(_) => ("E0100", "skipped"),
            ParseErrorKind::UnexpectedEof(_) => ("E0101", "input ends here"),
            ParseErrorKind::Expected { .. } => ("E0102", "here"),
            ParseErrorKind::RetryBudgetExhausted => ("E0103", "parsing stopped here"),
        };
        let mut diag = Diagnostic::error(self.to_string()).with_code(code).with_primary(self.span, label);
        if let Some(opened_at) = self.opened_at {
            diag = diag.with_secondary(opened_at, "block opened here");
        }
        if self.kind == ParseErrorKind::RetryBudgetExhausted {
            diag = diag.with_note("the output only covers the part of the file before this point");
        }
        if let Some(hint) = self.hint() {
            diag = diag.with_help(hint);
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabelStyle, Severity};
    use jass_ast::Span;

    #[test]
    fn lex_errors_are_warnings() {
        let result = jass_lexer::tokenize("x = \"open");
        let diag = result.errors[0].to_diagnostic();
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.clone().map(|c| c.0), Some("E0002".to_string()));
        assert_eq!(diag.message, "unterminated string literal");
        assert_eq!(diag.primary_span(), Some(Span::new(4, 9)));
        assert!(diag.help.is_some());
    }

    #[test]
    fn parse_errors_carry_hints() {
        let tokens = jass_lexer::tokenize("endloop").tokens;
        let result = jass_parser::parse(tokens, &jass_parser::ParseOptions::default());
        let diag = result.errors[0].to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.message, "unexpected keyword 'endloop'");
        assert_eq!(diag.help.as_deref(), Some("this closes a block that was never opened"));
    }

    #[test]
    fn unclosed_block_points_at_its_keyword() {
        let source = "function f()\n  call g()\n";
        let tokens = jass_lexer::tokenize(source).tokens;
        let result = jass_parser::parse(tokens, &jass_parser::ParseOptions::default());
        let diag = result.errors[0].to_diagnostic();
        assert_eq!(diag.code.as_ref().map(|c| c.0.as_str()), Some("E0101"));
        assert_eq!(diag.primary_span(), Some(Span::point(source.len())));
        let secondary: Vec<_> = diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary).collect();
        assert_eq!(secondary.len(), 1);
        assert_eq!(secondary[0].span, Span::new(0, 8));
        assert_eq!(secondary[0].message.as_deref(), Some("block opened here"));
    }

    #[test]
    fn budget_exhaustion_has_note() {
        let error = ParseError {
            kind: ParseErrorKind::RetryBudgetExhausted,
            span: Span::point(0),
            hint: None,
            opened_at: None,
        };
        let diag = error.to_diagnostic();
        assert_eq!(diag.code.map(|c| c.0), Some("E0103".to_string()));
        assert_eq!(diag.notes.len(), 1);
    }
}
