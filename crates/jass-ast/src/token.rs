// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
///
/// `text` carries the lexeme for everything except `Eol`/`Eof`. Keyword
/// text is lowercased; all other text is kept exactly as written, quotes
/// included for strings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
    pub line: Option<u32>,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// End of statement: newline or `;`.
    Eol,
    Eof,
    Keyword,
    Identifier,
    Number,
    String,
    /// Operator-class lexeme, including `[`, `]`, `,` and `.`.
    Operator,
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// Line comment, only produced when comments are preserved.
    Comment,
}

impl Token {
    pub fn new(kind: TokenKind, text: Option<String>, span: Span) -> Self {
        Self { kind, text, line: None, span }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Lexeme, or an empty string for text-less tokens.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Check kind and, case-insensitively, text.
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.text().eq_ignore_ascii_case(value)
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.is(TokenKind::Operator, symbol)
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eol => "end of line".to_string(),
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Keyword => format!("keyword '{}'", self.text()),
            TokenKind::Identifier => format!("name '{}'", self.text()),
            TokenKind::Number => format!("number {}", self.text()),
            TokenKind::String => "string literal".to_string(),
            TokenKind::Operator => format!("'{}'", self.text()),
            TokenKind::Comment => "comment".to_string(),
            kind => kind.display_name().to_string(),
        }
    }
}

impl TokenKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Eol => "end of line",
            TokenKind::Eof => "end of file",
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comment => "comment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_ignores_case() {
        let tok = Token::new(TokenKind::Keyword, Some("endif".into()), Span::new(0, 5));
        assert!(tok.is_keyword("ENDIF"));
        assert!(!tok.is_operator("endif"));
    }

    #[test]
    fn describe_uses_text() {
        let tok = Token::new(TokenKind::Operator, Some("+=".into()), Span::new(0, 2));
        assert_eq!(tok.describe(), "'+='");
        let eof = Token::new(TokenKind::Eof, None, Span::point(3));
        assert_eq!(eof.describe(), "end of file");
        assert_eq!(eof.text(), "");
    }
}
