// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use jass_ast::{LineMap, Span, Token, TokenKind};
use logos::Logos;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::keywords::is_keyword;

/// Raw token type for logos - classification happens in a second pass.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\x0C]+")]
enum RawToken {
    // Statement separators
    #[token("\n")]
    #[token(";")]
    Eol,

    #[regex(r"//[^\n]*")]
    LineComment,

    /// `true` when the comment was closed.
    #[token("/*", block_comment)]
    BlockComment(bool),

    /// Quoted segment kept verbatim. `true` when the closing quote was found.
    #[token("\"", |lex| quoted(lex, '"'))]
    #[token("'", |lex| quoted(lex, '\''))]
    #[token("`", |lex| quoted(lex, '`'))]
    Quoted(bool),

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(r"[A-Za-z_$#][A-Za-z0-9_$#]*")]
    Word,

    // Never grouped with neighbours.
    #[token("[")]
    #[token("]")]
    #[token(",")]
    #[token(".")]
    Punct,

    // Longest known operator wins, otherwise a single character.
    #[regex(r"==|!=|<=|>=|&&|\|\||->|\+=|-=|\*=|/=|%=|\+\+|--|\*\*|<<|>>")]
    #[regex(r"[-+*/%=<>!&|^~:?@]")]
    Operator,
}

/// Skip a block comment; unterminated comments run to end of input.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(idx) => {
            lex.bump(idx + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Consume up to and including the closing `delim`. A backslash keeps the
/// following character inside the segment.
fn quoted(lex: &mut logos::Lexer<RawToken>, delim: char) -> bool {
    let rest = lex.remainder();
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == delim {
            lex.bump(i + c.len_utf8());
            return true;
        }
    }
    lex.bump(rest.len());
    false
}

/// Maximum number of errors to record. Lexing itself always runs to the end.
const MAX_ERRORS: usize = 50;

/// The lexer for dialect source text.
pub struct Lexer<'a> {
    source: &'a str,
    keep_comments: bool,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, keep_comments: false, errors: Vec::new() }
    }

    /// Emit `//` comments as `Comment` tokens instead of dropping them.
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Tokenize the entire source. Always ends with an `Eof` token.
    #[instrument(level = "debug", skip(self), fields(len = self.source.len()))]
    pub fn tokenize(&mut self) -> LexResult {
        let line_map = LineMap::new(self.source);
        let mut tokens = Vec::new();
        let mut raw = RawToken::lexer(self.source);

        while let Some(result) = raw.next() {
            let range = raw.span();
            let span = Span::new(range.start, range.end);
            let slice = raw.slice();

            let (kind, text) = match result {
                Ok(tok) => match self.classify(tok, slice, span) {
                    Some(pair) => pair,
                    None => continue,
                },
                Err(()) => {
                    let ch = slice.chars().next().unwrap_or('?');
                    self.record(LexError::new(LexErrorKind::UnexpectedChar(ch), span));
                    continue;
                }
            };

            tokens.push(Token::new(kind, text, span).with_line(line_map.line_of(span.start)));
        }

        let end = self.source.len();
        tokens.push(Token::new(TokenKind::Eof, None, Span::point(end)).with_line(line_map.line_of(end)));

        debug!(tokens = tokens.len(), errors = self.errors.len(), "lexed source");
        LexResult { tokens, errors: std::mem::take(&mut self.errors) }
    }

    /// Map a raw token to its public kind and text. `None` drops it.
    fn classify(&mut self, raw: RawToken, slice: &str, span: Span) -> Option<(TokenKind, Option<String>)> {
        let pair = match raw {
            RawToken::Eol => (TokenKind::Eol, None),
            RawToken::LineComment => {
                if !self.keep_comments {
                    return None;
                }
                let body = slice.trim_start_matches('/').trim();
                (TokenKind::Comment, Some(body.to_string()))
            }
            RawToken::BlockComment(closed) => {
                if !closed {
                    self.record(LexError::new(LexErrorKind::UnterminatedComment, span));
                }
                return None;
            }
            RawToken::Quoted(closed) => {
                if !closed {
                    self.record(LexError::new(LexErrorKind::UnterminatedString, span));
                }
                (TokenKind::String, Some(slice.to_string()))
            }
            RawToken::Number => (TokenKind::Number, Some(slice.to_string())),
            RawToken::LParen => (TokenKind::LParen, Some("(".to_string())),
            RawToken::RParen => (TokenKind::RParen, Some(")".to_string())),
            RawToken::LBrace => (TokenKind::LBrace, Some("{".to_string())),
            RawToken::RBrace => (TokenKind::RBrace, Some("}".to_string())),
            RawToken::Word => {
                // The count sigil needs a name after it.
                if slice == "#" {
                    self.record(LexError::new(LexErrorKind::UnexpectedChar('#'), span));
                    return None;
                }
                if is_keyword(slice) {
                    (TokenKind::Keyword, Some(slice.to_ascii_lowercase()))
                } else {
                    (TokenKind::Identifier, Some(slice.to_string()))
                }
            }
            RawToken::Punct | RawToken::Operator => (TokenKind::Operator, Some(slice.to_string())),
        };
        Some(pair)
    }

    fn record(&mut self, error: LexError) {
        debug!(%error, start = error.span.start, "lexical anomaly");
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
    }
}

/// Tokenize `source` with comments dropped.
pub fn tokenize(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}

/// Result of lexing: tokens plus any anomalies found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without anomalies.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// A recovered lexical anomaly.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self.kind {
            LexErrorKind::UnexpectedChar(_) => Some("the character was skipped"),
            LexErrorKind::UnterminatedString => Some("add the closing quote"),
            LexErrorKind::UnterminatedComment => Some("close the comment with '*/'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        tokenize(src)
            .tokens
            .iter()
            .filter(|t| t.text.is_some())
            .map(|t| t.text().to_string())
            .collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_are_case_insensitive_and_lowercased() {
        let result = tokenize("LOCAL Integer x");
        assert_eq!(result.tokens[0].kind, TokenKind::Keyword);
        assert_eq!(result.tokens[0].text(), "local");
        assert_eq!(result.tokens[1].kind, TokenKind::Identifier);
        assert_eq!(result.tokens[1].text(), "Integer");
    }

    #[test]
    fn newlines_and_semicolons_are_eol() {
        assert_eq!(
            kinds("a;b\nc"),
            vec![
                TokenKind::Identifier,
                TokenKind::Eol,
                TokenKind::Identifier,
                TokenKind::Eol,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn strings_are_verbatim() {
        let result = tokenize(r#"call f("a \"b\"", 'c', `d`)"#);
        let strings: Vec<_> = result.tokens.iter().filter(|t| t.kind == TokenKind::String).map(|t| t.text()).collect();
        assert_eq!(strings, vec![r#""a \"b\"""#, "'c'", "`d`"]);
        assert!(result.is_ok());
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let result = tokenize("set s = \"never closed\nset t = 1");
        let last_two: Vec<_> = result.tokens.iter().rev().take(2).map(|t| t.kind).collect();
        assert_eq!(last_two, vec![TokenKind::Eof, TokenKind::String]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn numbers_take_one_fraction() {
        assert_eq!(texts("3.14 42 1.2.3"), vec!["3.14", "42", "1.2", ".", "3"]);
    }

    #[test]
    fn brackets_are_operators() {
        let result = tokenize("xs[0]");
        assert_eq!(result.tokens[1].kind, TokenKind::Operator);
        assert_eq!(result.tokens[1].text(), "[");
        assert_eq!(result.tokens[3].text(), "]");
    }

    #[test]
    fn operators_use_longest_match() {
        assert_eq!(texts("a==b!=c<=d->e"), vec!["a", "==", "b", "!=", "c", "<=", "d", "->", "e"]);
        assert_eq!(texts("x = -1"), vec!["x", "=", "-", "1"]);
        assert_eq!(texts("a,b"), vec!["a", ",", "b"]);
    }

    #[test]
    fn sigils_belong_to_identifiers() {
        let result = tokenize("#items $tmp");
        assert_eq!(result.tokens[0].text(), "#items");
        assert_eq!(result.tokens[1].text(), "$tmp");
        assert!(result.tokens[..2].iter().all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn lone_sigil_is_skipped() {
        let result = tokenize("x = # + 1");
        assert_eq!(texts("x = # + 1"), vec!["x", "=", "+", "1"]);
        assert!(matches!(result.errors[0].kind, LexErrorKind::UnexpectedChar('#')));
    }

    #[test]
    fn comments_dropped_by_default() {
        assert_eq!(kinds("x // note\n/* block */ y"), vec![
            TokenKind::Identifier,
            TokenKind::Eol,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn comments_kept_when_requested() {
        let result = Lexer::new("// hello there\nx").with_comments(true).tokenize();
        assert_eq!(result.tokens[0].kind, TokenKind::Comment);
        assert_eq!(result.tokens[0].text(), "hello there");
    }

    #[test]
    fn unknown_characters_are_skipped_and_reported() {
        let result = tokenize("a \\ b");
        assert_eq!(result.tokens.len(), 3);
        assert!(matches!(result.errors[0].kind, LexErrorKind::UnexpectedChar('\\')));
    }

    #[test]
    fn tokens_carry_lines() {
        let result = tokenize("a\nb");
        assert_eq!(result.tokens[0].line, Some(1));
        assert_eq!(result.tokens[2].line, Some(2));
    }
}
