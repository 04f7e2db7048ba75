// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use jass_ast::{Token, TokenKind};

/// Hint for an "expected X" error.
pub fn for_expected(expected: &str, found: &Token) -> Option<&'static str> {
    match (expected, found.kind) {
        ("'then'", TokenKind::Eol) => Some("conditions end with 'then' on the same line"),
        ("'then'", _) => Some("syntax: if <condition> then"),
        ("'to'", _) => Some("syntax: for i 0 to 10"),
        ("'='", _) => Some("syntax: set <name> = <value>"),
        ("')'", TokenKind::Eol) | ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("']'", _) => Some("add ']' to close the index"),
        ("'}'", _) => Some("add '}' to close the object"),
        ("a name", TokenKind::Number) => Some("names can't start with a number"),
        ("a name", TokenKind::Keyword) => Some("keywords can't be used as names"),
        ("a name", _) => Some("names start with a letter, '_', '$' or '#'"),
        ("a field name", _) => Some("object fields look like name: value"),
        _ => None,
    }
}

/// Hint for a token that no rule accepts.
pub fn for_unexpected(found: &Token) -> Option<&'static str> {
    match found.kind {
        TokenKind::Keyword => match found.text() {
            "end" | "endif" | "endloop" | "endfunction" | "endglobals" | "endstruct" | "endfor" => {
                Some("this closes a block that was never opened")
            }
            "else" | "elseif" => Some("'else' must follow an 'if' block"),
            "then" => Some("'then' must follow an 'if' condition"),
            "to" => Some("'to' belongs to a 'for' header"),
            "takes" | "returns" => Some("'takes' and 'returns' belong to a function header"),
            _ => None,
        },
        TokenKind::RParen => Some("unbalanced ')'"),
        TokenKind::RBrace => Some("unbalanced '}'"),
        _ => None,
    }
}
