// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the JASS-style scripting dialect.
//!
//! Tokenizes source text into a flat token stream for the parser.

mod keywords;
mod lexer;

pub use keywords::{is_keyword, KEYWORDS};
pub use lexer::{tokenize, LexError, LexErrorKind, LexResult, Lexer};
