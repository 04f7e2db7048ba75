// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the JASS-style scripting dialect.
//!
//! Transforms a token stream into an abstract syntax tree.

mod hints;
mod parser;

pub use parser::{
    parse, EndCondition, ParseError, ParseErrorKind, ParseOptions, ParseResult, Parser, DEFAULT_RETRY_BUDGET,
};
