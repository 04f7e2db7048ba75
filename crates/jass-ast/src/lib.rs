// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax types for the JASS-style scripting dialect.
//!
//! Shared by the lexer, parser, code generator and diagnostics crates.

pub mod node;
pub mod span;
pub mod token;

pub use node::{Ast, AstNode, Comparison, LiteralKind, ObjectField, Param};
pub use span::{LineMap, Span};
pub use token::{Token, TokenKind};
